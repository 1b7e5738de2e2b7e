use std::collections::BTreeMap;

use chrono::NaiveDate;

use crate::date_record::DateRecord;
use crate::error::VenueCalResult;
use crate::store::RecordStore;

/// In-memory store, mainly for tests.
#[derive(Debug, Default, Clone)]
pub struct MemoryStore {
    records: BTreeMap<NaiveDate, DateRecord>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl RecordStore for MemoryStore {
    fn load(&self, date: NaiveDate) -> Option<DateRecord> {
        self.records.get(&date).cloned()
    }

    fn save(&mut self, record: &DateRecord) -> VenueCalResult<()> {
        self.records.insert(record.date, record.clone());
        Ok(())
    }

    fn list_dates(&self) -> VenueCalResult<Vec<NaiveDate>> {
        Ok(self.records.keys().copied().collect())
    }
}
