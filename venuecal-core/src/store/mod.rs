//! Date-keyed record storage.
//!
//! The reconciliation engine only talks to a [`RecordStore`]. Production
//! runs use [`JsonDirStore`] (one JSON file per date), tests use
//! [`MemoryStore`].

mod json_dir;
mod memory;

pub use json_dir::JsonDirStore;
pub use memory::MemoryStore;

use chrono::NaiveDate;

use crate::date_record::DateRecord;
use crate::error::VenueCalResult;

pub trait RecordStore {
    /// Load the record for `date`. Missing, unreadable and malformed records
    /// all come back as `None`.
    fn load(&self, date: NaiveDate) -> Option<DateRecord>;

    /// Persist a record under its own date, replacing any previous one.
    fn save(&mut self, record: &DateRecord) -> VenueCalResult<()>;

    /// Every date that has a record, ascending.
    fn list_dates(&self) -> VenueCalResult<Vec<NaiveDate>>;
}
