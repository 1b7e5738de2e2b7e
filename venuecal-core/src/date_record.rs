//! The durable unit of storage: all events of one calendar date.

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::event::StoredEvent;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DateRecord {
    pub date: NaiveDate,
    pub updated_at: NaiveDateTime,
    /// Unique by id, ordered by time
    #[serde(default)]
    pub events: Vec<StoredEvent>,
}

impl DateRecord {
    pub fn new(date: NaiveDate, updated_at: NaiveDateTime, events: Vec<StoredEvent>) -> Self {
        DateRecord {
            date,
            updated_at,
            events,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }
}
