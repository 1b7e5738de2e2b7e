//! Event types shared by the scraper hand-off, the store and the emitter.
//!
//! `EventInput` is what the scraper produces, `StoredEvent` is what lives in a
//! date record, and `CalendarEntry` is a stored event tagged with its date for
//! downstream consumption.

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};

use crate::error::{VenueCalError, VenueCalResult};

pub(crate) const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M";

/// A freshly scraped event, as handed over by the scraper.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventInput {
    pub id: String,
    pub title: String,
    /// YYYY-MM-DD
    pub date: String,
    /// HH:MM, 24-hour
    pub time: String,
    pub url: String,
}

impl EventInput {
    /// Parse the event date, rejecting anything that is not a real YYYY-MM-DD day.
    pub fn parsed_date(&self) -> VenueCalResult<NaiveDate> {
        parse_date(&self.date)
    }

    /// Check that both date and time are well formed.
    pub fn validate(&self) -> VenueCalResult<NaiveDate> {
        let date = self.parsed_date()?;
        if self.time.len() != 5 || NaiveTime::parse_from_str(&self.time, TIME_FORMAT).is_err() {
            return Err(VenueCalError::InvalidTime {
                id: self.id.clone(),
                time: self.time.clone(),
            });
        }
        Ok(date)
    }
}

/// Everything one scraper run hands over.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScrapeResult {
    pub events: Vec<EventInput>,
    /// Months (YYYY-MM) whose listing pages were fetched successfully
    #[serde(default, alias = "fetchedMonths")]
    pub fetched_months: Vec<String>,
}

/// Lifecycle of a stored event.
///
/// The cancellation timestamp only exists on the cancelled variant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum EventStatus {
    Active,
    Cancelled { cancelled_at: NaiveDateTime },
}

/// An event as persisted inside a date record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoredEvent {
    pub id: String,
    pub title: String,
    pub time: String,
    pub url: String,
    #[serde(flatten)]
    pub status: EventStatus,
}

impl StoredEvent {
    /// Build the active form of a scraped event. Used for new events, detail
    /// updates and reactivations alike.
    pub fn active_from(input: &EventInput) -> Self {
        StoredEvent {
            id: input.id.clone(),
            title: input.title.clone(),
            time: input.time.clone(),
            url: input.url.clone(),
            status: EventStatus::Active,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == EventStatus::Active
    }

    pub fn is_cancelled(&self) -> bool {
        !self.is_active()
    }

    pub fn cancelled_at(&self) -> Option<NaiveDateTime> {
        match self.status {
            EventStatus::Active => None,
            EventStatus::Cancelled { cancelled_at } => Some(cancelled_at),
        }
    }

    pub fn cancel(&mut self, at: NaiveDateTime) {
        self.status = EventStatus::Cancelled { cancelled_at: at };
    }
}

/// A stored event tagged with its calendar date.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CalendarEntry {
    pub date: NaiveDate,
    #[serde(flatten)]
    pub event: StoredEvent,
}

pub(crate) fn parse_date(s: &str) -> VenueCalResult<NaiveDate> {
    // chrono accepts unpadded fields; keys must be exactly YYYY-MM-DD
    if s.len() != 10 {
        return Err(VenueCalError::InvalidDate(s.to_string()));
    }
    NaiveDate::parse_from_str(s, DATE_FORMAT).map_err(|_| VenueCalError::InvalidDate(s.to_string()))
}
