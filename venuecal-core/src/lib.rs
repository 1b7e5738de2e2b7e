//! Core of venuecal: keeps a date-sharded record of events scraped from a
//! venue website and reconciles each new scrape against it.
//!
//! - `event` holds the scraper hand-off, stored and emitted event types
//! - `store` holds the `RecordStore` trait with JSON-directory and in-memory backends
//! - `reconcile` holds the merge engine and its cancellation rules

pub mod config;
pub mod date_record;
pub mod error;
pub mod event;
pub mod fetch_window;
pub mod reconcile;
pub mod store;

pub use date_record::DateRecord;
pub use error::{VenueCalError, VenueCalResult};
pub use event::{CalendarEntry, EventInput, EventStatus, ScrapeResult, StoredEvent};
pub use reconcile::{Reconciler, SyncStats};
