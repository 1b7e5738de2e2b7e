//! Per-date merge of stored and freshly scraped events.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::event::{EventInput, StoredEvent};
use crate::reconcile::SyncStats;

/// What the merge needs to know about the date being processed.
#[derive(Debug, Clone, Copy)]
pub(crate) struct MergeContext {
    /// The date is today or later
    pub upcoming: bool,
    /// The date's month was fetched in this run
    pub can_cancel: bool,
    pub now: NaiveDateTime,
}

impl MergeContext {
    fn may_cancel(&self, event: &StoredEvent) -> bool {
        self.upcoming && self.can_cancel && event.is_active()
    }
}

/// Merge one date's stored events with the events scraped for it.
///
/// Scraped events are always written active. Stored events that were not
/// scraped are kept, and cancelled when the context allows it. The result is
/// unique by id and stably sorted by time.
pub(crate) fn merge_events(
    existing: Vec<StoredEvent>,
    scraped: &[EventInput],
    ctx: &MergeContext,
    stats: &mut SyncStats,
) -> Vec<StoredEvent> {
    let mut merged = Vec::with_capacity(existing.len() + scraped.len());

    let existing_by_id: HashMap<&str, &StoredEvent> =
        existing.iter().map(|e| (e.id.as_str(), e)).collect();

    for input in scraped {
        let event = StoredEvent::active_from(input);
        match existing_by_id.get(input.id.as_str()) {
            None => stats.created += 1,
            Some(prev) if prev.is_cancelled() => stats.reactivated += 1,
            Some(prev) if **prev != event => stats.updated += 1,
            Some(_) => {}
        }
        merged.push(event);
    }

    let scraped_ids: HashSet<&str> = scraped.iter().map(|e| e.id.as_str()).collect();

    // A repeated stored id keeps its first position and its last value.
    let mut leftovers: Vec<StoredEvent> = Vec::new();
    for event in existing {
        if scraped_ids.contains(event.id.as_str()) {
            continue;
        }
        match leftovers.iter_mut().find(|e| e.id == event.id) {
            Some(slot) => *slot = event,
            None => leftovers.push(event),
        }
    }

    for mut event in leftovers {
        if ctx.may_cancel(&event) {
            event.cancel(ctx.now);
            stats.cancelled += 1;
        }
        merged.push(event);
    }

    merged.sort_by(|a, b| a.time.cmp(&b.time));
    merged
}
