//! Reconciliation of scraped listings against the date-sharded store.
//!
//! One run visits every date that either has a stored record or appears in
//! the scraped input, merges the two per date and writes the result back.
//! Stored events are never removed: events that vanish from the site are
//! marked cancelled (for upcoming dates whose month was fetched), and
//! cancelled events that come back are reactivated.

mod merge;

use std::collections::{BTreeMap, BTreeSet};

use chrono::{Local, NaiveDate, NaiveDateTime, SubsecRound};
use serde::Serialize;

use crate::date_record::DateRecord;
use crate::error::VenueCalResult;
use crate::event::{CalendarEntry, EventInput};
use crate::fetch_window::FetchedMonths;
use crate::store::RecordStore;
use merge::{MergeContext, merge_events};

/// What a reconcile run changed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SyncStats {
    pub created: usize,
    pub updated: usize,
    pub reactivated: usize,
    pub cancelled: usize,
    /// Dates visited, stored or scraped
    pub dates_checked: usize,
    pub dates_written: usize,
}

impl SyncStats {
    /// True when no event changed state or details.
    pub fn is_quiet(&self) -> bool {
        self.created == 0 && self.updated == 0 && self.reactivated == 0 && self.cancelled == 0
    }
}

pub struct Reconciler<S> {
    store: S,
}

impl<S: RecordStore> Reconciler<S> {
    pub fn new(store: S) -> Self {
        Reconciler { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Fold a scrape run into the store, using the local clock for "now".
    pub fn reconcile(
        &mut self,
        scraped: &[EventInput],
        fetched_months: &[String],
    ) -> VenueCalResult<SyncStats> {
        let now = Local::now().naive_local().trunc_subsecs(0);
        self.reconcile_at(scraped, fetched_months, now)
    }

    /// Fold a scrape run into the store as of `now`.
    ///
    /// Every record written by one call carries `now` as its `updated_at`,
    /// and `now.date()` decides which dates count as past. Input is validated
    /// up front, so a malformed date, time or month fails before any write.
    pub fn reconcile_at(
        &mut self,
        scraped: &[EventInput],
        fetched_months: &[String],
        now: NaiveDateTime,
    ) -> VenueCalResult<SyncStats> {
        let months = FetchedMonths::parse(fetched_months)?;
        let scraped_by_date = group_by_date(scraped)?;
        let today = now.date();

        let dates: BTreeSet<NaiveDate> = self
            .store
            .list_dates()?
            .into_iter()
            .chain(scraped_by_date.keys().copied())
            .collect();

        let mut stats = SyncStats::default();

        for date in dates {
            let existing = self.store.load(date).map(|r| r.events).unwrap_or_default();
            let incoming = scraped_by_date.get(&date).map(Vec::as_slice).unwrap_or_default();

            let ctx = MergeContext {
                upcoming: date >= today,
                can_cancel: months.can_cancel(date),
                now,
            };

            let merged = merge_events(existing, incoming, &ctx, &mut stats);
            stats.dates_checked += 1;

            tracing::debug!(
                %date,
                scraped = incoming.len(),
                events = merged.len(),
                can_cancel = ctx.can_cancel,
                "merged date"
            );

            if merged.is_empty() {
                continue;
            }

            self.store.save(&DateRecord::new(date, now, merged))?;
            stats.dates_written += 1;
        }

        tracing::info!(
            created = stats.created,
            updated = stats.updated,
            reactivated = stats.reactivated,
            cancelled = stats.cancelled,
            checked = stats.dates_checked,
            written = stats.dates_written,
            "reconcile finished"
        );

        Ok(stats)
    }

    /// Every stored event tagged with its date, sorted by (date, time).
    pub fn all_events(&self) -> VenueCalResult<Vec<CalendarEntry>> {
        let mut entries: Vec<CalendarEntry> = Vec::new();

        for date in self.store.list_dates()? {
            let Some(record) = self.store.load(date) else {
                continue;
            };
            entries.extend(
                record
                    .events
                    .into_iter()
                    .map(|event| CalendarEntry { date, event }),
            );
        }

        entries.sort_by(|a, b| a.date.cmp(&b.date).then_with(|| a.event.time.cmp(&b.event.time)));
        Ok(entries)
    }
}

/// Group scraped events by date, keeping one event per id.
///
/// A repeated id on the same date replaces the earlier one in place.
fn group_by_date(scraped: &[EventInput]) -> VenueCalResult<BTreeMap<NaiveDate, Vec<EventInput>>> {
    let mut by_date: BTreeMap<NaiveDate, Vec<EventInput>> = BTreeMap::new();

    for input in scraped {
        let date = input.validate()?;
        let day = by_date.entry(date).or_default();

        match day.iter_mut().find(|e| e.id == input.id) {
            Some(slot) => {
                tracing::warn!(id = %input.id, %date, "duplicate event id in scraped input, keeping the last one");
                *slot = input.clone();
            }
            None => day.push(input.clone()),
        }
    }

    Ok(by_date)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::VenueCalError;
    use crate::event::{EventStatus, StoredEvent};
    use crate::store::MemoryStore;

    fn at(s: &str) -> NaiveDateTime {
        NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").unwrap()
    }

    fn date(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    /// "Today" for every test below is 2026-03-01.
    fn now() -> NaiveDateTime {
        at("2026-03-01T09:00:00")
    }

    fn later() -> NaiveDateTime {
        at("2026-03-02T09:00:00")
    }

    fn input(id: &str, d: &str, time: &str) -> EventInput {
        EventInput {
            id: id.to_string(),
            title: format!("Event {id}"),
            date: d.to_string(),
            time: time.to_string(),
            url: format!("https://example.com/event/{id}/"),
        }
    }

    fn months(ms: &[&str]) -> Vec<String> {
        ms.iter().map(|m| m.to_string()).collect()
    }

    fn reconciler() -> Reconciler<MemoryStore> {
        Reconciler::new(MemoryStore::new())
    }

    fn events_on(r: &Reconciler<MemoryStore>, d: &str) -> Vec<StoredEvent> {
        r.store().load(date(d)).map(|rec| rec.events).unwrap_or_default()
    }

    #[test]
    fn test_new_event_is_stored_active() {
        let mut r = reconciler();

        let stats = r
            .reconcile_at(&[input("e1", "2099-01-15", "18:00")], &[], now())
            .unwrap();

        let record = r.store().load(date("2099-01-15")).unwrap();
        assert_eq!(record.date, date("2099-01-15"));
        assert_eq!(record.updated_at, now());
        assert_eq!(record.events.len(), 1);
        assert_eq!(record.events[0].id, "e1");
        assert_eq!(record.events[0].status, EventStatus::Active);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.dates_written, 1);
    }

    #[test]
    fn test_future_disappearance_cancels() {
        let mut r = reconciler();
        let fetched = months(&["2026-04"]);

        r.reconcile_at(&[input("e1", "2026-04-10", "18:00")], &fetched, now())
            .unwrap();
        let stats = r.reconcile_at(&[], &fetched, later()).unwrap();

        let events = events_on(&r, "2026-04-10");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].cancelled_at(), Some(later()));
        assert_eq!(stats.cancelled, 1);
    }

    #[test]
    fn test_unfetched_month_is_protected() {
        let mut r = reconciler();

        r.reconcile_at(&[input("e1", "2026-04-10", "18:00")], &months(&["2026-04"]), now())
            .unwrap();
        r.reconcile_at(&[], &months(&["2026-03", "2026-05"]), later())
            .unwrap();

        let events = events_on(&r, "2026-04-10");
        assert!(events[0].is_active());
        assert_eq!(events[0].cancelled_at(), None);
    }

    #[test]
    fn test_empty_fetched_months_allows_cancellation_everywhere() {
        let mut r = reconciler();

        r.reconcile_at(&[input("e1", "2030-11-02", "18:00")], &[], now())
            .unwrap();
        r.reconcile_at(&[], &[], later()).unwrap();

        assert!(events_on(&r, "2030-11-02")[0].is_cancelled());
    }

    #[test]
    fn test_past_events_are_frozen() {
        let mut store = MemoryStore::new();
        let past = StoredEvent::active_from(&input("old", "2026-02-20", "18:00"));
        store
            .save(&DateRecord::new(date("2026-02-20"), at("2026-01-01T10:00:00"), vec![past.clone()]))
            .unwrap();
        let mut r = Reconciler::new(store);

        r.reconcile_at(&[], &[], now()).unwrap();
        r.reconcile_at(&[], &months(&["2026-02"]), now()).unwrap();

        assert_eq!(events_on(&r, "2026-02-20"), vec![past]);
    }

    #[test]
    fn test_today_counts_as_upcoming() {
        let mut r = reconciler();

        r.reconcile_at(&[input("e1", "2026-03-01", "20:00")], &[], at("2026-02-28T12:00:00"))
            .unwrap();
        r.reconcile_at(&[], &[], now()).unwrap();

        assert!(events_on(&r, "2026-03-01")[0].is_cancelled());
    }

    #[test]
    fn test_reactivation_clears_cancelled_at() {
        let mut r = reconciler();
        let scraped = [input("e1", "2026-05-01", "18:00")];

        r.reconcile_at(&scraped, &[], now()).unwrap();
        r.reconcile_at(&[], &[], now()).unwrap();
        assert!(events_on(&r, "2026-05-01")[0].is_cancelled());

        let stats = r.reconcile_at(&scraped, &[], later()).unwrap();

        let events = events_on(&r, "2026-05-01");
        assert_eq!(events[0].status, EventStatus::Active);
        assert_eq!(stats.reactivated, 1);
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        let mut r = reconciler();
        let scraped = [
            input("b", "2026-04-10", "20:00"),
            input("a", "2026-04-10", "18:00"),
            input("c", "2026-06-01", "19:30"),
        ];
        let fetched = months(&["2026-04", "2026-06"]);

        r.reconcile_at(&scraped, &fetched, now()).unwrap();
        let first = r.all_events().unwrap();
        let stats = r.reconcile_at(&scraped, &fetched, later()).unwrap();

        assert_eq!(r.all_events().unwrap(), first);
        assert!(stats.is_quiet());
        assert_eq!(stats.dates_checked, 2);
        assert_eq!(stats.dates_written, 2);
        assert_eq!(r.store().load(date("2026-04-10")).unwrap().updated_at, later());
    }

    #[test]
    fn test_one_timestamp_per_run() {
        let mut r = reconciler();
        let scraped = [
            input("a", "2026-04-10", "18:00"),
            input("b", "2026-05-10", "18:00"),
        ];

        r.reconcile_at(&scraped, &[], now()).unwrap();

        for d in r.store().list_dates().unwrap() {
            assert_eq!(r.store().load(d).unwrap().updated_at, now());
        }
    }

    #[test]
    fn test_moved_event_cancels_old_date() {
        let mut r = reconciler();

        r.reconcile_at(&[input("e1", "2026-03-06", "18:00")], &[], now())
            .unwrap();
        r.reconcile_at(&[input("e1-new", "2026-03-11", "18:00")], &[], later())
            .unwrap();

        assert!(events_on(&r, "2026-03-06")[0].is_cancelled());
        assert!(events_on(&r, "2026-03-11")[0].is_active());
    }

    #[test]
    fn test_events_are_never_dropped() {
        let mut r = reconciler();

        r.reconcile_at(
            &[input("a", "2026-04-10", "18:00"), input("b", "2026-04-10", "20:00")],
            &[],
            now(),
        )
        .unwrap();
        r.reconcile_at(&[input("c", "2026-04-10", "19:00")], &[], later())
            .unwrap();

        let events = events_on(&r, "2026-04-10");
        let ids: Vec<_> = events.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c", "b"]);
        assert!(events[0].is_cancelled());
        assert!(events[1].is_active());
        assert!(events[2].is_cancelled());
    }

    #[test]
    fn test_stored_dates_are_checked_without_scrape() {
        let mut r = reconciler();
        let scraped = [
            input("a", "2026-04-10", "18:00"),
            input("b", "2026-05-10", "18:00"),
        ];
        r.reconcile_at(&scraped, &months(&["2026-04", "2026-05"]), now())
            .unwrap();

        let stats = r
            .reconcile_at(&[input("c", "2026-06-01", "18:00")], &months(&["2026-06"]), later())
            .unwrap();

        assert_eq!(stats.dates_checked, 3);
        assert_eq!(stats.dates_written, 3);
        assert_eq!(stats.created, 1);
        assert_eq!(stats.cancelled, 0);
    }

    #[test]
    fn test_empty_run_on_empty_store_writes_nothing() {
        let mut r = reconciler();

        let stats = r.reconcile_at(&[], &[], now()).unwrap();

        assert!(r.store().is_empty());
        assert_eq!(stats, SyncStats::default());
    }

    #[test]
    fn test_duplicate_scraped_id_last_wins() {
        let mut r = reconciler();
        let mut second = input("e1", "2026-04-10", "21:00");
        second.title = "Second".to_string();

        r.reconcile_at(&[input("e1", "2026-04-10", "18:00"), second], &[], now())
            .unwrap();

        let events = events_on(&r, "2026-04-10");
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].title, "Second");
        assert_eq!(events[0].time, "21:00");
    }

    #[test]
    fn test_invalid_input_fails_before_any_write() {
        let mut r = reconciler();
        let scraped = [
            input("ok", "2026-04-10", "18:00"),
            input("bad", "2026-04-31", "18:00"),
        ];

        let err = r.reconcile_at(&scraped, &[], now()).unwrap_err();

        assert!(matches!(err, VenueCalError::InvalidDate(_)));
        assert!(r.store().is_empty());
    }

    #[test]
    fn test_invalid_month_is_fatal() {
        let mut r = reconciler();

        let err = r
            .reconcile_at(&[input("ok", "2026-04-10", "18:00")], &months(&["April"]), now())
            .unwrap_err();

        assert!(matches!(err, VenueCalError::InvalidMonth(_)));
        assert!(r.store().is_empty());
    }

    #[test]
    fn test_all_events_sorted_by_date_then_time() {
        let mut r = reconciler();
        let scraped = [
            input("late", "2026-04-20", "21:00"),
            input("next", "2026-05-01", "09:00"),
            input("early", "2026-04-20", "08:00"),
            input("first", "2026-03-15", "23:00"),
        ];

        r.reconcile_at(&scraped, &[], now()).unwrap();
        let all = r.all_events().unwrap();

        let order: Vec<_> = all.iter().map(|e| (e.date.to_string(), e.event.id.clone())).collect();
        assert_eq!(
            order,
            vec![
                ("2026-03-15".to_string(), "first".to_string()),
                ("2026-04-20".to_string(), "early".to_string()),
                ("2026-04-20".to_string(), "late".to_string()),
                ("2026-05-01".to_string(), "next".to_string()),
            ]
        );
    }
}
