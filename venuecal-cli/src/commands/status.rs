use anyhow::Result;
use chrono::Local;
use owo_colors::OwoColorize;
use venuecal_core::config::VenuecalConfig;
use venuecal_core::store::RecordStore;
use venuecal_core::{CalendarEntry, Reconciler};

use crate::render::date_label;

pub fn run(config: &VenuecalConfig) -> Result<()> {
    let reconciler = Reconciler::new(config.store());
    let dates = reconciler.store().list_dates()?;
    let entries = reconciler.all_events()?;
    let today = Local::now().date_naive();

    let summary = Summary::from_entries(&entries, today);

    println!("📅 {}", config.data_path().display());
    println!("   {} date records", dates.len());
    println!(
        "   {} active, {} cancelled",
        summary.active.green(),
        summary.cancelled.red()
    );

    if let Some(next) = summary.next {
        println!(
            "   next: {} {} {}",
            date_label(next.date, today).bold(),
            next.event.time,
            next.event.title
        );
    }

    Ok(())
}

struct Summary<'a> {
    active: usize,
    cancelled: usize,
    next: Option<&'a CalendarEntry>,
}

impl<'a> Summary<'a> {
    /// `entries` must be sorted by (date, time), as `all_events` returns them.
    fn from_entries(entries: &'a [CalendarEntry], today: chrono::NaiveDate) -> Self {
        let cancelled = entries.iter().filter(|e| e.event.is_cancelled()).count();
        let next = entries
            .iter()
            .find(|e| e.date >= today && e.event.is_active());

        Summary {
            active: entries.len() - cancelled,
            cancelled,
            next,
        }
    }
}
