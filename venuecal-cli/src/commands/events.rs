use anyhow::Result;
use chrono::{Local, NaiveDate};
use owo_colors::OwoColorize;
use venuecal_core::config::VenuecalConfig;
use venuecal_core::{CalendarEntry, Reconciler};

use crate::render::{Render, date_label};

pub fn run(
    config: &VenuecalConfig,
    from: Option<NaiveDate>,
    to: Option<NaiveDate>,
    cancelled_only: bool,
) -> Result<()> {
    let today = Local::now().date_naive();
    let from = from.unwrap_or(today);

    let reconciler = Reconciler::new(config.store());
    let entries: Vec<CalendarEntry> = reconciler
        .all_events()?
        .into_iter()
        .filter(|e| e.date >= from && to.is_none_or(|to| e.date <= to))
        .filter(|e| !cancelled_only || e.event.is_cancelled())
        .collect();

    if entries.is_empty() {
        println!("{}", "No events found".dimmed());
        return Ok(());
    }

    let mut current_date: Option<NaiveDate> = None;

    for entry in &entries {
        if current_date != Some(entry.date) {
            if current_date.is_some() {
                println!();
            }
            println!("{}", date_label(entry.date, today).bold());
            current_date = Some(entry.date);
        }
        println!("{}", entry.render());
    }

    Ok(())
}
