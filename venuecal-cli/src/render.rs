//! Terminal rendering for venuecal-core types.

use chrono::NaiveDate;
use owo_colors::OwoColorize;
use venuecal_core::{CalendarEntry, SyncStats};

/// Extension trait for TUI rendering with colors.
pub trait Render {
    fn render(&self) -> String;
}

impl Render for CalendarEntry {
    fn render(&self) -> String {
        let event = &self.event;
        match event.cancelled_at() {
            None => format!("  {} {}", event.time, event.title),
            Some(at) => format!(
                "  {} {} {}",
                event.time.dimmed(),
                event.title.strikethrough().red(),
                format!("(cancelled {})", at.format("%Y-%m-%d %H:%M")).dimmed()
            ),
        }
    }
}

impl Render for SyncStats {
    fn render(&self) -> String {
        if self.is_quiet() {
            return format!(
                "{} ({} dates checked)",
                "Everything up to date".green(),
                self.dates_checked
            );
        }

        let mut parts = Vec::new();
        if self.created > 0 {
            parts.push(format!("{} new", self.created).green().to_string());
        }
        if self.updated > 0 {
            parts.push(format!("{} updated", self.updated).yellow().to_string());
        }
        if self.reactivated > 0 {
            parts.push(format!("{} reactivated", self.reactivated).cyan().to_string());
        }
        if self.cancelled > 0 {
            parts.push(format!("{} cancelled", self.cancelled).red().to_string());
        }

        format!("Synced {} across {} dates", parts.join(", "), self.dates_written)
    }
}

/// Format a date as a human-readable label (e.g. "Today", "Tomorrow", "Wed Feb 25")
pub fn date_label(date: NaiveDate, today: NaiveDate) -> String {
    match (date - today).num_days() {
        0 => "Today".to_string(),
        1 => "Tomorrow".to_string(),
        _ => date.format("%a %b %-d %Y").to_string(),
    }
}
