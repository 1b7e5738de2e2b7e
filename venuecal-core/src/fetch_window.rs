//! Months confirmed as fetched during a scrape run.

use std::collections::BTreeSet;

use chrono::{Datelike, NaiveDate};

use crate::error::{VenueCalError, VenueCalResult};

/// Set of (year, month) pairs the scraper fetched successfully.
///
/// An empty set means "unknown": cancellation is allowed everywhere.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FetchedMonths {
    months: BTreeSet<(i32, u32)>,
}

impl FetchedMonths {
    /// Parse YYYY-MM tokens.
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> VenueCalResult<Self> {
        let months = tokens
            .iter()
            .map(|t| parse_month(t.as_ref()))
            .collect::<VenueCalResult<_>>()?;
        Ok(FetchedMonths { months })
    }

    pub fn is_unrestricted(&self) -> bool {
        self.months.is_empty()
    }

    /// Whether disappeared events on `date` may be cancelled in this run.
    pub fn can_cancel(&self, date: NaiveDate) -> bool {
        self.is_unrestricted() || self.months.contains(&(date.year(), date.month()))
    }
}

fn parse_month(token: &str) -> VenueCalResult<(i32, u32)> {
    let invalid = || VenueCalError::InvalidMonth(token.to_string());

    if token.len() != 7 {
        return Err(invalid());
    }
    let first = NaiveDate::parse_from_str(&format!("{token}-01"), "%Y-%m-%d").map_err(|_| invalid())?;
    Ok((first.year(), first.month()))
}
