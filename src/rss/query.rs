//! Turning command-line date selections into feed queries.

use chrono::{Days, NaiveDate};
use clap::ValueEnum;
use std::fmt;

/// Dates named relative to the current UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum RelativeDay {
    Today,
    Yesterday,
    DayBefore,
}

impl RelativeDay {
    pub fn days_back(self) -> u64 {
        match self {
            RelativeDay::Today => 0,
            RelativeDay::Yesterday => 1,
            RelativeDay::DayBefore => 2,
        }
    }

    pub fn resolve(self, today: NaiveDate) -> NaiveDate {
        today
            .checked_sub_days(Days::new(self.days_back()))
            .unwrap_or(today)
    }
}

impl fmt::Display for RelativeDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RelativeDay::Today => write!(f, "today"),
            RelativeDay::Yesterday => write!(f, "yesterday"),
            RelativeDay::DayBefore => write!(f, "day-before"),
        }
    }
}

/// What a single invocation asks of the feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DateQuery {
    /// Every dated entry.
    All,
    /// Only the earliest and latest available dates.
    Range,
    /// Entries for one calendar date.
    On(NaiveDate),
}

impl DateQuery {
    /// Picks the query from the CLI selections; `--date-range` beats a date.
    pub fn from_selection(
        date_range: bool,
        date: Option<NaiveDate>,
        relative: Option<RelativeDay>,
        today: NaiveDate,
    ) -> Self {
        if date_range {
            return DateQuery::Range;
        }
        match (date, relative) {
            (Some(date), _) => DateQuery::On(date),
            (None, Some(relative)) => DateQuery::On(relative.resolve(today)),
            (None, None) => DateQuery::All,
        }
    }
}
