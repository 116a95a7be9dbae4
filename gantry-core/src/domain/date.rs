//! Reference dates and the shared time origin

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Synthetic time origin (T0) shared by every reference date in a run
///
/// Intervals are laid out relative to this instant so timelines for different
/// dates share one axis without colliding with real calendar time.
pub const ANCHOR: NaiveDateTime = match NaiveDate::from_ymd_opt(1970, 1, 1) {
    Some(date) => date.and_time(NaiveTime::MIN),
    None => panic!("invalid anchor date"),
};

/// The "as of" date used to pick which past execution's duration applies
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReferenceDate(NaiveDate);

impl ReferenceDate {
    pub fn new(date: NaiveDate) -> Self {
        Self(date)
    }

    /// Build a reference date from calendar parts, `None` if the date does not exist
    pub fn from_ymd(year: i32, month: u32, day: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day).map(Self)
    }

    pub fn date(&self) -> NaiveDate {
        self.0
    }

    /// Suffix appended to task labels, e.g. `" 04-01-17"`
    pub fn label_suffix(&self) -> String {
        self.0.format(" %d-%m-%y").to_string()
    }
}

impl fmt::Display for ReferenceDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format("%Y-%m-%d"))
    }
}

impl FromStr for ReferenceDate {
    type Err = chrono::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").map(Self)
    }
}

impl From<NaiveDate> for ReferenceDate {
    fn from(date: NaiveDate) -> Self {
        Self(date)
    }
}
