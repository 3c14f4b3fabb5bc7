use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// ISO-8601 year and week a log directory or backup belongs to.
///
/// Ordering follows (year, week), which matches the lexicographic order of
/// both rendered forms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct WeekStamp {
    pub year: i32,
    pub week: u32,
}

impl WeekStamp {
    pub fn of(at: DateTime<Utc>) -> Self {
        let iso = at.iso_week();
        Self {
            year: iso.year(),
            week: iso.week(),
        }
    }

    /// Log directory name, e.g. `2026-W42`.
    pub fn dir_name(&self) -> String {
        format!("{}-W{:02}", self.year, self.week)
    }

    /// Backup file suffix, e.g. `2026W42`.
    pub fn backup_suffix(&self) -> String {
        format!("{}W{:02}", self.year, self.week)
    }
}

impl fmt::Display for WeekStamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dir_name())
    }
}

impl FromStr for WeekStamp {
    type Err = Error;

    /// Accepts both `2026-W42` and `2026W42`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || Error::InvalidWeekStamp(s.to_string());
        let (year, week) = s.split_once('W').ok_or_else(invalid)?;
        let year = year.strip_suffix('-').unwrap_or(year);
        let digits = |part: &str, len: usize| {
            part.len() == len && part.bytes().all(|b| b.is_ascii_digit())
        };
        if !digits(year, 4) || !digits(week, 2) {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let week: u32 = week.parse().map_err(|_| invalid())?;
        if !(1..=53).contains(&week) {
            return Err(invalid());
        }
        Ok(Self { year, week })
    }
}

impl From<WeekStamp> for String {
    fn from(stamp: WeekStamp) -> Self {
        stamp.dir_name()
    }
}

impl TryFrom<String> for WeekStamp {
    type Error = Error;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
