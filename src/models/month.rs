//! Review month representation
//!
//! The review workflow is keyed on calendar months written as `YYYY-MM`
//! tokens, both in CLI arguments and in snapshot/change file names.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GrantwatchError;

/// A calendar month (e.g., "2025-07")
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Month {
    year: i32,
    month: u32,
}

impl Month {
    /// Create a month from its parts
    ///
    /// # Panics
    ///
    /// Panics if `month` is not in `1..=12`. Use [`Month::parse`] for
    /// untrusted input.
    pub fn new(year: i32, month: u32) -> Self {
        assert!((1..=12).contains(&month), "month out of range: {}", month);
        Self { year, month }
    }

    /// Parse a strict `YYYY-MM` token
    pub fn parse(s: &str) -> Result<Self, GrantwatchError> {
        let s = s.trim();
        let invalid = || GrantwatchError::Validation(format!("Invalid month token: '{}'", s));

        let (year_part, month_part) = s.split_once('-').ok_or_else(invalid)?;
        if year_part.len() != 4 || month_part.len() != 2 {
            return Err(invalid());
        }

        let year: i32 = year_part.parse().map_err(|_| invalid())?;
        let month: u32 = month_part.parse().map_err(|_| invalid())?;

        if !(1..=12).contains(&month) {
            return Err(GrantwatchError::Validation(format!(
                "Invalid month: {}",
                month
            )));
        }

        Ok(Self { year, month })
    }

    /// The month containing the given date
    pub fn containing(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The previous calendar month relative to today, the default review
    /// period for aggregation and auditing
    pub fn previous_month() -> Self {
        Self::containing(chrono::Local::now().date_naive()).prev()
    }

    /// The month before this one
    pub fn prev(&self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// Whether the given date falls within this month
    pub fn contains(&self, date: NaiveDate) -> bool {
        date.year() == self.year && date.month() == self.month
    }

    /// Year component
    pub fn year(&self) -> i32 {
        self.year
    }

    /// Month component (1-12)
    pub fn month(&self) -> u32 {
        self.month
    }
}

impl fmt::Display for Month {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for Month {
    type Err = GrantwatchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for Month {
    type Error = GrantwatchError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        Self::parse(&s)
    }
}

impl From<Month> for String {
    fn from(m: Month) -> Self {
        m.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_valid() {
        let month = Month::parse("2025-07").unwrap();
        assert_eq!(month, Month::new(2025, 7));
        assert_eq!(month.to_string(), "2025-07");
    }

    #[test]
    fn test_parse_rejects_loose_formats() {
        assert!(Month::parse("2025-7").is_err());
        assert!(Month::parse("25-07").is_err());
        assert!(Month::parse("2025-13").is_err());
        assert!(Month::parse("2025/07").is_err());
        assert!(Month::parse("2025-07-01").is_err());
    }

    #[test]
    fn test_prev_wraps_year() {
        assert_eq!(Month::new(2025, 1).prev(), Month::new(2024, 12));
        assert_eq!(Month::new(2025, 7).prev(), Month::new(2025, 6));
    }

    #[test]
    fn test_contains() {
        let month = Month::new(2025, 7);
        assert!(month.contains(NaiveDate::from_ymd_opt(2025, 7, 15).unwrap()));
        assert!(!month.contains(NaiveDate::from_ymd_opt(2025, 8, 1).unwrap()));
    }

    #[test]
    fn test_serde_round_trip() {
        let month = Month::new(2025, 7);
        let json = serde_json::to_string(&month).unwrap();
        assert_eq!(json, "\"2025-07\"");
        let back: Month = serde_json::from_str(&json).unwrap();
        assert_eq!(back, month);
    }
}
