//! Month bucket identifiers.
//!
//! A [`MonthKey`] is the `YYYY-MM` label every monthly bucket is stored under.
//! The year is always rendered with four digits so that the textual form sorts
//! the same way as the chronological one, which lets the database compare keys
//! as plain strings.

use std::{fmt, str::FromStr};

use chrono::{Datelike, Local, NaiveDate};

use crate::{EngineError, ResultEngine};

/// A calendar month, ordered chronologically.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    pub fn new(year: i32, month: u32) -> ResultEngine<Self> {
        if !(1..=12).contains(&month) || !(0..=9999).contains(&year) {
            return Err(EngineError::InvalidMonthKey(format!("{year:04}-{month:02}")));
        }
        Ok(Self { year, month })
    }

    /// The month containing `date`.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month of the server's local clock.
    pub fn current() -> Self {
        Self::from_date(Local::now().date_naive())
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    pub fn previous(self) -> Self {
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

    pub fn first_day(&self) -> ResultEngine<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
            .ok_or_else(|| EngineError::InvalidMonthKey(self.to_string()))
    }

    /// `count` consecutive months starting at (and including) `self`.
    pub fn span(self, count: usize) -> impl Iterator<Item = MonthKey> {
        std::iter::successors(Some(self), |key| Some(key.next())).take(count)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = EngineError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || EngineError::InvalidMonthKey(s.to_string());
        let (year, month) = s.split_once('-').ok_or_else(invalid)?;
        if year.len() != 4 || month.len() != 2 {
            return Err(invalid());
        }
        let year: i32 = year.parse().map_err(|_| invalid())?;
        let month: u32 = month.parse().map_err(|_| invalid())?;
        Self::new(year, month).map_err(|_| invalid())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_and_display() {
        let key: MonthKey = "2025-03".parse().unwrap();
        assert_eq!(key.year(), 2025);
        assert_eq!(key.month(), 3);
        assert_eq!(key.to_string(), "2025-03");
    }

    #[test]
    fn rejects_malformed_keys() {
        for raw in ["2025-13", "2025-00", "2025-3", "25-03", "2025/03", "abcd-ef", ""] {
            assert_eq!(
                raw.parse::<MonthKey>(),
                Err(EngineError::InvalidMonthKey(raw.to_string())),
                "{raw}"
            );
        }
    }

    #[test]
    fn next_and_previous_roll_over_years() {
        let december: MonthKey = "2024-12".parse().unwrap();
        assert_eq!(december.next().to_string(), "2025-01");
        assert_eq!(december.next().previous(), december);
        assert_eq!(
            "2025-01".parse::<MonthKey>().unwrap().previous().to_string(),
            "2024-12"
        );
    }

    #[test]
    fn span_yields_consecutive_months() {
        let start: MonthKey = "2025-03".parse().unwrap();
        let keys: Vec<String> = start.span(13).map(|k| k.to_string()).collect();
        assert_eq!(keys.len(), 13);
        assert_eq!(keys[0], "2025-03");
        assert_eq!(keys[9], "2025-12");
        assert_eq!(keys[10], "2026-01");
        assert_eq!(keys[12], "2026-03");
    }

    #[test]
    fn ordering_matches_text_ordering() {
        let a: MonthKey = "2024-12".parse().unwrap();
        let b: MonthKey = "2025-01".parse().unwrap();
        assert!(a < b);
        assert!(a.to_string() < b.to_string());
    }
}
