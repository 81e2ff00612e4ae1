//! Due-date resolution for budget items.
//!
//! A budget item only stores a day of month. The concrete calendar date of a
//! given month depends on the item's [`DateType`]: `fixed` items keep the day
//! as is, `dynamic` items move off weekends following their [`WeekendRule`].

use chrono::{Datelike, NaiveDate, TimeDelta, Weekday};

use crate::{DateType, EngineError, MonthKey, ResultEngine, WeekendRule};

/// Resolve `due_day` of `year`/`month` to a calendar date.
///
/// The day is not checked against the month length: a day past the end of
/// the month rolls forward into the following month (day 31 of a 30-day month
/// is the 1st of the next one).
pub fn resolve_due_date(
    due_day: u32,
    year: i32,
    month: u32,
    date_type: DateType,
    weekend_rule: WeekendRule,
) -> ResultEngine<NaiveDate> {
    let out_of_range =
        || EngineError::InvalidValue(format!("cannot resolve day {due_day} of {year}-{month:02}"));

    let first = NaiveDate::from_ymd_opt(year, month, 1).ok_or_else(out_of_range)?;
    let date = first
        .checked_add_signed(TimeDelta::days(i64::from(due_day) - 1))
        .ok_or_else(out_of_range)?;

    if date_type == DateType::Fixed {
        return Ok(date);
    }

    let shift = match (date.weekday(), weekend_rule) {
        (Weekday::Sat, WeekendRule::Next) => 2,
        (Weekday::Sun, WeekendRule::Next) => 1,
        (Weekday::Sat, WeekendRule::Previous) => -1,
        (Weekday::Sun, WeekendRule::Previous) => -2,
        _ => 0,
    };
    date.checked_add_signed(TimeDelta::days(shift))
        .ok_or_else(out_of_range)
}

impl MonthKey {
    /// Resolve `due_day` inside this month.
    pub fn resolve_due_date(
        &self,
        due_day: u32,
        date_type: DateType,
        weekend_rule: WeekendRule,
    ) -> ResultEngine<NaiveDate> {
        resolve_due_date(due_day, self.year(), self.month(), date_type, weekend_rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn fixed_keeps_the_day_even_on_weekends() {
        // 2024-06-01 is a Saturday, 2024-06-02 a Sunday.
        for rule in [WeekendRule::Next, WeekendRule::Previous] {
            assert_eq!(
                resolve_due_date(1, 2024, 6, DateType::Fixed, rule).unwrap(),
                date(2024, 6, 1)
            );
            assert_eq!(
                resolve_due_date(2, 2024, 6, DateType::Fixed, rule).unwrap(),
                date(2024, 6, 2)
            );
        }
    }

    #[test]
    fn fixed_rolls_past_month_end() {
        assert_eq!(
            resolve_due_date(31, 2025, 2, DateType::Fixed, WeekendRule::Next).unwrap(),
            date(2025, 3, 3)
        );
        assert_eq!(
            resolve_due_date(31, 2024, 2, DateType::Fixed, WeekendRule::Next).unwrap(),
            date(2024, 3, 2)
        );
        assert_eq!(
            resolve_due_date(31, 2024, 4, DateType::Fixed, WeekendRule::Next).unwrap(),
            date(2024, 5, 1)
        );
    }

    #[test]
    fn dynamic_next_moves_weekends_to_monday() {
        assert_eq!(
            resolve_due_date(1, 2024, 6, DateType::Dynamic, WeekendRule::Next).unwrap(),
            date(2024, 6, 3)
        );
        assert_eq!(
            resolve_due_date(2, 2024, 6, DateType::Dynamic, WeekendRule::Next).unwrap(),
            date(2024, 6, 3)
        );
    }

    #[test]
    fn dynamic_previous_moves_weekends_to_friday() {
        assert_eq!(
            resolve_due_date(1, 2024, 6, DateType::Dynamic, WeekendRule::Previous).unwrap(),
            date(2024, 5, 31)
        );
        assert_eq!(
            resolve_due_date(2, 2024, 6, DateType::Dynamic, WeekendRule::Previous).unwrap(),
            date(2024, 5, 31)
        );
    }

    #[test]
    fn dynamic_leaves_weekdays_alone() {
        // Rent due on the 5th: 2024-06-05 is a Wednesday.
        let resolved =
            resolve_due_date(5, 2024, 6, DateType::Dynamic, WeekendRule::Next).unwrap();
        assert_eq!(resolved, date(2024, 6, 5));
        assert_eq!(resolved.weekday(), Weekday::Wed);
    }

    #[test]
    fn dynamic_never_lands_on_a_weekend() {
        let key: MonthKey = "2025-01".parse().unwrap();
        for month in key.span(12) {
            for day in 1..=31 {
                for rule in [WeekendRule::Next, WeekendRule::Previous] {
                    let resolved = month.resolve_due_date(day, DateType::Dynamic, rule).unwrap();
                    assert!(
                        !matches!(resolved.weekday(), Weekday::Sat | Weekday::Sun),
                        "{month} day {day} resolved to {resolved}"
                    );
                }
            }
        }
    }

    #[test]
    fn invalid_month_is_an_error() {
        assert!(resolve_due_date(1, 2024, 13, DateType::Fixed, WeekendRule::Next).is_err());
    }
}
