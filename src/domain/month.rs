use std::{fmt, str::FromStr};

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::errors::ForecastError;

pub const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, ordered chronologically and rendered as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct YearMonth {
    year: i32,
    month: u32,
}

impl YearMonth {
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    pub fn year(&self) -> i32 {
        self.year
    }

    pub fn month(&self) -> u32 {
        self.month
    }

    /// Zero-based position of the month within its year (January = 0).
    pub fn calendar_index(&self) -> usize {
        (self.month - 1) as usize
    }

    /// Saturates at the representable range instead of overflowing.
    pub fn add_months(&self, months: i32) -> Self {
        let ordinal = self.ordinal().saturating_add(months);
        Self {
            year: ordinal.div_euclid(12),
            month: ordinal.rem_euclid(12) as u32 + 1,
        }
    }

    pub fn succ(&self) -> Self {
        self.add_months(1)
    }

    /// Signed number of months from `self` to `other`.
    pub fn months_until(&self, other: YearMonth) -> i32 {
        other.ordinal().saturating_sub(self.ordinal())
    }

    pub fn first_day(&self) -> Option<NaiveDate> {
        NaiveDate::from_ymd_opt(self.year, self.month, 1)
    }

    pub fn last_day(&self) -> Option<NaiveDate> {
        self.succ().first_day()?.pred_opt()
    }

    /// Every month from `start` to `end`, both inclusive. Empty when `end < start`.
    pub fn range_inclusive(start: YearMonth, end: YearMonth) -> impl Iterator<Item = YearMonth> {
        let count = start.months_until(end).max(-1) + 1;
        (0..count).map(move |offset| start.add_months(offset))
    }

    fn ordinal(&self) -> i32 {
        self.year.saturating_mul(12).saturating_add(self.month as i32 - 1)
    }
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for YearMonth {
    type Err = ForecastError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let invalid = || ForecastError::InvalidInput(format!("`{raw}` is not a YYYY-MM month"));
        let (year, month) = raw.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        YearMonth::new(year, month).ok_or_else(invalid)
    }
}

impl TryFrom<String> for YearMonth {
    type Error = ForecastError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<YearMonth> for String {
    fn from(value: YearMonth) -> Self {
        value.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ym(year: i32, month: u32) -> YearMonth {
        YearMonth::new(year, month).unwrap()
    }

    #[test]
    fn add_months_wraps_years_in_both_directions() {
        assert_eq!(ym(2024, 11).add_months(3), ym(2025, 2));
        assert_eq!(ym(2024, 1).add_months(-1), ym(2023, 12));
        assert_eq!(ym(2024, 6).add_months(-18), ym(2022, 12));
    }

    #[test]
    fn add_months_saturates_near_the_i32_limit() {
        let far = ym(2024, 3).add_months(i32::MAX - 10);
        assert!(far > ym(2024, 3));
        assert_eq!(far, far.add_months(i32::MAX));
        assert!(ym(2024, 3).add_months(i32::MIN) < ym(2024, 3));
    }

    #[test]
    fn range_is_inclusive_and_contiguous() {
        let months: Vec<_> = YearMonth::range_inclusive(ym(2023, 11), ym(2024, 2)).collect();
        assert_eq!(
            months,
            vec![ym(2023, 11), ym(2023, 12), ym(2024, 1), ym(2024, 2)]
        );
        assert_eq!(YearMonth::range_inclusive(ym(2024, 2), ym(2024, 1)).count(), 0);
    }

    #[test]
    fn last_day_handles_leap_years() {
        assert_eq!(
            ym(2024, 2).last_day(),
            NaiveDate::from_ymd_opt(2024, 2, 29)
        );
        assert_eq!(
            ym(2023, 12).last_day(),
            NaiveDate::from_ymd_opt(2023, 12, 31)
        );
    }

    #[test]
    fn parses_and_serializes_as_year_month_string() {
        let month: YearMonth = "2024-03".parse().unwrap();
        assert_eq!(month, ym(2024, 3));
        assert_eq!(serde_json::to_string(&month).unwrap(), "\"2024-03\"");
        assert!("2024-13".parse::<YearMonth>().is_err());
        assert!("March".parse::<YearMonth>().is_err());
    }
}
