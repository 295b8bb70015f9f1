//! Turns `{period, month, year}` into a concrete inclusive date window and
//! the bucket layout the timeline is drawn on.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::errors::AppError;

const MONTH_LABELS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

/// Filter granularity
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One calendar month, bucketed by day
    Monthly,
    /// One calendar year, bucketed by month
    Yearly,
}

/// Inclusive range of calendar dates
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }
}

/// A period resolved against a concrete month or year.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResolvedPeriod {
    pub period: Period,
    pub window: DateWindow,
}

impl ResolvedPeriod {
    /// Resolve `period` for the given `month` and `year`.
    ///
    /// `month` is only consulted for [`Period::Monthly`]; the frontend sends
    /// it regardless of the selected period.
    pub fn resolve(
        period: Period,
        month: Option<u32>,
        year: Option<i32>,
    ) -> Result<Self, AppError> {
        let year = year.ok_or_else(|| AppError::InvalidFilter("year is required".to_string()))?;
        if !(1000..=9999).contains(&year) {
            return Err(AppError::InvalidFilter(format!(
                "year must be a 4-digit year, got {year}"
            )));
        }

        let window = match period {
            Period::Yearly => DateWindow {
                start: ymd(year, 1, 1)?,
                end: ymd(year, 12, 31)?,
            },
            Period::Monthly => {
                let month = month.ok_or_else(|| {
                    AppError::InvalidFilter(
                        "month is required when period is monthly".to_string(),
                    )
                })?;
                if !(1..=12).contains(&month) {
                    return Err(AppError::InvalidFilter(format!(
                        "month must be between 1 and 12, got {month}"
                    )));
                }
                let start = ymd(year, month, 1)?;
                DateWindow {
                    start,
                    end: ymd(year, month, days_in_month(year, month))?,
                }
            }
        };

        Ok(Self { period, window })
    }

    /// Number of timeline buckets: 12 for a year, days-in-month for a month.
    pub fn bucket_count(&self) -> usize {
        match self.period {
            Period::Yearly => MONTH_LABELS.len(),
            Period::Monthly => self.window.end.day() as usize,
        }
    }

    /// Chronological bucket labels.
    pub fn bucket_labels(&self) -> Vec<String> {
        match self.period {
            Period::Yearly => MONTH_LABELS.iter().map(|m| m.to_string()).collect(),
            Period::Monthly => (1..=self.bucket_count()).map(|d| d.to_string()).collect(),
        }
    }

    /// Index of the bucket `date` falls into, or `None` outside the window.
    pub fn bucket_index(&self, date: NaiveDate) -> Option<usize> {
        if !self.window.contains(date) {
            return None;
        }
        Some(match self.period {
            Period::Yearly => date.month0() as usize,
            Period::Monthly => date.day0() as usize,
        })
    }
}

/// Days in `month` of `year`, accounting for leap years.
pub fn days_in_month(year: i32, month: u32) -> u32 {
    let (next_year, next_month) = if month == 12 {
        (year + 1, 1)
    } else {
        (year, month + 1)
    };

    NaiveDate::from_ymd_opt(next_year, next_month, 1)
        .and_then(|first_of_next| first_of_next.pred_opt())
        .map(|last| last.day())
        .unwrap_or(31)
}

fn ymd(year: i32, month: u32, day: u32) -> Result<NaiveDate, AppError> {
    NaiveDate::from_ymd_opt(year, month, day)
        .ok_or_else(|| AppError::InvalidFilter(format!("invalid date {year}-{month}-{day}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    #[test]
    fn test_yearly_covers_whole_year() {
        let resolved = ResolvedPeriod::resolve(Period::Yearly, Some(7), Some(2024)).unwrap();

        assert_eq!(resolved.window.start, date(2024, 1, 1));
        assert_eq!(resolved.window.end, date(2024, 12, 31));
        assert_eq!(resolved.bucket_count(), 12);
    }

    #[test]
    fn test_monthly_leap_february() {
        let resolved = ResolvedPeriod::resolve(Period::Monthly, Some(2), Some(2024)).unwrap();

        assert_eq!(resolved.window.start, date(2024, 2, 1));
        assert_eq!(resolved.window.end, date(2024, 2, 29));
        assert_eq!(resolved.bucket_count(), 29);
    }

    #[test]
    fn test_monthly_common_february() {
        let resolved = ResolvedPeriod::resolve(Period::Monthly, Some(2), Some(2023)).unwrap();
        assert_eq!(resolved.window.end, date(2023, 2, 28));
    }

    #[test]
    fn test_monthly_december_rolls_year() {
        let resolved = ResolvedPeriod::resolve(Period::Monthly, Some(12), Some(2023)).unwrap();
        assert_eq!(resolved.window.end, date(2023, 12, 31));
        assert_eq!(resolved.bucket_count(), 31);
    }

    #[test]
    fn test_missing_year_is_invalid() {
        let err = ResolvedPeriod::resolve(Period::Yearly, None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));
    }

    #[test]
    fn test_monthly_without_month_is_invalid() {
        let err = ResolvedPeriod::resolve(Period::Monthly, None, Some(2024)).unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));
    }

    #[test]
    fn test_out_of_range_month_is_invalid() {
        let err = ResolvedPeriod::resolve(Period::Monthly, Some(13), Some(2024)).unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));
    }

    #[test]
    fn test_two_digit_year_is_invalid() {
        let err = ResolvedPeriod::resolve(Period::Yearly, None, Some(24)).unwrap_err();
        assert!(matches!(err, AppError::InvalidFilter(_)));
    }

    #[test]
    fn test_bucket_index_and_labels() {
        let yearly = ResolvedPeriod::resolve(Period::Yearly, None, Some(2024)).unwrap();
        assert_eq!(yearly.bucket_index(date(2024, 3, 5)), Some(2));
        assert_eq!(yearly.bucket_index(date(2025, 1, 1)), None);
        assert_eq!(yearly.bucket_labels()[2], "Mar");

        let monthly = ResolvedPeriod::resolve(Period::Monthly, Some(4), Some(2024)).unwrap();
        assert_eq!(monthly.bucket_index(date(2024, 4, 30)), Some(29));
        assert_eq!(monthly.bucket_labels().last().map(String::as_str), Some("30"));
    }

    #[test]
    fn test_days_in_month() {
        assert_eq!(days_in_month(2024, 2), 29);
        assert_eq!(days_in_month(1900, 2), 28);
        assert_eq!(days_in_month(2000, 2), 29);
        assert_eq!(days_in_month(2024, 4), 30);
        assert_eq!(days_in_month(2024, 1), 31);
    }
}
