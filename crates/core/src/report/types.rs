//! Report period and summary types.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::error::ReportError;

/// Report granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Period {
    /// One calendar day.
    Day,
    /// One calendar month.
    Month,
    /// One calendar year.
    Year,
}

impl Period {
    /// Convert to query-string value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Month => "month",
            Self::Year => "year",
        }
    }

    /// Parse from query-string value.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidPeriod` for anything else.
    pub fn parse(s: &str) -> Result<Self, ReportError> {
        match s {
            "day" => Ok(Self::Day),
            "month" => Ok(Self::Month),
            "year" => Ok(Self::Year),
            other => Err(ReportError::InvalidPeriod(other.to_string())),
        }
    }
}

/// A concrete calendar window: one day, one month, or one year.
///
/// Matching is always against the row's business date, never `created_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PeriodRef {
    /// Exact calendar date.
    Day(NaiveDate),
    /// Calendar year and month.
    Month {
        /// Calendar year.
        year: i32,
        /// Calendar month (1-12).
        month: u32,
    },
    /// Calendar year.
    Year(i32),
}

impl PeriodRef {
    /// Parses the `date` query parameter for the given period:
    /// ISO day for `Day`, `YYYY-MM` for `Month`, `YYYY` for `Year`.
    ///
    /// # Errors
    ///
    /// Returns `ReportError::InvalidDate` for malformed input.
    pub fn parse(period: Period, date: &str) -> Result<Self, ReportError> {
        let invalid = || ReportError::InvalidDate {
            date: date.to_string(),
            period: period.as_str(),
        };

        match period {
            Period::Day => NaiveDate::parse_from_str(date, "%Y-%m-%d")
                .map(Self::Day)
                .map_err(|_| invalid()),
            Period::Month => {
                // YYYY-MM; reuse date parsing by pinning the day.
                let first_day = format!("{date}-01");
                NaiveDate::parse_from_str(&first_day, "%Y-%m-%d")
                    .map(|d| Self::Month {
                        year: d.year(),
                        month: d.month(),
                    })
                    .map_err(|_| invalid())
            }
            Period::Year => date.parse::<i32>().map(Self::Year).map_err(|_| invalid()),
        }
    }

    /// True when the business date falls inside this window.
    #[must_use]
    pub fn contains(&self, date: NaiveDate) -> bool {
        match *self {
            Self::Day(day) => date == day,
            Self::Month { year, month } => date.year() == year && date.month() == month,
            Self::Year(year) => date.year() == year,
        }
    }
}

/// Summary statistics over the caller's row-filtered universe.
///
/// Every sum defaults to zero when no rows match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    /// Expense subtotal for the current calendar day.
    pub today: Decimal,
    /// Expense subtotal for the current calendar month.
    pub month: Decimal,
    /// Expense subtotal for the current calendar year.
    pub year: Decimal,
    /// Number of expense rows in scope.
    pub total_count: u64,
    /// All-time income sum.
    pub total_income: Decimal,
    /// All-time expense sum.
    pub total_expenses: Decimal,
    /// `total_income - total_expenses`.
    pub balance: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse() {
        assert_eq!(Period::parse("day"), Ok(Period::Day));
        assert_eq!(Period::parse("month"), Ok(Period::Month));
        assert_eq!(Period::parse("year"), Ok(Period::Year));
        assert!(matches!(
            Period::parse("week"),
            Err(ReportError::InvalidPeriod(_))
        ));
    }

    #[test]
    fn test_period_ref_parse_day() {
        let parsed = PeriodRef::parse(Period::Day, "2024-01-15").unwrap();
        assert_eq!(
            parsed,
            PeriodRef::Day(NaiveDate::from_ymd_opt(2024, 1, 15).unwrap())
        );
    }

    #[test]
    fn test_period_ref_parse_month_and_year() {
        assert_eq!(
            PeriodRef::parse(Period::Month, "2024-01").unwrap(),
            PeriodRef::Month {
                year: 2024,
                month: 1
            }
        );
        assert_eq!(
            PeriodRef::parse(Period::Year, "2024").unwrap(),
            PeriodRef::Year(2024)
        );
    }

    #[rstest::rstest]
    #[case(Period::Day, "2024-1")]
    #[case(Period::Day, "yesterday")]
    #[case(Period::Month, "2024-13")]
    #[case(Period::Month, "2024")]
    #[case(Period::Year, "twenty24")]
    fn test_period_ref_rejects_malformed_dates(#[case] period: Period, #[case] date: &str) {
        assert!(matches!(
            PeriodRef::parse(period, date),
            Err(ReportError::InvalidDate { .. })
        ));
    }

    #[test]
    fn test_contains() {
        let date = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();

        assert!(PeriodRef::Day(date).contains(date));
        assert!(
            !PeriodRef::Day(NaiveDate::from_ymd_opt(2024, 1, 16).unwrap()).contains(date)
        );
        assert!(
            PeriodRef::Month {
                year: 2024,
                month: 1
            }
            .contains(date)
        );
        assert!(
            !PeriodRef::Month {
                year: 2024,
                month: 2
            }
            .contains(date)
        );
        assert!(PeriodRef::Year(2024).contains(date));
        assert!(!PeriodRef::Year(2023).contains(date));
    }
}
