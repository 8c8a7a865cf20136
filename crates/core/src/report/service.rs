//! Report aggregation over fetched ledger rows.
//!
//! Consumes scoped repository reads; performs no mutation and no I/O.

use chrono::{Datelike, NaiveDate};
use rust_decimal::Decimal;

use super::types::{PeriodRef, Summary};
use crate::ledger::{Expense, Income};

/// Derives period-scoped views and summary statistics.
pub struct ReportAggregator;

impl ReportAggregator {
    /// Keeps the expenses whose business date falls inside the window.
    #[must_use]
    pub fn filter_by_period(expenses: Vec<Expense>, period: &PeriodRef) -> Vec<Expense> {
        expenses
            .into_iter()
            .filter(|e| period.contains(e.expense_date))
            .collect()
    }

    /// Sum of `total` over the rows; zero for an empty sequence.
    #[must_use]
    pub fn subtotal(expenses: &[Expense]) -> Decimal {
        expenses.iter().map(|e| e.total).sum()
    }

    /// Builds summary statistics as of the given calendar date.
    #[must_use]
    pub fn summarize(expenses: &[Expense], incomes: &[Income], today: NaiveDate) -> Summary {
        let this_month = PeriodRef::Month {
            year: today.year(),
            month: today.month(),
        };
        let this_year = PeriodRef::Year(today.year());

        let sum_where = |window: &PeriodRef| -> Decimal {
            expenses
                .iter()
                .filter(|e| window.contains(e.expense_date))
                .map(|e| e.total)
                .sum()
        };

        let total_expenses = Self::subtotal(expenses);
        let total_income: Decimal = incomes.iter().map(|i| i.amount).sum();

        Summary {
            today: sum_where(&PeriodRef::Day(today)),
            month: sum_where(&this_month),
            year: sum_where(&this_year),
            total_count: expenses.len() as u64,
            total_income,
            total_expenses,
            balance: total_income - total_expenses,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::report::types::Period;
    use chrono::Utc;
    use rust_decimal_macros::dec;
    use uuid::Uuid;

    fn expense(date: &str, total: Decimal) -> Expense {
        Expense {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            product_name: "Widget".to_string(),
            quantity: dec!(1),
            unit_price: total,
            total,
            receipt: None,
            expense_date: date.parse().unwrap(),
            created_at: Utc::now(),
        }
    }

    fn income(date: &str, amount: Decimal) -> Income {
        Income {
            id: Uuid::new_v4(),
            owner_id: Uuid::new_v4(),
            source: "Salary".to_string(),
            amount,
            income_date: date.parse().unwrap(),
            description: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn test_filter_by_month_matches_business_date_only() {
        let rows = vec![
            expense("2024-01-05", dec!(10.00)),
            expense("2024-01-31", dec!(5.00)),
            expense("2024-02-01", dec!(7.00)),
            expense("2023-01-15", dec!(3.00)),
        ];

        let window = PeriodRef::parse(Period::Month, "2024-01").unwrap();
        let filtered = ReportAggregator::filter_by_period(rows, &window);

        assert_eq!(filtered.len(), 2);
        assert!(filtered.iter().all(|e| e.expense_date.to_string().starts_with("2024-01")));
        assert_eq!(ReportAggregator::subtotal(&filtered), dec!(15.00));
    }

    #[test]
    fn test_subtotal_empty_is_zero() {
        assert_eq!(ReportAggregator::subtotal(&[]), Decimal::ZERO);
    }

    #[test]
    fn test_day_filter_example() {
        let rows = vec![expense("2024-01-15", dec!(21.00))];
        let window = PeriodRef::parse(Period::Day, "2024-01-15").unwrap();

        let filtered = ReportAggregator::filter_by_period(rows, &window);
        assert_eq!(filtered.len(), 1);
        assert_eq!(ReportAggregator::subtotal(&filtered), dec!(21.00));
    }

    #[test]
    fn test_summary_balance() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let expenses = vec![expense("2024-01-15", dec!(21.00))];
        let incomes = vec![income("2024-01-01", dec!(500.00))];

        let summary = ReportAggregator::summarize(&expenses, &incomes, today);

        assert_eq!(summary.today, dec!(0));
        assert_eq!(summary.month, dec!(21.00));
        assert_eq!(summary.year, dec!(21.00));
        assert_eq!(summary.total_count, 1);
        assert_eq!(summary.total_income, dec!(500.00));
        assert_eq!(summary.total_expenses, dec!(21.00));
        assert_eq!(summary.balance, dec!(479.00));
    }

    #[test]
    fn test_summary_defaults_to_zero() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 20).unwrap();
        let summary = ReportAggregator::summarize(&[], &[], today);

        assert_eq!(summary.today, Decimal::ZERO);
        assert_eq!(summary.month, Decimal::ZERO);
        assert_eq!(summary.year, Decimal::ZERO);
        assert_eq!(summary.total_count, 0);
        assert_eq!(summary.balance, Decimal::ZERO);
    }

    #[test]
    fn test_summary_today_counts_only_today() {
        let today = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let expenses = vec![
            expense("2024-01-15", dec!(21.00)),
            expense("2024-01-14", dec!(9.00)),
        ];

        let summary = ReportAggregator::summarize(&expenses, &[], today);
        assert_eq!(summary.today, dec!(21.00));
        assert_eq!(summary.month, dec!(30.00));
    }
}
