//! Boundary validation for ledger writes.
//!
//! Rejected input never reaches storage or the receipt pipeline.

use rust_decimal::Decimal;
use thiserror::Error;

use super::types::{NewExpense, NewIncome};

/// Validation errors for ledger writes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LedgerValidationError {
    /// Product name is missing or blank.
    #[error("Product name is required")]
    MissingProductName,

    /// Quantity is zero or negative.
    #[error("Quantity must be greater than 0")]
    NonPositiveQuantity,

    /// Unit price is zero or negative.
    #[error("Unit price must be greater than 0")]
    NonPositiveUnitPrice,

    /// Income source is missing or blank.
    #[error("Source is required")]
    MissingSource,

    /// Income amount is zero or negative.
    #[error("Amount must be greater than 0")]
    NonPositiveAmount,
}

/// Computes an expense line total: `round(quantity * unit_price, 2)`.
#[must_use]
pub fn compute_total(quantity: Decimal, unit_price: Decimal) -> Decimal {
    (quantity * unit_price).round_dp(2)
}

/// Validates expense fields.
///
/// # Errors
///
/// Returns the first violated precondition.
pub fn validate_expense(input: &NewExpense) -> Result<(), LedgerValidationError> {
    if input.product_name.trim().is_empty() {
        return Err(LedgerValidationError::MissingProductName);
    }
    if input.quantity <= Decimal::ZERO {
        return Err(LedgerValidationError::NonPositiveQuantity);
    }
    if input.unit_price <= Decimal::ZERO {
        return Err(LedgerValidationError::NonPositiveUnitPrice);
    }
    Ok(())
}

/// Validates income fields.
///
/// # Errors
///
/// Returns the first violated precondition.
pub fn validate_income(input: &NewIncome) -> Result<(), LedgerValidationError> {
    if input.source.trim().is_empty() {
        return Err(LedgerValidationError::MissingSource);
    }
    if input.amount <= Decimal::ZERO {
        return Err(LedgerValidationError::NonPositiveAmount);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use rust_decimal_macros::dec;

    fn expense(product_name: &str, quantity: Decimal, unit_price: Decimal) -> NewExpense {
        NewExpense {
            product_name: product_name.to_string(),
            quantity,
            unit_price,
            expense_date: NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
        }
    }

    #[test]
    fn test_compute_total_rounds_to_cents() {
        assert_eq!(compute_total(dec!(2), dec!(10.50)), dec!(21.00));
        assert_eq!(compute_total(dec!(3), dec!(0.333)), dec!(1.00));
        assert_eq!(compute_total(dec!(0.5), dec!(0.05)), dec!(0.03));
    }

    #[test]
    fn test_valid_expense() {
        assert!(validate_expense(&expense("Coffee", dec!(1), dec!(3.50))).is_ok());
    }

    #[test]
    fn test_blank_product_name_rejected() {
        assert_eq!(
            validate_expense(&expense("   ", dec!(1), dec!(3.50))),
            Err(LedgerValidationError::MissingProductName)
        );
    }

    #[test]
    fn test_non_positive_quantity_rejected() {
        assert_eq!(
            validate_expense(&expense("Coffee", dec!(0), dec!(3.50))),
            Err(LedgerValidationError::NonPositiveQuantity)
        );
        assert_eq!(
            validate_expense(&expense("Coffee", dec!(-1), dec!(3.50))),
            Err(LedgerValidationError::NonPositiveQuantity)
        );
    }

    #[test]
    fn test_non_positive_unit_price_rejected() {
        assert_eq!(
            validate_expense(&expense("Coffee", dec!(1), dec!(0))),
            Err(LedgerValidationError::NonPositiveUnitPrice)
        );
    }

    #[test]
    fn test_income_validation() {
        let mut income = NewIncome {
            source: "Salary".to_string(),
            amount: dec!(500.00),
            income_date: NaiveDate::from_ymd_opt(2024, 1, 1).unwrap(),
            description: None,
        };
        assert!(validate_income(&income).is_ok());

        income.source = String::new();
        assert_eq!(
            validate_income(&income),
            Err(LedgerValidationError::MissingSource)
        );

        income.source = "Salary".to_string();
        income.amount = Decimal::ZERO;
        assert_eq!(
            validate_income(&income),
            Err(LedgerValidationError::NonPositiveAmount)
        );
    }
}

#[cfg(test)]
mod property_tests {
    use super::*;
    use proptest::prelude::*;

    // For any valid (quantity, unit_price) pair the computed total equals
    // quantity * unit_price rounded to two decimal places, and never carries
    // more than two decimal places.
    proptest! {
        #[test]
        fn prop_total_is_rounded_product(
            quantity_cents in 1i64..1_000_000,
            price_cents in 1i64..1_000_000,
        ) {
            let quantity = Decimal::new(quantity_cents, 2);
            let unit_price = Decimal::new(price_cents, 2);

            let total = compute_total(quantity, unit_price);

            prop_assert_eq!(total, (quantity * unit_price).round_dp(2));
            prop_assert!(total.scale() <= 2);
        }
    }
}
