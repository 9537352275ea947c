//! Fixed-point money helpers.
//!
//! All amounts are `rust_decimal::Decimal` values kept at two decimal
//! places with half-up rounding. Native floats never carry money.

use std::str::FromStr;

use rust_decimal::{Decimal, RoundingStrategy};

use crate::reservation::ValidationError;

/// Number of decimal places every stored amount carries.
pub const MONEY_SCALE: u32 = 2;

/// Rounds an amount to cents, half away from zero.
///
/// # Examples
///
/// ```
/// use haven::money::round;
/// use rust_decimal::Decimal;
/// use std::str::FromStr;
///
/// assert_eq!(round(Decimal::from_str("2.345").unwrap()).to_string(), "2.35");
/// assert_eq!(round(Decimal::from_str("2.344").unwrap()).to_string(), "2.34");
/// assert_eq!(round(Decimal::from(7)).to_string(), "7.00");
/// ```
#[must_use]
pub fn round(amount: Decimal) -> Decimal {
    let mut rounded =
        amount.round_dp_with_strategy(MONEY_SCALE, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(MONEY_SCALE);
    rounded
}

/// Parses a non-negative amount such as `"120"` or `"99.50"`.
///
/// # Errors
///
/// Returns an error if the text is not a decimal number, is negative, or
/// has more than two decimal places.
pub fn parse_amount(field: &str, text: &str) -> Result<Decimal, ValidationError> {
    let value = Decimal::from_str(text.trim()).map_err(|e| ValidationError {
        field: field.into(),
        message: format!("'{text}' is not a valid amount: {e}"),
    })?;
    check_amount(field, value)?;
    Ok(round(value))
}

/// Validates that an amount is non-negative and has at most two decimal places.
///
/// # Errors
///
/// Returns an error describing the violated constraint.
pub fn check_amount(field: &str, value: Decimal) -> Result<(), ValidationError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(ValidationError {
            field: field.into(),
            message: format!("amount {value} must not be negative"),
        });
    }
    if value.normalize().scale() > MONEY_SCALE {
        return Err(ValidationError {
            field: field.into(),
            message: format!("amount {value} has more than {MONEY_SCALE} decimal places"),
        });
    }
    Ok(())
}
