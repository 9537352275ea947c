//! Deterministic stay pricing.
//!
//! Pricing is a pure function of the nightly rate, the number of nights,
//! the flat per-stay fees, the cancellation policy and any credit applied.
//! It never touches storage; the lifecycle operations persist its output.
//!
//! ```text
//! base       = rate * nights + cleaning + pets + tourist tax
//! discount   = round(base * pct / 100)   (non-refundable only)
//! total      = base - discount
//! amount due = max(0, total - credit)
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::money::{self, check_amount};
use crate::reservation::{CancellationPolicy, ValidationError};

#[cfg(test)]
mod proptests;

/// Default discount granted for choosing the non-refundable policy.
pub const DEFAULT_NON_REFUNDABLE_DISCOUNT_PERCENT: u32 = 10;

/// Resolved, immutable pricing rules handed to [`price`].
///
/// # Examples
///
/// ```
/// use haven::PricingRules;
/// use rust_decimal::Decimal;
///
/// let rules = PricingRules::default();
/// assert_eq!(rules.non_refundable_discount_percent(), Decimal::from(10));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PricingRules {
    non_refundable_discount_percent: Decimal,
}

impl PricingRules {
    /// Creates pricing rules with a custom non-refundable discount.
    ///
    /// # Errors
    ///
    /// Returns an error unless `percent` lies in `[0, 100]`.
    pub fn new(non_refundable_discount_percent: Decimal) -> Result<Self, ValidationError> {
        if non_refundable_discount_percent < Decimal::ZERO
            || non_refundable_discount_percent > Decimal::ONE_HUNDRED
        {
            return Err(ValidationError {
                field: "pricing.non_refundable_discount_percent".into(),
                message: format!(
                    "discount {non_refundable_discount_percent}% must be between 0 and 100"
                ),
            });
        }
        Ok(Self {
            non_refundable_discount_percent,
        })
    }

    /// Discount percentage applied to non-refundable stays.
    #[must_use]
    pub const fn non_refundable_discount_percent(&self) -> Decimal {
        self.non_refundable_discount_percent
    }
}

impl Default for PricingRules {
    fn default() -> Self {
        Self {
            non_refundable_discount_percent: Decimal::from(DEFAULT_NON_REFUNDABLE_DISCOUNT_PERCENT),
        }
    }
}

/// The commercial inputs of a stay.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Charges {
    /// Price of one night.
    pub nightly_rate: Decimal,
    /// Flat cleaning fee per stay.
    pub cleaning_fee: Decimal,
    /// Flat pet fee per stay.
    pub pet_fee: Decimal,
    /// Flat tourist tax per stay.
    pub tourist_tax: Decimal,
}

impl Charges {
    /// Creates charges with only a nightly rate.
    #[must_use]
    pub fn nightly(nightly_rate: Decimal) -> Self {
        Self {
            nightly_rate,
            ..Self::default()
        }
    }

    /// Checks every amount is a non-negative cent value.
    ///
    /// # Errors
    ///
    /// Returns the first amount that fails validation.
    pub fn validate(&self) -> Result<(), ValidationError> {
        check_amount("nightly_rate", self.nightly_rate)?;
        check_amount("cleaning_fee", self.cleaning_fee)?;
        check_amount("pet_fee", self.pet_fee)?;
        check_amount("tourist_tax", self.tourist_tax)?;
        Ok(())
    }
}

/// Itemised result of pricing a stay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriceBreakdown {
    /// Nights charged.
    pub nights: u32,
    /// `nightly_rate * nights`.
    pub accommodation: Decimal,
    /// Cleaning fee.
    pub cleaning_fee: Decimal,
    /// Pet fee.
    pub pet_fee: Decimal,
    /// Tourist tax.
    pub tourist_tax: Decimal,
    /// Accommodation plus all fees, before discount.
    pub base_total: Decimal,
    /// Non-refundable discount, zero for flexible stays.
    pub discount: Decimal,
    /// `base_total - discount`.
    pub total: Decimal,
    /// Credit applied against the total (as requested, not capped).
    pub applied_credit: Decimal,
    /// `max(0, total - applied_credit)`.
    pub amount_due: Decimal,
}

/// Prices a stay.
///
/// # Errors
///
/// Returns a validation error if any amount is negative or finer than a cent,
/// or if `nights` is zero.
///
/// # Examples
///
/// ```
/// use haven::{price, CancellationPolicy, Charges, PricingRules};
/// use rust_decimal::Decimal;
///
/// let charges = Charges::nightly(Decimal::from(100));
/// let quote = price(
///     &PricingRules::default(),
///     &charges,
///     5,
///     CancellationPolicy::NonRefundable,
///     Decimal::ZERO,
/// )
/// .unwrap();
///
/// assert_eq!(quote.base_total.to_string(), "500.00");
/// assert_eq!(quote.discount.to_string(), "50.00");
/// assert_eq!(quote.total.to_string(), "450.00");
/// ```
pub fn price(
    rules: &PricingRules,
    charges: &Charges,
    nights: u32,
    policy: CancellationPolicy,
    applied_credit: Decimal,
) -> Result<PriceBreakdown, ValidationError> {
    if nights == 0 {
        return Err(ValidationError {
            field: "nights".into(),
            message: "a stay must cover at least one night".into(),
        });
    }
    charges.validate()?;
    check_amount("applied_credit", applied_credit)?;

    let accommodation = charges
        .nightly_rate
        .checked_mul(Decimal::from(nights))
        .map(money::round)
        .ok_or_else(|| too_large("nightly_rate"))?;
    let base_total = [charges.cleaning_fee, charges.pet_fee, charges.tourist_tax]
        .into_iter()
        .try_fold(accommodation, Decimal::checked_add)
        .map(money::round)
        .ok_or_else(|| too_large("base_total"))?;

    let discount = match policy {
        CancellationPolicy::NonRefundable => base_total
            .checked_mul(rules.non_refundable_discount_percent)
            .map(|scaled| money::round(scaled / Decimal::ONE_HUNDRED))
            .ok_or_else(|| too_large("base_total"))?,
        CancellationPolicy::Flexible => money::round(Decimal::ZERO),
    };

    let total = money::round(base_total - discount);
    let amount_due = money::round((total - applied_credit).max(Decimal::ZERO));

    Ok(PriceBreakdown {
        nights,
        accommodation,
        cleaning_fee: money::round(charges.cleaning_fee),
        pet_fee: money::round(charges.pet_fee),
        tourist_tax: money::round(charges.tourist_tax),
        base_total,
        discount,
        total,
        applied_credit: money::round(applied_credit),
        amount_due,
    })
}

fn too_large(field: &str) -> ValidationError {
    ValidationError {
        field: field.into(),
        message: "amount is too large to price".into(),
    }
}
