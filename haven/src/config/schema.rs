//! Configuration schema definitions.
//!
//! Every field is optional so that partial files can be layered on top of
//! each other; the accessor methods on [`Config`] fill in the built-in
//! defaults.

use std::str::FromStr;
use std::time::Duration;

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};

use crate::code::{DEFAULT_CODE_LENGTH, DEFAULT_CODE_PREFIX, DEFAULT_MAX_CODE_ATTEMPTS};
use crate::database::DEFAULT_LOCK_WAIT;
use crate::error::Result;
use crate::pricing::{PricingRules, DEFAULT_NON_REFUNDABLE_DISCOUNT_PERCENT};
use crate::reservation::ReservationStatus;

/// Currency used when none is configured.
pub const DEFAULT_CURRENCY: &str = "EUR";

/// Complete configuration structure.
///
/// # Examples
///
/// ```
/// use haven::config::{BookingConfig, Config};
///
/// let config = Config {
///     booking: Some(BookingConfig {
///         code_prefix: Some("SEA-".to_string()),
///         ..Default::default()
///     }),
///     ..Default::default()
/// };
/// assert_eq!(config.max_guests(), None);
/// assert_eq!(config.lock_wait().as_secs(), 5);
/// ```
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Pricing settings.
    pub pricing: Option<PricingConfig>,

    /// Booking code and admission settings.
    pub booking: Option<BookingConfig>,

    /// Maximum time to wait for the database write lock (seconds).
    pub maximum_lock_wait_seconds: Option<u64>,

    /// Refuse to create the database on first use.
    pub disable_autoinit: Option<bool>,
}

/// Pricing settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct PricingConfig {
    /// Discount granted for the non-refundable policy, in percent.
    #[serde(default, deserialize_with = "deserialize_percent")]
    pub non_refundable_discount_percent: Option<Decimal>,

    /// ISO 4217 code shown next to amounts.
    pub currency: Option<String>,
}

/// Booking settings.
#[derive(Debug, Clone, Deserialize, Serialize, Default, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct BookingConfig {
    /// Prefix of generated booking codes.
    pub code_prefix: Option<String>,

    /// Number of random characters after the prefix.
    pub code_length: Option<usize>,

    /// Candidates tried before code generation gives up.
    pub max_code_attempts: Option<u32>,

    /// Status of newly created reservations (`pending` or `confirmed`).
    pub initial_status: Option<ReservationStatus>,

    /// Upper bound on the total number of guests.
    pub max_guests: Option<u32>,
}

impl Config {
    /// Returns a configuration with every built-in default filled in.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self {
            pricing: Some(PricingConfig {
                non_refundable_discount_percent: Some(Decimal::from(
                    DEFAULT_NON_REFUNDABLE_DISCOUNT_PERCENT,
                )),
                currency: Some(DEFAULT_CURRENCY.to_string()),
            }),
            booking: Some(BookingConfig {
                code_prefix: Some(DEFAULT_CODE_PREFIX.to_string()),
                code_length: Some(DEFAULT_CODE_LENGTH),
                max_code_attempts: Some(DEFAULT_MAX_CODE_ATTEMPTS),
                initial_status: Some(ReservationStatus::Pending),
                max_guests: None,
            }),
            maximum_lock_wait_seconds: Some(DEFAULT_LOCK_WAIT.as_secs()),
            disable_autoinit: Some(false),
        }
    }

    /// Pricing rules resolved from the `pricing` section.
    ///
    /// # Errors
    ///
    /// Returns an error if the configured discount is outside `[0, 100]`.
    pub fn pricing_rules(&self) -> Result<PricingRules> {
        match self
            .pricing
            .as_ref()
            .and_then(|p| p.non_refundable_discount_percent)
        {
            Some(percent) => Ok(PricingRules::new(percent)?),
            None => Ok(PricingRules::default()),
        }
    }

    /// Currency code for display.
    #[must_use]
    pub fn currency(&self) -> &str {
        self.pricing
            .as_ref()
            .and_then(|p| p.currency.as_deref())
            .unwrap_or(DEFAULT_CURRENCY)
    }

    /// Booking section, or an empty one.
    #[must_use]
    pub fn booking(&self) -> BookingConfig {
        self.booking.clone().unwrap_or_default()
    }

    /// Status given to new reservations.
    #[must_use]
    pub fn initial_status(&self) -> ReservationStatus {
        self.booking
            .as_ref()
            .and_then(|b| b.initial_status)
            .unwrap_or(ReservationStatus::Pending)
    }

    /// Guest limit, if any.
    #[must_use]
    pub fn max_guests(&self) -> Option<u32> {
        self.booking.as_ref().and_then(|b| b.max_guests)
    }

    /// How long a writer waits for the database lock.
    #[must_use]
    pub fn lock_wait(&self) -> Duration {
        self.maximum_lock_wait_seconds
            .map_or(DEFAULT_LOCK_WAIT, Duration::from_secs)
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum PercentRepr {
    Integer(u64),
    Float(f64),
    Text(String),
}

/// Accepts `10`, `12.5` or `"12.5"` for a percentage.
fn deserialize_percent<'de, D>(deserializer: D) -> std::result::Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let repr: Option<PercentRepr> = Option::deserialize(deserializer)?;
    repr.map(|r| match r {
        PercentRepr::Integer(n) => Ok(Decimal::from(n)),
        PercentRepr::Float(f) => {
            Decimal::from_str(&f.to_string()).map_err(serde::de::Error::custom)
        }
        PercentRepr::Text(s) => Decimal::from_str(s.trim()).map_err(serde::de::Error::custom),
    })
    .transpose()
}
