//! Environment variable handling for configuration overrides.
//!
//! `HAVEN_*` variables override values from configuration files.

use std::env;
use std::str::FromStr;

use crate::config::schema::Config;
use crate::error::{Error, Result};
use crate::money;

/// Lock wait override.
pub const LOCK_WAIT_ENV: &str = "HAVEN_MAXIMUM_LOCK_WAIT_SECONDS";
/// Auto-initialisation switch.
pub const DISABLE_AUTOINIT_ENV: &str = "HAVEN_DISABLE_AUTOINIT";
/// Non-refundable discount override.
pub const DISCOUNT_ENV: &str = "HAVEN_NON_REFUNDABLE_DISCOUNT_PERCENT";
/// Currency override.
pub const CURRENCY_ENV: &str = "HAVEN_CURRENCY";
/// Booking code prefix override.
pub const CODE_PREFIX_ENV: &str = "HAVEN_CODE_PREFIX";
/// Booking code length override.
pub const CODE_LENGTH_ENV: &str = "HAVEN_CODE_LENGTH";
/// Status of new reservations.
pub const INITIAL_STATUS_ENV: &str = "HAVEN_INITIAL_STATUS";
/// Guest limit override.
pub const MAX_GUESTS_ENV: &str = "HAVEN_MAX_GUESTS";

/// Applies environment variable overrides.
///
/// # Examples
///
/// ```no_run
/// use haven::config::{Config, EnvironmentConfig};
///
/// let mut config = Config::default();
/// EnvironmentConfig::apply_overrides(&mut config).unwrap();
/// ```
pub struct EnvironmentConfig;

impl EnvironmentConfig {
    /// Reads the `HAVEN_*` variables into `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if a variable holds a value of the wrong type.
    pub fn apply_overrides(config: &mut Config) -> Result<()> {
        if let Ok(seconds) = env::var(LOCK_WAIT_ENV) {
            config.maximum_lock_wait_seconds = Some(Self::parse(LOCK_WAIT_ENV, &seconds)?);
        }

        if let Ok(val) = env::var(DISABLE_AUTOINIT_ENV) {
            config.disable_autoinit = Some(Self::parse_bool(DISABLE_AUTOINIT_ENV, &val)?);
        }

        if let Ok(percent) = env::var(DISCOUNT_ENV) {
            let percent = money::parse_amount(DISCOUNT_ENV, &percent)?;
            config
                .pricing
                .get_or_insert_with(Default::default)
                .non_refundable_discount_percent = Some(percent);
        }

        if let Ok(currency) = env::var(CURRENCY_ENV) {
            config.pricing.get_or_insert_with(Default::default).currency =
                Some(currency.trim().to_ascii_uppercase());
        }

        Self::apply_booking_overrides(config)
    }

    fn apply_booking_overrides(config: &mut Config) -> Result<()> {
        let mut booking = config.booking.clone().unwrap_or_default();
        let mut modified = false;

        if let Ok(prefix) = env::var(CODE_PREFIX_ENV) {
            booking.code_prefix = Some(prefix);
            modified = true;
        }

        if let Ok(length) = env::var(CODE_LENGTH_ENV) {
            booking.code_length = Some(Self::parse(CODE_LENGTH_ENV, &length)?);
            modified = true;
        }

        if let Ok(status) = env::var(INITIAL_STATUS_ENV) {
            booking.initial_status = Some(status.trim().parse()?);
            modified = true;
        }

        if let Ok(max) = env::var(MAX_GUESTS_ENV) {
            booking.max_guests = Some(Self::parse(MAX_GUESTS_ENV, &max)?);
            modified = true;
        }

        if modified {
            config.booking = Some(booking);
        }
        Ok(())
    }

    fn parse<T: FromStr>(field: &str, s: &str) -> Result<T> {
        s.trim().parse().map_err(|_| Error::Validation {
            field: field.into(),
            message: format!("'{s}' is not a positive integer"),
        })
    }

    /// Parses a boolean value.
    ///
    /// Accepts true/1/yes/on and false/0/no/off, case-insensitively.
    fn parse_bool(field: &str, s: &str) -> Result<bool> {
        match s.to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(Error::Validation {
                field: field.into(),
                message: format!(
                    "invalid boolean value: '{s}' (expected true/false/1/0/yes/no/on/off)"
                ),
            }),
        }
    }
}
