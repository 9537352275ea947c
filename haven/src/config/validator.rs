//! Configuration validation.

use crate::code::CodeGenerator;
use crate::config::schema::{BookingConfig, Config, PricingConfig};
use crate::error::{Error, Result};
use crate::pricing::PricingRules;
use crate::reservation::ReservationStatus;

/// Longest random suffix a booking code may carry.
pub const MAX_CODE_LENGTH: usize = 32;

/// Validates configuration values.
///
/// # Examples
///
/// ```
/// use haven::config::{Config, ConfigValidator};
///
/// ConfigValidator::validate(&Config::with_defaults()).unwrap();
/// ```
pub struct ConfigValidator;

impl ConfigValidator {
    /// Validates a complete configuration.
    ///
    /// # Errors
    ///
    /// Returns the first invalid field found.
    pub fn validate(config: &Config) -> Result<()> {
        if let Some(ref pricing) = config.pricing {
            Self::validate_pricing(pricing)?;
        }

        if let Some(ref booking) = config.booking {
            Self::validate_booking(booking)?;
        }

        if config.maximum_lock_wait_seconds == Some(0) {
            return Err(Error::validation(
                "maximum_lock_wait_seconds",
                "timeout must be greater than 0",
            ));
        }

        Ok(())
    }

    fn validate_pricing(pricing: &PricingConfig) -> Result<()> {
        if let Some(percent) = pricing.non_refundable_discount_percent {
            PricingRules::new(percent)?;
        }

        if let Some(ref currency) = pricing.currency {
            if currency.len() != 3 || !currency.chars().all(|c| c.is_ascii_uppercase()) {
                return Err(Error::validation(
                    "pricing.currency",
                    format!("'{currency}' is not a three-letter currency code"),
                ));
            }
        }

        Ok(())
    }

    fn validate_booking(booking: &BookingConfig) -> Result<()> {
        if let Some(length) = booking.code_length {
            if length > MAX_CODE_LENGTH {
                return Err(Error::validation(
                    "booking.code_length",
                    format!("must not exceed {MAX_CODE_LENGTH}"),
                ));
            }
        }

        // Prefix characters, zero length and zero attempts
        CodeGenerator::from_config(booking)?;

        if let Some(status) = booking.initial_status {
            if !matches!(
                status,
                ReservationStatus::Pending | ReservationStatus::Confirmed
            ) {
                return Err(Error::validation(
                    "booking.initial_status",
                    format!("new reservations cannot start as {status}"),
                ));
            }
        }

        if booking.max_guests == Some(0) {
            return Err(Error::validation(
                "booking.max_guests",
                "must allow at least one guest",
            ));
        }

        Ok(())
    }
}
