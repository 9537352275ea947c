//! Configuration merging and precedence handling.

use crate::config::loader::ConfigSource;
use crate::config::schema::{BookingConfig, Config, PricingConfig};

/// Merges configuration sources according to precedence rules.
///
/// # Examples
///
/// ```
/// use haven::config::{Config, ConfigMerger};
///
/// let low = Config { maximum_lock_wait_seconds: Some(5), ..Default::default() };
/// let high = Config { maximum_lock_wait_seconds: Some(1), ..Default::default() };
///
/// let mut result = low;
/// ConfigMerger::merge_into(&mut result, &high);
/// assert_eq!(result.maximum_lock_wait_seconds, Some(1));
/// ```
pub struct ConfigMerger;

impl ConfigMerger {
    /// Merges sources given from lowest to highest precedence onto `base`.
    #[must_use]
    pub fn merge(base: Config, sources: Vec<ConfigSource>) -> Config {
        let mut result = base;
        for source in sources {
            Self::merge_into(&mut result, &source.config);
        }
        result
    }

    /// Merges `source` into `target`; every field set in `source` wins.
    ///
    /// Nested sections merge field by field, so a project file may override
    /// only the booking prefix and keep the user's guest limit.
    pub fn merge_into(target: &mut Config, source: &Config) {
        if source.maximum_lock_wait_seconds.is_some() {
            target.maximum_lock_wait_seconds = source.maximum_lock_wait_seconds;
        }

        if source.disable_autoinit.is_some() {
            target.disable_autoinit = source.disable_autoinit;
        }

        if let Some(ref source_pricing) = source.pricing {
            target.pricing = Some(match &target.pricing {
                Some(target_pricing) => Self::merge_pricing(target_pricing, source_pricing),
                None => source_pricing.clone(),
            });
        }

        if let Some(ref source_booking) = source.booking {
            target.booking = Some(match &target.booking {
                Some(target_booking) => Self::merge_booking(target_booking, source_booking),
                None => source_booking.clone(),
            });
        }
    }

    fn merge_pricing(target: &PricingConfig, source: &PricingConfig) -> PricingConfig {
        PricingConfig {
            non_refundable_discount_percent: source
                .non_refundable_discount_percent
                .or(target.non_refundable_discount_percent),
            currency: source.currency.clone().or_else(|| target.currency.clone()),
        }
    }

    fn merge_booking(target: &BookingConfig, source: &BookingConfig) -> BookingConfig {
        BookingConfig {
            code_prefix: source
                .code_prefix
                .clone()
                .or_else(|| target.code_prefix.clone()),
            code_length: source.code_length.or(target.code_length),
            max_code_attempts: source.max_code_attempts.or(target.max_code_attempts),
            initial_status: source.initial_status.or(target.initial_status),
            max_guests: source.max_guests.or(target.max_guests),
        }
    }
}
