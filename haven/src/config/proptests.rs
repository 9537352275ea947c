//! Property-based tests for configuration merging and validation.

use super::merger::ConfigMerger;
use super::schema::{BookingConfig, Config, PricingConfig};
use super::validator::ConfigValidator;
use crate::reservation::ReservationStatus;
use proptest::prelude::*;
use rust_decimal::Decimal;

fn pricing_strategy() -> impl Strategy<Value = PricingConfig> {
    (
        prop::option::of((0i64..=10_000).prop_map(|bp| Decimal::new(bp, 2))),
        prop::option::of("[A-Z]{3}"),
    )
        .prop_map(|(non_refundable_discount_percent, currency)| PricingConfig {
            non_refundable_discount_percent,
            currency,
        })
}

fn booking_strategy() -> impl Strategy<Value = BookingConfig> {
    (
        prop::option::of("[A-Z]{1,4}-"),
        prop::option::of(1usize..=12),
        prop::option::of(1u32..100),
        prop::option::of(prop_oneof![
            Just(ReservationStatus::Pending),
            Just(ReservationStatus::Confirmed)
        ]),
        prop::option::of(1u32..20),
    )
        .prop_map(
            |(code_prefix, code_length, max_code_attempts, initial_status, max_guests)| {
                BookingConfig {
                    code_prefix,
                    code_length,
                    max_code_attempts,
                    initial_status,
                    max_guests,
                }
            },
        )
}

fn config_strategy() -> impl Strategy<Value = Config> {
    (
        prop::option::of(pricing_strategy()),
        prop::option::of(booking_strategy()),
        prop::option::of(1u64..120),
        prop::option::of(any::<bool>()),
    )
        .prop_map(
            |(pricing, booking, maximum_lock_wait_seconds, disable_autoinit)| Config {
                pricing,
                booking,
                maximum_lock_wait_seconds,
                disable_autoinit,
            },
        )
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    // Any field the higher layer sets is what the merged config reports
    #[test]
    fn merge_higher_precedence_wins(low in config_strategy(), high in config_strategy()) {
        let mut merged = low.clone();
        ConfigMerger::merge_into(&mut merged, &high);

        prop_assert_eq!(
            merged.maximum_lock_wait_seconds,
            high.maximum_lock_wait_seconds.or(low.maximum_lock_wait_seconds)
        );
        prop_assert_eq!(merged.disable_autoinit, high.disable_autoinit.or(low.disable_autoinit));

        let max_guests = |c: &Config| c.booking.as_ref().and_then(|b| b.max_guests);
        prop_assert_eq!(max_guests(&merged), max_guests(&high).or(max_guests(&low)));

        let prefix = |c: &Config| c.booking.as_ref().and_then(|b| b.code_prefix.clone());
        prop_assert_eq!(prefix(&merged), prefix(&high).or(prefix(&low)));
    }

    // Merging a config into itself changes nothing
    #[test]
    fn merge_idempotent(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &config);
        prop_assert_eq!(merged, config);
    }

    // Merging an empty layer is a no-op
    #[test]
    fn merge_empty_is_identity(config in config_strategy()) {
        let mut merged = config.clone();
        ConfigMerger::merge_into(&mut merged, &Config::default());
        prop_assert_eq!(merged, config);
    }

    // Merging two valid layers yields a valid config
    #[test]
    fn merge_preserves_validity(low in config_strategy(), high in config_strategy()) {
        prop_assume!(ConfigValidator::validate(&low).is_ok());
        prop_assume!(ConfigValidator::validate(&high).is_ok());

        let mut merged = low;
        ConfigMerger::merge_into(&mut merged, &high);
        prop_assert!(ConfigValidator::validate(&merged).is_ok());
    }
}
