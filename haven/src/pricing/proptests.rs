//! Property-based tests for the pricing calculator.

use super::{price, Charges, PricingRules};
use crate::reservation::CancellationPolicy;
use proptest::prelude::*;
use rust_decimal::Decimal;

// Amounts in cents up to 10,000.00
fn amount_strategy() -> impl Strategy<Value = Decimal> {
    (0i64..1_000_000).prop_map(|cents| Decimal::new(cents, 2))
}

fn charges_strategy() -> impl Strategy<Value = Charges> {
    (
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
        amount_strategy(),
    )
        .prop_map(|(nightly_rate, cleaning_fee, pet_fee, tourist_tax)| Charges {
            nightly_rate,
            cleaning_fee,
            pet_fee,
            tourist_tax,
        })
}

fn policy_strategy() -> impl Strategy<Value = CancellationPolicy> {
    prop_oneof![
        Just(CancellationPolicy::Flexible),
        Just(CancellationPolicy::NonRefundable),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn amount_due_is_never_negative(
        charges in charges_strategy(),
        nights in 1u32..60,
        policy in policy_strategy(),
        credit in amount_strategy(),
    ) {
        let quote = price(&PricingRules::default(), &charges, nights, policy, credit).unwrap();
        prop_assert!(quote.amount_due >= Decimal::ZERO);
        prop_assert!(quote.total >= Decimal::ZERO);
        prop_assert_eq!(quote.amount_due, (quote.total - credit).max(Decimal::ZERO));
    }

    #[test]
    fn results_are_cent_precise(
        charges in charges_strategy(),
        nights in 1u32..60,
        policy in policy_strategy(),
        credit in amount_strategy(),
    ) {
        let quote = price(&PricingRules::default(), &charges, nights, policy, credit).unwrap();
        for value in [quote.base_total, quote.discount, quote.total, quote.amount_due] {
            prop_assert_eq!(value.scale(), 2);
        }
    }

    #[test]
    fn total_is_base_minus_discount(
        charges in charges_strategy(),
        nights in 1u32..60,
        policy in policy_strategy(),
    ) {
        let rules = PricingRules::default();
        let quote = price(&rules, &charges, nights, policy, Decimal::ZERO).unwrap();
        prop_assert_eq!(quote.total, quote.base_total - quote.discount);
        if policy == CancellationPolicy::Flexible {
            prop_assert_eq!(quote.discount, Decimal::ZERO);
        } else {
            prop_assert!(quote.discount <= quote.base_total);
        }
    }

    #[test]
    fn pricing_is_deterministic(
        charges in charges_strategy(),
        nights in 1u32..60,
        policy in policy_strategy(),
        credit in amount_strategy(),
    ) {
        let rules = PricingRules::default();
        prop_assert_eq!(
            price(&rules, &charges, nights, policy, credit).unwrap(),
            price(&rules, &charges, nights, policy, credit).unwrap()
        );
    }
}
