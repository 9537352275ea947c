//! Property-based tests for stay ranges.

use super::StayRange;
use chrono::{Duration, NaiveDate};
use proptest::prelude::*;

// Stays within a two-year window starting 2025-01-01
fn stay_strategy() -> impl Strategy<Value = StayRange> {
    (0i64..730, 1i64..30).prop_map(|(offset, nights)| {
        let base = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap();
        let check_in = base + Duration::days(offset);
        StayRange::new(check_in, check_in + Duration::days(nights)).unwrap()
    })
}

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 2000,
        .. ProptestConfig::default()
    })]

    #[test]
    fn overlap_is_symmetric(a in stay_strategy(), b in stay_strategy()) {
        prop_assert_eq!(a.overlaps(&b), b.overlaps(&a));
    }

    #[test]
    fn overlap_matches_shared_night(a in stay_strategy(), b in stay_strategy()) {
        let mut night = a.check_in();
        let mut shared = false;
        while night < a.check_out() {
            if b.contains_night(night) {
                shared = true;
                break;
            }
            night = night.succ_opt().unwrap();
        }
        prop_assert_eq!(a.overlaps(&b), shared);
    }

    #[test]
    fn stay_adjacent_to_itself_is_free(a in stay_strategy(), nights in 1i64..30) {
        let next = StayRange::new(a.check_out(), a.check_out() + Duration::days(nights)).unwrap();
        prop_assert!(!a.overlaps(&next));
    }

    #[test]
    fn nights_are_positive(a in stay_strategy()) {
        prop_assert!(a.nights() >= 1);
    }
}
