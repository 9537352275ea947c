//! Availability resolution.
//!
//! A candidate stay is available when no date-holding reservation's
//! *effective* blocked range overlaps it and no blocked period covers it.
//!
//! The effective range of a reservation is:
//!
//! | status                      | blocks                       |
//! |-----------------------------|------------------------------|
//! | cancelled, checked out      | nothing                      |
//! | no-show with release date   | `[check_in, released_from)`  |
//! | anything else               | `[check_in, check_out)`      |
//!
//! [`is_available`] must run inside the transaction that will write the
//! booking so the rows it reads stay locked until commit. [`resolve`] is
//! the pure decision over already-fetched rows.

use std::fmt;

use chrono::NaiveDate;
use log::debug;
use serde::Serialize;

use crate::blocked::BlockedPeriod;
use crate::error::{Blocker, Error, Result};
use crate::reservation::{Reservation, ReservationCode, ReservationId, ReservationStatus};
use crate::stay::{DateSpan, StayRange};
use crate::store::ReservationStore;

/// Outcome of an availability check.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Availability {
    /// The stay can be booked.
    Available,
    /// The stay is blocked by the given entity.
    Unavailable(Blocker),
}

impl Availability {
    /// Whether the stay can be booked.
    #[must_use]
    pub const fn is_available(&self) -> bool {
        matches!(self, Self::Available)
    }

    /// The blocking entity, if any.
    #[must_use]
    pub const fn blocker(&self) -> Option<&Blocker> {
        match self {
            Self::Available => None,
            Self::Unavailable(blocker) => Some(blocker),
        }
    }

    /// Converts unavailability into [`Error::Conflict`].
    ///
    /// # Errors
    ///
    /// Returns the conflict if the stay is unavailable.
    pub fn into_result(self) -> Result<()> {
        match self {
            Self::Available => Ok(()),
            Self::Unavailable(blocker) => Err(Error::Conflict { blocker }),
        }
    }
}

impl fmt::Display for Availability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Available => f.write_str("available"),
            Self::Unavailable(blocker) => write!(f, "unavailable ({blocker})"),
        }
    }
}

/// Decides availability from reservations and blocked periods already read
/// from the store.
///
/// Reservations are re-checked against their effective blocked range, so the
/// input may contain no-shows whose released nights no longer conflict.
/// Reservations are checked before blocked periods.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use haven::availability::{resolve, Availability};
/// use haven::{Reservation, ReservationCode, ReservationStatus, StayRange};
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 7, day).unwrap();
/// let no_show = Reservation::builder(
///     ReservationCode::new("HV-NOSHOW").unwrap(),
///     StayRange::new(d(1), d(10)).unwrap(),
/// )
/// .status(ReservationStatus::NoShow)
/// .released_from(Some(d(4)))
/// .build()
/// .unwrap();
///
/// let later = StayRange::new(d(5), d(10)).unwrap();
/// assert_eq!(resolve(&later, &[no_show.clone()], &[], None), Availability::Available);
///
/// let early = StayRange::new(d(3), d(6)).unwrap();
/// assert!(!resolve(&early, &[no_show], &[], None).is_available());
/// ```
#[must_use]
pub fn resolve(
    candidate: &StayRange,
    reservations: &[Reservation],
    periods: &[BlockedPeriod],
    exclude: Option<ReservationId>,
) -> Availability {
    let conflicting = reservations
        .iter()
        .filter(|r| Some(r.id()) != exclude)
        .find(|r| {
            r.blocked_range()
                .is_some_and(|blocked| blocked.overlaps(candidate))
        });
    if let Some(reservation) = conflicting {
        return Availability::Unavailable(Blocker::Reservation {
            code: reservation.code().to_string(),
        });
    }

    if let Some(period) = periods.iter().find(|p| p.blocks(candidate)) {
        return Availability::Unavailable(Blocker::Period {
            id: period.id(),
            reason: period.reason().to_string(),
        });
    }

    Availability::Available
}

/// Checks whether `candidate` is free, locking the overlapping reservations.
///
/// # Errors
///
/// Returns an error if the store cannot lock or read the rows.
pub fn is_available<S: ReservationStore + ?Sized>(
    store: &S,
    candidate: &StayRange,
    exclude: Option<ReservationId>,
) -> Result<Availability> {
    let reservations = store.lock_overlapping(candidate, exclude)?;
    let periods = store.list_blocked_periods(candidate)?;
    debug!(
        "checking {candidate}: {} overlapping reservation(s), {} blocked period(s)",
        reservations.len(),
        periods.len()
    );
    Ok(resolve(candidate, &reservations, &periods, exclude))
}

/// Where an occupied stretch of the calendar comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum Occupancy {
    /// A reservation's effective blocked range.
    Reservation {
        /// Booking code.
        code: ReservationCode,
        /// Current status.
        status: ReservationStatus,
        /// Nights held.
        range: StayRange,
    },
    /// An administrator blocked period.
    Blocked {
        /// Blocked period id.
        id: i64,
        /// Recorded reason.
        reason: String,
        /// Closed days (inclusive).
        span: DateSpan,
    },
}

impl Occupancy {
    /// First occupied date.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        match self {
            Self::Reservation { range, .. } => range.check_in(),
            Self::Blocked { span, .. } => span.start(),
        }
    }
}

impl fmt::Display for Occupancy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reservation {
                code,
                status,
                range,
            } => write!(f, "{range} {code} ({status})"),
            Self::Blocked { id, reason, span } => write!(f, "{span} blocked #{id}: {reason}"),
        }
    }
}

/// Lists what occupies `window`, ordered by start date.
///
/// Reservations appear with their effective blocked range; fully released
/// no-shows are omitted.
///
/// # Errors
///
/// Returns an error if the store cannot read the rows.
pub fn calendar<S: ReservationStore + ?Sized>(
    store: &S,
    window: &StayRange,
) -> Result<Vec<Occupancy>> {
    let mut entries: Vec<Occupancy> = store
        .lock_overlapping(window, None)?
        .into_iter()
        .filter_map(|r| {
            let range = r.blocked_range().filter(|b| b.overlaps(window))?;
            Some(Occupancy::Reservation {
                code: r.code().clone(),
                status: r.status(),
                range,
            })
        })
        .collect();

    entries.extend(
        store
            .list_blocked_periods(window)?
            .into_iter()
            .map(|p| Occupancy::Blocked {
                id: p.id(),
                reason: p.reason().to_string(),
                span: p.span(),
            }),
    );

    entries.sort_by_key(Occupancy::start);
    Ok(entries)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, d, insert_stay, insert_stay_released};
    use crate::database::Database;

    fn stay(from: (u32, u32), to: (u32, u32)) -> StayRange {
        StayRange::new(d(from.0, from.1), d(to.0, to.1)).unwrap()
    }

    fn check(db: &mut Database, candidate: StayRange) -> Availability {
        let tx = db.begin_transaction().unwrap();
        is_available(&*tx, &candidate, None).unwrap()
    }

    #[test]
    fn test_back_to_back_is_available() {
        let mut db = create_test_database();
        insert_stay(&db, "HV-JUNE01", d(6, 1), d(6, 5), ReservationStatus::Confirmed);

        assert!(check(&mut db, stay((6, 5), (6, 8))).is_available());
        assert!(check(&mut db, stay((5, 28), (6, 1))).is_available());
    }

    #[test]
    fn test_overlap_names_reservation() {
        let mut db = create_test_database();
        insert_stay(&db, "HV-JUNE01", d(6, 1), d(6, 5), ReservationStatus::Paid);

        let result = check(&mut db, stay((6, 4), (6, 8)));
        assert_eq!(
            result,
            Availability::Unavailable(Blocker::Reservation {
                code: "HV-JUNE01".into()
            })
        );
        assert!(result.into_result().unwrap_err().is_conflict());
    }

    #[test]
    fn test_cancelled_and_checked_out_never_block() {
        let mut db = create_test_database();
        insert_stay(&db, "HV-CANC01", d(6, 1), d(6, 5), ReservationStatus::Cancelled);
        insert_stay(&db, "HV-DONE01", d(6, 1), d(6, 5), ReservationStatus::CheckedOut);

        for _ in 0..3 {
            assert!(check(&mut db, stay((6, 1), (6, 5))).is_available());
        }
    }

    #[test]
    fn test_partial_no_show_release() {
        let mut db = create_test_database();
        insert_stay_released(
            &db,
            "HV-NOSH01",
            d(7, 1),
            d(7, 10),
            ReservationStatus::NoShow,
            Some(d(7, 4)),
        );

        assert!(check(&mut db, stay((7, 5), (7, 10))).is_available());
        assert!(check(&mut db, stay((7, 4), (7, 6))).is_available());
        assert!(!check(&mut db, stay((7, 3), (7, 5))).is_available());
    }

    #[test]
    fn test_full_no_show_release() {
        let mut db = create_test_database();
        insert_stay_released(
            &db,
            "HV-NOSH02",
            d(7, 1),
            d(7, 10),
            ReservationStatus::NoShow,
            Some(d(7, 1)),
        );
        assert!(check(&mut db, stay((7, 1), (7, 10))).is_available());
    }

    #[test]
    fn test_no_show_without_release_blocks_whole_stay() {
        let mut db = create_test_database();
        insert_stay(&db, "HV-NOSH03", d(7, 1), d(7, 10), ReservationStatus::NoShow);
        assert!(!check(&mut db, stay((7, 8), (7, 12))).is_available());
    }

    #[test]
    fn test_blocked_period_reason_reported() {
        let mut db = create_test_database();
        Database::insert_blocked_period(
            db.connection(),
            DateSpan::new(d(8, 10), d(8, 12)).unwrap(),
            "roof repair",
        )
        .unwrap();

        match check(&mut db, stay((8, 11), (8, 14))) {
            Availability::Unavailable(Blocker::Period { reason, .. }) => {
                assert_eq!(reason, "roof repair");
            }
            other => panic!("expected blocked period, got {other:?}"),
        }
        assert!(check(&mut db, stay((8, 12), (8, 14))).is_available());
    }

    #[test]
    fn test_exclude_self() {
        let mut db = create_test_database();
        let own = insert_stay(&db, "HV-SELF01", d(6, 1), d(6, 5), ReservationStatus::Confirmed);

        let tx = db.begin_transaction().unwrap();
        let extended = stay((6, 1), (6, 7));
        assert!(!is_available(&*tx, &extended, None).unwrap().is_available());
        assert!(is_available(&*tx, &extended, Some(own.id()))
            .unwrap()
            .is_available());
    }

    #[test]
    fn test_calendar_lists_effective_ranges() {
        let mut db = create_test_database();
        insert_stay(&db, "HV-CAL001", d(6, 1), d(6, 5), ReservationStatus::Confirmed);
        insert_stay(&db, "HV-CAL002", d(6, 8), d(6, 9), ReservationStatus::Cancelled);
        insert_stay_released(
            &db,
            "HV-CAL003",
            d(6, 10),
            d(6, 20),
            ReservationStatus::NoShow,
            Some(d(6, 12)),
        );
        Database::insert_blocked_period(
            db.connection(),
            DateSpan::new(d(6, 6), d(6, 7)).unwrap(),
            "owner",
        )
        .unwrap();

        let tx = db.begin_read().unwrap();
        let entries = calendar(&*tx, &stay((6, 1), (7, 1))).unwrap();
        let starts: Vec<_> = entries.iter().map(Occupancy::start).collect();
        assert_eq!(starts, vec![d(6, 1), d(6, 6), d(6, 10)]);

        match &entries[2] {
            Occupancy::Reservation { range, .. } => {
                assert_eq!(*range, stay((6, 10), (6, 12)));
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }
}
