//! Shared fixtures for database-backed unit tests.

use chrono::NaiveDate;
use rust_decimal::Decimal;

use crate::database::Database;
use crate::pricing::Charges;
use crate::reservation::{Reservation, ReservationCode, ReservationStatus};
use crate::stay::StayRange;

/// Creates a fresh in-memory database with the schema applied.
///
/// # Panics
///
/// Panics if the database cannot be created.
#[must_use]
pub fn create_test_database() -> Database {
    Database::open_in_memory().unwrap()
}

/// A 2025 date.
///
/// # Panics
///
/// Panics on an invalid month/day.
#[must_use]
pub fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// Inserts a pending reservation with the given code for 1-3 January 2030,
/// well away from the dates the tests book.
///
/// # Panics
///
/// Panics if the insert fails.
pub fn insert_test_reservation(db: &Database, code: &str) -> Reservation {
    let stay = StayRange::new(
        NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
        NaiveDate::from_ymd_opt(2030, 1, 3).unwrap(),
    )
    .unwrap();
    let reservation = Reservation::builder(ReservationCode::new(code).unwrap(), stay)
        .charges(Charges::nightly(Decimal::from(100)))
        .totals(Decimal::from(200), Decimal::ZERO, Decimal::from(200))
        .build()
        .unwrap();
    Database::insert_reservation(db.connection(), &reservation).unwrap();
    reservation
}

/// Inserts a reservation for `[check_in, check_out)` in the given status.
///
/// # Panics
///
/// Panics if the range is invalid or the insert fails.
pub fn insert_stay(
    db: &Database,
    code: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    status: ReservationStatus,
) -> Reservation {
    insert_stay_released(db, code, check_in, check_out, status, None)
}

/// Like [`insert_stay`] with a no-show release date.
///
/// # Panics
///
/// Panics if the range is invalid or the insert fails.
pub fn insert_stay_released(
    db: &Database,
    code: &str,
    check_in: NaiveDate,
    check_out: NaiveDate,
    status: ReservationStatus,
    released_from: Option<NaiveDate>,
) -> Reservation {
    let stay = StayRange::new(check_in, check_out).unwrap();
    let reservation = Reservation::builder(ReservationCode::new(code).unwrap(), stay)
        .status(status)
        .released_from(released_from)
        .build()
        .unwrap();
    Database::insert_reservation(db.connection(), &reservation).unwrap();
    reservation
}
