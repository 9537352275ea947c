//! Database CRUD operations for reservations and blocked periods.
//!
//! Most functions take a `&Connection` so they can run inside a caller's
//! transaction (a `Transaction` derefs to a `Connection`). The
//! [`ReservationStore`] implementation for `Connection` delegates here.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use log::debug;
use rusqlite::types::Type;
use rusqlite::{params, Connection, OptionalExtension, Row};
use rust_decimal::Decimal;

use crate::blocked::{validate_reason, BlockedPeriod};
use crate::error::{Error, Result};
use crate::pricing::Charges;
use crate::reservation::{
    CancellationPolicy, Guests, Reservation, ReservationCode, ReservationId, ReservationStatus,
};
use crate::stay::{DateSpan, StayRange};
use crate::store::ReservationStore;

use super::connection::Database;
use super::schema::{INSERT_RESERVATION, RESERVATION_COLUMNS, UPDATE_RESERVATION};

/// Parses a TEXT column through `FromStr`, reporting failures as conversion errors.
fn parse_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: String = row.get(idx)?;
    text.parse::<T>()
        .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
}

/// Like [`parse_column`] for nullable columns.
fn parse_optional_column<T>(row: &Row<'_>, idx: usize) -> rusqlite::Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let text: Option<String> = row.get(idx)?;
    text.map(|t| {
        t.parse::<T>()
            .map_err(|e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e)))
    })
    .transpose()
}

fn conversion_error(
    idx: usize,
) -> impl FnOnce(crate::reservation::ValidationError) -> rusqlite::Error {
    move |e| rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(e))
}

/// Deserializes a reservation from a row selected with [`RESERVATION_COLUMNS`].
fn row_to_reservation(row: &Row<'_>) -> rusqlite::Result<Reservation> {
    let id: ReservationId = parse_column(row, 0)?;
    let code_text: String = row.get(1)?;
    let code = ReservationCode::new(code_text).map_err(conversion_error(1))?;
    let check_in: NaiveDate = parse_column(row, 2)?;
    let check_out: NaiveDate = parse_column(row, 3)?;
    let stay = StayRange::new(check_in, check_out).map_err(conversion_error(3))?;
    let guests = Guests {
        adults: row.get(4)?,
        children: row.get(5)?,
        infants: row.get(6)?,
    };
    let charges = Charges {
        nightly_rate: parse_column(row, 8)?,
        cleaning_fee: parse_column(row, 9)?,
        pet_fee: parse_column(row, 10)?,
        tourist_tax: parse_column(row, 11)?,
    };
    let policy: CancellationPolicy = parse_column(row, 12)?;
    let total_price: Decimal = parse_column(row, 13)?;
    let applied_credit: Decimal = parse_column(row, 14)?;
    let amount_due: Decimal = parse_column(row, 15)?;
    let status: ReservationStatus = parse_column(row, 16)?;
    let created_at: DateTime<Utc> = parse_column(row, 17)?;
    let updated_at: DateTime<Utc> = parse_column(row, 18)?;
    let cancelled_at: Option<DateTime<Utc>> = parse_optional_column(row, 19)?;
    let cancellation_reason: Option<String> = row.get(20)?;
    let released_from: Option<NaiveDate> = parse_optional_column(row, 21)?;

    Reservation::builder(code, stay)
        .id(id)
        .guests(guests)
        .guest_name(row.get(7)?)
        .charges(charges)
        .policy(policy)
        .totals(total_price, applied_credit, amount_due)
        .status(status)
        .created_at(created_at)
        .updated_at(updated_at)
        .cancellation(cancelled_at, cancellation_reason)
        .released_from(released_from)
        .build()
        .map_err(conversion_error(0))
}

fn row_to_blocked_period(row: &Row<'_>) -> rusqlite::Result<BlockedPeriod> {
    let id: i64 = row.get(0)?;
    let start: NaiveDate = parse_column(row, 1)?;
    let end: NaiveDate = parse_column(row, 2)?;
    let reason: String = row.get(3)?;
    let created_at: DateTime<Utc> = parse_column(row, 4)?;
    let span = DateSpan::new(start, end).map_err(conversion_error(2))?;
    BlockedPeriod::with_created_at(id, span, reason, created_at).map_err(conversion_error(3))
}

fn timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339()
}

const BLOCKED_COLUMNS: &str = "id, start_date, end_date, reason, created_at";

impl Database {
    /// Inserts a new reservation (without creating a transaction).
    ///
    /// # Errors
    ///
    /// Returns a validation error naming `code` if the booking code is
    /// already taken, or any other database error.
    pub fn insert_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        let charges = reservation.charges();
        let guests = reservation.guests();
        let result = conn.execute(
            INSERT_RESERVATION,
            params![
                reservation.id().to_string(),
                reservation.code().as_str(),
                reservation.stay().check_in().to_string(),
                reservation.stay().check_out().to_string(),
                guests.adults,
                guests.children,
                guests.infants,
                reservation.guest_name(),
                charges.nightly_rate.to_string(),
                charges.cleaning_fee.to_string(),
                charges.pet_fee.to_string(),
                charges.tourist_tax.to_string(),
                reservation.policy().as_str(),
                reservation.total_price().to_string(),
                reservation.applied_credit().to_string(),
                reservation.amount_due().to_string(),
                reservation.status().as_str(),
                timestamp(reservation.created_at()),
                timestamp(reservation.updated_at()),
                reservation.cancelled_at().map(timestamp),
                reservation.cancellation_reason(),
                reservation.released_from().map(|d| d.to_string()),
            ],
        );

        match result {
            Ok(_) => {
                debug!("inserted reservation {}", reservation.code());
                Ok(())
            }
            Err(e) if e.sqlite_error_code() == Some(rusqlite::ErrorCode::ConstraintViolation) => {
                Err(Error::Validation {
                    field: "code".into(),
                    message: format!(
                        "reservation {} or its code already exists",
                        reservation.code()
                    ),
                })
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Replaces the stored value of an existing reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no row has the reservation's id.
    pub fn update_reservation(conn: &Connection, reservation: &Reservation) -> Result<()> {
        let charges = reservation.charges();
        let guests = reservation.guests();
        let rows_affected = conn.execute(
            UPDATE_RESERVATION,
            params![
                reservation.id().to_string(),
                reservation.stay().check_in().to_string(),
                reservation.stay().check_out().to_string(),
                guests.adults,
                guests.children,
                guests.infants,
                reservation.guest_name(),
                charges.nightly_rate.to_string(),
                charges.cleaning_fee.to_string(),
                charges.pet_fee.to_string(),
                charges.tourist_tax.to_string(),
                reservation.policy().as_str(),
                reservation.total_price().to_string(),
                reservation.applied_credit().to_string(),
                reservation.amount_due().to_string(),
                reservation.status().as_str(),
                timestamp(reservation.updated_at()),
                reservation.cancelled_at().map(timestamp),
                reservation.cancellation_reason(),
                reservation.released_from().map(|d| d.to_string()),
            ],
        )?;

        if rows_affected == 0 {
            return Err(Error::NotFound {
                resource: format!("reservation {}", reservation.code()),
            });
        }
        debug!(
            "updated reservation {} ({})",
            reservation.code(),
            reservation.status()
        );
        Ok(())
    }

    /// Retrieves a reservation by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed.
    pub fn get_reservation_by_id(
        conn: &Connection,
        id: ReservationId,
    ) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE id = ?");
        Ok(conn
            .query_row(&sql, [id.to_string()], row_to_reservation)
            .optional()?)
    }

    /// Retrieves a reservation by booking code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or the stored row is malformed.
    pub fn get_reservation_by_code(
        conn: &Connection,
        code: &ReservationCode,
    ) -> Result<Option<Reservation>> {
        let sql = format!("SELECT {RESERVATION_COLUMNS} FROM reservations WHERE code = ?");
        Ok(conn
            .query_row(&sql, [code.as_str()], row_to_reservation)
            .optional()?)
    }

    /// Whether a booking code is already in use.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn code_exists(conn: &Connection, code: &ReservationCode) -> Result<bool> {
        let exists: bool = conn.query_row(
            "SELECT EXISTS (SELECT 1 FROM reservations WHERE code = ?)",
            [code.as_str()],
            |row| row.get(0),
        )?;
        Ok(exists)
    }

    /// Finds reservations that still hold dates and whose stored stay
    /// intersects `range`.
    ///
    /// Cancelled and checked-out reservations are excluded. No-shows are
    /// returned with their full stored stay; callers derive the effective
    /// blocked range.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_overlapping(
        conn: &Connection,
        range: &StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE status NOT IN ('cancelled', 'checked_out')
               AND check_in < ?2 AND check_out > ?1
               AND (?3 IS NULL OR id <> ?3)
             ORDER BY check_in, code"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![
                range.check_in().to_string(),
                range.check_out().to_string(),
                exclude.map(|id| id.to_string()),
            ],
            row_to_reservation,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Lists reservations ordered by check-in, optionally filtered by status.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_reservations(
        conn: &Connection,
        status: Option<ReservationStatus>,
    ) -> Result<Vec<Reservation>> {
        let sql = format!(
            "SELECT {RESERVATION_COLUMNS} FROM reservations
             WHERE (?1 IS NULL OR status = ?1)
             ORDER BY check_in, code"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([status.map(|s| s.as_str())], row_to_reservation)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Stores a new blocked period and returns it with its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is empty or the insert fails.
    pub fn insert_blocked_period(
        conn: &Connection,
        span: DateSpan,
        reason: &str,
    ) -> Result<BlockedPeriod> {
        let reason = validate_reason(reason)?;
        let created_at = Utc::now();
        conn.execute(
            "INSERT INTO blocked_periods (start_date, end_date, reason, created_at) VALUES (?, ?, ?, ?)",
            params![
                span.start().to_string(),
                span.end().to_string(),
                reason,
                timestamp(created_at),
            ],
        )?;
        let id = conn.last_insert_rowid();
        debug!("blocked {span} as #{id}");
        Ok(BlockedPeriod::with_created_at(id, span, reason, created_at)?)
    }

    /// Deletes a blocked period. Returns whether it existed.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn delete_blocked_period(conn: &Connection, id: i64) -> Result<bool> {
        let rows_affected = conn.execute("DELETE FROM blocked_periods WHERE id = ?", [id])?;
        Ok(rows_affected > 0)
    }

    /// Lists every blocked period ordered by start date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_all_blocked_periods(conn: &Connection) -> Result<Vec<BlockedPeriod>> {
        let sql = format!("SELECT {BLOCKED_COLUMNS} FROM blocked_periods ORDER BY start_date, id");
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map([], row_to_blocked_period)?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }

    /// Finds blocked periods that block `range`:
    /// `start_date < range.check_out AND end_date > range.check_in`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_blocking_periods(
        conn: &Connection,
        range: &StayRange,
    ) -> Result<Vec<BlockedPeriod>> {
        let sql = format!(
            "SELECT {BLOCKED_COLUMNS} FROM blocked_periods
             WHERE start_date < ?2 AND end_date > ?1
             ORDER BY start_date, id"
        );
        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt.query_map(
            params![range.check_in().to_string(), range.check_out().to_string()],
            row_to_blocked_period,
        )?;
        Ok(rows.collect::<rusqlite::Result<Vec<_>>>()?)
    }
}

impl ReservationStore for Connection {
    fn lock_overlapping(
        &self,
        range: &StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<Reservation>> {
        // Outside a transaction the result could be stale by the time it is used
        if self.is_autocommit() {
            return Err(Error::validation(
                "transaction",
                "overlapping reservations can only be locked inside a transaction",
            ));
        }
        Database::find_overlapping(self, range, exclude)
    }

    fn get_by_id(&self, id: ReservationId) -> Result<Option<Reservation>> {
        Database::get_reservation_by_id(self, id)
    }

    fn get_by_code(&self, code: &ReservationCode) -> Result<Option<Reservation>> {
        Database::get_reservation_by_code(self, code)
    }

    fn code_exists(&self, code: &ReservationCode) -> Result<bool> {
        Database::code_exists(self, code)
    }

    fn insert(&self, reservation: &Reservation) -> Result<()> {
        Database::insert_reservation(self, reservation)
    }

    fn save(&self, reservation: &Reservation) -> Result<()> {
        Database::update_reservation(self, reservation)
    }

    fn list_blocked_periods(&self, range: &StayRange) -> Result<Vec<BlockedPeriod>> {
        Database::find_blocking_periods(self, range)
    }
}
