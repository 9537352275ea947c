//! The reservation store contract.
//!
//! The lifecycle and the availability resolver only talk to storage through
//! [`ReservationStore`]. The `SQLite` implementation lives in
//! [`crate::database`] and is provided for [`rusqlite::Connection`] (and so
//! for any open [`rusqlite::Transaction`]).

use std::fmt;
use std::str::FromStr;

use crate::blocked::BlockedPeriod;
use crate::error::{Error, Result};
use crate::reservation::{Reservation, ReservationCode, ReservationId, ValidationError};
use crate::stay::StayRange;

/// Storage operations the booking core relies on.
///
/// # Locking
///
/// [`lock_overlapping`](Self::lock_overlapping) must be called inside the
/// transaction that will write the result, and the store must keep every
/// returned row locked against concurrent writers until that transaction
/// ends. Availability decisions are only valid while that lock is held.
pub trait ReservationStore {
    /// Returns every reservation whose stored stay intersects `range`,
    /// excluding cancelled and checked-out ones, and locks them.
    ///
    /// `exclude` drops a reservation from the result (used when a
    /// reservation is re-validated against its own new dates).
    ///
    /// # Errors
    ///
    /// Returns an error if the lock cannot be taken or the query fails.
    fn lock_overlapping(
        &self,
        range: &StayRange,
        exclude: Option<ReservationId>,
    ) -> Result<Vec<Reservation>>;

    /// Looks up a reservation by identifier.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_by_id(&self, id: ReservationId) -> Result<Option<Reservation>>;

    /// Looks up a reservation by booking code.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn get_by_code(&self, code: &ReservationCode) -> Result<Option<Reservation>>;

    /// Whether any reservation already holds `code`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn code_exists(&self, code: &ReservationCode) -> Result<bool>;

    /// Persists a new reservation.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails, including when the id or code
    /// is already taken.
    fn insert(&self, reservation: &Reservation) -> Result<()>;

    /// Replaces the stored value of an existing reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no row has the reservation's id.
    fn save(&self, reservation: &Reservation) -> Result<()>;

    /// Returns the blocked periods that make `range` unavailable.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    fn list_blocked_periods(&self, range: &StayRange) -> Result<Vec<BlockedPeriod>>;
}

/// A reference to a reservation given either by id or by booking code.
///
/// # Examples
///
/// ```
/// use haven::ReservationRef;
///
/// let by_code: ReservationRef = "hv-7k2qxd".parse().unwrap();
/// assert_eq!(by_code.to_string(), "HV-7K2QXD");
///
/// let by_id: ReservationRef = "67e55044-10b1-426f-9247-bb680e5fe0c8".parse().unwrap();
/// assert!(matches!(by_id, ReservationRef::Id(_)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReservationRef {
    /// Opaque identifier.
    Id(ReservationId),
    /// Booking code.
    Code(ReservationCode),
}

impl ReservationRef {
    /// Fetches the referenced reservation.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if it does not exist.
    pub fn fetch<S: ReservationStore + ?Sized>(&self, store: &S) -> Result<Reservation> {
        let found = match self {
            Self::Id(id) => store.get_by_id(*id)?,
            Self::Code(code) => store.get_by_code(code)?,
        };
        found.ok_or_else(|| Error::NotFound {
            resource: format!("reservation {self}"),
        })
    }
}

impl fmt::Display for ReservationRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => id.fmt(f),
            Self::Code(code) => code.fmt(f),
        }
    }
}

impl FromStr for ReservationRef {
    type Err = ValidationError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.parse::<ReservationId>() {
            Ok(id) => Ok(Self::Id(id)),
            Err(_) => ReservationCode::new(s).map(Self::Code),
        }
    }
}

impl From<ReservationId> for ReservationRef {
    fn from(id: ReservationId) -> Self {
        Self::Id(id)
    }
}

impl From<ReservationCode> for ReservationRef {
    fn from(code: ReservationCode) -> Self {
        Self::Code(code)
    }
}

impl From<&Reservation> for ReservationRef {
    fn from(reservation: &Reservation) -> Self {
        Self::Id(reservation.id())
    }
}
