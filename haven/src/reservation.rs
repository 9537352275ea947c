//! Reservation types and the booking status machine.
//!
//! A [`Reservation`] records one stay at the property together with its
//! commercial terms and lifecycle state. Reservations are never deleted by
//! the library; cancelling, checking out or marking a no-show changes the
//! status, and availability derives the occupied nights from that status.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::money::check_amount;
use crate::pricing::{Charges, PriceBreakdown};
use crate::stay::StayRange;

/// Opaque unique identifier of a reservation.
///
/// # Examples
///
/// ```
/// use haven::ReservationId;
///
/// let a = ReservationId::new();
/// let b = ReservationId::new();
/// assert_ne!(a, b);
/// assert_eq!(a.to_string().parse::<ReservationId>().unwrap(), a);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationId(Uuid);

impl ReservationId {
    /// Generates a fresh random identifier.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Returns the underlying UUID.
    #[must_use]
    pub const fn as_uuid(&self) -> &Uuid {
        &self.0
    }
}

impl Default for ReservationId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReservationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ReservationId {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s.trim())
            .map(Self)
            .map_err(|e| ValidationError {
                field: "id".into(),
                message: format!("'{s}' is not a reservation id: {e}"),
            })
    }
}

/// Human-readable booking code, e.g. `HV-7K2QXD`.
///
/// Codes are unique across all reservations and never change once assigned.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservationCode(String);

impl ReservationCode {
    /// Wraps a code, normalising it to upper case.
    ///
    /// # Errors
    ///
    /// Returns an error if the code is empty or contains characters other
    /// than ASCII letters, digits and `-`.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven::ReservationCode;
    ///
    /// let code = ReservationCode::new("hv-ab12cd").unwrap();
    /// assert_eq!(code.as_str(), "HV-AB12CD");
    /// assert!(ReservationCode::new("").is_err());
    /// assert!(ReservationCode::new("HV AB").is_err());
    /// ```
    pub fn new(code: impl AsRef<str>) -> Result<Self, ValidationError> {
        let code = code.as_ref().trim();
        if code.is_empty() {
            return Err(ValidationError {
                field: "code".into(),
                message: "booking code must not be empty".into(),
            });
        }
        if !code.chars().all(|c| c.is_ascii_alphanumeric() || c == '-') {
            return Err(ValidationError {
                field: "code".into(),
                message: format!("booking code '{code}' contains invalid characters"),
            });
        }
        Ok(Self(code.to_ascii_uppercase()))
    }

    /// Wraps a code already known to be well-formed.
    pub(crate) fn from_trusted(code: String) -> Self {
        Self(code)
    }

    /// Returns the code as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ReservationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Guest count breakdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Guests {
    /// Adults (at least one).
    pub adults: u32,
    /// Children.
    pub children: u32,
    /// Infants.
    pub infants: u32,
}

impl Guests {
    /// Creates a guest breakdown.
    ///
    /// # Errors
    ///
    /// Returns an error if there is no adult.
    pub fn new(adults: u32, children: u32, infants: u32) -> Result<Self, ValidationError> {
        if adults == 0 {
            return Err(ValidationError {
                field: "adults".into(),
                message: "at least one adult is required".into(),
            });
        }
        Ok(Self {
            adults,
            children,
            infants,
        })
    }

    /// Total headcount.
    #[must_use]
    pub const fn total(&self) -> u32 {
        self.adults + self.children + self.infants
    }
}

impl Default for Guests {
    fn default() -> Self {
        Self {
            adults: 1,
            children: 0,
            infants: 0,
        }
    }
}

/// Cancellation policy chosen at booking time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum CancellationPolicy {
    /// Refundable; full price.
    #[default]
    Flexible,
    /// Not refundable; discounted.
    NonRefundable,
}

impl CancellationPolicy {
    /// The stored name of the policy.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Flexible => "flexible",
            Self::NonRefundable => "non_refundable",
        }
    }
}

impl fmt::Display for CancellationPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CancellationPolicy {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "flexible" => Ok(Self::Flexible),
            "non_refundable" | "nonrefundable" => Ok(Self::NonRefundable),
            _ => Err(ValidationError {
                field: "policy".into(),
                message: format!("unknown cancellation policy '{s}'"),
            }),
        }
    }
}

/// Lifecycle status of a reservation.
///
/// ```text
/// pending -> confirmed -> paid -> checked_in -> checked_out
///    \           \          \          \
///     +-----------+----------+----------+--> cancelled | no_show
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReservationStatus {
    /// Requested, awaiting confirmation.
    Pending,
    /// Accepted by the host.
    Confirmed,
    /// Payment received.
    Paid,
    /// Guest has arrived.
    CheckedIn,
    /// Guest has left. Terminal; frees the dates.
    CheckedOut,
    /// Cancelled. Terminal; frees the dates.
    Cancelled,
    /// Guest did not turn up or left early. Terminal; may free some dates.
    NoShow,
}

impl ReservationStatus {
    /// All statuses, in lifecycle order.
    pub const ALL: [Self; 7] = [
        Self::Pending,
        Self::Confirmed,
        Self::Paid,
        Self::CheckedIn,
        Self::CheckedOut,
        Self::Cancelled,
        Self::NoShow,
    ];

    /// The stored name of the status.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Paid => "paid",
            Self::CheckedIn => "checked_in",
            Self::CheckedOut => "checked_out",
            Self::Cancelled => "cancelled",
            Self::NoShow => "no_show",
        }
    }

    /// Whether no further transitions are possible.
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled | Self::NoShow)
    }

    /// Whether reservations in this status never occupy any night.
    #[must_use]
    pub const fn frees_dates(&self) -> bool {
        matches!(self, Self::CheckedOut | Self::Cancelled)
    }

    /// Whether a reservation in this status may be cancelled.
    #[must_use]
    pub const fn can_cancel(&self) -> bool {
        !matches!(self, Self::CheckedOut | Self::Cancelled | Self::NoShow)
    }

    /// Whether a reservation in this status may be marked as a no-show.
    #[must_use]
    pub const fn can_mark_no_show(&self) -> bool {
        !matches!(self, Self::Cancelled | Self::CheckedOut | Self::NoShow)
    }

    /// Whether a reservation in this status may have its dates or terms changed.
    #[must_use]
    pub const fn can_modify(&self) -> bool {
        !self.is_terminal()
    }

    /// Whether the happy-path move from `self` to `next` is allowed.
    ///
    /// Cancellation and no-show have their own checks and are not covered here.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven::ReservationStatus::*;
    ///
    /// assert!(Pending.can_advance_to(Confirmed));
    /// assert!(Confirmed.can_advance_to(Paid));
    /// assert!(CheckedIn.can_advance_to(CheckedOut));
    /// assert!(!Pending.can_advance_to(CheckedOut));
    /// assert!(!Paid.can_advance_to(Confirmed));
    /// ```
    #[must_use]
    pub const fn can_advance_to(&self, next: Self) -> bool {
        matches!(
            (self, next),
            (Self::Pending, Self::Confirmed | Self::Paid)
                | (Self::Confirmed, Self::Paid | Self::CheckedIn)
                | (Self::Paid, Self::CheckedIn)
                | (Self::CheckedIn, Self::CheckedOut)
        )
    }
}

impl fmt::Display for ReservationStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ReservationStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = s.trim().to_lowercase().replace('-', "_");
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == wanted)
            .ok_or_else(|| ValidationError {
                field: "status".into(),
                message: format!("unknown reservation status '{s}'"),
            })
    }
}

/// A booking of the property.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use haven::{Reservation, ReservationCode, ReservationStatus, StayRange};
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
/// let stay = StayRange::new(d(1), d(5)).unwrap();
/// let reservation = Reservation::builder(ReservationCode::new("HV-AAAAAA").unwrap(), stay)
///     .build()
///     .unwrap();
///
/// assert_eq!(reservation.status(), ReservationStatus::Pending);
/// assert_eq!(reservation.blocked_range(), Some(stay));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reservation {
    pub(crate) id: ReservationId,
    pub(crate) code: ReservationCode,
    pub(crate) stay: StayRange,
    pub(crate) guests: Guests,
    pub(crate) guest_name: Option<String>,
    pub(crate) charges: Charges,
    pub(crate) policy: CancellationPolicy,
    pub(crate) total_price: Decimal,
    pub(crate) applied_credit: Decimal,
    pub(crate) amount_due: Decimal,
    pub(crate) status: ReservationStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
    pub(crate) cancelled_at: Option<DateTime<Utc>>,
    pub(crate) cancellation_reason: Option<String>,
    pub(crate) released_from: Option<NaiveDate>,
}

impl Reservation {
    /// Creates a new reservation builder.
    #[must_use]
    pub fn builder(code: ReservationCode, stay: StayRange) -> ReservationBuilder {
        ReservationBuilder {
            id: None,
            code,
            stay,
            guests: Guests::default(),
            guest_name: None,
            charges: Charges::default(),
            policy: CancellationPolicy::default(),
            total_price: Decimal::ZERO,
            applied_credit: Decimal::ZERO,
            amount_due: Decimal::ZERO,
            status: ReservationStatus::Pending,
            created_at: None,
            updated_at: None,
            cancelled_at: None,
            cancellation_reason: None,
            released_from: None,
        }
    }

    /// Returns the opaque identifier.
    #[must_use]
    pub const fn id(&self) -> ReservationId {
        self.id
    }

    /// Returns the booking code.
    #[must_use]
    pub const fn code(&self) -> &ReservationCode {
        &self.code
    }

    /// Returns the booked nights.
    #[must_use]
    pub const fn stay(&self) -> StayRange {
        self.stay
    }

    /// Returns the guest breakdown.
    #[must_use]
    pub const fn guests(&self) -> Guests {
        self.guests
    }

    /// Returns the lead guest's name, if recorded.
    #[must_use]
    pub fn guest_name(&self) -> Option<&str> {
        self.guest_name.as_deref()
    }

    /// Returns the rate and fees the stay was priced with.
    #[must_use]
    pub const fn charges(&self) -> &Charges {
        &self.charges
    }

    /// Returns the cancellation policy.
    #[must_use]
    pub const fn policy(&self) -> CancellationPolicy {
        self.policy
    }

    /// Returns the total price after any discount.
    #[must_use]
    pub const fn total_price(&self) -> Decimal {
        self.total_price
    }

    /// Returns the credit applied to this booking.
    #[must_use]
    pub const fn applied_credit(&self) -> Decimal {
        self.applied_credit
    }

    /// Returns the amount still owed.
    #[must_use]
    pub const fn amount_due(&self) -> Decimal {
        self.amount_due
    }

    /// Returns the lifecycle status.
    #[must_use]
    pub const fn status(&self) -> ReservationStatus {
        self.status
    }

    /// Returns when the reservation was created.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Returns when the reservation was last changed.
    #[must_use]
    pub const fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }

    /// Returns when the reservation was cancelled.
    #[must_use]
    pub const fn cancelled_at(&self) -> Option<DateTime<Utc>> {
        self.cancelled_at
    }

    /// Returns the recorded cancellation reason.
    #[must_use]
    pub fn cancellation_reason(&self) -> Option<&str> {
        self.cancellation_reason.as_deref()
    }

    /// Returns the date from which a no-show's nights were released.
    #[must_use]
    pub const fn released_from(&self) -> Option<NaiveDate> {
        self.released_from
    }

    /// The nights this reservation currently keeps others from booking.
    ///
    /// - cancelled / checked out: none
    /// - no-show with a release date: `[check_in, released_from)`, none if fully released
    /// - otherwise the whole stay
    #[must_use]
    pub fn blocked_range(&self) -> Option<StayRange> {
        if self.status.frees_dates() {
            return None;
        }
        match (self.status, self.released_from) {
            (ReservationStatus::NoShow, Some(released_from)) => self.stay.truncated(released_from),
            _ => Some(self.stay),
        }
    }

    /// Number of nights returned to inventory by a no-show release.
    ///
    /// Zero unless the reservation is a no-show with a release date.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn released_nights(&self) -> u32 {
        match (self.status, self.released_from) {
            (ReservationStatus::NoShow, Some(released_from)) => {
                let from = released_from.max(self.stay.check_in());
                (self.stay.check_out() - from).num_days().max(0) as u32
            }
            _ => 0,
        }
    }

    /// Stores a fresh price breakdown on the reservation.
    pub(crate) fn set_price(&mut self, breakdown: &PriceBreakdown) {
        self.total_price = breakdown.total;
        self.applied_credit = breakdown.applied_credit;
        self.amount_due = breakdown.amount_due;
    }
}

/// Builder for creating `Reservation` instances.
#[derive(Debug)]
pub struct ReservationBuilder {
    id: Option<ReservationId>,
    code: ReservationCode,
    stay: StayRange,
    guests: Guests,
    guest_name: Option<String>,
    charges: Charges,
    policy: CancellationPolicy,
    total_price: Decimal,
    applied_credit: Decimal,
    amount_due: Decimal,
    status: ReservationStatus,
    created_at: Option<DateTime<Utc>>,
    updated_at: Option<DateTime<Utc>>,
    cancelled_at: Option<DateTime<Utc>>,
    cancellation_reason: Option<String>,
    released_from: Option<NaiveDate>,
}

impl ReservationBuilder {
    /// Sets the identifier (a fresh one is generated otherwise).
    #[must_use]
    pub const fn id(mut self, id: ReservationId) -> Self {
        self.id = Some(id);
        self
    }

    /// Sets the guest breakdown.
    #[must_use]
    pub const fn guests(mut self, guests: Guests) -> Self {
        self.guests = guests;
        self
    }

    /// Sets the lead guest's name. Whitespace is trimmed.
    #[must_use]
    pub fn guest_name(mut self, name: Option<String>) -> Self {
        self.guest_name = name.map(|n| n.trim().to_string());
        self
    }

    /// Sets the rate and fees.
    #[must_use]
    pub const fn charges(mut self, charges: Charges) -> Self {
        self.charges = charges;
        self
    }

    /// Sets the cancellation policy.
    #[must_use]
    pub const fn policy(mut self, policy: CancellationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Copies the totals from a price breakdown.
    #[must_use]
    pub const fn price(mut self, breakdown: &PriceBreakdown) -> Self {
        self.total_price = breakdown.total;
        self.applied_credit = breakdown.applied_credit;
        self.amount_due = breakdown.amount_due;
        self
    }

    /// Sets the stored totals directly (used when loading from storage).
    #[must_use]
    pub const fn totals(
        mut self,
        total_price: Decimal,
        applied_credit: Decimal,
        amount_due: Decimal,
    ) -> Self {
        self.total_price = total_price;
        self.applied_credit = applied_credit;
        self.amount_due = amount_due;
        self
    }

    /// Sets the status.
    #[must_use]
    pub const fn status(mut self, status: ReservationStatus) -> Self {
        self.status = status;
        self
    }

    /// Sets the creation timestamp.
    #[must_use]
    pub const fn created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    /// Sets the last-modified timestamp.
    #[must_use]
    pub const fn updated_at(mut self, updated_at: DateTime<Utc>) -> Self {
        self.updated_at = Some(updated_at);
        self
    }

    /// Sets the cancellation timestamp and reason.
    #[must_use]
    pub fn cancellation(mut self, at: Option<DateTime<Utc>>, reason: Option<String>) -> Self {
        self.cancelled_at = at;
        self.cancellation_reason = reason;
        self
    }

    /// Sets the no-show release date.
    #[must_use]
    pub const fn released_from(mut self, released_from: Option<NaiveDate>) -> Self {
        self.released_from = released_from;
        self
    }

    /// Builds the reservation, checking its invariants.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - there is no adult guest
    /// - the guest name is empty after trimming
    /// - a charge or total is negative or finer than a cent
    /// - `amount_due != max(0, total_price - applied_credit)`
    /// - the release date lies outside `[check_in, check_out]`
    pub fn build(self) -> Result<Reservation, ValidationError> {
        if self.guests.adults == 0 {
            return Err(ValidationError {
                field: "adults".into(),
                message: "at least one adult is required".into(),
            });
        }

        if let Some(ref name) = self.guest_name {
            if name.is_empty() {
                return Err(ValidationError {
                    field: "guest_name".into(),
                    message: "guest name must be non-empty after trimming whitespace".into(),
                });
            }
        }

        self.charges.validate()?;
        check_amount("total_price", self.total_price)?;
        check_amount("applied_credit", self.applied_credit)?;
        check_amount("amount_due", self.amount_due)?;

        let expected_due = (self.total_price - self.applied_credit).max(Decimal::ZERO);
        if self.amount_due != expected_due {
            return Err(ValidationError {
                field: "amount_due".into(),
                message: format!(
                    "amount due {} does not match total {} less credit {}",
                    self.amount_due, self.total_price, self.applied_credit
                ),
            });
        }

        if let Some(released_from) = self.released_from {
            validate_release_date(&self.stay, released_from)?;
        }

        let now = Utc::now();
        let created_at = self.created_at.unwrap_or(now);
        Ok(Reservation {
            id: self.id.unwrap_or_default(),
            code: self.code,
            stay: self.stay,
            guests: self.guests,
            guest_name: self.guest_name,
            charges: self.charges,
            policy: self.policy,
            total_price: self.total_price,
            applied_credit: self.applied_credit,
            amount_due: self.amount_due,
            status: self.status,
            created_at,
            updated_at: self.updated_at.unwrap_or(created_at),
            cancelled_at: self.cancelled_at,
            cancellation_reason: self.cancellation_reason,
            released_from: self.released_from,
        })
    }
}

/// Checks that a no-show release date lies within `[check_in, check_out]`.
///
/// # Errors
///
/// Returns an error naming `released_from` if the date is out of range.
pub fn validate_release_date(
    stay: &StayRange,
    released_from: NaiveDate,
) -> Result<(), ValidationError> {
    if released_from < stay.check_in() || released_from > stay.check_out() {
        return Err(ValidationError {
            field: "released_from".into(),
            message: format!(
                "release date {released_from} must lie within {}..={}",
                stay.check_in(),
                stay.check_out()
            ),
        });
    }
    Ok(())
}

/// Error type for validation failures.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    /// The field that failed validation.
    pub field: String,
    /// A description of the validation failure.
    pub message: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "validation error for '{}': {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    fn code() -> ReservationCode {
        ReservationCode::new("HV-TEST01").unwrap()
    }

    fn stay() -> StayRange {
        StayRange::new(d(7, 1), d(7, 10)).unwrap()
    }

    #[test]
    fn test_status_round_trips_through_str() {
        for status in ReservationStatus::ALL {
            assert_eq!(status.as_str().parse::<ReservationStatus>().unwrap(), status);
        }
        assert_eq!(
            "checked-in".parse::<ReservationStatus>().unwrap(),
            ReservationStatus::CheckedIn
        );
        assert!("archived".parse::<ReservationStatus>().is_err());
    }

    #[test]
    fn test_cancel_and_no_show_guards() {
        use ReservationStatus::*;

        assert!(Pending.can_cancel());
        assert!(CheckedIn.can_cancel());
        assert!(!CheckedOut.can_cancel());
        assert!(!Cancelled.can_cancel());

        assert!(Paid.can_mark_no_show());
        assert!(!NoShow.can_mark_no_show());
        assert!(!Cancelled.can_mark_no_show());
        assert!(!CheckedOut.can_mark_no_show());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!(
            "non-refundable".parse::<CancellationPolicy>().unwrap(),
            CancellationPolicy::NonRefundable
        );
        assert_eq!(
            "Flexible".parse::<CancellationPolicy>().unwrap(),
            CancellationPolicy::Flexible
        );
        assert!("strict".parse::<CancellationPolicy>().is_err());
    }

    #[test]
    fn test_guests_require_an_adult() {
        assert!(Guests::new(0, 2, 0).is_err());
        assert_eq!(Guests::new(2, 1, 1).unwrap().total(), 4);
    }

    #[test]
    fn test_builder_checks_amount_due() {
        let result = Reservation::builder(code(), stay())
            .totals(dec!(100), dec!(20), dec!(90))
            .build();
        assert_eq!(result.unwrap_err().field, "amount_due");

        let ok = Reservation::builder(code(), stay())
            .totals(dec!(100), dec!(120), dec!(0))
            .build()
            .unwrap();
        assert_eq!(ok.amount_due(), dec!(0));
    }

    #[test]
    fn test_builder_rejects_release_outside_stay() {
        let result = Reservation::builder(code(), stay())
            .status(ReservationStatus::NoShow)
            .released_from(Some(d(7, 11)))
            .build();
        assert_eq!(result.unwrap_err().field, "released_from");

        // Check-out day itself is allowed
        assert!(Reservation::builder(code(), stay())
            .status(ReservationStatus::NoShow)
            .released_from(Some(d(7, 10)))
            .build()
            .is_ok());
    }

    #[test]
    fn test_blocked_range_by_status() {
        let base = Reservation::builder(code(), stay()).build().unwrap();
        assert_eq!(base.blocked_range(), Some(stay()));

        for status in [ReservationStatus::Cancelled, ReservationStatus::CheckedOut] {
            let r = Reservation::builder(code(), stay()).status(status).build().unwrap();
            assert_eq!(r.blocked_range(), None);
        }
    }

    #[test]
    fn test_partial_no_show_blocks_only_used_nights() {
        let r = Reservation::builder(code(), stay())
            .status(ReservationStatus::NoShow)
            .released_from(Some(d(7, 4)))
            .build()
            .unwrap();
        assert_eq!(
            r.blocked_range(),
            Some(StayRange::new(d(7, 1), d(7, 4)).unwrap())
        );
        assert_eq!(r.released_nights(), 6);
    }

    #[test]
    fn test_full_no_show_blocks_nothing() {
        let r = Reservation::builder(code(), stay())
            .status(ReservationStatus::NoShow)
            .released_from(Some(d(7, 1)))
            .build()
            .unwrap();
        assert_eq!(r.blocked_range(), None);
        assert_eq!(r.released_nights(), 9);
    }

    #[test]
    fn test_guest_name_trimmed_and_checked() {
        let r = Reservation::builder(code(), stay())
            .guest_name(Some("  Ada Byron ".to_string()))
            .build()
            .unwrap();
        assert_eq!(r.guest_name(), Some("Ada Byron"));

        assert!(Reservation::builder(code(), stay())
            .guest_name(Some("   ".to_string()))
            .build()
            .is_err());
    }

    #[test]
    fn test_serde_round_trip() {
        let r = Reservation::builder(code(), stay())
            .charges(Charges::nightly(dec!(120)))
            .totals(dec!(1080), dec!(0), dec!(1080))
            .build()
            .unwrap();
        let json = serde_json::to_string(&r).unwrap();
        let back: Reservation = serde_json::from_str(&json).unwrap();
        assert_eq!(back, r);
    }
}
