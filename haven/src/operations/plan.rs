//! Plan types for lifecycle operations.
//!
//! A plan is built inside the write transaction, after the relevant rows
//! are locked, and lists every write and every follow-up the operation
//! will perform. Nothing is written while planning.

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::Result;
use crate::events::ReservationEvent;
use crate::pricing::{Charges, PriceBreakdown};
use crate::reservation::{
    validate_release_date, CancellationPolicy, Guests, Reservation, ReservationId,
    ReservationStatus,
};
use crate::stay::StayRange;

/// The change a transition makes to a stored reservation.
///
/// Each variant lists exactly the fields it rewrites; the reservation is
/// then saved as a whole value.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TransitionPatch {
    /// Happy-path status move (confirm, pay, check in).
    ///
    /// Fields: `status`, `updated_at`.
    Status {
        /// New status.
        to: ReservationStatus,
    },
    /// Cancellation.
    ///
    /// Fields: `status`, `cancelled_at`, `cancellation_reason`, `updated_at`.
    Cancel {
        /// Free-text reason.
        reason: Option<String>,
    },
    /// No-show with the date from which nights return to inventory.
    ///
    /// Fields: `status`, `released_from`, `updated_at`.
    NoShow {
        /// First night that is bookable again.
        released_from: NaiveDate,
    },
    /// Checkout.
    ///
    /// Fields: `status`, `updated_at`.
    CheckOut,
    /// Dates, party or terms changed.
    ///
    /// Fields: `stay`, `guests`, `guest_name`, `charges`, `policy`,
    /// `total_price`, `applied_credit`, `amount_due`, `status`, `updated_at`.
    Modify {
        /// New stay.
        stay: StayRange,
        /// New guest breakdown.
        guests: Guests,
        /// New lead guest name.
        guest_name: Option<String>,
        /// New rate and fees.
        charges: Charges,
        /// New cancellation policy.
        policy: CancellationPolicy,
        /// Price computed for the new terms; `None` keeps the stored totals.
        price: Option<PriceBreakdown>,
        /// New status.
        status: ReservationStatus,
    },
}

impl TransitionPatch {
    /// The stored fields this patch rewrites.
    #[must_use]
    pub const fn fields(&self) -> &'static [&'static str] {
        match self {
            Self::Status { .. } | Self::CheckOut => &["status", "updated_at"],
            Self::Cancel { .. } => &[
                "status",
                "cancelled_at",
                "cancellation_reason",
                "updated_at",
            ],
            Self::NoShow { .. } => &["status", "released_from", "updated_at"],
            Self::Modify { .. } => &[
                "stay",
                "guests",
                "guest_name",
                "charges",
                "policy",
                "total_price",
                "applied_credit",
                "amount_due",
                "status",
                "updated_at",
            ],
        }
    }

    /// Returns `before` with this patch applied at time `at`.
    ///
    /// # Errors
    ///
    /// Returns a validation error if the result would break a reservation
    /// invariant (release date outside the stay, inconsistent totals).
    pub fn apply(&self, before: &Reservation, at: DateTime<Utc>) -> Result<Reservation> {
        let mut after = before.clone();
        match self {
            Self::Status { to } => after.status = *to,
            Self::CheckOut => after.status = ReservationStatus::CheckedOut,
            Self::Cancel { reason } => {
                after.status = ReservationStatus::Cancelled;
                after.cancelled_at = Some(at);
                after.cancellation_reason.clone_from(reason);
            }
            Self::NoShow { released_from } => {
                validate_release_date(&before.stay, *released_from)?;
                after.status = ReservationStatus::NoShow;
                after.released_from = Some(*released_from);
            }
            Self::Modify {
                stay,
                guests,
                guest_name,
                charges,
                policy,
                price,
                status,
            } => {
                // Rebuild so every invariant is checked against the new terms
                let builder = Reservation::builder(before.code.clone(), *stay);
                let builder = match price {
                    Some(breakdown) => builder.price(breakdown),
                    None => builder.totals(
                        before.total_price,
                        before.applied_credit,
                        before.amount_due,
                    ),
                };
                after = builder
                    .id(before.id)
                    .guests(*guests)
                    .guest_name(guest_name.clone())
                    .charges(*charges)
                    .policy(*policy)
                    .status(*status)
                    .created_at(before.created_at)
                    .cancellation(before.cancelled_at, before.cancellation_reason.clone())
                    .build()?;
            }
        }
        after.updated_at = at;
        Ok(after)
    }
}

/// A single step of a plan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlanAction {
    /// Persist a new reservation.
    Insert(Reservation),

    /// Save the result of a transition.
    Update {
        /// The transition applied.
        patch: TransitionPatch,
        /// The reservation after the transition.
        reservation: Reservation,
    },

    /// Deliver an event once the transaction has committed.
    Emit(ReservationEvent),

    /// Ask the credit ledger to earn pending credit once committed.
    EarnPendingCredits(ReservationId),
}

impl PlanAction {
    /// Returns a human-readable description of this action.
    #[must_use]
    pub fn description(&self) -> String {
        match self {
            Self::Insert(r) => format!("Create reservation {} for {}", r.code(), r.stay()),
            Self::Update { patch, reservation } => format!(
                "Update reservation {} ({})",
                reservation.code(),
                patch.fields().join(", ")
            ),
            Self::Emit(event) => format!(
                "Emit {} event for {}",
                event.kind(),
                event.reservation().code()
            ),
            Self::EarnPendingCredits(id) => format!("Earn pending credits of {id}"),
        }
    }
}

/// A complete operation plan describing all actions to be taken.
#[derive(Debug, Clone)]
pub struct OperationPlan {
    /// A human-readable description of the operation.
    pub description: String,

    /// The sequence of actions to perform.
    pub actions: Vec<PlanAction>,

    /// Warnings to communicate to the user.
    pub warnings: Vec<String>,
}

impl OperationPlan {
    /// Creates an empty plan.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven::operations::OperationPlan;
    ///
    /// let plan = OperationPlan::new("Cancel HV-ABC123");
    /// assert_eq!(plan.description, "Cancel HV-ABC123");
    /// assert!(plan.is_empty());
    /// ```
    #[must_use]
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            actions: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Adds an action to the plan.
    #[must_use]
    pub fn add_action(mut self, action: PlanAction) -> Self {
        self.actions.push(action);
        self
    }

    /// Adds a warning to the plan.
    #[must_use]
    pub fn add_warning(mut self, warning: impl Into<String>) -> Self {
        self.warnings.push(warning.into());
        self
    }

    /// Checks if the plan has no actions.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.actions.is_empty()
    }

    /// Returns the number of actions in the plan.
    #[must_use]
    pub fn len(&self) -> usize {
        self.actions.len()
    }

    /// The reservation written by the plan, if any.
    #[must_use]
    pub fn reservation(&self) -> Option<&Reservation> {
        self.actions.iter().find_map(|action| match action {
            PlanAction::Insert(r) | PlanAction::Update { reservation: r, .. } => Some(r),
            PlanAction::Emit(_) | PlanAction::EarnPendingCredits(_) => None,
        })
    }
}
