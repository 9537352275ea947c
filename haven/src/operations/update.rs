//! Modification of an existing booking.
//!
//! Every field is optional; unset fields keep their stored value. New dates
//! are re-checked against every other reservation while the overlapping
//! rows are locked, and the price is recomputed whenever a commercial term
//! moves.

use chrono::Utc;
use log::debug;
use rust_decimal::Decimal;
use rusqlite::Connection;

use crate::availability;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::ReservationEvent;
use crate::pricing::{price, Charges};
use crate::reservation::{CancellationPolicy, Guests, ReservationStatus};
use crate::stay::StayRange;
use crate::store::ReservationRef;

use super::create::{check_guest_limit, unused_credit_warning};
use super::plan::{OperationPlan, PlanAction, TransitionPatch};

/// Requested changes to a reservation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpdateOptions {
    /// The reservation to change.
    pub reference: ReservationRef,

    /// New stay.
    pub stay: Option<StayRange>,

    /// New guest breakdown.
    pub guests: Option<Guests>,

    /// New lead guest name; `Some(None)` clears it.
    pub guest_name: Option<Option<String>>,

    /// New rate and fees.
    pub charges: Option<Charges>,

    /// New cancellation policy.
    pub policy: Option<CancellationPolicy>,

    /// New applied credit.
    pub applied_credit: Option<Decimal>,

    /// New status, limited to forward moves short of checkout.
    pub status: Option<ReservationStatus>,
}

impl UpdateOptions {
    /// Creates options that change nothing yet.
    #[must_use]
    pub const fn new(reference: ReservationRef) -> Self {
        Self {
            reference,
            stay: None,
            guests: None,
            guest_name: None,
            charges: None,
            policy: None,
            applied_credit: None,
            status: None,
        }
    }

    /// Moves the stay.
    #[must_use]
    pub const fn with_stay(mut self, stay: StayRange) -> Self {
        self.stay = Some(stay);
        self
    }

    /// Changes the guest breakdown.
    #[must_use]
    pub const fn with_guests(mut self, guests: Guests) -> Self {
        self.guests = Some(guests);
        self
    }

    /// Replaces (or with `None`, clears) the lead guest name.
    #[must_use]
    pub fn with_guest_name(mut self, name: Option<String>) -> Self {
        self.guest_name = Some(name);
        self
    }

    /// Changes the rate and fees.
    #[must_use]
    pub const fn with_charges(mut self, charges: Charges) -> Self {
        self.charges = Some(charges);
        self
    }

    /// Changes the cancellation policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CancellationPolicy) -> Self {
        self.policy = Some(policy);
        self
    }

    /// Changes the applied credit.
    #[must_use]
    pub const fn with_applied_credit(mut self, credit: Decimal) -> Self {
        self.applied_credit = Some(credit);
        self
    }

    /// Moves the status forward.
    #[must_use]
    pub const fn with_status(mut self, status: ReservationStatus) -> Self {
        self.status = Some(status);
        self
    }
}

/// Plans a modification.
pub struct UpdatePlan<'a> {
    options: UpdateOptions,
    config: &'a Config,
}

impl<'a> UpdatePlan<'a> {
    /// Creates a planner for `options` under `config`.
    #[must_use]
    pub const fn new(options: UpdateOptions, config: &'a Config) -> Self {
        Self { options, config }
    }

    /// Builds the plan. Must run inside the write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation,
    /// [`Error::InvalidTransition`] for a terminal reservation or an illegal
    /// status move, [`Error::Conflict`] when the new dates are taken, or a
    /// validation error for bad or empty input.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let opts = &self.options;
        let before = opts.reference.fetch(conn)?;
        let old_status = before.status();
        if !old_status.can_modify() {
            return Err(Error::InvalidTransition {
                status: old_status,
                action: "modify".into(),
            });
        }

        let stay = opts.stay.unwrap_or(before.stay());
        let guests = opts.guests.unwrap_or(before.guests());
        let guest_name = match &opts.guest_name {
            Some(name) => name
                .as_deref()
                .map(str::trim)
                .filter(|n| !n.is_empty())
                .map(str::to_string),
            None => before.guest_name().map(str::to_string),
        };
        let charges = opts.charges.unwrap_or(*before.charges());
        let policy = opts.policy.unwrap_or(before.policy());
        let applied_credit = opts.applied_credit.unwrap_or(before.applied_credit());
        let status = opts.status.unwrap_or(old_status);

        let stay_changed = stay != before.stay();
        let commercial_changed = stay_changed
            || charges != *before.charges()
            || policy != before.policy()
            || applied_credit != before.applied_credit();
        let changed = commercial_changed
            || guests != before.guests()
            || guest_name.as_deref() != before.guest_name()
            || status != old_status;
        if !changed {
            return Err(Error::validation("update", "no changes requested"));
        }

        if status != old_status {
            if status == ReservationStatus::CheckedOut {
                return Err(Error::validation(
                    "status",
                    "use check-out to complete a stay",
                ));
            }
            if !old_status.can_advance_to(status) {
                return Err(Error::InvalidTransition {
                    status: old_status,
                    action: format!("set status {status} on"),
                });
            }
        }

        if guests != before.guests() {
            check_guest_limit(self.config, guests)?;
        }

        if stay_changed {
            availability::is_available(conn, &stay, Some(before.id()))?.into_result()?;
            debug!("{} can move from {} to {stay}", before.code(), before.stay());
        }

        let breakdown = if commercial_changed {
            Some(price(
                &self.config.pricing_rules()?,
                &charges,
                stay.nights(),
                policy,
                applied_credit,
            )?)
        } else {
            None
        };

        let mut warnings = Vec::new();
        if let Some(breakdown) = &breakdown {
            warnings.extend(unused_credit_warning(breakdown));
            let settled = matches!(
                old_status,
                ReservationStatus::Paid | ReservationStatus::CheckedIn
            );
            if settled && breakdown.total != before.total_price() {
                warnings.push(format!(
                    "{} was paid at {}; the new total is {}",
                    before.code(),
                    before.total_price(),
                    breakdown.total
                ));
            }
        }

        let patch = TransitionPatch::Modify {
            stay,
            guests,
            guest_name,
            charges,
            policy,
            price: breakdown,
            status,
        };
        let after = patch.apply(&before, Utc::now())?;

        let plan = OperationPlan::new(format!("Modify {}", before.code()))
            .add_action(PlanAction::Update {
                patch,
                reservation: after.clone(),
            })
            .add_action(PlanAction::Emit(ReservationEvent::Modified {
                reservation: after,
                old_status,
                previous_stay: stay_changed.then_some(before.stay()),
            }));
        Ok(warnings.into_iter().fold(plan, OperationPlan::add_warning))
    }
}
