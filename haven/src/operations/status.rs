//! Happy-path status moves: confirm, pay, check in, check out.

use std::fmt;

use chrono::Utc;
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::events::ReservationEvent;
use crate::reservation::ReservationStatus;
use crate::store::ReservationRef;

use super::plan::{OperationPlan, PlanAction, TransitionPatch};

/// A forward move along `pending -> confirmed -> paid -> checked_in -> checked_out`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusAction {
    /// `pending -> confirmed`.
    Confirm,
    /// `pending | confirmed -> paid`.
    MarkPaid,
    /// `confirmed | paid -> checked_in`.
    CheckIn,
    /// `checked_in -> checked_out`; earns pending credit.
    CheckOut,
}

impl StatusAction {
    /// The status the move ends in.
    #[must_use]
    pub const fn target(self) -> ReservationStatus {
        match self {
            Self::Confirm => ReservationStatus::Confirmed,
            Self::MarkPaid => ReservationStatus::Paid,
            Self::CheckIn => ReservationStatus::CheckedIn,
            Self::CheckOut => ReservationStatus::CheckedOut,
        }
    }

    const fn verb(self) -> &'static str {
        match self {
            Self::Confirm => "confirm",
            Self::MarkPaid => "mark as paid",
            Self::CheckIn => "check in",
            Self::CheckOut => "check out",
        }
    }
}

impl fmt::Display for StatusAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.verb())
    }
}

/// Plans a status move on one reservation.
pub struct StatusPlan {
    reference: ReservationRef,
    action: StatusAction,
}

impl StatusPlan {
    /// Creates a planner.
    #[must_use]
    pub const fn new(reference: ReservationRef, action: StatusAction) -> Self {
        Self { reference, action }
    }

    /// Builds the plan. Must run inside the write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation or
    /// [`Error::InvalidTransition`] if the move is not allowed from the
    /// current status.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let before = self.reference.fetch(conn)?;
        let old_status = before.status();
        let target = self.action.target();

        if !old_status.can_advance_to(target) {
            return Err(Error::InvalidTransition {
                status: old_status,
                action: self.action.verb().to_string(),
            });
        }

        let patch = match self.action {
            StatusAction::CheckOut => TransitionPatch::CheckOut,
            _ => TransitionPatch::Status { to: target },
        };
        let after = patch.apply(&before, Utc::now())?;

        let mut plan = OperationPlan::new(format!("{} {}", self.action, before.code()))
            .add_action(PlanAction::Update {
                patch,
                reservation: after.clone(),
            });

        plan = if self.action == StatusAction::CheckOut {
            plan.add_action(PlanAction::EarnPendingCredits(after.id()))
                .add_action(PlanAction::Emit(ReservationEvent::CheckedOut {
                    reservation: after,
                    old_status,
                }))
        } else {
            plan.add_action(PlanAction::Emit(ReservationEvent::Modified {
                reservation: after,
                old_status,
                previous_stay: None,
            }))
        };
        Ok(plan)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::database::test_util::{create_test_database, d, insert_stay};

    fn plan_for(status: ReservationStatus, action: StatusAction) -> Result<OperationPlan> {
        let mut db = create_test_database();
        let r = insert_stay(&db, "HV-STAT01", d(8, 1), d(8, 4), status);
        let tx = db.begin_transaction().unwrap();
        StatusPlan::new(ReservationRef::from(&r), action).build_plan(&tx)
    }

    #[test]
    fn test_allowed_moves() {
        use ReservationStatus::{CheckedIn, Confirmed, Paid, Pending};
        for (from, action) in [
            (Pending, StatusAction::Confirm),
            (Pending, StatusAction::MarkPaid),
            (Confirmed, StatusAction::MarkPaid),
            (Confirmed, StatusAction::CheckIn),
            (Paid, StatusAction::CheckIn),
            (CheckedIn, StatusAction::CheckOut),
        ] {
            let plan = plan_for(from, action).unwrap();
            assert_eq!(plan.reservation().unwrap().status(), action.target());
        }
    }

    #[test]
    fn test_rejected_moves() {
        use ReservationStatus::{Cancelled, CheckedIn, CheckedOut, NoShow, Paid, Pending};
        for (from, action) in [
            (Pending, StatusAction::CheckIn),
            (Pending, StatusAction::CheckOut),
            (Paid, StatusAction::Confirm),
            (Paid, StatusAction::CheckOut),
            (CheckedIn, StatusAction::MarkPaid),
            (CheckedOut, StatusAction::CheckOut),
            (Cancelled, StatusAction::Confirm),
            (NoShow, StatusAction::CheckIn),
        ] {
            let err = plan_for(from, action).unwrap_err();
            assert!(
                matches!(err, Error::InvalidTransition { status, .. } if status == from),
                "{from} / {action}: {err}"
            );
        }
    }

    #[test]
    fn test_check_out_earns_credit_and_emits_checked_out() {
        let plan = plan_for(ReservationStatus::CheckedIn, StatusAction::CheckOut).unwrap();
        assert!(plan
            .actions
            .iter()
            .any(|a| matches!(a, PlanAction::EarnPendingCredits(_))));
        assert!(plan.actions.iter().any(|a| matches!(
            a,
            PlanAction::Emit(ReservationEvent::CheckedOut {
                old_status: ReservationStatus::CheckedIn,
                ..
            })
        )));
    }

    #[test]
    fn test_error_message_names_rule() {
        let err = plan_for(ReservationStatus::CheckedOut, StatusAction::CheckIn).unwrap_err();
        assert_eq!(err.to_string(), "cannot check in a checked_out reservation");
    }
}
