//! Cancel operation planning.
//!
//! Cancelling leaves the recorded dates untouched; the dates free up
//! because cancelled reservations never take part in overlap queries.

use chrono::Utc;
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::events::ReservationEvent;
use crate::store::ReservationRef;

use super::plan::{OperationPlan, PlanAction, TransitionPatch};

/// Plans the cancellation of one reservation.
pub struct CancelPlan {
    reference: ReservationRef,
    reason: Option<String>,
}

impl CancelPlan {
    /// Creates a planner. A blank reason is dropped.
    #[must_use]
    pub fn new(reference: ReservationRef, reason: Option<String>) -> Self {
        let reason = reason
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        Self { reference, reason }
    }

    /// Builds the plan. Must run inside the write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation or
    /// [`Error::InvalidTransition`] if it is cancelled, checked out or a no-show.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let before = self.reference.fetch(conn)?;
        let old_status = before.status();
        if !old_status.can_cancel() {
            return Err(Error::InvalidTransition {
                status: old_status,
                action: "cancel".into(),
            });
        }

        let patch = TransitionPatch::Cancel {
            reason: self.reason.clone(),
        };
        let after = patch.apply(&before, Utc::now())?;

        Ok(OperationPlan::new(format!("Cancel {}", before.code()))
            .add_action(PlanAction::Update {
                patch,
                reservation: after.clone(),
            })
            .add_action(PlanAction::Emit(ReservationEvent::Cancelled {
                reservation: after,
                old_status,
            })))
    }
}
