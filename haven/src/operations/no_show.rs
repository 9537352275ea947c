//! No-show marking.
//!
//! Nights from the release date onwards return to inventory; omitting the
//! date releases the whole stay.

use chrono::{NaiveDate, Utc};
use rusqlite::Connection;

use crate::error::{Error, Result};
use crate::events::ReservationEvent;
use crate::store::ReservationRef;

use super::plan::{OperationPlan, PlanAction, TransitionPatch};

/// Plans marking one reservation as a no-show.
pub struct NoShowPlan {
    reference: ReservationRef,
    released_from: Option<NaiveDate>,
}

impl NoShowPlan {
    /// Creates a planner. `released_from` defaults to the check-in date.
    #[must_use]
    pub const fn new(reference: ReservationRef, released_from: Option<NaiveDate>) -> Self {
        Self {
            reference,
            released_from,
        }
    }

    /// Builds the plan. Must run inside the write transaction.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] for an unknown reservation,
    /// [`Error::InvalidTransition`] if it is cancelled, checked out or
    /// already a no-show, or a validation error if the release date lies
    /// outside `[check_in, check_out]`.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let before = self.reference.fetch(conn)?;
        let old_status = before.status();
        if !old_status.can_mark_no_show() {
            return Err(Error::InvalidTransition {
                status: old_status,
                action: "mark as no-show".into(),
            });
        }

        let released_from = self.released_from.unwrap_or(before.stay().check_in());
        let patch = TransitionPatch::NoShow { released_from };
        let after = patch.apply(&before, Utc::now())?;
        let released_nights = after.released_nights();

        Ok(OperationPlan::new(format!("Mark {} as no-show", before.code()))
            .add_action(PlanAction::Update {
                patch,
                reservation: after.clone(),
            })
            .add_action(PlanAction::Emit(ReservationEvent::NoShow {
                reservation: after,
                old_status,
                released_nights,
            })))
    }
}
