//! Plan execution engine.

use log::debug;
use rusqlite::Connection;

use crate::error::Result;
use crate::events::ReservationEvent;
use crate::reservation::{Reservation, ReservationId};
use crate::store::ReservationStore;

use super::plan::{OperationPlan, PlanAction};

/// Result of executing a plan.
///
/// Events and credit requests are collected, not delivered: the caller
/// dispatches them once the transaction has committed.
#[derive(Debug, Clone)]
pub struct ExecutionResult {
    /// Whether this was a dry run (no changes made).
    pub dry_run: bool,

    /// Descriptions of actions that were taken (or would be taken).
    pub actions_taken: Vec<String>,

    /// Warnings from the plan.
    pub warnings: Vec<String>,

    /// The reservation written (or that would be written).
    pub reservation: Option<Reservation>,

    /// Events to deliver after commit. Empty for a dry run.
    pub events: Vec<ReservationEvent>,

    /// Reservations whose pending credit should be earned after commit.
    pub credits_to_earn: Vec<ReservationId>,
}

impl ExecutionResult {
    fn new(plan: &OperationPlan, dry_run: bool) -> Self {
        Self {
            dry_run,
            actions_taken: plan.actions.iter().map(PlanAction::description).collect(),
            warnings: plan.warnings.clone(),
            reservation: plan.reservation().cloned(),
            events: Vec::new(),
            credits_to_earn: Vec::new(),
        }
    }
}

/// Applies operation plans to an open transaction.
///
/// # Examples
///
/// ```no_run
/// use haven::operations::{OperationPlan, PlanExecutor};
/// use haven::{Database, DatabaseConfig};
///
/// let mut db = Database::open(DatabaseConfig::new("/tmp/haven.db")).unwrap();
/// let tx = db.begin_transaction().unwrap();
/// let plan = OperationPlan::new("Nothing to do");
///
/// let result = PlanExecutor::new(&tx).dry_run().execute(&plan).unwrap();
/// assert!(result.dry_run);
/// ```
pub struct PlanExecutor<'a> {
    conn: &'a Connection,
    dry_run: bool,
}

impl<'a> PlanExecutor<'a> {
    /// Creates an executor writing through `conn`.
    #[must_use]
    pub const fn new(conn: &'a Connection) -> Self {
        Self {
            conn,
            dry_run: false,
        }
    }

    /// Sets the executor to dry-run mode: the plan is reported, not applied.
    #[must_use]
    pub const fn dry_run(mut self) -> Self {
        self.dry_run = true;
        self
    }

    /// Executes the given plan.
    ///
    /// # Errors
    ///
    /// Returns an error if any write fails. The caller must then drop the
    /// transaction so nothing is persisted.
    pub fn execute(&self, plan: &OperationPlan) -> Result<ExecutionResult> {
        let mut result = ExecutionResult::new(plan, self.dry_run);
        if self.dry_run {
            debug!("dry run: {}", plan.description);
            return Ok(result);
        }

        for action in &plan.actions {
            match action {
                PlanAction::Insert(reservation) => self.conn.insert(reservation)?,
                PlanAction::Update { reservation, .. } => self.conn.save(reservation)?,
                PlanAction::Emit(event) => result.events.push(event.clone()),
                PlanAction::EarnPendingCredits(id) => result.credits_to_earn.push(*id),
            }
            debug!("{}", action.description());
        }

        Ok(result)
    }
}
