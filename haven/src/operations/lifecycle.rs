//! The lifecycle controller.
//!
//! [`Lifecycle`] is the entry point for every booking change. Each write
//! runs the same sequence:
//!
//! 1. take the database write lock (`BEGIN IMMEDIATE`)
//! 2. build the plan, which reads and checks under that lock
//! 3. execute the plan's writes
//! 4. commit, or roll back on any error
//! 5. hand events and credit requests to the collaborators
//!
//! Step 5 is best-effort: a failing sink or ledger is logged and the
//! committed change stands.

use std::path::Path;

use chrono::NaiveDate;
use log::{debug, info, warn};
use rusqlite::Connection;

use crate::availability::{self, Availability, Occupancy};
use crate::blocked::BlockedPeriod;
use crate::config::Config;
use crate::credits::{CreditLedger, NoopCreditLedger};
use crate::database::{Database, DatabaseConfig};
use crate::error::{Error, Result};
use crate::events::{EventSink, LogSink};
use crate::pricing::PriceBreakdown;
use crate::reservation::{Reservation, ReservationStatus};
use crate::stay::{DateSpan, StayRange};
use crate::store::ReservationRef;

use super::cancel::CancelPlan;
use super::create::{CreateOptions, CreatePlan};
use super::executor::{ExecutionResult, PlanExecutor};
use super::no_show::NoShowPlan;
use super::plan::OperationPlan;
use super::status::{StatusAction, StatusPlan};
use super::update::{UpdateOptions, UpdatePlan};

/// Price and availability of a stay, without booking it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Quote {
    /// The stay quoted.
    pub stay: StayRange,
    /// Computed price.
    pub price: PriceBreakdown,
    /// Whether the stay could be booked right now.
    pub availability: Availability,
}

/// Orchestrates reservation changes over a database.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use haven::config::Config;
/// use haven::operations::{CreateOptions, Lifecycle};
/// use haven::{Charges, Database, StayRange};
/// use rust_decimal::Decimal;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
/// let mut lifecycle = Lifecycle::new(Database::open_in_memory().unwrap(), Config::default());
///
/// let stay = StayRange::new(d(1), d(5)).unwrap();
/// let booked = lifecycle
///     .create(CreateOptions::new(stay, Charges::nightly(Decimal::from(100))))
///     .unwrap();
/// assert_eq!(booked.total_price(), Decimal::from(400));
///
/// // The same nights cannot be sold twice
/// let again = lifecycle.create(CreateOptions::new(stay, Charges::nightly(Decimal::from(100))));
/// assert!(again.unwrap_err().is_conflict());
/// ```
pub struct Lifecycle {
    db: Database,
    config: Config,
    events: Box<dyn EventSink>,
    credits: Box<dyn CreditLedger>,
}

impl Lifecycle {
    /// Creates a controller over an open database.
    ///
    /// Events go to the log and no credit ledger is attached until
    /// [`with_event_sink`](Self::with_event_sink) and
    /// [`with_credit_ledger`](Self::with_credit_ledger) say otherwise.
    #[must_use]
    pub fn new(db: Database, config: Config) -> Self {
        Self {
            db,
            config,
            events: Box::new(LogSink),
            credits: Box::new(NoopCreditLedger),
        }
    }

    /// Opens the database at `path` with the lock wait and auto-init
    /// settings from `config`.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened, or does not exist
    /// while `disable_autoinit` is set.
    pub fn open(path: impl AsRef<Path>, config: Config) -> Result<Self> {
        let mut db_config = DatabaseConfig::new(path).with_busy_timeout(config.lock_wait());
        if config.disable_autoinit.unwrap_or(false) {
            db_config = db_config.existing_only();
        }
        let db = Database::open(db_config)?;
        Ok(Self::new(db, config))
    }

    /// Replaces the event sink.
    #[must_use]
    pub fn with_event_sink(mut self, sink: impl EventSink + 'static) -> Self {
        self.events = Box::new(sink);
        self
    }

    /// Replaces the credit ledger.
    #[must_use]
    pub fn with_credit_ledger(mut self, ledger: impl CreditLedger + 'static) -> Self {
        self.credits = Box::new(ledger);
        self
    }

    /// The underlying database.
    #[must_use]
    pub const fn database(&self) -> &Database {
        &self.db
    }

    /// The active configuration.
    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// Books a stay.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Conflict`] if the nights are taken,
    /// [`Error::LockTimeout`] if the write lock is busy, or a validation
    /// error for bad input.
    pub fn create(&mut self, options: CreateOptions) -> Result<Reservation> {
        let result = self.run(|conn, config| CreatePlan::new(options, config).build_plan(conn))?;
        Self::written(result)
    }

    /// Plans a booking without writing it.
    ///
    /// The returned result carries the reservation that would be stored,
    /// including a freshly drawn code that is not reserved.
    ///
    /// # Errors
    ///
    /// Same as [`create`](Self::create).
    pub fn preview_create(&mut self, options: CreateOptions) -> Result<ExecutionResult> {
        let tx = self.db.begin_read()?;
        let plan = CreatePlan::new(options, &self.config).build_plan(&tx)?;
        let result = PlanExecutor::new(&tx).dry_run().execute(&plan)?;
        // Dropping the transaction rolls it back
        drop(tx);
        Ok(result)
    }

    /// Prices a stay and reports whether it is free.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad charges or credit, or a store error.
    pub fn quote(&mut self, options: &CreateOptions) -> Result<Quote> {
        let price = options.price(&self.config)?;
        let tx = self.db.begin_read()?;
        let availability = availability::is_available(&*tx, &options.stay, None)?;
        Ok(Quote {
            stay: options.stay,
            price,
            availability,
        })
    }

    /// Changes dates, party, terms or status of a booking.
    ///
    /// # Errors
    ///
    /// See [`UpdatePlan::build_plan`].
    pub fn update(&mut self, options: UpdateOptions) -> Result<Reservation> {
        let result = self.run(|conn, config| UpdatePlan::new(options, config).build_plan(conn))?;
        Self::written(result)
    }

    /// Cancels a booking, freeing its nights.
    ///
    /// # Errors
    ///
    /// See [`CancelPlan::build_plan`].
    pub fn cancel(
        &mut self,
        reference: ReservationRef,
        reason: Option<String>,
    ) -> Result<Reservation> {
        let result = self.run(|conn, _| CancelPlan::new(reference, reason).build_plan(conn))?;
        Self::written(result)
    }

    /// Marks a booking as a no-show, releasing nights from `released_from`
    /// (the check-in date when `None`).
    ///
    /// # Errors
    ///
    /// See [`NoShowPlan::build_plan`].
    pub fn mark_no_show(
        &mut self,
        reference: ReservationRef,
        released_from: Option<NaiveDate>,
    ) -> Result<Reservation> {
        let result =
            self.run(|conn, _| NoShowPlan::new(reference, released_from).build_plan(conn))?;
        Self::written(result)
    }

    /// `pending -> confirmed`.
    ///
    /// # Errors
    ///
    /// See [`StatusPlan::build_plan`].
    pub fn confirm(&mut self, reference: ReservationRef) -> Result<Reservation> {
        self.advance(reference, StatusAction::Confirm)
    }

    /// `pending | confirmed -> paid`.
    ///
    /// # Errors
    ///
    /// See [`StatusPlan::build_plan`].
    pub fn mark_paid(&mut self, reference: ReservationRef) -> Result<Reservation> {
        self.advance(reference, StatusAction::MarkPaid)
    }

    /// `confirmed | paid -> checked_in`.
    ///
    /// # Errors
    ///
    /// See [`StatusPlan::build_plan`].
    pub fn check_in(&mut self, reference: ReservationRef) -> Result<Reservation> {
        self.advance(reference, StatusAction::CheckIn)
    }

    /// `checked_in -> checked_out`, then earns the booking's pending credit.
    ///
    /// # Errors
    ///
    /// See [`StatusPlan::build_plan`]. Ledger failures are logged, not
    /// returned.
    pub fn check_out(&mut self, reference: ReservationRef) -> Result<Reservation> {
        self.advance(reference, StatusAction::CheckOut)
    }

    /// Looks up a reservation by id or code.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if it does not exist.
    pub fn get(&self, reference: &ReservationRef) -> Result<Reservation> {
        reference.fetch(self.db.connection())
    }

    /// Lists reservations by check-in, optionally only those in `status`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list(&self, status: Option<ReservationStatus>) -> Result<Vec<Reservation>> {
        Database::list_reservations(self.db.connection(), status)
    }

    /// Checks whether `stay` could be booked right now.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn availability(&mut self, stay: &StayRange) -> Result<Availability> {
        let tx = self.db.begin_read()?;
        availability::is_available(&*tx, stay, None)
    }

    /// Lists what occupies `window`.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn calendar(&mut self, window: &StayRange) -> Result<Vec<Occupancy>> {
        let tx = self.db.begin_read()?;
        availability::calendar(&*tx, window)
    }

    /// Closes the nights from `span.start()` up to `span.end()` to bookings.
    ///
    /// Guests may still arrive on the last day of the span. Existing
    /// reservations inside the span are kept.
    ///
    /// # Errors
    ///
    /// Returns a validation error for an empty reason or a span that closes
    /// no night, or a store error.
    pub fn add_blocked_period(&mut self, span: DateSpan, reason: &str) -> Result<BlockedPeriod> {
        if span.closed_nights() == 0 {
            return Err(Error::validation(
                "span",
                format!("blocking {span} closes no night; end on the day guests may arrive again"),
            ));
        }
        let lock_wait = self.db.config().busy_timeout;
        let tx = self.db.begin_transaction()?;
        let period = Database::insert_blocked_period(&tx, span, reason)?;
        Database::commit(tx, lock_wait)?;
        info!("blocked {span}: {}", period.reason());
        Ok(period)
    }

    /// Reopens the days of a blocked period.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotFound`] if no period has `id`.
    pub fn remove_blocked_period(&mut self, id: i64) -> Result<()> {
        let lock_wait = self.db.config().busy_timeout;
        let tx = self.db.begin_transaction()?;
        if !Database::delete_blocked_period(&tx, id)? {
            return Err(Error::NotFound {
                resource: format!("blocked period #{id}"),
            });
        }
        Database::commit(tx, lock_wait)?;
        info!("removed blocked period #{id}");
        Ok(())
    }

    /// Lists every blocked period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_blocked_periods(&self) -> Result<Vec<BlockedPeriod>> {
        Database::list_all_blocked_periods(self.db.connection())
    }

    fn advance(&mut self, reference: ReservationRef, action: StatusAction) -> Result<Reservation> {
        let result = self.run(|conn, _| StatusPlan::new(reference, action).build_plan(conn))?;
        Self::written(result)
    }

    /// Plans and applies one operation under the write lock, then
    /// dispatches its follow-ups.
    fn run<F>(&mut self, build: F) -> Result<ExecutionResult>
    where
        F: FnOnce(&Connection, &Config) -> Result<OperationPlan>,
    {
        let lock_wait = self.db.config().busy_timeout;
        let tx = self.db.begin_transaction()?;

        let plan = build(&tx, &self.config)?;
        debug!("built plan '{}' with {} action(s)", plan.description, plan.len());
        for warning in &plan.warnings {
            warn!("{warning}");
        }

        let result = PlanExecutor::new(&tx).execute(&plan)?;
        Database::commit(tx, lock_wait)?;
        info!("{}", plan.description);

        self.dispatch(&result);
        Ok(result)
    }

    fn dispatch(&self, result: &ExecutionResult) {
        for id in &result.credits_to_earn {
            match self.credits.earn_pending_credits(*id) {
                Ok(count) => debug!("earned {count} credit entries for {id}"),
                Err(e) => warn!("failed to earn pending credits for {id}: {e}"),
            }
        }
        for event in &result.events {
            if let Err(e) = self.events.emit(event) {
                warn!(
                    "failed to deliver {} event for {}: {e}",
                    event.kind(),
                    event.reservation().code()
                );
            }
        }
    }

    fn written(result: ExecutionResult) -> Result<Reservation> {
        result.reservation.ok_or_else(|| Error::NotFound {
            resource: "reservation written by the operation".into(),
        })
    }
}
