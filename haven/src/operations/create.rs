//! Create operation planning.

use log::debug;
use rust_decimal::Decimal;
use rusqlite::Connection;

use crate::availability;
use crate::code::CodeGenerator;
use crate::config::Config;
use crate::error::{Error, Result};
use crate::events::ReservationEvent;
use crate::pricing::{price, Charges, PriceBreakdown};
use crate::reservation::{CancellationPolicy, Guests, Reservation, ReservationStatus};
use crate::stay::StayRange;

use super::plan::{OperationPlan, PlanAction};

/// What a new booking asks for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreateOptions {
    /// Requested stay.
    pub stay: StayRange,

    /// Guest breakdown.
    pub guests: Guests,

    /// Lead guest name.
    pub guest_name: Option<String>,

    /// Nightly rate and fees.
    pub charges: Charges,

    /// Cancellation policy.
    pub policy: CancellationPolicy,

    /// Guest credit applied against the total.
    pub applied_credit: Decimal,

    /// Initial status; the configured one when `None`.
    pub status: Option<ReservationStatus>,
}

impl CreateOptions {
    /// Creates options for `stay` at `charges`, one adult, flexible policy.
    ///
    /// # Examples
    ///
    /// ```
    /// use chrono::NaiveDate;
    /// use haven::operations::CreateOptions;
    /// use haven::{Charges, StayRange};
    /// use rust_decimal::Decimal;
    ///
    /// let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
    /// let options = CreateOptions::new(
    ///     StayRange::new(d(1), d(5)).unwrap(),
    ///     Charges::nightly(Decimal::from(120)),
    /// );
    /// assert_eq!(options.guests.adults, 1);
    /// ```
    #[must_use]
    pub fn new(stay: StayRange, charges: Charges) -> Self {
        Self {
            stay,
            guests: Guests::default(),
            guest_name: None,
            charges,
            policy: CancellationPolicy::default(),
            applied_credit: Decimal::ZERO,
            status: None,
        }
    }

    /// Sets the guest breakdown.
    #[must_use]
    pub const fn with_guests(mut self, guests: Guests) -> Self {
        self.guests = guests;
        self
    }

    /// Sets the lead guest name.
    #[must_use]
    pub fn with_guest_name(mut self, name: Option<String>) -> Self {
        self.guest_name = name;
        self
    }

    /// Sets the cancellation policy.
    #[must_use]
    pub const fn with_policy(mut self, policy: CancellationPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Sets the applied credit.
    #[must_use]
    pub const fn with_applied_credit(mut self, credit: Decimal) -> Self {
        self.applied_credit = credit;
        self
    }

    /// Overrides the configured initial status.
    #[must_use]
    pub const fn with_status(mut self, status: Option<ReservationStatus>) -> Self {
        self.status = status;
        self
    }

    /// Prices these options under `config`.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad charges, credit, or pricing rules.
    pub fn price(&self, config: &Config) -> Result<PriceBreakdown> {
        Ok(price(
            &config.pricing_rules()?,
            &self.charges,
            self.stay.nights(),
            self.policy,
            self.applied_credit,
        )?)
    }
}

/// Checks the guest count against the configured limit.
pub(super) fn check_guest_limit(config: &Config, guests: Guests) -> Result<()> {
    if let Some(max) = config.max_guests() {
        if guests.total() > max {
            return Err(Error::validation(
                "guests",
                format!("{} guests exceed the limit of {max}", guests.total()),
            ));
        }
    }
    Ok(())
}

/// Notes credit that exceeds the total and will not be used.
pub(super) fn unused_credit_warning(breakdown: &PriceBreakdown) -> Option<String> {
    let unused = breakdown.applied_credit - breakdown.total;
    (unused > Decimal::ZERO).then(|| {
        format!(
            "applied credit {} exceeds the total {}; {unused} stays unused",
            breakdown.applied_credit, breakdown.total
        )
    })
}

/// Plans a new booking.
pub struct CreatePlan<'a> {
    options: CreateOptions,
    config: &'a Config,
}

impl<'a> CreatePlan<'a> {
    /// Creates a planner for `options` under `config`.
    #[must_use]
    pub const fn new(options: CreateOptions, config: &'a Config) -> Self {
        Self { options, config }
    }

    /// Builds the plan. Must run inside the write transaction.
    ///
    /// Order matters: overlapping reservations are locked and the stay is
    /// checked before anything is priced or a code is drawn.
    ///
    /// # Errors
    ///
    /// Returns a validation error for bad input, [`Error::Conflict`] when
    /// the dates are taken, or a store error.
    pub fn build_plan(&self, conn: &Connection) -> Result<OperationPlan> {
        let options = &self.options;
        let status = options.status.unwrap_or_else(|| self.config.initial_status());
        if !matches!(
            status,
            ReservationStatus::Pending | ReservationStatus::Confirmed
        ) {
            return Err(Error::validation(
                "status",
                format!("new reservations cannot start as {status}"),
            ));
        }
        check_guest_limit(self.config, options.guests)?;

        availability::is_available(conn, &options.stay, None)?.into_result()?;

        let breakdown = options.price(self.config)?;
        let code = CodeGenerator::from_config(&self.config.booking())?.generate(conn)?;
        debug!("assigned booking code {code} to {}", options.stay);

        let reservation = Reservation::builder(code, options.stay)
            .guests(options.guests)
            .guest_name(options.guest_name.clone())
            .charges(options.charges)
            .policy(options.policy)
            .price(&breakdown)
            .status(status)
            .build()?;

        let plan = OperationPlan::new(format!("Book {}", options.stay))
            .add_action(PlanAction::Insert(reservation.clone()))
            .add_action(PlanAction::Emit(ReservationEvent::Created { reservation }));
        Ok(unused_credit_warning(&breakdown)
            .into_iter()
            .fold(plan, OperationPlan::add_warning))
    }
}
