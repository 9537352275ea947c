#![deny(missing_docs, unsafe_code)]
#![warn(clippy::all, clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

//! # haven
//!
//! A library for booking a single vacation-rental property without ever
//! selling the same night twice.
//!
//! Every change to a booking goes through the [`Lifecycle`] controller,
//! which takes the database write lock, checks availability against every
//! reservation that could overlap, and only then writes. Prices are
//! computed by a pure calculator on fixed-point decimals.
//!
//! ## Core Types
//!
//! - [`StayRange`] and [`DateSpan`]: half-open stays and inclusive blocked days
//! - [`Reservation`], [`ReservationCode`] and [`ReservationStatus`]: bookings
//!   and their state machine
//! - [`price`], [`Charges`] and [`PriceBreakdown`]: the pricing calculator
//! - [`Lifecycle`]: create, modify, cancel, no-show and checkout
//! - [`Error`] and [`Result`]: error handling types
//! - [`Logger`] and [`LogLevel`]: logging infrastructure
//!
//! ## Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use haven::{price, CancellationPolicy, Charges, PricingRules, StayRange};
//! use rust_decimal::Decimal;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
//!
//! // Back-to-back stays share the changeover day without overlapping
//! let first = StayRange::new(d(1), d(5)).unwrap();
//! let second = StayRange::new(d(5), d(8)).unwrap();
//! assert!(!first.overlaps(&second));
//!
//! let breakdown = price(
//!     &PricingRules::default(),
//!     &Charges::nightly(Decimal::from(125)),
//!     first.nights(),
//!     CancellationPolicy::NonRefundable,
//!     Decimal::ZERO,
//! )
//! .unwrap();
//! assert_eq!(breakdown.total, Decimal::from(450));
//! ```

pub mod availability;
pub mod blocked;
pub mod code;
pub mod config;
pub mod credits;
pub mod database;
pub mod error;
pub mod events;
pub mod logging;
pub mod money;
pub mod operations;
pub mod pricing;
pub mod reservation;
pub mod stay;
pub mod store;

// Re-export key types at crate root for convenience
pub use availability::{Availability, Occupancy};
pub use blocked::BlockedPeriod;
pub use config::{Config, ConfigBuilder};
pub use credits::{CreditLedger, NoopCreditLedger, SqliteCreditLedger};
pub use database::{Database, DatabaseConfig};
pub use error::{Blocker, Error, Result};
pub use events::{EventSink, ReservationEvent};
pub use logging::{init_logger, LogLevel, Logger};
pub use operations::{
    CreateOptions, ExecutionResult, Lifecycle, OperationPlan, PlanAction, PlanExecutor, Quote,
    UpdateOptions,
};
pub use pricing::{price, Charges, PriceBreakdown, PricingRules};
pub use reservation::{
    CancellationPolicy, Guests, Reservation, ReservationCode, ReservationId, ReservationStatus,
};
pub use stay::{DateSpan, StayRange};
pub use store::{ReservationRef, ReservationStore};
