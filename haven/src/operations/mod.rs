//! Reservation lifecycle operations using the plan-execute pattern.
//!
//! Every write is split in two phases, both run inside one write
//! transaction:
//! 1. **Planning**: reads and locks what the operation depends on, checks
//!    the transition and builds an [`OperationPlan`]
//! 2. **Execution**: a [`PlanExecutor`] applies the plan's writes and
//!    collects the events and credit requests to hand out after commit
//!
//! [`Lifecycle`] drives both phases and owns the collaborators.
//!
//! # Examples
//!
//! ```
//! use chrono::NaiveDate;
//! use haven::operations::{CreateOptions, CreatePlan, PlanExecutor};
//! use haven::{Charges, Config, Database, StayRange};
//! use rust_decimal::Decimal;
//!
//! let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
//! let mut db = Database::open_in_memory().unwrap();
//! let config = Config::default();
//!
//! let tx = db.begin_transaction().unwrap();
//! let stay = StayRange::new(d(1), d(4)).unwrap();
//! let options = CreateOptions::new(stay, Charges::nightly(Decimal::from(90)));
//! let plan = CreatePlan::new(options, &config).build_plan(&tx).unwrap();
//!
//! let result = PlanExecutor::new(&tx).execute(&plan).unwrap();
//! tx.commit().unwrap();
//! assert_eq!(result.events.len(), 1);
//! ```

pub mod cancel;
pub mod create;
pub mod executor;
pub mod init;
pub mod lifecycle;
pub mod no_show;
pub mod plan;
pub mod status;
pub mod update;

pub use cancel::CancelPlan;
pub use create::{CreateOptions, CreatePlan};
pub use executor::{ExecutionResult, PlanExecutor};
pub use init::{init_database, InitOptions, InitResult};
pub use lifecycle::{Lifecycle, Quote};
pub use no_show::NoShowPlan;
pub use plan::{OperationPlan, PlanAction, TransitionPatch};
pub use status::{StatusAction, StatusPlan};
pub use update::{UpdateOptions, UpdatePlan};
