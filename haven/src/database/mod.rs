//! `SQLite` storage for reservations, blocked periods and credit entries.
//!
//! This module provides connection management, schema versioning, CRUD
//! operations and the [`ReservationStore`](crate::store::ReservationStore)
//! implementation used by the lifecycle.
//!
//! # Examples
//!
//! ```no_run
//! use haven::database::{Database, DatabaseConfig};
//!
//! let mut db = Database::open(DatabaseConfig::new("/tmp/haven.db")).unwrap();
//!
//! // Every booking write happens under the database write lock
//! let tx = db.begin_transaction().unwrap();
//! let all = Database::list_reservations(&tx, None).unwrap();
//! tx.commit().unwrap();
//! println!("{} reservations", all.len());
//! ```

mod config;
mod connection;
pub mod migrations;
mod operations;
mod schema;

#[cfg(test)]
pub(crate) mod test_util;

pub use config::{
    default_data_dir, resolve_data_dir, resolve_database_path, DatabaseConfig, DATABASE_FILE_NAME,
    DATA_DIR_ENV, DEFAULT_LOCK_WAIT,
};
pub use connection::Database;
pub use migrations::{check_schema_compatibility, get_schema_version, initialize_schema};
pub use schema::CURRENT_SCHEMA_VERSION;
