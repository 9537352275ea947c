//! Shared fixtures for the integration tests.

#![allow(dead_code)]

use std::path::{Path, PathBuf};
use std::time::Duration;

use chrono::NaiveDate;
use haven::config::Config;
use haven::events::MemorySink;
use haven::{Charges, CreateOptions, Database, DatabaseConfig, Lifecycle, StayRange};
use rust_decimal::Decimal;
use tempfile::TempDir;

/// A data directory that lives as long as the fixture.
pub struct TestStore {
    pub dir: TempDir,
    pub path: PathBuf,
}

impl TestStore {
    /// Creates an initialized database file in a fresh temporary directory.
    pub fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("haven.db");
        // Create the schema and switch to WAL before any concurrent opener
        Database::open(DatabaseConfig::new(&path)).unwrap();
        Self { dir, path }
    }

    /// Opens a controller on the database with a generous lock wait.
    pub fn lifecycle(&self) -> Lifecycle {
        Lifecycle::open(&self.path, test_config()).unwrap()
    }

    /// Opens a controller whose events are recorded.
    pub fn recorded(&self) -> (Lifecycle, MemorySink) {
        let sink = MemorySink::new();
        (self.lifecycle().with_event_sink(sink.clone()), sink)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

/// Default configuration with a lock wait long enough for busy CI machines.
pub fn test_config() -> Config {
    Config {
        maximum_lock_wait_seconds: Some(30),
        ..Config::default()
    }
}

/// A 2025 date.
pub fn d(month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, month, day).unwrap()
}

/// A stay between two 2025 dates.
pub fn stay(from: (u32, u32), to: (u32, u32)) -> StayRange {
    StayRange::new(d(from.0, from.1), d(to.0, to.1)).unwrap()
}

/// Booking options at the given nightly rate.
pub fn booking(from: (u32, u32), to: (u32, u32), rate: i64) -> CreateOptions {
    CreateOptions::new(stay(from, to), Charges::nightly(Decimal::from(rate)))
}

/// Lock wait used by tests that expect contention.
pub const SHORT_WAIT: Duration = Duration::from_millis(200);
