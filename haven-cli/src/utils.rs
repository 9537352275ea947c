//! Utility functions for CLI operations.
//!
//! This module provides the helpers every command shares: data directory
//! resolution, configuration loading, opening the lifecycle controller,
//! argument parsers and output formatting.

use crate::error::CliError;
use chrono::{DateTime, Utc};
use clap::ValueEnum;
use haven::database::{resolve_data_dir as default_data_dir, DATABASE_FILE_NAME};
use haven::events::{FanoutSink, JsonLinesSink, LogSink};
use haven::{
    Config, ConfigBuilder, DatabaseConfig, Lifecycle, PriceBreakdown, Reservation,
    SqliteCreditLedger,
};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Global CLI options shared across all commands.
#[derive(Debug, Clone, Default)]
#[allow(dead_code)] // verbose is consumed by the logger before dispatch
pub struct GlobalOptions {
    /// Enable verbose output.
    pub verbose: bool,

    /// Suppress non-essential output.
    pub quiet: bool,

    /// Override the data directory location.
    pub data_dir: Option<PathBuf>,

    /// Override the lock wait (in seconds).
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization.
    pub disable_autoinit: bool,

    /// Append committed events as JSON lines to this file.
    pub events: Option<PathBuf>,
}

/// Output format for commands that print reservations.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, ValueEnum)]
#[value(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Aligned, human-readable text
    #[default]
    Human,
    /// JSON document
    Json,
}

/// Resolve the data directory: `--data-dir`, then `HAVEN_DATA_DIR`, then `~/.haven`.
pub fn resolve_data_dir(global: &GlobalOptions) -> Result<PathBuf, CliError> {
    match global.data_dir {
        Some(ref dir) => Ok(dir.clone()),
        None => default_data_dir().map_err(|e| CliError::Config(e.to_string())),
    }
}

/// Load hierarchical configuration.
///
/// Configuration is merged from multiple sources with precedence:
/// 1. Global options (highest priority)
/// 2. Environment variables
/// 3. Configuration files (project `haven.yaml`, then `<data_dir>/config.yaml`)
/// 4. Built-in defaults (lowest priority)
pub fn load_configuration(global: &GlobalOptions) -> Result<Config, CliError> {
    let data_dir = resolve_data_dir(global)?;

    let overrides = Config {
        maximum_lock_wait_seconds: global.busy_timeout,
        disable_autoinit: global.disable_autoinit.then_some(true),
        ..Config::default()
    };

    ConfigBuilder::new()
        .with_data_dir(&data_dir)
        .with_config(overrides)
        .build()
        .map_err(|e| CliError::Config(e.to_string()))
}

/// Open the lifecycle controller on the resolved database.
///
/// Credits are kept in the same database. When `--events` is given every
/// committed event is also appended to that file.
///
/// # Errors
///
/// Returns `NoDataDirectory` if the database doesn't exist and auto-init is disabled.
pub fn open_lifecycle(global: &GlobalOptions) -> Result<Lifecycle, CliError> {
    let config = load_configuration(global)?;
    let db_path = resolve_data_dir(global)?.join(DATABASE_FILE_NAME);

    if !db_path.exists() && config.disable_autoinit.unwrap_or(false) {
        return Err(CliError::NoDataDirectory(db_path));
    }

    let lock_wait = config.lock_wait();
    let lifecycle = Lifecycle::open(&db_path, config)?;
    let ledger =
        SqliteCreditLedger::open(DatabaseConfig::new(&db_path).with_busy_timeout(lock_wait))?;
    let lifecycle = lifecycle.with_credit_ledger(ledger);

    Ok(match global.events {
        Some(ref path) => lifecycle
            .with_event_sink(FanoutSink::new().with(LogSink).with(JsonLinesSink::new(path))),
        None => lifecycle,
    })
}

/// Parse a non-negative money amount with at most two decimal places.
pub fn parse_money(text: &str) -> Result<Decimal, String> {
    haven::money::parse_amount("amount", text).map_err(|e| e.message)
}

/// Parse a lock wait given in whole seconds.
pub fn parse_seconds(text: &str) -> Result<u64, String> {
    text.trim()
        .parse::<u64>()
        .map_err(|e| format!("'{text}' is not a number of seconds: {e}"))
}

/// Format a timestamp for display.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format("%Y-%m-%d %H:%M:%S").to_string()
}

/// Print a value as pretty JSON on stdout.
pub fn print_json<T: Serialize>(value: &T) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();
    serde_json::to_writer_pretty(&mut handle, value)?;
    writeln!(handle)?;
    Ok(())
}

/// Print one reservation in the requested format.
pub fn print_reservation(
    reservation: &Reservation,
    format: OutputFormat,
    currency: &str,
) -> Result<(), CliError> {
    match format {
        OutputFormat::Json => print_json(reservation),
        OutputFormat::Human => {
            let stdout = std::io::stdout();
            let mut out = stdout.lock();
            write_reservation(&mut out, reservation, currency)?;
            Ok(())
        }
    }
}

/// Write the human rendering of a reservation.
pub fn write_reservation(
    out: &mut impl Write,
    r: &Reservation,
    currency: &str,
) -> std::io::Result<()> {
    let stay = r.stay();
    let guests = r.guests();
    writeln!(out, "{}  {}", r.code(), r.status())?;
    writeln!(out, "  id:        {}", r.id())?;
    writeln!(
        out,
        "  stay:      {} to {} ({} nights)",
        stay.check_in(),
        stay.check_out(),
        stay.nights()
    )?;
    if let Some(name) = r.guest_name() {
        writeln!(out, "  guest:     {name}")?;
    }
    writeln!(
        out,
        "  party:     {} adults, {} children, {} infants",
        guests.adults, guests.children, guests.infants
    )?;
    writeln!(out, "  policy:    {}", r.policy())?;
    writeln!(out, "  total:     {} {currency}", r.total_price())?;
    if !r.applied_credit().is_zero() {
        writeln!(out, "  credit:    {} {currency}", r.applied_credit())?;
    }
    writeln!(out, "  due:       {} {currency}", r.amount_due())?;
    if let Some(released) = r.released_from() {
        writeln!(
            out,
            "  released:  from {released} ({} nights)",
            r.released_nights()
        )?;
    }
    if let Some(at) = r.cancelled_at() {
        match r.cancellation_reason() {
            Some(reason) => writeln!(out, "  cancelled: {} ({reason})", format_timestamp(at))?,
            None => writeln!(out, "  cancelled: {}", format_timestamp(at))?,
        }
    }
    writeln!(out, "  updated:   {}", format_timestamp(r.updated_at()))
}

/// Write the human rendering of a price breakdown.
pub fn write_breakdown(
    out: &mut impl Write,
    p: &PriceBreakdown,
    currency: &str,
) -> std::io::Result<()> {
    writeln!(out, "  nights:        {}", p.nights)?;
    writeln!(out, "  accommodation: {} {currency}", p.accommodation)?;
    for (label, amount) in [
        ("cleaning fee", p.cleaning_fee),
        ("pet fee", p.pet_fee),
        ("tourist tax", p.tourist_tax),
    ] {
        if !amount.is_zero() {
            writeln!(out, "  {:<15}{amount} {currency}", format!("{label}:"))?;
        }
    }
    if !p.discount.is_zero() {
        writeln!(out, "  discount:      -{} {currency}", p.discount)?;
    }
    writeln!(out, "  total:         {} {currency}", p.total)?;
    if !p.applied_credit.is_zero() {
        writeln!(out, "  credit:        -{} {currency}", p.applied_credit)?;
    }
    writeln!(out, "  amount due:    {} {currency}", p.amount_due)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use haven::{Charges, ReservationCode, StayRange};
    use std::time::Duration;
    use tempfile::TempDir;

    #[test]
    fn test_parse_money() {
        assert_eq!(parse_money("120").unwrap().to_string(), "120.00");
        assert!(parse_money("-5").is_err());
        assert!(parse_money("1.234").is_err());
        assert!(parse_money("ten").is_err());
    }

    #[test]
    fn test_open_lifecycle_respects_disable_autoinit() {
        let temp = TempDir::new().unwrap();
        let global = GlobalOptions {
            data_dir: Some(temp.path().join("missing")),
            disable_autoinit: true,
            ..GlobalOptions::default()
        };
        let err = open_lifecycle(&global).err().unwrap();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn test_busy_timeout_overrides_config() {
        let temp = TempDir::new().unwrap();
        let global = GlobalOptions {
            data_dir: Some(temp.path().to_path_buf()),
            busy_timeout: Some(1),
            ..GlobalOptions::default()
        };
        let config = load_configuration(&global).unwrap();
        assert_eq!(config.lock_wait(), Duration::from_secs(1));
    }

    #[test]
    fn test_write_reservation() {
        let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
        let r = Reservation::builder(
            ReservationCode::new("HV-PRINT1").unwrap(),
            StayRange::new(d(1), d(4)).unwrap(),
        )
        .guest_name(Some("Ada".into()))
        .charges(Charges::nightly(Decimal::new(10000, 2)))
        .totals(Decimal::new(30000, 2), Decimal::ZERO, Decimal::new(30000, 2))
        .build()
        .unwrap();

        let mut buf = Vec::new();
        write_reservation(&mut buf, &r, "EUR").unwrap();
        let text = String::from_utf8(buf).unwrap();

        assert!(text.starts_with("HV-PRINT1  pending"));
        assert!(text.contains("2025-06-01 to 2025-06-04 (3 nights)"));
        assert!(text.contains("guest:     Ada"));
        assert!(text.contains("total:     300.00 EUR"));
        assert!(!text.contains("credit:"));
    }
}
