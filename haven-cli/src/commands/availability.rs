//! Availability command implementation.
//!
//! Reports whether a stay could be booked and what occupies the nights
//! around it.

use crate::error::CliError;
use crate::utils::{open_lifecycle, print_json, GlobalOptions, OutputFormat};
use chrono::NaiveDate;
use clap::Args;
use haven::{Occupancy, StayRange};
use serde::Serialize;
use std::io::Write;

/// Show availability and occupancy for a date window.
#[derive(Args)]
pub struct AvailabilityCommand {
    /// First night of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,

    /// Day after the last night of the window (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,

    /// Exit with status 1 if the window cannot be booked
    #[arg(long)]
    pub check: bool,

    /// Output format
    #[arg(
        long,
        value_enum,
        default_value = "human",
        env = "HAVEN_OUTPUT_FORMAT",
        ignore_case = true
    )]
    pub format: OutputFormat,
}

#[derive(Serialize)]
struct AvailabilityReport<'a> {
    window: StayRange,
    available: bool,
    blocker: Option<String>,
    occupied: &'a [Occupancy],
}

impl AvailabilityCommand {
    /// Execute the availability command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let window = StayRange::new(self.from, self.to)?;
        let mut lifecycle = open_lifecycle(global)?;
        let availability = lifecycle.availability(&window)?;
        let occupied = lifecycle.calendar(&window)?;

        match self.format {
            OutputFormat::Json => print_json(&AvailabilityReport {
                window,
                available: availability.is_available(),
                blocker: availability.blocker().map(ToString::to_string),
                occupied: &occupied,
            })?,
            OutputFormat::Human => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writeln!(out, "{} to {}: {availability}", self.from, self.to)?;
                for entry in &occupied {
                    writeln!(out, "  {entry}")?;
                }
            }
        }

        if self.check && !availability.is_available() {
            return Err(CliError::SemanticFailure(format!(
                "{} to {} is not available",
                self.from, self.to
            )));
        }
        Ok(())
    }
}
