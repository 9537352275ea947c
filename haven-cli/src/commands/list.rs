//! List command implementation.
//!
//! This module implements the `list` command, which displays reservations
//! ordered by check-in as a table or as JSON.

use crate::error::CliError;
use crate::utils::{open_lifecycle, print_json, GlobalOptions, OutputFormat};
use clap::Args;
use haven::{Reservation, ReservationStatus};
use std::io::Write;

/// Column headers for table output.
const COLUMN_HEADERS: [&str; 7] = [
    "code",
    "check_in",
    "check_out",
    "nights",
    "status",
    "guest",
    "due",
];

/// List reservations.
#[derive(Args)]
pub struct ListCommand {
    /// Only show reservations in this status
    #[arg(long, value_name = "STATUS")]
    pub status: Option<ReservationStatus>,

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

impl ListCommand {
    /// Execute the list command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let lifecycle = open_lifecycle(global)?;
        let reservations = lifecycle.list(self.status)?;

        match self.format {
            OutputFormat::Human => format_as_table(&reservations),
            OutputFormat::Json => print_json(&reservations),
        }
    }
}

/// Format reservations as a tab-separated table.
fn format_as_table(reservations: &[Reservation]) -> Result<(), CliError> {
    let stdout = std::io::stdout();
    let mut handle = stdout.lock();

    let header_line = COLUMN_HEADERS
        .iter()
        .map(|s| s.to_uppercase())
        .collect::<Vec<_>>()
        .join("\t");
    writeln!(handle, "{header_line}")?;

    for res in reservations {
        let stay = res.stay();
        writeln!(
            handle,
            "{}\t{}\t{}\t{}\t{}\t{}\t{}",
            res.code(),
            stay.check_in(),
            stay.check_out(),
            stay.nights(),
            res.status(),
            res.guest_name().unwrap_or("-"),
            res.amount_due(),
        )?;
    }

    Ok(())
}
