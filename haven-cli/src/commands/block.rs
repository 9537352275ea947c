//! Blocked period commands: `block`, `unblock` and `blocks`.

use crate::error::CliError;
use crate::utils::{format_timestamp, open_lifecycle, print_json, GlobalOptions, OutputFormat};
use chrono::NaiveDate;
use clap::Args;
use haven::DateSpan;
use std::io::Write;

/// Close a span of days to bookings.
#[derive(Args)]
pub struct BlockCommand {
    /// First closed day (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub from: NaiveDate,

    /// Last day of the period (YYYY-MM-DD); guests may arrive again on it,
    /// so it must come after --from
    #[arg(long, value_name = "DATE")]
    pub to: NaiveDate,

    /// Why the days are closed
    #[arg(long)]
    pub reason: String,
}

impl BlockCommand {
    /// Execute the block command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let span = DateSpan::new(self.from, self.to)?;
        let mut lifecycle = open_lifecycle(global)?;
        let period = lifecycle.add_blocked_period(span, &self.reason)?;

        if !global.quiet {
            eprintln!("Closed {} nights", span.closed_nights());
        }
        println!("{}", period.id());
        Ok(())
    }
}

/// Reopen a blocked period.
#[derive(Args)]
pub struct UnblockCommand {
    /// Id printed by `haven block` or listed by `haven blocks`
    #[arg(value_name = "ID")]
    pub id: i64,
}

impl UnblockCommand {
    /// Execute the unblock command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut lifecycle = open_lifecycle(global)?;
        lifecycle.remove_blocked_period(self.id)?;

        if !global.quiet {
            eprintln!("Removed blocked period #{}", self.id);
        }
        Ok(())
    }
}

/// List blocked periods.
#[derive(Args)]
pub struct BlocksCommand {
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

impl BlocksCommand {
    /// Execute the blocks command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let lifecycle = open_lifecycle(global)?;
        let periods = lifecycle.list_blocked_periods()?;

        match self.format {
            OutputFormat::Json => print_json(&periods),
            OutputFormat::Human => {
                let stdout = std::io::stdout();
                let mut handle = stdout.lock();
                writeln!(handle, "ID\tFROM\tTO\tREASON\tCREATED_AT")?;
                for period in &periods {
                    let span = period.span();
                    writeln!(
                        handle,
                        "{}\t{}\t{}\t{}\t{}",
                        period.id(),
                        span.start(),
                        span.end(),
                        period.reason(),
                        format_timestamp(period.created_at()),
                    )?;
                }
                Ok(())
            }
        }
    }
}
