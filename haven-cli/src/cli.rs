//! CLI structure and command definitions.
//!
//! This module defines the main CLI structure using clap's derive macros,
//! including global options and subcommands.

use crate::commands::{
    AvailabilityCommand, BlockCommand, BlocksCommand, BookCommand, CancelCommand,
    CompletionsCommand, InitCommand, ListCommand, ModifyCommand, NoShowCommand, QuoteCommand,
    ShowCommand, StatusCommand, UnblockCommand,
};
use crate::utils::parse_seconds;
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Command-line tool for booking a vacation rental without double-booking.
#[derive(Parser)]
#[command(name = "haven")]
#[command(version, about = "Book a vacation rental without double-booking", long_about = None)]
pub struct Cli {
    /// Enable verbose output
    #[arg(long, global = true)]
    pub verbose: bool,

    /// Suppress non-essential output
    #[arg(long, global = true)]
    pub quiet: bool,

    /// Override the data directory location
    #[arg(long, value_name = "PATH", global = true, env = "HAVEN_DATA_DIR")]
    pub data_dir: Option<PathBuf>,

    /// Seconds to wait for the database lock
    #[arg(
        long,
        value_name = "SECONDS",
        global = true,
        env = "HAVEN_BUSY_TIMEOUT",
        value_parser = parse_seconds
    )]
    pub busy_timeout: Option<u64>,

    /// Disable automatic database initialization
    #[arg(long, global = true, env = "HAVEN_DISABLE_AUTOINIT")]
    pub disable_autoinit: bool,

    /// Append committed events as JSON lines to this file
    #[arg(long, value_name = "FILE", global = true, env = "HAVEN_EVENTS_FILE")]
    pub events: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Available CLI commands.
#[derive(Subcommand)]
pub enum Command {
    /// Initialize the data directory and database
    Init(InitCommand),

    /// Price a stay and check whether it is free
    Quote(QuoteCommand),

    /// Book a stay
    Book(BookCommand),

    /// Show one reservation
    Show(ShowCommand),

    /// List reservations
    List(ListCommand),

    /// Change dates, party, terms or status of a reservation
    Modify(ModifyCommand),

    /// Confirm a pending reservation
    Confirm(StatusCommand),

    /// Record payment for a reservation
    Pay(StatusCommand),

    /// Check the guests in
    CheckIn(StatusCommand),

    /// Check the guests out and earn their pending credit
    CheckOut(StatusCommand),

    /// Cancel a reservation and free its nights
    Cancel(CancelCommand),

    /// Mark a reservation as a no-show and release nights
    NoShow(NoShowCommand),

    /// Show availability and occupancy for a date window
    Availability(AvailabilityCommand),

    /// Close days to bookings
    Block(BlockCommand),

    /// Reopen a blocked period
    Unblock(UnblockCommand),

    /// List blocked periods
    Blocks(BlocksCommand),

    /// Generate shell completion scripts
    Completions(CompletionsCommand),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "haven",
            "list",
            "--data-dir",
            "/tmp/haven-test",
            "--busy-timeout",
            "3",
            "--quiet",
        ])
        .unwrap();

        assert!(cli.quiet);
        assert_eq!(cli.busy_timeout, Some(3));
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/haven-test")));
        assert!(matches!(cli.command, Command::List(_)));
    }

    #[test]
    fn test_status_commands_share_arguments() {
        for name in ["confirm", "pay", "check-in", "check-out"] {
            let cli = Cli::try_parse_from(["haven", name, "HV-ABC123"]).unwrap();
            let cmd = match cli.command {
                Command::Confirm(cmd)
                | Command::Pay(cmd)
                | Command::CheckIn(cmd)
                | Command::CheckOut(cmd) => cmd,
                _ => panic!("{name} parsed to the wrong command"),
            };
            assert_eq!(cmd.reference.to_string(), "HV-ABC123");
        }
    }
}
