//! Main entry point for the haven CLI.
//!
//! This is the command-line interface for the haven reservation engine.
//! It provides commands for managing bookings of a single property:
//! - `quote` / `book`: price and book a stay
//! - `modify`, `confirm`, `pay`, `check-in`, `check-out`: move a booking along
//! - `cancel` / `no-show`: end a booking early and free its nights
//! - `availability`, `block`, `unblock`, `blocks`: manage the calendar

mod cli;
mod commands;
mod error;
mod utils;

use clap::Parser;
use cli::{Cli, Command};
use haven::operations::StatusAction;
use utils::GlobalOptions;

fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    let _logger = haven::init_logger(cli.verbose, cli.quiet);

    let global = GlobalOptions {
        verbose: cli.verbose,
        quiet: cli.quiet,
        data_dir: cli.data_dir,
        busy_timeout: cli.busy_timeout,
        disable_autoinit: cli.disable_autoinit,
        events: cli.events,
    };

    let result = match cli.command {
        Command::Init(cmd) => cmd.execute(&global),
        Command::Quote(cmd) => cmd.execute(&global),
        Command::Book(cmd) => cmd.execute(&global),
        Command::Show(cmd) => cmd.execute(&global),
        Command::List(cmd) => cmd.execute(&global),
        Command::Modify(cmd) => cmd.execute(&global),
        Command::Confirm(cmd) => cmd.execute(StatusAction::Confirm, &global),
        Command::Pay(cmd) => cmd.execute(StatusAction::MarkPaid, &global),
        Command::CheckIn(cmd) => cmd.execute(StatusAction::CheckIn, &global),
        Command::CheckOut(cmd) => cmd.execute(StatusAction::CheckOut, &global),
        Command::Cancel(cmd) => cmd.execute(&global),
        Command::NoShow(cmd) => cmd.execute(&global),
        Command::Availability(cmd) => cmd.execute(&global),
        Command::Block(cmd) => cmd.execute(&global),
        Command::Unblock(cmd) => cmd.execute(&global),
        Command::Blocks(cmd) => cmd.execute(&global),
        Command::Completions(cmd) => cmd.execute(&global),
    };

    // Handle errors and set exit code
    match result {
        Ok(()) => std::process::exit(0),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(e.exit_code());
        }
    }
}
