//! Build script for haven-cli.
//!
//! Generates the `haven.1` man page into `OUT_DIR/man` with `clap_mangen`.
//! Build scripts cannot depend on the crate being built, so the command
//! tree is described here a second time.

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::fs;
use std::path::PathBuf;

/// Keep in sync with src/cli.rs.
fn build_cli() -> Command {
    Command::new("haven")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Book a vacation rental without double-booking")
        .long_about(
            "Reservation engine for a single vacation-rental property: quotes, bookings, \
             lifecycle changes and blocked periods, with every write checked against \
             the nights already sold",
        )
        .arg(
            Arg::new("verbose")
                .long("verbose")
                .help("Enable verbose output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("quiet")
                .long("quiet")
                .help("Suppress non-essential output")
                .global(true)
                .action(ArgAction::SetTrue),
        )
        .arg(
            Arg::new("data-dir")
                .long("data-dir")
                .help("Override the data directory location")
                .value_name("PATH")
                .global(true)
                .env("HAVEN_DATA_DIR"),
        )
        .arg(
            Arg::new("busy-timeout")
                .long("busy-timeout")
                .help("Seconds to wait for the database lock")
                .value_name("SECONDS")
                .global(true)
                .env("HAVEN_BUSY_TIMEOUT"),
        )
        .arg(
            Arg::new("disable-autoinit")
                .long("disable-autoinit")
                .help("Disable automatic database initialization")
                .global(true)
                .action(ArgAction::SetTrue)
                .env("HAVEN_DISABLE_AUTOINIT"),
        )
        .arg(
            Arg::new("events")
                .long("events")
                .help("Append committed events as JSON lines to this file")
                .value_name("FILE")
                .global(true)
                .env("HAVEN_EVENTS_FILE"),
        )
        .subcommands(vec![
            Command::new("init").about("Initialize the data directory and database"),
            Command::new("quote").about("Price a stay and check whether it is free"),
            Command::new("book").about("Book a stay"),
            Command::new("show").about("Show one reservation"),
            Command::new("list").about("List reservations"),
            Command::new("modify")
                .about("Change dates, party, terms or status of a reservation"),
            Command::new("confirm").about("Confirm a pending reservation"),
            Command::new("pay").about("Record payment for a reservation"),
            Command::new("check-in").about("Check the guests in"),
            Command::new("check-out").about("Check the guests out and earn their pending credit"),
            Command::new("cancel").about("Cancel a reservation and free its nights"),
            Command::new("no-show").about("Mark a reservation as a no-show and release nights"),
            Command::new("availability")
                .about("Show availability and occupancy for a date window"),
            Command::new("block").about("Close days to bookings"),
            Command::new("unblock").about("Reopen a blocked period"),
            Command::new("blocks").about("List blocked periods"),
            Command::new("completions").about("Generate shell completion scripts"),
        ])
}

fn main() -> std::io::Result<()> {
    let out_dir = PathBuf::from(std::env::var_os("OUT_DIR").ok_or_else(|| {
        std::io::Error::new(std::io::ErrorKind::NotFound, "OUT_DIR is not set")
    })?);
    let man_dir = out_dir.join("man");
    fs::create_dir_all(&man_dir)?;

    let mut buffer = Vec::new();
    Man::new(build_cli()).render(&mut buffer)?;
    fs::write(man_dir.join("haven.1"), buffer)?;

    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=src/commands/");
    Ok(())
}
