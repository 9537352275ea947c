//! Cancel and no-show command implementations.
//!
//! Both end a reservation early and free nights for rebooking: a
//! cancellation frees the whole stay, a no-show frees the nights from the
//! release date onwards.

use crate::error::CliError;
use crate::utils::{open_lifecycle, print_reservation, GlobalOptions, OutputFormat};
use chrono::NaiveDate;
use clap::Args;
use haven::ReservationRef;

/// Cancel a reservation.
#[derive(Args)]
pub struct CancelCommand {
    /// Booking code or reservation id
    #[arg(value_name = "RESERVATION")]
    pub reference: ReservationRef,

    /// Reason recorded with the cancellation
    #[arg(long)]
    pub reason: Option<String>,

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

impl CancelCommand {
    /// Execute the cancel command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut lifecycle = open_lifecycle(global)?;
        let reservation = lifecycle.cancel(self.reference, self.reason)?;

        if !global.quiet {
            eprintln!(
                "Cancelled {}; {} nights are free again",
                reservation.code(),
                reservation.stay().nights()
            );
        }
        print_reservation(&reservation, self.format, lifecycle.config().currency())
    }
}

/// Mark a guest as a no-show.
#[derive(Args)]
pub struct NoShowCommand {
    /// Booking code or reservation id
    #[arg(value_name = "RESERVATION")]
    pub reference: ReservationRef,

    /// First night to release (defaults to the check-in date, releasing the whole stay)
    #[arg(long, value_name = "DATE")]
    pub released_from: Option<NaiveDate>,

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

impl NoShowCommand {
    /// Execute the no-show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut lifecycle = open_lifecycle(global)?;
        let reservation = lifecycle.mark_no_show(self.reference, self.released_from)?;

        if !global.quiet {
            eprintln!(
                "Marked {} as no-show; released {} nights",
                reservation.code(),
                reservation.released_nights()
            );
        }
        print_reservation(&reservation, self.format, lifecycle.config().currency())
    }
}
