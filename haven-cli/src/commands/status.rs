//! Status commands: `confirm`, `pay`, `check-in` and `check-out`.
//!
//! The four commands take the same arguments and differ only in the move
//! they request, so they share one argument struct.

use crate::error::CliError;
use crate::utils::{open_lifecycle, print_reservation, GlobalOptions, OutputFormat};
use clap::Args;
use haven::operations::StatusAction;
use haven::ReservationRef;

/// Move a reservation one step along its lifecycle.
#[derive(Args)]
pub struct StatusCommand {
    /// Booking code or reservation id
    #[arg(value_name = "RESERVATION")]
    pub reference: ReservationRef,

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

impl StatusCommand {
    /// Execute the status move named by `action`.
    pub fn execute(self, action: StatusAction, global: &GlobalOptions) -> Result<(), CliError> {
        let mut lifecycle = open_lifecycle(global)?;
        let reference = self.reference;

        let reservation = match action {
            StatusAction::Confirm => lifecycle.confirm(reference)?,
            StatusAction::MarkPaid => lifecycle.mark_paid(reference)?,
            StatusAction::CheckIn => lifecycle.check_in(reference)?,
            StatusAction::CheckOut => lifecycle.check_out(reference)?,
        };

        if !global.quiet {
            eprintln!("{} is now {}", reservation.code(), reservation.status());
        }
        print_reservation(&reservation, self.format, lifecycle.config().currency())
    }
}
