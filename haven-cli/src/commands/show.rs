//! Show command implementation.

use crate::error::CliError;
use crate::utils::{open_lifecycle, print_reservation, GlobalOptions, OutputFormat};
use clap::Args;
use haven::ReservationRef;

/// Show one reservation.
#[derive(Args)]
pub struct ShowCommand {
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

impl ShowCommand {
    /// Execute the show command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let lifecycle = open_lifecycle(global)?;
        let reservation = lifecycle.get(&self.reference)?;
        print_reservation(&reservation, self.format, lifecycle.config().currency())
    }
}
