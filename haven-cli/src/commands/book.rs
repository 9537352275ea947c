//! Book command implementation.
//!
//! This module implements the `book` command and the booking arguments it
//! shares with `quote`.

use crate::error::CliError;
use crate::utils::{open_lifecycle, parse_money, print_json, print_reservation, OutputFormat};
use crate::utils::{write_breakdown, GlobalOptions};
use chrono::NaiveDate;
use clap::Args;
use haven::{CancellationPolicy, Charges, CreateOptions, Guests, ReservationStatus, StayRange};
use rust_decimal::Decimal;
use serde::Serialize;
use std::io::Write;

/// Stay, party and commercial terms of a booking request.
#[derive(Args, Debug, Clone)]
pub struct BookingArgs {
    /// Arrival date (YYYY-MM-DD)
    #[arg(long, value_name = "DATE")]
    pub check_in: NaiveDate,

    /// Departure date (YYYY-MM-DD); the night before it is the last one
    #[arg(long, value_name = "DATE")]
    pub check_out: NaiveDate,

    /// Nightly rate
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money)]
    pub rate: Decimal,

    /// One-off cleaning fee
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money, default_value = "0")]
    pub cleaning_fee: Decimal,

    /// One-off pet fee
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money, default_value = "0")]
    pub pet_fee: Decimal,

    /// Tourist tax for the whole stay
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money, default_value = "0")]
    pub tourist_tax: Decimal,

    /// Number of adults
    #[arg(long, default_value_t = 1)]
    pub adults: u32,

    /// Number of children
    #[arg(long, default_value_t = 0)]
    pub children: u32,

    /// Number of infants
    #[arg(long, default_value_t = 0)]
    pub infants: u32,

    /// Lead guest name
    #[arg(long, value_name = "NAME")]
    pub guest_name: Option<String>,

    /// Cancellation policy (flexible or non-refundable)
    #[arg(long, default_value = "flexible")]
    pub policy: CancellationPolicy,

    /// Credit to apply against the total
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money, default_value = "0")]
    pub credit: Decimal,
}

impl BookingArgs {
    /// Convert the arguments into library booking options.
    pub fn to_options(&self) -> Result<CreateOptions, CliError> {
        let stay = StayRange::new(self.check_in, self.check_out)?;
        let guests = Guests::new(self.adults, self.children, self.infants)?;
        let charges = Charges {
            nightly_rate: self.rate,
            cleaning_fee: self.cleaning_fee,
            pet_fee: self.pet_fee,
            tourist_tax: self.tourist_tax,
        };

        Ok(CreateOptions::new(stay, charges)
            .with_guests(guests)
            .with_guest_name(self.guest_name.clone())
            .with_policy(self.policy)
            .with_applied_credit(self.credit))
    }
}

/// Book the property for a stay.
#[derive(Args)]
pub struct BookCommand {
    #[command(flatten)]
    pub booking: BookingArgs,

    /// Initial status (pending or confirmed; defaults to the configured one)
    #[arg(long)]
    pub status: Option<ReservationStatus>,

    /// Show what would be booked without writing it
    #[arg(long)]
    pub dry_run: bool,

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
struct DryRunReport<'a> {
    dry_run: bool,
    actions: &'a [String],
    warnings: &'a [String],
    reservation: Option<&'a haven::Reservation>,
}

impl BookCommand {
    /// Execute the book command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let options = self.booking.to_options()?.with_status(self.status);
        let mut lifecycle = open_lifecycle(global)?;
        let currency = lifecycle.config().currency().to_string();

        if self.dry_run {
            let result = lifecycle.preview_create(options)?;
            return match self.format {
                OutputFormat::Json => print_json(&DryRunReport {
                    dry_run: true,
                    actions: &result.actions_taken,
                    warnings: &result.warnings,
                    reservation: result.reservation.as_ref(),
                }),
                OutputFormat::Human => {
                    if !global.quiet {
                        eprintln!("Dry run - would perform the following actions:");
                        for (i, action) in result.actions_taken.iter().enumerate() {
                            eprintln!("  {}. {action}", i + 1);
                        }
                        for warning in &result.warnings {
                            eprintln!("Warning: {warning}");
                        }
                    }
                    match result.reservation {
                        Some(ref reservation) => {
                            print_reservation(reservation, self.format, &currency)
                        }
                        None => Ok(()),
                    }
                }
            };
        }

        let reservation = lifecycle.create(options)?;
        if !global.quiet {
            eprintln!(
                "Booked {} for {} nights",
                reservation.code(),
                reservation.stay().nights()
            );
        }
        print_reservation(&reservation, self.format, &currency)
    }
}

/// Price a stay and check whether it is free, without booking it.
#[derive(Args)]
pub struct QuoteCommand {
    #[command(flatten)]
    pub booking: BookingArgs,

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
struct QuoteReport<'a> {
    stay: StayRange,
    price: &'a haven::PriceBreakdown,
    available: bool,
    blocker: Option<String>,
    currency: &'a str,
}

impl QuoteCommand {
    /// Execute the quote command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let options = self.booking.to_options()?;
        let mut lifecycle = open_lifecycle(global)?;
        let quote = lifecycle.quote(&options)?;
        let currency = lifecycle.config().currency();

        match self.format {
            OutputFormat::Json => print_json(&QuoteReport {
                stay: quote.stay,
                price: &quote.price,
                available: quote.availability.is_available(),
                blocker: quote.availability.blocker().map(ToString::to_string),
                currency,
            }),
            OutputFormat::Human => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                writeln!(
                    out,
                    "{} to {}: {}",
                    quote.stay.check_in(),
                    quote.stay.check_out(),
                    quote.availability
                )?;
                write_breakdown(&mut out, &quote.price, currency)?;
                Ok(())
            }
        }
    }
}
