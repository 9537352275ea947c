//! Modify command implementation.
//!
//! Only the flags given on the command line change; everything else keeps
//! its stored value. Moving one end of the stay keeps the other.

use crate::error::CliError;
use crate::utils::{open_lifecycle, parse_money, print_reservation, GlobalOptions, OutputFormat};
use chrono::NaiveDate;
use clap::Args;
use haven::{
    CancellationPolicy, Charges, Guests, Reservation, ReservationRef, ReservationStatus,
    StayRange, UpdateOptions,
};
use rust_decimal::Decimal;

/// Change dates, party, terms or status of a reservation.
#[derive(Args)]
pub struct ModifyCommand {
    /// Booking code or reservation id
    #[arg(value_name = "RESERVATION")]
    pub reference: ReservationRef,

    /// New arrival date
    #[arg(long, value_name = "DATE")]
    pub check_in: Option<NaiveDate>,

    /// New departure date
    #[arg(long, value_name = "DATE")]
    pub check_out: Option<NaiveDate>,

    /// New nightly rate
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money)]
    pub rate: Option<Decimal>,

    /// New cleaning fee
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money)]
    pub cleaning_fee: Option<Decimal>,

    /// New pet fee
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money)]
    pub pet_fee: Option<Decimal>,

    /// New tourist tax
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money)]
    pub tourist_tax: Option<Decimal>,

    /// New number of adults
    #[arg(long)]
    pub adults: Option<u32>,

    /// New number of children
    #[arg(long)]
    pub children: Option<u32>,

    /// New number of infants
    #[arg(long)]
    pub infants: Option<u32>,

    /// New lead guest name
    #[arg(long, value_name = "NAME", conflicts_with = "clear_guest_name")]
    pub guest_name: Option<String>,

    /// Remove the lead guest name
    #[arg(long)]
    pub clear_guest_name: bool,

    /// New cancellation policy
    #[arg(long)]
    pub policy: Option<CancellationPolicy>,

    /// New applied credit
    #[arg(long, value_name = "AMOUNT", value_parser = parse_money)]
    pub credit: Option<Decimal>,

    /// Move the status forward (checkout has its own command)
    #[arg(long)]
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

impl ModifyCommand {
    /// Execute the modify command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let mut lifecycle = open_lifecycle(global)?;
        let current = lifecycle.get(&self.reference)?;
        let options = self.to_options(&current)?;

        let updated = lifecycle.update(options)?;
        if !global.quiet {
            eprintln!("Modified {}", updated.code());
        }
        print_reservation(&updated, self.format, lifecycle.config().currency())
    }

    /// Fill partially given groups (dates, charges, party) from `current`.
    fn to_options(&self, current: &Reservation) -> Result<UpdateOptions, CliError> {
        let mut options = UpdateOptions::new(ReservationRef::from(current));

        if self.check_in.is_some() || self.check_out.is_some() {
            let stay = current.stay();
            options = options.with_stay(StayRange::new(
                self.check_in.unwrap_or(stay.check_in()),
                self.check_out.unwrap_or(stay.check_out()),
            )?);
        }

        if self.rate.is_some()
            || self.cleaning_fee.is_some()
            || self.pet_fee.is_some()
            || self.tourist_tax.is_some()
        {
            let charges = current.charges();
            options = options.with_charges(Charges {
                nightly_rate: self.rate.unwrap_or(charges.nightly_rate),
                cleaning_fee: self.cleaning_fee.unwrap_or(charges.cleaning_fee),
                pet_fee: self.pet_fee.unwrap_or(charges.pet_fee),
                tourist_tax: self.tourist_tax.unwrap_or(charges.tourist_tax),
            });
        }

        if self.adults.is_some() || self.children.is_some() || self.infants.is_some() {
            let guests = current.guests();
            options = options.with_guests(Guests::new(
                self.adults.unwrap_or(guests.adults),
                self.children.unwrap_or(guests.children),
                self.infants.unwrap_or(guests.infants),
            )?);
        }

        if self.clear_guest_name {
            options = options.with_guest_name(None);
        } else if let Some(ref name) = self.guest_name {
            options = options.with_guest_name(Some(name.clone()));
        }

        if let Some(policy) = self.policy {
            options = options.with_policy(policy);
        }
        if let Some(credit) = self.credit {
            options = options.with_applied_credit(credit);
        }
        if let Some(status) = self.status {
            options = options.with_status(status);
        }

        Ok(options)
    }
}
