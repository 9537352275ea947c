//! Configuration layering against real files and environment variables.

mod common;

use std::fs;

use haven::config::ConfigBuilder;
use haven::{CancellationPolicy, Database, Lifecycle, ReservationStatus};
use rust_decimal_macros::dec;
use serial_test::serial;
use tempfile::TempDir;

fn write(path: &std::path::Path, contents: &str) {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, contents).unwrap();
}

#[test]
#[serial]
fn test_project_file_overrides_user_file() {
    let temp = TempDir::new().unwrap();
    let data_dir = temp.path().join("data");
    let project = temp.path().join("cottage");
    let nested = project.join("notes");
    fs::create_dir_all(&nested).unwrap();

    write(
        &data_dir.join("config.yaml"),
        "pricing:\n  non_refundable_discount_percent: 5\n  currency: GBP\nbooking:\n  max_guests: 6\n",
    );
    write(
        &project.join("haven.yaml"),
        "pricing:\n  non_refundable_discount_percent: 15\n",
    );

    let config = ConfigBuilder::new()
        .with_working_dir(&nested)
        .with_data_dir(&data_dir)
        .skip_env()
        .build()
        .unwrap();

    assert_eq!(
        config.pricing_rules().unwrap().non_refundable_discount_percent(),
        dec!(15)
    );
    assert_eq!(config.currency(), "GBP");
    assert_eq!(config.max_guests(), Some(6));
}

#[test]
#[serial]
fn test_environment_overrides_files() {
    let temp = TempDir::new().unwrap();
    write(
        &temp.path().join("haven.yaml"),
        "booking:\n  initial_status: pending\n",
    );

    std::env::set_var("HAVEN_INITIAL_STATUS", "confirmed");
    std::env::set_var("HAVEN_NON_REFUNDABLE_DISCOUNT_PERCENT", "20");
    let config = ConfigBuilder::new()
        .with_working_dir(temp.path())
        .with_data_dir(&temp.path().join("data"))
        .build();
    std::env::remove_var("HAVEN_INITIAL_STATUS");
    std::env::remove_var("HAVEN_NON_REFUNDABLE_DISCOUNT_PERCENT");

    let config = config.unwrap();
    assert_eq!(config.initial_status(), ReservationStatus::Confirmed);

    // The configured discount reaches the pricing of new bookings
    let mut lifecycle = Lifecycle::new(Database::open_in_memory().unwrap(), config);
    let r = lifecycle
        .create(common::booking((5, 1), (5, 6), 100).with_policy(CancellationPolicy::NonRefundable))
        .unwrap();
    assert_eq!(r.total_price(), dec!(400.00));
    assert_eq!(r.status(), ReservationStatus::Confirmed);
}

#[test]
#[serial]
fn test_invalid_file_is_reported() {
    let temp = TempDir::new().unwrap();
    write(
        &temp.path().join("haven.yaml"),
        "booking:\n  initial_status: checked_out\n",
    );

    let err = ConfigBuilder::new()
        .with_working_dir(temp.path())
        .with_data_dir(&temp.path().join("data"))
        .skip_env()
        .build()
        .unwrap_err();
    assert!(err.is_validation(), "got {err}");
}

#[test]
#[serial]
fn test_unknown_keys_rejected() {
    let temp = TempDir::new().unwrap();
    write(&temp.path().join("haven.yaml"), "room_types:\n  suite: 1\n");

    let result = ConfigBuilder::new()
        .with_working_dir(temp.path())
        .with_data_dir(&temp.path().join("data"))
        .skip_env()
        .build();
    assert!(result.is_err());
}
