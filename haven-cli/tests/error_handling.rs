//! Exit codes and error messages of the haven binary.

mod common;

use common::TestEnv;
use predicates::prelude::*;

#[test]
fn test_unknown_reservation_exits_8() {
    let env = TestEnv::new();

    env.command()
        .args(["show", "HV-NOPE00"])
        .assert()
        .failure()
        .code(8)
        .stderr(predicate::str::contains("not found: reservation HV-NOPE00"));
}

#[test]
fn test_disable_autoinit_without_database_exits_3() {
    let env = TestEnv::new();

    env.command()
        .args(["--disable-autoinit", "list"])
        .assert()
        .failure()
        .code(3)
        .stderr(predicate::str::contains("haven init"));

    assert!(!env.data_dir.exists());
}

#[test]
fn test_illegal_transition_exits_1() {
    let env = TestEnv::new();
    let code = env.book("2025-06-01", "2025-06-03", "100");

    env.command()
        .args(["check-out", &code])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains(
            "cannot check out a pending reservation",
        ));
}

#[test]
fn test_too_few_adults_exits_1() {
    let env = TestEnv::new();

    env.command()
        .args([
            "book",
            "--check-in",
            "2025-06-01",
            "--check-out",
            "2025-06-03",
            "--rate",
            "100",
            "--adults",
            "0",
        ])
        .assert()
        .failure()
        .code(1);
}

#[test]
fn test_malformed_arguments_are_rejected() {
    let env = TestEnv::new();

    env.command()
        .args([
            "book",
            "--check-in",
            "June 1st",
            "--check-out",
            "2025-06-03",
            "--rate",
            "100",
        ])
        .assert()
        .failure();

    env.command()
        .args([
            "book",
            "--check-in",
            "2025-06-01",
            "--check-out",
            "2025-06-03",
            "--rate",
            "12.345",
        ])
        .assert()
        .failure()
        .stderr(predicate::str::contains("decimal places"));
}

#[test]
fn test_invalid_config_exits_7() {
    let env = TestEnv::new();
    std::fs::write(
        env.path().join("haven.yaml"),
        "booking:\n  initial_status: checked_out\n",
    )
    .unwrap();

    env.command().arg("list").assert().failure().code(7);
}

#[test]
fn test_blocked_period_lifecycle() {
    let env = TestEnv::new();

    let output = env
        .command()
        .args([
            "block",
            "--from",
            "2025-08-10",
            "--to",
            "2025-08-12",
            "--reason",
            "roof repairs",
        ])
        .output()
        .unwrap();
    assert!(output.status.success());
    let id = String::from_utf8(output.stdout).unwrap().trim().to_string();

    env.command()
        .args([
            "book",
            "--check-in",
            "2025-08-11",
            "--check-out",
            "2025-08-13",
            "--rate",
            "100",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("blocked: roof repairs"));

    env.command()
        .args([
            "availability",
            "--from",
            "2025-08-01",
            "--to",
            "2025-08-20",
            "--check",
        ])
        .assert()
        .failure()
        .code(1)
        .stdout(predicate::str::contains("roof repairs"));

    let blocks = env.json(&["blocks"]);
    assert_eq!(blocks.as_array().unwrap().len(), 1);

    env.command().args(["unblock", &id]).assert().success();
    env.book("2025-08-11", "2025-08-13", "100");

    env.command()
        .args(["unblock", &id])
        .assert()
        .failure()
        .code(8);
}

#[test]
fn test_single_day_block_is_rejected() {
    let env = TestEnv::new();

    env.command()
        .args([
            "block",
            "--from",
            "2025-08-10",
            "--to",
            "2025-08-10",
            "--reason",
            "inspection",
        ])
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("closes no night"));

    let blocks = env.json(&["blocks"]);
    assert!(blocks.as_array().unwrap().is_empty());
}

#[test]
fn test_init_refuses_to_overwrite() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--with-config"])
        .assert()
        .success()
        .stdout(predicate::str::contains("haven-data"));
    assert!(env.data_dir.join("haven.db").exists());
    assert!(env.data_dir.join("config.yaml").exists());

    env.command()
        .arg("init")
        .assert()
        .failure()
        .code(1)
        .stderr(predicate::str::contains("--overwrite"));

    env.command()
        .args(["init", "--overwrite"])
        .assert()
        .success();
}

#[test]
fn test_init_dry_run_creates_nothing() {
    let env = TestEnv::new();

    env.command()
        .args(["init", "--dry-run"])
        .assert()
        .success()
        .stderr(predicate::str::contains("Create database"));

    assert!(!env.data_dir.exists());
}

#[test]
fn test_completions() {
    let env = TestEnv::new();

    env.command_bare()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("haven"));
}
