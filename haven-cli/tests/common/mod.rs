//! Common test utilities for CLI integration tests.
//!
//! Each test gets its own data directory and runs the binary from inside a
//! temporary working directory so no stray `haven.yaml` is picked up.

use assert_cmd::Command;
use serde_json::Value;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Test environment with isolated data directory.
pub struct TestEnv {
    /// Temporary directory (kept alive for the duration of the test)
    #[allow(dead_code)]
    temp_dir: TempDir,
    /// Path to the temporary directory
    pub temp_path: PathBuf,
    /// Path to the haven data directory
    pub data_dir: PathBuf,
}

#[allow(dead_code)]
impl TestEnv {
    /// Create a new test environment.
    ///
    /// The data directory is not created; haven creates it on first use.
    pub fn new() -> Self {
        let temp_dir = tempfile::tempdir().expect("Failed to create temp dir");
        let temp_path = temp_dir.path().to_path_buf();
        let data_dir = temp_path.join("haven-data");

        Self {
            temp_dir,
            temp_path,
            data_dir,
        }
    }

    /// Command with only the binary and the isolated working directory.
    pub fn command_bare(&self) -> Command {
        let mut cmd = Command::cargo_bin("haven").expect("Failed to find haven binary");
        cmd.current_dir(&self.temp_path)
            .env_remove("HAVEN_DATA_DIR")
            .env_remove("HAVEN_OUTPUT_FORMAT")
            .env_remove("HAVEN_DISABLE_AUTOINIT")
            .env_remove("HAVEN_EVENTS_FILE");
        cmd
    }

    /// Command with `--data-dir` pointing at this environment.
    pub fn command(&self) -> Command {
        let mut cmd = self.command_bare();
        cmd.arg("--data-dir").arg(&self.data_dir);
        cmd
    }

    /// Get the temp path.
    pub fn path(&self) -> &Path {
        &self.temp_path
    }

    /// Run a command expected to succeed and parse its JSON stdout.
    ///
    /// # Panics
    /// Panics if the command fails or prints something other than JSON.
    pub fn json(&self, args: &[&str]) -> Value {
        let output = self
            .command()
            .args(args)
            .args(["--format", "json"])
            .output()
            .expect("Failed to run haven");

        assert!(
            output.status.success(),
            "haven {args:?} failed: {}",
            String::from_utf8_lossy(&output.stderr)
        );
        serde_json::from_slice(&output.stdout).expect("Output is not JSON")
    }

    /// Book a stay at the given nightly rate and return its code.
    pub fn book(&self, check_in: &str, check_out: &str, rate: &str) -> String {
        let booked = self.json(&[
            "book",
            "--check-in",
            check_in,
            "--check-out",
            check_out,
            "--rate",
            rate,
        ]);
        booked["code"]
            .as_str()
            .expect("booking has no code")
            .to_string()
    }
}
