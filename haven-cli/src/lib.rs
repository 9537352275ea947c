//! Library exports for haven-cli.
//!
//! This module exports the CLI structure so documentation tooling and
//! tests can inspect the command tree.

pub mod cli;
pub mod commands;
pub mod error;
pub mod utils;

pub use cli::Cli;
