//! Init command implementation.
//!
//! This module implements the `init` command, which creates the data
//! directory, the database and optionally a configuration template.

use crate::error::CliError;
use crate::utils::{resolve_data_dir, GlobalOptions};
use clap::Args;
use haven::database::DATABASE_FILE_NAME;
use haven::operations::{init_database, InitOptions};

/// Initialize the haven data directory and database.
#[derive(Args)]
pub struct InitCommand {
    /// Replace an existing database (all reservations are lost)
    #[arg(long)]
    pub overwrite: bool,

    /// Also write a commented config.yaml template
    #[arg(long)]
    pub with_config: bool,

    /// Show what would be created without creating anything
    #[arg(long)]
    pub dry_run: bool,
}

impl InitCommand {
    /// Execute the init command.
    pub fn execute(self, global: &GlobalOptions) -> Result<(), CliError> {
        let data_dir = resolve_data_dir(global)?;

        if self.dry_run {
            let db_path = data_dir.join(DATABASE_FILE_NAME);
            if !global.quiet {
                eprintln!("Dry run - would perform the following actions:");
                if !data_dir.exists() {
                    eprintln!("  Create directory: {}", data_dir.display());
                }
                if db_path.exists() && !self.overwrite {
                    eprintln!("  Refuse: database exists at {}", db_path.display());
                } else {
                    eprintln!("  Create database: {}", db_path.display());
                }
                if self.with_config {
                    eprintln!("  Create config template (if missing)");
                }
            }
            return Ok(());
        }

        let options = InitOptions::new(data_dir)
            .with_overwrite(self.overwrite)
            .with_create_config(self.with_config);
        let result = init_database(&options)?;

        if !global.quiet {
            if result.data_dir_created {
                eprintln!("Created data directory: {}", result.data_dir.display());
            }
            if result.database_created {
                eprintln!("Created database");
            }
            if result.config_created {
                eprintln!("Created configuration template");
            }
        }
        println!("{}", result.data_dir.display());

        Ok(())
    }
}
