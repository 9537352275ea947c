//! Data directory initialization.
//!
//! Creates the data directory and the database, and optionally drops a
//! commented configuration template next to it.

use std::fs;
use std::path::PathBuf;

use log::info;

use crate::config::USER_CONFIG_FILE;
use crate::database::{Database, DatabaseConfig, DATABASE_FILE_NAME};
use crate::error::{Error, Result};

/// Options for initialization.
#[derive(Debug, Clone)]
pub struct InitOptions {
    /// Data directory to initialize.
    pub data_dir: PathBuf,
    /// Replace an existing database.
    pub overwrite: bool,
    /// Write a configuration template if none exists.
    pub create_config: bool,
}

impl InitOptions {
    /// Creates options for `data_dir`.
    #[must_use]
    pub const fn new(data_dir: PathBuf) -> Self {
        Self {
            data_dir,
            overwrite: false,
            create_config: false,
        }
    }

    /// Sets whether an existing database is replaced.
    #[must_use]
    pub const fn with_overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = overwrite;
        self
    }

    /// Sets whether a configuration template is written.
    #[must_use]
    pub const fn with_create_config(mut self, create_config: bool) -> Self {
        self.create_config = create_config;
        self
    }
}

/// What initialization did.
#[derive(Debug)]
pub struct InitResult {
    /// The data directory had to be created.
    pub data_dir_created: bool,
    /// The database was created or recreated.
    pub database_created: bool,
    /// A configuration template was written.
    pub config_created: bool,
    /// The data directory.
    pub data_dir: PathBuf,
}

const CONFIG_TEMPLATE: &str = r"# haven configuration

# pricing:
#   non_refundable_discount_percent: 10
#   currency: EUR

# booking:
#   code_prefix: HV-
#   code_length: 6
#   max_code_attempts: 32
#   initial_status: pending   # or confirmed
#   max_guests: 8

# Seconds a writer waits for the database lock (default: 5)
# maximum_lock_wait_seconds: 5
";

/// Initializes the data directory and database.
///
/// # Errors
///
/// Returns an error if the directory, database or template cannot be
/// written, or if the database exists and `overwrite` is not set.
///
/// # Examples
///
/// ```no_run
/// use haven::operations::init::{init_database, InitOptions};
/// use std::path::PathBuf;
///
/// let options = InitOptions::new(PathBuf::from("/tmp/haven-data")).with_create_config(true);
/// let result = init_database(&options).unwrap();
/// assert!(result.database_created);
/// ```
pub fn init_database(options: &InitOptions) -> Result<InitResult> {
    let mut result = InitResult {
        data_dir_created: false,
        database_created: false,
        config_created: false,
        data_dir: options.data_dir.clone(),
    };

    if !options.data_dir.exists() {
        fs::create_dir_all(&options.data_dir)?;
        result.data_dir_created = true;
    }

    let db_path = options.data_dir.join(DATABASE_FILE_NAME);
    if db_path.exists() {
        if !options.overwrite {
            return Err(Error::Validation {
                field: "database".into(),
                message: format!(
                    "database already exists at {}; use --overwrite to replace it",
                    db_path.display()
                ),
            });
        }
        fs::remove_file(&db_path)?;
    }

    Database::open(DatabaseConfig::new(&db_path))?;
    result.database_created = true;
    info!("initialized {}", db_path.display());

    if options.create_config {
        let config_path = options.data_dir.join(USER_CONFIG_FILE);
        if !config_path.exists() {
            fs::write(&config_path, CONFIG_TEMPLATE)?;
            result.config_created = true;
        }
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{Config, ConfigLoader};
    use tempfile::TempDir;

    #[test]
    fn test_init_fresh_directory() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("haven");

        let result = init_database(&InitOptions::new(data_dir.clone())).unwrap();

        assert!(result.data_dir_created);
        assert!(result.database_created);
        assert!(!result.config_created);
        assert!(data_dir.join("haven.db").exists());
    }

    #[test]
    fn test_init_refuses_existing_database() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().to_path_buf();
        init_database(&InitOptions::new(data_dir.clone())).unwrap();

        match init_database(&InitOptions::new(data_dir.clone())) {
            Err(Error::Validation { field, message }) => {
                assert_eq!(field, "database");
                assert!(message.contains("--overwrite"));
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let again = init_database(&InitOptions::new(data_dir).with_overwrite(true)).unwrap();
        assert!(!again.data_dir_created);
        assert!(again.database_created);
    }

    #[test]
    fn test_config_template_is_loadable() {
        let temp = TempDir::new().unwrap();
        let data_dir = temp.path().join("haven");

        let result =
            init_database(&InitOptions::new(data_dir.clone()).with_create_config(true)).unwrap();
        assert!(result.config_created);

        // Every setting is commented out, so the file parses to an empty config
        let config = ConfigLoader::load_file(&data_dir.join("config.yaml")).unwrap();
        assert_eq!(config, Config::default());
    }
}
