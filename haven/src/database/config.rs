//! Database location and connection parameters.

use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::error::{Error, Result};

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "HAVEN_DATA_DIR";

/// File name of the database inside the data directory.
pub const DATABASE_FILE_NAME: &str = "haven.db";

/// Default time to wait for the write lock.
pub const DEFAULT_LOCK_WAIT: Duration = Duration::from_secs(5);

/// Configuration for database connections.
///
/// # Examples
///
/// ```
/// use haven::database::DatabaseConfig;
/// use std::time::Duration;
///
/// let config = DatabaseConfig::new("/tmp/haven.db")
///     .with_busy_timeout(Duration::from_secs(2));
/// assert_eq!(config.busy_timeout.as_secs(), 2);
/// ```
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Path to the database file.
    pub path: PathBuf,
    /// How long a writer waits for the database lock before giving up.
    pub busy_timeout: Duration,
    /// Whether to create the file (and its directory) if missing.
    pub auto_create: bool,
}

impl DatabaseConfig {
    /// Creates a configuration with a 5 second lock wait and auto-creation.
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            busy_timeout: DEFAULT_LOCK_WAIT,
            auto_create: true,
        }
    }

    /// Sets the lock wait.
    #[must_use]
    pub const fn with_busy_timeout(mut self, timeout: Duration) -> Self {
        self.busy_timeout = timeout;
        self
    }

    /// Refuses to create a missing database.
    #[must_use]
    pub const fn existing_only(mut self) -> Self {
        self.auto_create = false;
        self
    }
}

/// Returns the default data directory, `~/.haven`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_data_dir() -> Result<PathBuf> {
    let home = home::home_dir().ok_or_else(|| Error::Validation {
        field: "home_directory".into(),
        message: "cannot determine home directory".into(),
    })?;
    Ok(home.join(".haven"))
}

/// Resolves the data directory: `$HAVEN_DATA_DIR` if set, else `~/.haven`.
///
/// # Errors
///
/// Returns an error if neither is available.
pub fn resolve_data_dir() -> Result<PathBuf> {
    match std::env::var_os(DATA_DIR_ENV) {
        Some(dir) if !dir.is_empty() => Ok(PathBuf::from(dir)),
        _ => default_data_dir(),
    }
}

/// Resolves the database file path inside [`resolve_data_dir`].
///
/// # Errors
///
/// Returns an error if the data directory cannot be resolved.
pub fn resolve_database_path() -> Result<PathBuf> {
    Ok(resolve_data_dir()?.join(DATABASE_FILE_NAME))
}
