//! Database connection management.

use std::time::Duration;

use log::debug;
use rusqlite::{Connection, OpenFlags, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::config::DatabaseConfig;

/// An open `SQLite` database with haven's schema.
///
/// # Examples
///
/// ```no_run
/// use haven::database::{Database, DatabaseConfig};
///
/// let db = Database::open(DatabaseConfig::new("/tmp/haven.db")).unwrap();
/// ```
#[derive(Debug)]
pub struct Database {
    pub(super) conn: Connection,
    config: DatabaseConfig,
}

impl Database {
    /// Opens (and if needed creates) the database.
    ///
    /// This will:
    /// - create the parent directory when `auto_create` is set
    /// - set the busy timeout to the configured lock wait
    /// - switch to WAL journaling
    /// - initialise or verify the schema
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be opened, a pragma fails, or the
    /// schema version is unsupported.
    pub fn open(config: DatabaseConfig) -> Result<Self> {
        if config.auto_create && !config.path.exists() {
            if let Some(parent) = config.path.parent() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let flags = if config.auto_create {
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX
        } else {
            OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_NO_MUTEX
        };

        let conn = Connection::open_with_flags(&config.path, flags)?;
        let lock_wait = config.busy_timeout;

        // Busy timeout first so concurrent openers wait instead of failing
        conn.busy_timeout(config.busy_timeout)?;
        let _: String = conn
            .query_row("PRAGMA journal_mode = WAL", [], |row| row.get(0))
            .map_err(|e| Error::from_sqlite(e, lock_wait))?;
        conn.execute_batch("PRAGMA synchronous = NORMAL; PRAGMA foreign_keys = ON")?;

        super::migrations::check_schema_compatibility(&conn).map_err(|e| match e {
            Error::Database(inner) => Error::from_sqlite(inner, lock_wait),
            other => other,
        })?;

        debug!("opened database {}", config.path.display());
        Ok(Self { conn, config })
    }

    /// Opens a private in-memory database, mainly for tests and benchmarks.
    ///
    /// # Errors
    ///
    /// Returns an error if schema initialisation fails.
    pub fn open_in_memory() -> Result<Self> {
        let conn = Connection::open_in_memory()?;
        super::migrations::check_schema_compatibility(&conn)?;
        Ok(Self {
            conn,
            config: DatabaseConfig::new(":memory:"),
        })
    }

    /// The configuration the database was opened with.
    #[must_use]
    pub const fn config(&self) -> &DatabaseConfig {
        &self.config
    }

    /// Returns a reference to the underlying `SQLite` connection.
    #[must_use]
    pub const fn connection(&self) -> &Connection {
        &self.conn
    }

    /// Consumes the database, returning the underlying connection.
    #[must_use]
    pub fn into_connection(self) -> Connection {
        self.conn
    }

    /// Begins a write transaction, taking the database write lock up front.
    ///
    /// `BEGIN IMMEDIATE` acquires the lock before any read happens, so every
    /// overlap query run inside the transaction sees a state no other writer
    /// can change until commit or rollback. Waiting longer than the
    /// configured busy timeout yields [`Error::LockTimeout`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::LockTimeout`] if the lock is not obtained in time.
    pub fn begin_transaction(&mut self) -> Result<Transaction<'_>> {
        let lock_wait = self.config.busy_timeout;
        let tx = self
            .conn
            .transaction_with_behavior(TransactionBehavior::Immediate)
            .map_err(|e| Error::from_sqlite(e, lock_wait))?;
        debug!("acquired database write lock");
        Ok(tx)
    }

    /// Begins a read transaction giving a consistent snapshot without
    /// blocking writers.
    ///
    /// # Errors
    ///
    /// Returns an error if the transaction cannot be started.
    pub fn begin_read(&mut self) -> Result<Transaction<'_>> {
        let lock_wait = self.config.busy_timeout;
        self.conn
            .transaction_with_behavior(TransactionBehavior::Deferred)
            .map_err(|e| Error::from_sqlite(e, lock_wait))
    }

    /// Commits a transaction opened with [`begin_transaction`](Self::begin_transaction).
    ///
    /// # Errors
    ///
    /// Returns an error if the commit fails; the transaction is rolled back.
    pub fn commit(tx: Transaction<'_>, lock_wait: Duration) -> Result<()> {
        tx.commit().map_err(|e| Error::from_sqlite(e, lock_wait))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_database_open() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert!(path.exists());

        let journal_mode: String = db
            .connection()
            .query_row("PRAGMA journal_mode", [], |row| row.get(0))
            .unwrap();
        assert_eq!(journal_mode.to_lowercase(), "wal");
    }

    #[test]
    fn test_database_auto_create_directory() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("subdir").join("test.db");
        let _db = Database::open(DatabaseConfig::new(&path)).unwrap();
        assert!(path.exists());
    }

    #[test]
    fn test_existing_only_refuses_missing_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("missing.db");
        assert!(Database::open(DatabaseConfig::new(&path).existing_only()).is_err());
        assert!(!path.exists());
    }

    #[test]
    fn test_second_writer_times_out() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let config = DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(100));

        let mut first = Database::open(config.clone()).unwrap();
        let mut second = Database::open(config).unwrap();

        let _held = first.begin_transaction().unwrap();
        let err = second.begin_transaction().unwrap_err();
        assert!(err.is_concurrency(), "expected lock timeout, got {err}");
    }

    #[test]
    fn test_reader_not_blocked_by_writer() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let config = DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(100));

        let mut writer = Database::open(config.clone()).unwrap();
        let mut reader = Database::open(config).unwrap();

        let _held = writer.begin_transaction().unwrap();
        let tx = reader.begin_read().unwrap();
        let count: i64 = tx
            .query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn test_open_while_writer_holds_lock() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("test.db");
        let config = DatabaseConfig::new(&path).with_busy_timeout(Duration::from_millis(100));

        let mut writer = Database::open(config.clone()).unwrap();
        let _held = writer.begin_transaction().unwrap();

        let late = Database::open(config).unwrap();
        let count: i64 = late
            .connection()
            .query_row("SELECT COUNT(*) FROM reservations", [], |row| row.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }
}
