//! Schema initialisation and version checks.

use rusqlite::{Connection, Transaction, TransactionBehavior};

use crate::error::{Error, Result};

use super::schema::{
    CREATE_BLOCKED_PERIODS_TABLE, CREATE_CREDIT_ENTRIES_TABLE, CREATE_CREDIT_INDEX,
    CREATE_METADATA_TABLE, CREATE_RESERVATIONS_TABLE, CREATE_STATUS_INDEX, CREATE_STAY_INDEX,
    CURRENT_SCHEMA_VERSION, INSERT_SCHEMA_VERSION, SELECT_SCHEMA_VERSION,
};

/// Creates all tables, indices and the version record.
///
/// Every statement is idempotent, so running it twice is harmless.
///
/// # Errors
///
/// Returns an error if any SQL statement fails to execute.
///
/// # Examples
///
/// ```
/// use rusqlite::Connection;
/// use haven::database::migrations::{get_schema_version, initialize_schema};
///
/// let conn = Connection::open_in_memory().unwrap();
/// initialize_schema(&conn).unwrap();
/// assert_eq!(get_schema_version(&conn).unwrap(), 1);
/// ```
pub fn initialize_schema(conn: &Connection) -> Result<()> {
    conn.execute(CREATE_METADATA_TABLE, [])?;
    conn.execute(CREATE_RESERVATIONS_TABLE, [])?;
    conn.execute(CREATE_STAY_INDEX, [])?;
    conn.execute(CREATE_STATUS_INDEX, [])?;
    conn.execute(CREATE_BLOCKED_PERIODS_TABLE, [])?;
    conn.execute(CREATE_CREDIT_ENTRIES_TABLE, [])?;
    conn.execute(CREATE_CREDIT_INDEX, [])?;
    conn.execute(INSERT_SCHEMA_VERSION, [CURRENT_SCHEMA_VERSION.to_string()])?;
    Ok(())
}

/// Reads the schema version; `0` means the database was never initialised.
///
/// # Errors
///
/// Returns an error if the stored version is unreadable or the query fails
/// for a reason other than a missing table or row.
pub fn get_schema_version(conn: &Connection) -> Result<u32> {
    let has_metadata: bool = conn.query_row(
        "SELECT EXISTS (SELECT 1 FROM sqlite_master WHERE type = 'table' AND name = 'metadata')",
        [],
        |row| row.get(0),
    )?;
    if !has_metadata {
        return Ok(0);
    }

    match conn.query_row(SELECT_SCHEMA_VERSION, [], |row| row.get::<_, String>(0)) {
        Ok(value) => value.parse::<u32>().map_err(|e| Error::DatabaseCorruption {
            details: format!("schema version '{value}' is not a number: {e}"),
        }),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(0),
        Err(e) => Err(e.into()),
    }
}

/// Initialises a fresh database or verifies an existing one.
///
/// The version is read without taking the write lock, so opening a database
/// another process is writing to does not wait. Only a database that still
/// reports version `0` is initialised, and that happens in an immediate
/// transaction that re-reads the version first so two processes opening a
/// brand new file cannot interleave their initialisation.
///
/// # Errors
///
/// Returns [`Error::UnsupportedSchemaVersion`] if the stored version differs
/// from [`CURRENT_SCHEMA_VERSION`], or any database error.
pub fn check_schema_compatibility(conn: &Connection) -> Result<()> {
    let version = get_schema_version(conn)?;
    if version != 0 {
        return ensure_supported(version);
    }

    let tx = Transaction::new_unchecked(conn, TransactionBehavior::Immediate)?;
    match get_schema_version(&tx)? {
        0 => initialize_schema(&tx)?,
        version => ensure_supported(version)?,
    }
    tx.commit()?;
    Ok(())
}

fn ensure_supported(version: u32) -> Result<()> {
    if version == CURRENT_SCHEMA_VERSION {
        Ok(())
    } else {
        Err(Error::UnsupportedSchemaVersion {
            expected: CURRENT_SCHEMA_VERSION,
            found: version,
        })
    }
}
