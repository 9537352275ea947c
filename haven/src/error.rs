//! Error types for the haven library.
//!
//! This module provides the error hierarchy for every booking operation,
//! using `thiserror` for ergonomic error handling. Errors fall into four
//! caller-facing classes: validation (bad input or an illegal status
//! transition), conflict (dates unavailable), concurrency (lock wait timed
//! out) and not-found. Everything else is an infrastructure failure.

use std::fmt;
use std::time::Duration;

use thiserror::Error;

use crate::reservation::ReservationStatus;

/// Result type alias for operations that may fail with a haven error.
///
/// # Examples
///
/// ```
/// use haven::{Error, Result};
///
/// fn example_operation() -> Result<u32> {
///     Ok(3)
/// }
/// ```
pub type Result<T> = std::result::Result<T, Error>;

/// The main error type for the haven library.
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed input was provided.
    #[error("validation error for '{field}': {message}")]
    Validation {
        /// The field that failed validation.
        field: String,
        /// A description of the validation failure.
        message: String,
    },

    /// A lifecycle action is not permitted from the reservation's current status.
    #[error("cannot {action} a {status} reservation")]
    InvalidTransition {
        /// The status the reservation is currently in.
        status: ReservationStatus,
        /// The attempted action, e.g. "cancel".
        action: String,
    },

    /// The requested dates are not available.
    #[error("dates unavailable: {blocker}")]
    Conflict {
        /// What is occupying the requested dates.
        blocker: Blocker,
    },

    /// A database lock could not be acquired in time.
    #[error("database lock timeout after {waited:?}")]
    LockTimeout {
        /// How long the busy handler waited before giving up.
        waited: Duration,
    },

    /// The requested resource was not found.
    #[error("not found: {resource}")]
    NotFound {
        /// The resource that was not found.
        resource: String,
    },

    /// No unused booking code could be generated.
    #[error("could not generate an unused booking code after {attempts} attempts")]
    CodeSpaceExhausted {
        /// The number of candidate codes tried.
        attempts: u32,
    },

    /// A database error occurred.
    #[error("database error: {0}")]
    Database(#[from] rusqlite::Error),

    /// A configuration error occurred.
    #[error("configuration error: {0}")]
    Configuration(#[from] serde_yaml::Error),

    /// An I/O error occurred.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Database corruption was detected.
    #[error("database corruption detected: {details}")]
    DatabaseCorruption {
        /// Details about the corruption.
        details: String,
    },

    /// An unsupported schema version was encountered.
    #[error("unsupported schema version: expected {expected}, found {found}")]
    UnsupportedSchemaVersion {
        /// The expected schema version.
        expected: u32,
        /// The schema version found in the database.
        found: u32,
    },
}

/// The entity occupying dates that a request wanted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Blocker {
    /// Another reservation, identified by its booking code.
    Reservation {
        /// Booking code of the conflicting reservation.
        code: String,
    },
    /// An administrator-declared blocked period.
    Period {
        /// Identifier of the blocked period.
        id: i64,
        /// The reason recorded on the period.
        reason: String,
    },
}

impl fmt::Display for Blocker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reservation { code } => write!(f, "overlaps reservation {code}"),
            Self::Period { reason, .. } => write!(f, "blocked: {reason}"),
        }
    }
}

impl From<crate::reservation::ValidationError> for Error {
    fn from(err: crate::reservation::ValidationError) -> Self {
        Self::Validation {
            field: err.field,
            message: err.message,
        }
    }
}

impl Error {
    /// Builds a validation error.
    pub(crate) fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Converts a rusqlite error, turning busy/locked failures into [`Error::LockTimeout`].
    ///
    /// `SQLite` only reports `SQLITE_BUSY` once its busy handler has waited for
    /// the configured timeout, so the timeout is attached here.
    pub(crate) fn from_sqlite(err: rusqlite::Error, waited: Duration) -> Self {
        match err.sqlite_error_code() {
            Some(rusqlite::ErrorCode::DatabaseBusy | rusqlite::ErrorCode::DatabaseLocked) => {
                Self::LockTimeout { waited }
            }
            _ => Self::Database(err),
        }
    }

    /// Check if error is a validation failure (bad input or illegal transition).
    ///
    /// # Examples
    ///
    /// ```
    /// use haven::Error;
    ///
    /// let err = Error::Validation { field: "guests".into(), message: "too many".into() };
    /// assert!(err.is_validation());
    /// ```
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::Validation { .. } | Self::InvalidTransition { .. })
    }

    /// Check if error reports unavailable dates.
    #[must_use]
    pub fn is_conflict(&self) -> bool {
        matches!(self, Self::Conflict { .. })
    }

    /// Check if error is a lock acquisition timeout.
    #[must_use]
    pub fn is_concurrency(&self) -> bool {
        matches!(self, Self::LockTimeout { .. })
    }

    /// Check if error indicates a missing reservation or blocked period.
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound { .. })
    }

    /// Check if the whole operation may be retried unchanged.
    ///
    /// # Examples
    ///
    /// ```
    /// use haven::Error;
    /// use std::time::Duration;
    ///
    /// assert!(Error::LockTimeout { waited: Duration::from_secs(5) }.is_retryable());
    /// assert!(!Error::NotFound { resource: "x".into() }.is_retryable());
    /// ```
    #[must_use]
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            Self::LockTimeout { .. } | Self::CodeSpaceExhausted { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error() {
        let err = Error::Validation {
            field: "check_out".to_string(),
            message: "must be after check-in".to_string(),
        };
        let display = format!("{err}");
        assert!(display.contains("validation error"));
        assert!(display.contains("check_out"));
        assert!(display.contains("must be after check-in"));
        assert!(err.is_validation());
    }

    #[test]
    fn test_invalid_transition_error() {
        let err = Error::InvalidTransition {
            status: ReservationStatus::CheckedOut,
            action: "cancel".to_string(),
        };
        assert_eq!(format!("{err}"), "cannot cancel a checked_out reservation");
        assert!(err.is_validation());
        assert!(!err.is_conflict());
    }

    #[test]
    fn test_conflict_error_names_reservation() {
        let err = Error::Conflict {
            blocker: Blocker::Reservation {
                code: "HV-ABC123".to_string(),
            },
        };
        let display = format!("{err}");
        assert!(display.contains("dates unavailable"));
        assert!(display.contains("HV-ABC123"));
        assert!(err.is_conflict());
        assert!(!err.is_retryable());
    }

    #[test]
    fn test_conflict_error_names_period() {
        let err = Error::Conflict {
            blocker: Blocker::Period {
                id: 4,
                reason: "roof repair".to_string(),
            },
        };
        assert!(format!("{err}").contains("roof repair"));
    }

    #[test]
    fn test_lock_timeout_error() {
        let err = Error::LockTimeout {
            waited: Duration::from_millis(200),
        };
        let display = format!("{err}");
        assert!(display.contains("lock timeout"));
        assert!(display.ends_with("200ms"), "{display}");
        assert!(err.is_concurrency());
        assert!(err.is_retryable());
    }

    #[test]
    fn test_not_found_error() {
        let err = Error::NotFound {
            resource: "reservation HV-ZZZZZZ".to_string(),
        };
        assert!(format!("{err}").contains("not found"));
        assert!(err.is_not_found());
    }

    #[test]
    fn test_busy_sqlite_error_becomes_lock_timeout() {
        let busy = rusqlite::Error::SqliteFailure(
            rusqlite::ffi::Error::new(rusqlite::ffi::SQLITE_BUSY),
            None,
        );
        assert!(matches!(
            Error::from_sqlite(busy, Duration::from_secs(3)),
            Error::LockTimeout { waited } if waited == Duration::from_secs(3)
        ));

        let other = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(Error::from_sqlite(other, Duration::from_secs(3)), Error::Database(_)));
    }

    #[test]
    fn test_unsupported_schema_version_error() {
        let err = Error::UnsupportedSchemaVersion {
            expected: 1,
            found: 2,
        };
        let display = format!("{err}");
        assert!(display.contains("expected 1"));
        assert!(display.contains("found 2"));
    }

    #[test]
    fn test_io_error_conversion() {
        let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "file not found");
        let err: Error = io_err.into();
        assert!(format!("{err}").contains("I/O error"));
    }
}
