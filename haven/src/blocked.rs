//! Administrator-declared blocked periods.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;
use crate::stay::{DateSpan, StayRange};

/// A date span closed to bookings for a reason unrelated to any reservation
/// (owner use, maintenance, ...).
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use haven::{BlockedPeriod, DateSpan, StayRange};
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 8, day).unwrap();
/// let period = BlockedPeriod::new(1, DateSpan::new(d(10), d(12)).unwrap(), "painting").unwrap();
///
/// assert!(period.blocks(&StayRange::new(d(11), d(14)).unwrap()));
/// assert!(!period.blocks(&StayRange::new(d(12), d(14)).unwrap()));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlockedPeriod {
    id: i64,
    span: DateSpan,
    reason: String,
    created_at: DateTime<Utc>,
}

impl BlockedPeriod {
    /// Creates a blocked period stamped with the current time.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is empty after trimming.
    pub fn new(
        id: i64,
        span: DateSpan,
        reason: impl Into<String>,
    ) -> Result<Self, ValidationError> {
        Self::with_created_at(id, span, reason, Utc::now())
    }

    /// Creates a blocked period with an explicit creation time.
    ///
    /// # Errors
    ///
    /// Returns an error if the reason is empty after trimming.
    pub fn with_created_at(
        id: i64,
        span: DateSpan,
        reason: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, ValidationError> {
        let reason = validate_reason(&reason.into())?;
        Ok(Self {
            id,
            span,
            reason,
            created_at,
        })
    }

    /// Storage identifier.
    #[must_use]
    pub const fn id(&self) -> i64 {
        self.id
    }

    /// The closed days.
    #[must_use]
    pub const fn span(&self) -> DateSpan {
        self.span
    }

    /// Why the dates are closed.
    #[must_use]
    pub fn reason(&self) -> &str {
        &self.reason
    }

    /// When the period was declared.
    #[must_use]
    pub const fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Whether this period makes `stay` unavailable.
    #[must_use]
    pub fn blocks(&self, stay: &StayRange) -> bool {
        self.span.blocks(stay)
    }
}

impl fmt::Display for BlockedPeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{} {} ({})", self.id, self.span, self.reason)
    }
}

/// Trims and checks a blocked-period reason.
///
/// # Errors
///
/// Returns an error if nothing remains after trimming.
pub fn validate_reason(reason: &str) -> Result<String, ValidationError> {
    let trimmed = reason.trim();
    if trimmed.is_empty() {
        return Err(ValidationError {
            field: "reason".into(),
            message: "a blocked period needs a reason".into(),
        });
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn d(day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 8, day).unwrap()
    }

    #[test]
    fn test_reason_required() {
        let span = DateSpan::new(d(1), d(2)).unwrap();
        let err = BlockedPeriod::new(1, span, "   ").unwrap_err();
        assert_eq!(err.field, "reason");
    }

    #[test]
    fn test_reason_trimmed() {
        let span = DateSpan::new(d(1), d(2)).unwrap();
        let period = BlockedPeriod::new(3, span, "  owner stay ").unwrap();
        assert_eq!(period.reason(), "owner stay");
        assert_eq!(period.to_string(), "#3 [2025-08-01, 2025-08-02] (owner stay)");
    }

    #[test]
    fn test_single_day_period() {
        let span = DateSpan::new(d(10), d(10)).unwrap();
        let period = BlockedPeriod::new(1, span, "inspection").unwrap();
        // start < stay.end && end > stay.start with start == end == 10th
        assert!(period.blocks(&StayRange::new(d(9), d(11)).unwrap()));
        assert!(!period.blocks(&StayRange::new(d(10), d(12)).unwrap()));
        assert!(!period.blocks(&StayRange::new(d(8), d(10)).unwrap()));
    }
}
