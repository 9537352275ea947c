//! Date range types for stays and blocked periods.
//!
//! Stays use the hospitality convention of a half-open range: the guest
//! occupies the nights from `check_in` up to but not including `check_out`,
//! so one party's check-out day can be the next party's check-in day.

use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::reservation::ValidationError;

#[cfg(test)]
mod proptests;

/// A half-open night range `[check_in, check_out)`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use haven::StayRange;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 6, day).unwrap();
/// let stay = StayRange::new(d(1), d(5)).unwrap();
/// assert_eq!(stay.nights(), 4);
///
/// // Back-to-back stays do not overlap
/// let next = StayRange::new(d(5), d(8)).unwrap();
/// assert!(!stay.overlaps(&next));
///
/// // Zero-length stays are rejected
/// assert!(StayRange::new(d(5), d(5)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct StayRange {
    check_in: NaiveDate,
    check_out: NaiveDate,
}

impl StayRange {
    /// Creates a stay range.
    ///
    /// # Errors
    ///
    /// Returns an error unless `check_out` is strictly after `check_in`.
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Result<Self, ValidationError> {
        if check_out <= check_in {
            return Err(ValidationError {
                field: "check_out".into(),
                message: format!("check-out {check_out} must be after check-in {check_in}"),
            });
        }
        Ok(Self {
            check_in,
            check_out,
        })
    }

    /// The first night of the stay.
    #[must_use]
    pub const fn check_in(&self) -> NaiveDate {
        self.check_in
    }

    /// The departure day (not itself occupied).
    #[must_use]
    pub const fn check_out(&self) -> NaiveDate {
        self.check_out
    }

    /// Number of nights in the stay. Always at least 1.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn nights(&self) -> u32 {
        (self.check_out - self.check_in).num_days() as u32
    }

    /// Half-open overlap test: `self.start < other.end && self.end > other.start`.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        self.check_in < other.check_out && self.check_out > other.check_in
    }

    /// Returns true if `date` is a night of this stay.
    #[must_use]
    pub fn contains_night(&self, date: NaiveDate) -> bool {
        self.check_in <= date && date < self.check_out
    }

    /// Truncates the stay so it ends at `until`.
    ///
    /// Returns `None` when nothing remains (`until <= check_in`).
    #[must_use]
    pub fn truncated(&self, until: NaiveDate) -> Option<Self> {
        let end = until.min(self.check_out);
        Self::new(self.check_in, end).ok()
    }
}

impl fmt::Display for StayRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.check_in, self.check_out)
    }
}

/// An inclusive administrator date span `[start, end]`.
///
/// # Examples
///
/// ```
/// use chrono::NaiveDate;
/// use haven::DateSpan;
///
/// let d = |day| NaiveDate::from_ymd_opt(2025, 8, day).unwrap();
/// let span = DateSpan::new(d(10), d(10)).unwrap();
/// assert_eq!(span.days(), 1);
/// assert!(DateSpan::new(d(11), d(10)).is_err());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateSpan {
    start: NaiveDate,
    end: NaiveDate,
}

impl DateSpan {
    /// Creates an inclusive span.
    ///
    /// # Errors
    ///
    /// Returns an error if `end` is before `start`.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Result<Self, ValidationError> {
        if end < start {
            return Err(ValidationError {
                field: "end".into(),
                message: format!("end {end} must not be before start {start}"),
            });
        }
        Ok(Self { start, end })
    }

    /// First day of the span.
    #[must_use]
    pub const fn start(&self) -> NaiveDate {
        self.start
    }

    /// Last day of the span (inclusive).
    #[must_use]
    pub const fn end(&self) -> NaiveDate {
        self.end
    }

    /// Number of calendar days covered, counting both ends.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn days(&self) -> u32 {
        (self.end - self.start).num_days() as u32 + 1
    }

    /// Nights a blocked period over this span closes: those from `start`
    /// up to but not including `end`.
    #[must_use]
    #[allow(clippy::cast_sign_loss)]
    pub fn closed_nights(&self) -> u32 {
        (self.end - self.start).num_days() as u32
    }

    /// Blocked-period test against a stay: `start < stay.end && end > stay.start`.
    ///
    /// A span whose last day equals the stay's check-in day does not block it.
    #[must_use]
    pub fn blocks(&self, stay: &StayRange) -> bool {
        self.start < stay.check_out() && self.end > stay.check_in()
    }
}

impl fmt::Display for DateSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, month, day).unwrap()
    }

    #[test]
    fn test_stay_rejects_inverted_and_empty() {
        assert!(StayRange::new(d(6, 5), d(6, 1)).is_err());
        let err = StayRange::new(d(6, 5), d(6, 5)).unwrap_err();
        assert_eq!(err.field, "check_out");
    }

    #[test]
    fn test_back_to_back_stays_do_not_overlap() {
        let existing = StayRange::new(d(6, 1), d(6, 5)).unwrap();
        let next = StayRange::new(d(6, 5), d(6, 8)).unwrap();
        assert!(!existing.overlaps(&next));
        assert!(!next.overlaps(&existing));
    }

    #[test]
    fn test_one_night_overlap() {
        let existing = StayRange::new(d(6, 1), d(6, 5)).unwrap();
        let request = StayRange::new(d(6, 4), d(6, 8)).unwrap();
        assert!(existing.overlaps(&request));
    }

    #[test]
    fn test_contained_stay_overlaps() {
        let outer = StayRange::new(d(7, 1), d(7, 10)).unwrap();
        let inner = StayRange::new(d(7, 3), d(7, 4)).unwrap();
        assert!(outer.overlaps(&inner));
        assert!(inner.overlaps(&outer));
    }

    #[test]
    fn test_nights_across_month_boundary() {
        let stay = StayRange::new(d(6, 28), d(7, 3)).unwrap();
        assert_eq!(stay.nights(), 5);
        assert!(stay.contains_night(d(6, 30)));
        assert!(!stay.contains_night(d(7, 3)));
    }

    #[test]
    fn test_truncated() {
        let stay = StayRange::new(d(7, 1), d(7, 10)).unwrap();
        assert_eq!(
            stay.truncated(d(7, 4)),
            Some(StayRange::new(d(7, 1), d(7, 4)).unwrap())
        );
        assert_eq!(stay.truncated(d(7, 1)), None);
        assert_eq!(stay.truncated(d(7, 20)), Some(stay));
    }

    #[test]
    fn test_span_blocks_uses_strict_bounds() {
        let span = DateSpan::new(d(8, 10), d(8, 12)).unwrap();
        assert!(span.blocks(&StayRange::new(d(8, 11), d(8, 14)).unwrap()));
        assert!(span.blocks(&StayRange::new(d(8, 8), d(8, 11)).unwrap()));
        // Stay leaving on the span's first day is unaffected
        assert!(!span.blocks(&StayRange::new(d(8, 7), d(8, 10)).unwrap()));
        // Stay arriving on the span's last day is unaffected
        assert!(!span.blocks(&StayRange::new(d(8, 12), d(8, 15)).unwrap()));
        assert_eq!(span.closed_nights(), 2);
    }

    #[test]
    fn test_single_day_span_closes_no_night() {
        let span = DateSpan::new(d(8, 10), d(8, 10)).unwrap();
        assert_eq!(span.days(), 1);
        assert_eq!(span.closed_nights(), 0);
        assert!(!span.blocks(&StayRange::new(d(8, 10), d(8, 11)).unwrap()));
    }

    #[test]
    fn test_display() {
        let stay = StayRange::new(d(6, 1), d(6, 5)).unwrap();
        assert_eq!(stay.to_string(), "[2025-06-01, 2025-06-05)");
        let span = DateSpan::new(d(6, 1), d(6, 5)).unwrap();
        assert_eq!(span.to_string(), "[2025-06-01, 2025-06-05]");
    }
}
