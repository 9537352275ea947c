//! Domain events emitted after committed lifecycle transitions.
//!
//! Sinks are collaborators (notifications, audit trail, cleaning schedules).
//! Delivery is best-effort: the lifecycle logs a failed emission and moves
//! on, the booking itself is already committed.

use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};

use chrono::{DateTime, Utc};
use log::info;
use serde::Serialize;

use crate::error::Result;
use crate::reservation::{Reservation, ReservationStatus};
use crate::stay::StayRange;

/// Something that happened to a reservation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ReservationEvent {
    /// A reservation was booked.
    Created {
        /// Snapshot after the change.
        reservation: Reservation,
    },
    /// Dates, terms or status changed.
    Modified {
        /// Snapshot after the change.
        reservation: Reservation,
        /// Status before the change.
        old_status: ReservationStatus,
        /// Stay before the change, when the dates moved.
        previous_stay: Option<StayRange>,
    },
    /// The reservation was cancelled.
    Cancelled {
        /// Snapshot after the change.
        reservation: Reservation,
        /// Status before the change.
        old_status: ReservationStatus,
    },
    /// The guest did not show up (or left early).
    NoShow {
        /// Snapshot after the change.
        reservation: Reservation,
        /// Status before the change.
        old_status: ReservationStatus,
        /// Nights returned to inventory.
        released_nights: u32,
    },
    /// The guest checked out.
    CheckedOut {
        /// Snapshot after the change.
        reservation: Reservation,
        /// Status before the change.
        old_status: ReservationStatus,
    },
}

impl ReservationEvent {
    /// Short event name, as serialized.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::Created { .. } => "created",
            Self::Modified { .. } => "modified",
            Self::Cancelled { .. } => "cancelled",
            Self::NoShow { .. } => "no_show",
            Self::CheckedOut { .. } => "checked_out",
        }
    }

    /// The reservation snapshot carried by the event.
    #[must_use]
    pub const fn reservation(&self) -> &Reservation {
        match self {
            Self::Created { reservation }
            | Self::Modified { reservation, .. }
            | Self::Cancelled { reservation, .. }
            | Self::NoShow { reservation, .. }
            | Self::CheckedOut { reservation, .. } => reservation,
        }
    }
}

/// Receives lifecycle events.
pub trait EventSink {
    /// Delivers one event.
    ///
    /// # Errors
    ///
    /// Returns an error if delivery failed. The caller logs it; the
    /// reservation change is not undone.
    fn emit(&self, event: &ReservationEvent) -> Result<()>;
}

/// Discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl EventSink for NullSink {
    fn emit(&self, _event: &ReservationEvent) -> Result<()> {
        Ok(())
    }
}

/// Reports events through the `log` facade at info level.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl EventSink for LogSink {
    fn emit(&self, event: &ReservationEvent) -> Result<()> {
        let reservation = event.reservation();
        info!(
            "{} {} {} ({})",
            event.kind(),
            reservation.code(),
            reservation.stay(),
            reservation.status()
        );
        Ok(())
    }
}

#[derive(Serialize)]
struct AuditRecord<'a> {
    at: DateTime<Utc>,
    #[serde(flatten)]
    event: &'a ReservationEvent,
}

/// Appends each event as one JSON object per line.
///
/// # Examples
///
/// ```no_run
/// use haven::events::JsonLinesSink;
///
/// let sink = JsonLinesSink::new("/var/log/haven/events.jsonl");
/// ```
#[derive(Debug, Clone)]
pub struct JsonLinesSink {
    path: PathBuf,
}

impl JsonLinesSink {
    /// Creates a sink appending to `path` (created on first event).
    #[must_use]
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// The file events are appended to.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl EventSink for JsonLinesSink {
    fn emit(&self, event: &ReservationEvent) -> Result<()> {
        let record = AuditRecord {
            at: Utc::now(),
            event,
        };
        let mut line = serde_json::to_string(&record).map_err(std::io::Error::from)?;
        line.push('\n');

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        file.write_all(line.as_bytes())?;
        Ok(())
    }
}

/// Keeps events in memory. Clones share the same buffer.
///
/// # Examples
///
/// ```
/// use haven::events::{EventSink, MemorySink};
///
/// let sink = MemorySink::new();
/// let handle = sink.clone();
/// assert!(handle.events().is_empty());
/// ```
#[derive(Debug, Default, Clone)]
pub struct MemorySink {
    events: Arc<Mutex<Vec<ReservationEvent>>>,
}

impl MemorySink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A copy of every event received so far.
    #[must_use]
    pub fn events(&self) -> Vec<ReservationEvent> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// The kinds of the received events, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<&'static str> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .iter()
            .map(ReservationEvent::kind)
            .collect()
    }
}

impl EventSink for MemorySink {
    fn emit(&self, event: &ReservationEvent) -> Result<()> {
        self.events
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(event.clone());
        Ok(())
    }
}

/// Forwards each event to several sinks, stopping at the first failure.
#[derive(Default)]
pub struct FanoutSink {
    sinks: Vec<Box<dyn EventSink>>,
}

impl FanoutSink {
    /// Creates an empty fan-out.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a sink.
    #[must_use]
    pub fn with(mut self, sink: impl EventSink + 'static) -> Self {
        self.sinks.push(Box::new(sink));
        self
    }
}

impl EventSink for FanoutSink {
    fn emit(&self, event: &ReservationEvent) -> Result<()> {
        for sink in &self.sinks {
            sink.emit(event)?;
        }
        Ok(())
    }
}
