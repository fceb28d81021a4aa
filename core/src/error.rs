//! Error types for inventory and snapshot operations.

use crate::event::EventId;
use std::path::PathBuf;
use thiserror::Error;

/// Errors returned by the inventory store, snapshot I/O, and service facade.
///
/// `NotFound`, `InsufficientCapacity` and `InvalidArgument` are caused by the
/// caller's input and are always returned as values. The remaining variants are
/// server-side failures.
#[derive(Error, Debug)]
pub enum TicketError {
    /// No event exists with the given id.
    #[error("Event with id {0} not found")]
    NotFound(EventId),

    /// The event does not have enough remaining tickets for the request.
    #[error("Not enough tickets available for event {event_id}: requested {requested}, available {available}")]
    InsufficientCapacity {
        /// Event that was booked against
        event_id: EventId,
        /// Tickets asked for
        requested: u32,
        /// Tickets remaining at the moment of the check
        available: u32,
    },

    /// A ticket count or capacity was out of range.
    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    /// The persisted snapshot could not be parsed or violates an event invariant.
    #[error("Corrupt snapshot at {path}: {reason}")]
    CorruptSnapshot {
        /// Snapshot file location
        path: PathBuf,
        /// What was wrong with it
        reason: String,
    },

    /// An identifier could not be generated.
    #[error("Identifier allocation failed: {0}")]
    AllocationFailure(String),

    /// Writing the snapshot file failed.
    #[error("Failed to write snapshot to {path}: {source}")]
    SnapshotWrite {
        /// Snapshot file location
        path: PathBuf,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

impl TicketError {
    /// Whether the error was caused by the caller's input rather than the server.
    #[must_use]
    pub const fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::InsufficientCapacity { .. } | Self::InvalidArgument(_)
        )
    }

    /// Short machine-readable label, used for metric labels and error codes.
    #[must_use]
    pub const fn kind(&self) -> &'static str {
        match self {
            Self::NotFound(_) => "not_found",
            Self::InsufficientCapacity { .. } => "insufficient_capacity",
            Self::InvalidArgument(_) => "invalid_argument",
            Self::CorruptSnapshot { .. } => "corrupt_snapshot",
            Self::AllocationFailure(_) => "allocation_failure",
            Self::SnapshotWrite { .. } => "snapshot_write",
        }
    }
}

/// Result alias for core operations.
pub type Result<T> = std::result::Result<T, TicketError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_error_classification() {
        assert!(TicketError::NotFound(EventId::from("e-1")).is_client_error());
        assert!(TicketError::InvalidArgument("zero".into()).is_client_error());
        assert!(!TicketError::AllocationFailure("exhausted".into()).is_client_error());
        assert!(
            !TicketError::CorruptSnapshot {
                path: PathBuf::from("events.json"),
                reason: "bad json".into(),
            }
            .is_client_error()
        );
    }

    #[test]
    fn test_insufficient_capacity_display() {
        let err = TicketError::InsufficientCapacity {
            event_id: EventId::from("concert"),
            requested: 5,
            available: 4,
        };
        assert_eq!(
            err.to_string(),
            "Not enough tickets available for event concert: requested 5, available 4"
        );
        assert_eq!(err.kind(), "insufficient_capacity");
    }
}
