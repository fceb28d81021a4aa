//! Full-state snapshot persistence.
//!
//! The snapshot is a single JSON document:
//!
//! ```json
//! {
//!   "events": [
//!     {
//!       "id": "7c0e...",
//!       "name": "Summer Concert",
//!       "date": "2025-07-01T20:00:00Z",
//!       "totalTickets": 100,
//!       "availableTickets": 42
//!     }
//!   ]
//! }
//! ```
//!
//! Saves go through a uniquely named temp file in the destination directory which is
//! flushed to disk and then renamed over the destination, so a reader never sees a
//! half-written snapshot. Concurrent saves each use their own temp file.
//!
//! Field names written by older tooling (`ID`, `Name`, `Date`, `TotalTickets`,
//! `AvailableTickets`) are accepted on read. Saves always use camelCase.

use crate::error::{Result, TicketError};
use crate::event::Event;
use crate::store::check_records;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// On-disk layout.
#[derive(Debug, Serialize, Deserialize)]
struct SnapshotDocument {
    /// `null` is accepted on read and treated as no events.
    #[serde(default)]
    events: Option<Vec<Event>>,
}

/// A snapshot file location with load and save operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SnapshotFile {
    path: PathBuf,
}

impl SnapshotFile {
    /// Create a handle for the snapshot at `path`. Nothing is read or written yet.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Snapshot location
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read every event from the snapshot.
    ///
    /// A missing or unreadable file yields an empty list and a warning, so a fresh
    /// deployment starts with an empty store.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::CorruptSnapshot`] if the file is not valid snapshot
    /// JSON, an event has more available than total tickets, or an id appears twice.
    pub fn load(&self) -> Result<Vec<Event>> {
        let data = match fs::read(&self.path) {
            Ok(data) => data,
            Err(error) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %error,
                    "Snapshot not readable, starting with no events"
                );
                return Ok(Vec::new());
            }
        };

        let document: SnapshotDocument =
            serde_json::from_slice(&data).map_err(|e| self.corrupt(e.to_string()))?;
        let events = document.events.unwrap_or_default();

        check_records(&events).map_err(|e| self.corrupt(e.to_string()))?;

        tracing::debug!(path = %self.path.display(), events = events.len(), "Snapshot loaded");
        Ok(events)
    }

    /// Write `events` as the new snapshot, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::SnapshotWrite`] if the directory, temp file, or rename
    /// cannot be completed. The previous snapshot is left in place and the temp file
    /// is removed in that case.
    pub fn save(&self, events: &[Event]) -> Result<()> {
        let document = SnapshotDocument {
            events: Some(events.to_vec()),
        };
        let data = serde_json::to_vec_pretty(&document)
            .map_err(|e| self.write_error(io::Error::other(e)))?;

        let dir = match self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            Some(parent) => {
                fs::create_dir_all(parent).map_err(|e| self.write_error(e))?;
                parent
            }
            None => Path::new("."),
        };

        let mut temp = NamedTempFile::new_in(dir).map_err(|e| self.write_error(e))?;
        temp.write_all(&data)
            .and_then(|()| temp.as_file().sync_all())
            .map_err(|e| self.write_error(e))?;
        temp.persist(&self.path).map_err(|e| self.write_error(e.error))?;

        tracing::debug!(path = %self.path.display(), events = events.len(), "Snapshot saved");
        Ok(())
    }

    fn corrupt(&self, reason: String) -> TicketError {
        TicketError::CorruptSnapshot {
            path: self.path.clone(),
            reason,
        }
    }

    fn write_error(&self, source: io::Error) -> TicketError {
        TicketError::SnapshotWrite {
            path: self.path.clone(),
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use crate::event::EventId;
    use chrono::{TimeZone, Utc};
    use tempfile::TempDir;

    fn event(id: &str, total: u32, available: u32) -> Event {
        Event::restore(
            EventId::from(id),
            format!("Event {id}"),
            Utc.with_ymd_and_hms(2025, 3, 14, 18, 30, 0).unwrap(),
            total,
            available,
        )
        .unwrap()
    }

    #[test]
    fn test_save_creates_parent_directory() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("database").join("events.json"));

        file.save(&[event("a", 10, 4)]).unwrap();

        assert!(file.path().exists());
        assert_eq!(file.load().unwrap(), vec![event("a", 10, 4)]);
    }

    #[test]
    fn test_no_tmp_file_left_after_save() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("events.json"));

        file.save(&[event("a", 1, 1)]).unwrap();
        file.save(&[]).unwrap();

        let names: Vec<String> = fs::read_dir(dir.path())
            .unwrap()
            .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["events.json".to_string()]);
    }

    #[test]
    fn test_null_events_reads_as_empty() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("events.json");
        fs::write(&path, br#"{"events":null}"#).unwrap();

        assert!(SnapshotFile::new(path).load().unwrap().is_empty());
    }

    #[test]
    fn test_duplicate_ids_are_corrupt() {
        let dir = TempDir::new().unwrap();
        let file = SnapshotFile::new(dir.path().join("events.json"));
        file.save(&[event("a", 5, 5), event("a", 3, 1)]).unwrap();

        let err = file.load().unwrap_err();
        assert!(matches!(err, TicketError::CorruptSnapshot { .. }));
    }
}
