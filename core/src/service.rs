//! Service facade consumed by transport adapters.
//!
//! [`TicketService`] wires an [`InventoryStore`] to a [`SnapshotFile`] and adds
//! logging and business metrics around each operation. Its only lock serializes
//! saves, and it never retries a failed booking.

use crate::environment::{IdSource, UuidIdSource};
use crate::error::{Result, TicketError};
use crate::event::{Capacity, Event, EventId, TicketId};
use crate::metrics;
use crate::snapshot::SnapshotFile;
use crate::store::InventoryStore;
use chrono::{DateTime, Utc};
use std::sync::{Arc, Mutex, PoisonError};

/// Ticket operations plus snapshot lifecycle.
#[derive(Debug)]
pub struct TicketService {
    store: InventoryStore,
    /// Held across snapshot and write so a save never replaces a newer cut.
    save_lock: Mutex<()>,
}

impl Default for TicketService {
    fn default() -> Self {
        Self::new(InventoryStore::new(Arc::new(UuidIdSource)))
    }
}

impl TicketService {
    /// Wrap an explicitly constructed store.
    #[must_use]
    pub const fn new(store: InventoryStore) -> Self {
        Self {
            store,
            save_lock: Mutex::new(()),
        }
    }

    /// Service over an empty store using the given id source.
    #[must_use]
    pub fn with_id_source(ids: Arc<dyn IdSource>) -> Self {
        Self::new(InventoryStore::new(ids))
    }

    /// The underlying store
    #[must_use]
    pub const fn store(&self) -> &InventoryStore {
        &self.store
    }

    /// Populate the store from a snapshot.
    ///
    /// A corrupt snapshot is logged and the store starts empty. Returns the number
    /// of events loaded.
    pub fn initialize(&self, snapshot: &SnapshotFile) -> usize {
        let events = match snapshot.load() {
            Ok(events) => events,
            Err(error) => {
                tracing::warn!(
                    path = %snapshot.path().display(),
                    error = %error,
                    "Ignoring unusable snapshot, starting with no events"
                );
                Vec::new()
            }
        };

        let loaded = match self.store.restore(events) {
            Ok(loaded) => loaded,
            Err(error) => {
                tracing::warn!(error = %error, "Snapshot records rejected, starting with no events");
                self.store.restore(Vec::new()).unwrap_or_default()
            }
        };
        for event in self.store.list_events() {
            metrics::update_tickets_available(event.id().as_str(), event.available_tickets());
        }
        metrics::set_event_count(loaded);

        tracing::info!(path = %snapshot.path().display(), events = loaded, "Ticket service initialized");
        loaded
    }

    /// Create a new event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::AllocationFailure`] if no id can be generated.
    pub fn create_event(
        &self,
        name: impl Into<String>,
        date: DateTime<Utc>,
        capacity: Capacity,
    ) -> Result<Event> {
        let event = self.store.create_event(name, date, capacity).inspect_err(|error| {
            tracing::error!(error = %error, "Failed to create event");
        })?;

        metrics::record_event_created(event.total_tickets());
        tracing::info!(
            event_id = %event.id(),
            name = event.name(),
            total_tickets = event.total_tickets(),
            "New event created"
        );
        Ok(event)
    }

    /// Every event, as point-in-time copies.
    #[must_use]
    pub fn list_events(&self) -> Vec<Event> {
        let events = self.store.list_events();
        tracing::debug!(count = events.len(), "Listed events");
        events
    }

    /// A single event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotFound`] if the event does not exist.
    pub fn get_event(&self, event_id: &EventId) -> Result<Event> {
        self.store.get_event(event_id)
    }

    /// Sell `quantity` tickets for an event.
    ///
    /// # Errors
    ///
    /// Same as [`InventoryStore::book_tickets`]. Failures are final; the caller
    /// decides whether to try again.
    pub fn book_tickets(&self, event_id: &EventId, quantity: u32) -> Result<Vec<TicketId>> {
        match self.store.book_tickets(event_id, quantity) {
            Ok(booking) => {
                metrics::record_booking_succeeded(quantity);
                tracing::info!(
                    event_id = %event_id,
                    quantity,
                    remaining = booking.remaining,
                    "Tickets booked"
                );
                Ok(booking.tickets)
            }
            Err(error) => {
                metrics::record_booking_rejected(error.kind());
                if error.is_client_error() {
                    tracing::debug!(event_id = %event_id, quantity, error = %error, "Booking rejected");
                } else {
                    tracing::error!(event_id = %event_id, quantity, error = %error, "Booking failed");
                }
                Err(error)
            }
        }
    }

    /// Write the current state to `snapshot`. Returns the number of events saved.
    ///
    /// Concurrent saves run one at a time, so the file always ends on the latest cut.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::SnapshotWrite`] if the file cannot be written.
    pub fn save(&self, snapshot: &SnapshotFile) -> Result<usize> {
        let _guard = self.save_lock.lock().unwrap_or_else(PoisonError::into_inner);
        let events = self.store.snapshot();
        snapshot.save(&events)?;
        metrics::record_snapshot_saved(events.len());
        tracing::info!(path = %snapshot.path().display(), events = events.len(), "Ticket service saved");
        Ok(events.len())
    }

    /// Final save before the process exits.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::SnapshotWrite`] if the file cannot be written.
    pub fn shutdown(&self, snapshot: &SnapshotFile) -> Result<()> {
        self.save(snapshot).map(|_| ()).inspect_err(|error: &TicketError| {
            tracing::error!(error = %error, "Failed to save snapshot on shutdown");
        })
    }
}
