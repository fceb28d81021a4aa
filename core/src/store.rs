//! Concurrent inventory store.
//!
//! Owns every [`Event`] and implements the booking protocol. This is the only place
//! in the system where an event's remaining-ticket counter changes.
//!
//! # Locking
//!
//! Two tiers, always acquired in this order:
//!
//! ```text
//! structural RwLock  (map shape: insert, iterate, replace)
//!        │
//!        ▼
//! per-event Mutex    (one event's counter: check + decrement)
//! ```
//!
//! | Operation       | Structural | Per-event          |
//! |-----------------|------------|--------------------|
//! | `create_event`  | write      | -                  |
//! | `list_events`   | read       | each, briefly      |
//! | `get_event`     | read       | one, briefly       |
//! | `book_tickets`  | read       | one, for the check |
//! | `restore`       | write      | -                  |
//! | `snapshot`      | write      | each, briefly      |
//!
//! Bookings against different events share the structural lock in read mode and
//! never wait on each other. Bookings against the same event serialize on that
//! event's mutex, so the capacity check and the decrement are one atomic step.
//! Nothing acquires the structural lock while holding a per-event lock.
//!
//! Lock poisoning is recovered rather than propagated: a counter is only written
//! after every fallible step of a booking has succeeded.

use crate::environment::IdSource;
use crate::error::{Result, TicketError};
use crate::event::{
    Capacity, Event, EventId, MAX_EVENT_CAPACITY, MAX_TICKETS_PER_BOOKING, TicketId,
};
use crate::ledger::{DiscardLedger, TicketLedger};
use crate::metrics;
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};
use std::collections::hash_map::Entry;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};

type EventMap = HashMap<EventId, Mutex<Event>>;

/// Result of a successful booking.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Booking {
    /// One fresh token per ticket sold
    pub tickets: Vec<TicketId>,
    /// Tickets left on the event right after this booking
    pub remaining: u32,
}

/// Thread-safe mapping of event id to event, with atomic booking.
pub struct InventoryStore {
    events: RwLock<EventMap>,
    ids: Arc<dyn IdSource>,
    ledger: Arc<dyn TicketLedger>,
}

impl InventoryStore {
    /// Create an empty store that discards issued ticket ids after returning them.
    #[must_use]
    pub fn new(ids: Arc<dyn IdSource>) -> Self {
        Self::with_ledger(ids, Arc::new(DiscardLedger))
    }

    /// Create an empty store that reports every booking to `ledger`.
    #[must_use]
    pub fn with_ledger(ids: Arc<dyn IdSource>, ledger: Arc<dyn TicketLedger>) -> Self {
        Self {
            events: RwLock::new(HashMap::new()),
            ids,
            ledger,
        }
    }

    /// Create an event with all of its tickets available.
    ///
    /// The event is visible to every later `list_events`, `get_event` and
    /// `book_tickets` call on any thread once this returns.
    ///
    /// # Errors
    ///
    /// - [`TicketError::InvalidArgument`] if `capacity` exceeds [`MAX_EVENT_CAPACITY`]
    /// - [`TicketError::AllocationFailure`] if the id source fails or hands out an
    ///   id that is already in use
    pub fn create_event(
        &self,
        name: impl Into<String>,
        date: DateTime<Utc>,
        capacity: Capacity,
    ) -> Result<Event> {
        if capacity.value() > MAX_EVENT_CAPACITY {
            return Err(TicketError::InvalidArgument(format!(
                "total tickets must be at most {MAX_EVENT_CAPACITY}, got {capacity}"
            )));
        }

        let id = EventId::from(self.ids.next_id()?);
        let event = Event::new(id.clone(), name, date, capacity);

        match self.write_events().entry(id) {
            Entry::Occupied(entry) => Err(TicketError::AllocationFailure(format!(
                "id source returned duplicate event id {}",
                entry.key()
            ))),
            Entry::Vacant(entry) => {
                metrics::update_tickets_available(event.id().as_str(), event.available_tickets());
                entry.insert(Mutex::new(event.clone()));
                Ok(event)
            }
        }
    }

    /// Point-in-time copies of every event, ordered by date then id.
    ///
    /// Each record is read under its own guard and is internally consistent.
    /// Available counts may already be stale when the caller looks at them.
    #[must_use]
    pub fn list_events(&self) -> Vec<Event> {
        let events = self.read_events();
        let mut listed: Vec<Event> = events.values().map(|slot| lock_event(slot).clone()).collect();
        drop(events);
        listed.sort_by(|a, b| a.date().cmp(&b.date()).then_with(|| a.id().cmp(b.id())));
        listed
    }

    /// Copy of a single event.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::NotFound`] if no event has this id.
    pub fn get_event(&self, event_id: &EventId) -> Result<Event> {
        let events = self.read_events();
        let slot = events
            .get(event_id)
            .ok_or_else(|| TicketError::NotFound(event_id.clone()))?;
        let event = lock_event(slot).clone();
        Ok(event)
    }

    /// Atomically sell `quantity` tickets for an event.
    ///
    /// On success exactly `quantity` fresh ticket ids are returned and the event's
    /// available count drops by `quantity`. On any error the count is unchanged.
    /// The `ticketing_tickets_available` gauge is updated before the event is
    /// unlocked, so it always ends on the latest count.
    ///
    /// # Errors
    ///
    /// - [`TicketError::InvalidArgument`] if `quantity` is zero or exceeds
    ///   [`MAX_TICKETS_PER_BOOKING`]
    /// - [`TicketError::NotFound`] if the event does not exist
    /// - [`TicketError::InsufficientCapacity`] if fewer than `quantity` remain
    /// - [`TicketError::AllocationFailure`] if ticket ids cannot be generated
    pub fn book_tickets(&self, event_id: &EventId, quantity: u32) -> Result<Booking> {
        if quantity == 0 {
            return Err(TicketError::InvalidArgument(
                "number of tickets must be greater than zero".to_string(),
            ));
        }
        if quantity > MAX_TICKETS_PER_BOOKING {
            return Err(TicketError::InvalidArgument(format!(
                "at most {MAX_TICKETS_PER_BOOKING} tickets can be booked at once, got {quantity}"
            )));
        }

        let events = self.read_events();
        let slot = events
            .get(event_id)
            .ok_or_else(|| TicketError::NotFound(event_id.clone()))?;

        let mut event = lock_event(slot);
        event.ensure_available(quantity)?;

        // Ids are generated before the decrement so a failing source leaves the
        // counter untouched.
        let tickets = (0..quantity)
            .map(|_| self.ids.next_id().map(TicketId::from))
            .collect::<Result<Vec<_>>>()?;

        event.reserve(quantity)?;
        self.ledger.record(event_id, &tickets);
        let remaining = event.available_tickets();
        metrics::update_tickets_available(event_id.as_str(), remaining);

        Ok(Booking { tickets, remaining })
    }

    /// Replace the whole contents of the store.
    ///
    /// Returns the number of events now held.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InvalidArgument`] if an event has more available than
    /// total tickets or an id appears twice. The store is unchanged in that case.
    pub fn restore(&self, events: Vec<Event>) -> Result<usize> {
        check_records(&events)?;
        let restored: EventMap = events
            .into_iter()
            .map(|event| (event.id().clone(), Mutex::new(event)))
            .collect();
        let mut current = self.write_events();
        *current = restored;
        Ok(current.len())
    }

    /// A consistent copy of every event for persistence.
    ///
    /// Holds the structural lock exclusively while copying, so no create or
    /// booking is in flight and the copy is a single cut of the store.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Event> {
        let events = self.write_events();
        let mut copied: Vec<Event> = events.values().map(|slot| lock_event(slot).clone()).collect();
        drop(events);
        copied.sort_by(|a, b| a.id().cmp(b.id()));
        copied
    }

    /// Number of events held
    #[must_use]
    pub fn len(&self) -> usize {
        self.read_events().len()
    }

    /// Whether the store holds no events
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read_events(&self) -> RwLockReadGuard<'_, EventMap> {
        self.events.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write_events(&self) -> RwLockWriteGuard<'_, EventMap> {
        self.events.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl std::fmt::Debug for InventoryStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InventoryStore")
            .field("events", &self.len())
            .finish_non_exhaustive()
    }
}

fn lock_event(slot: &Mutex<Event>) -> MutexGuard<'_, Event> {
    slot.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Every record satisfies the capacity invariant and no id repeats.
pub(crate) fn check_records(events: &[Event]) -> Result<()> {
    let mut seen = HashSet::with_capacity(events.len());
    for event in events {
        event.validate()?;
        if !seen.insert(event.id()) {
            return Err(TicketError::InvalidArgument(format!(
                "duplicate event id {}",
                event.id()
            )));
        }
    }
    Ok(())
}
