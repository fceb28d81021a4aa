//! Record of which event each issued ticket belongs to.
//!
//! The store hands every successful booking to a [`TicketLedger`]. By default the
//! tokens are discarded once returned to the caller ([`DiscardLedger`]); plugging in
//! [`InMemoryTicketLedger`] keeps a `ticket -> event` index for the lifetime of the
//! process. Ledger contents are not written to the snapshot file.

use crate::event::{EventId, TicketId};
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Receives the tickets issued by each successful booking.
///
/// Called while the booked event's guard is held, so implementations must not call
/// back into the inventory store.
pub trait TicketLedger: Send + Sync {
    /// Record that `tickets` were sold for `event_id`.
    fn record(&self, event_id: &EventId, tickets: &[TicketId]);
}

/// Ledger that keeps nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct DiscardLedger;

impl TicketLedger for DiscardLedger {
    fn record(&self, _event_id: &EventId, _tickets: &[TicketId]) {}
}

/// Ledger that indexes every issued ticket in memory.
#[derive(Debug, Default)]
pub struct InMemoryTicketLedger {
    tickets: RwLock<HashMap<TicketId, EventId>>,
}

impl InMemoryTicketLedger {
    /// Create an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The event a ticket was issued for, if it was issued by this process.
    #[must_use]
    pub fn event_for(&self, ticket: &TicketId) -> Option<EventId> {
        self.tickets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(ticket)
            .cloned()
    }

    /// Number of tickets recorded for `event_id`.
    #[must_use]
    pub fn issued_for(&self, event_id: &EventId) -> usize {
        self.tickets
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .values()
            .filter(|id| *id == event_id)
            .count()
    }

    /// Total number of tickets recorded.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tickets.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    /// Whether no tickets have been recorded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl TicketLedger for InMemoryTicketLedger {
    fn record(&self, event_id: &EventId, tickets: &[TicketId]) {
        let mut index = self.tickets.write().unwrap_or_else(PoisonError::into_inner);
        for ticket in tickets {
            index.insert(ticket.clone(), event_id.clone());
        }
    }
}
