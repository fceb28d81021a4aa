//! The event entity: the unit of ticket inventory.
//!
//! An [`Event`] has an immutable identity (id, name, date, total capacity) and a
//! single mutable counter, `available_tickets`. The counter only ever decreases and
//! is only changed through [`Event::reserve`], which the inventory store calls
//! while holding that event's guard.
//!
//! # Invariant
//!
//! ```text
//! 0 <= available_tickets <= total_tickets
//! ```
//!
//! Holds after construction, after every reservation, and is re-checked for every
//! record read back from a snapshot.

use crate::error::{Result, TicketError};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

// ============================================================================
// Identifiers
// ============================================================================

/// Opaque unique identifier for an event.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EventId(String);

impl EventId {
    /// Wrap an existing identifier string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for EventId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        Self(id.to_owned())
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Opaque unique token representing one sold ticket.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TicketId(String);

impl TicketId {
    /// Wrap an existing token string.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Borrow the token as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<String> for TicketId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

// ============================================================================
// Value Objects
// ============================================================================

/// Largest capacity accepted for a new event.
pub const MAX_EVENT_CAPACITY: u32 = 1_000_000;

/// Largest number of tickets a single booking may request.
///
/// Every ticket in a booking gets its own id, generated while the event is locked.
pub const MAX_TICKETS_PER_BOOKING: u32 = 10_000;

/// Total ticket capacity of an event.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Capacity(u32);

impl Capacity {
    /// Creates a new `Capacity`
    #[must_use]
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Get the inner value
    #[must_use]
    pub const fn value(&self) -> u32 {
        self.0
    }
}

/// Wire values arrive as signed integers; anything outside
/// `0..=MAX_EVENT_CAPACITY` is rejected here.
impl TryFrom<i64> for Capacity {
    type Error = TicketError;

    fn try_from(value: i64) -> Result<Self> {
        u32::try_from(value)
            .ok()
            .filter(|v| *v <= MAX_EVENT_CAPACITY)
            .map(Self)
            .ok_or_else(|| {
                TicketError::InvalidArgument(format!(
                    "total tickets must be between 0 and {MAX_EVENT_CAPACITY}, got {value}"
                ))
            })
    }
}

impl fmt::Display for Capacity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Entity
// ============================================================================

/// A ticketed occurrence with fixed capacity and a remaining-capacity counter.
///
/// Serializes as `{id, name, date, totalTickets, availableTickets}` with `date` as an
/// RFC 3339 timestamp. This is both the HTTP encoding and the snapshot record.
/// The PascalCase names of older snapshot files are accepted on read.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(alias = "ID")]
    id: EventId,
    #[serde(alias = "Name")]
    name: String,
    #[serde(alias = "Date")]
    date: DateTime<Utc>,
    #[serde(alias = "TotalTickets")]
    total_tickets: u32,
    #[serde(alias = "AvailableTickets")]
    available_tickets: u32,
}

impl Event {
    /// Create a fresh event with every ticket still available.
    #[must_use]
    pub fn new(id: EventId, name: impl Into<String>, date: DateTime<Utc>, capacity: Capacity) -> Self {
        Self {
            id,
            name: name.into(),
            date,
            total_tickets: capacity.value(),
            available_tickets: capacity.value(),
        }
    }

    /// Rebuild an event with a partially consumed counter.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InvalidArgument`] if `available_tickets` exceeds
    /// `total_tickets`.
    pub fn restore(
        id: EventId,
        name: impl Into<String>,
        date: DateTime<Utc>,
        total_tickets: u32,
        available_tickets: u32,
    ) -> Result<Self> {
        let event = Self {
            id,
            name: name.into(),
            date,
            total_tickets,
            available_tickets,
        };
        event.validate()?;
        Ok(event)
    }

    /// Event identifier
    #[must_use]
    pub const fn id(&self) -> &EventId {
        &self.id
    }

    /// Display name
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// When the event takes place
    #[must_use]
    pub const fn date(&self) -> DateTime<Utc> {
        self.date
    }

    /// Capacity fixed at creation
    #[must_use]
    pub const fn total_tickets(&self) -> u32 {
        self.total_tickets
    }

    /// Tickets not yet sold
    #[must_use]
    pub const fn available_tickets(&self) -> u32 {
        self.available_tickets
    }

    /// Tickets sold so far
    #[must_use]
    pub const fn sold_tickets(&self) -> u32 {
        self.total_tickets.saturating_sub(self.available_tickets)
    }

    /// Whether every ticket has been sold
    #[must_use]
    pub const fn is_sold_out(&self) -> bool {
        self.available_tickets == 0
    }

    /// Check the capacity invariant.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InvalidArgument`] describing the violation.
    pub fn validate(&self) -> Result<()> {
        if self.available_tickets > self.total_tickets {
            return Err(TicketError::InvalidArgument(format!(
                "event {} has {} available tickets but only {} in total",
                self.id, self.available_tickets, self.total_tickets
            )));
        }
        Ok(())
    }

    /// Fail unless `quantity` tickets are currently available.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InsufficientCapacity`] if fewer remain.
    pub fn ensure_available(&self, quantity: u32) -> Result<()> {
        if self.available_tickets < quantity {
            return Err(self.insufficient(quantity));
        }
        Ok(())
    }

    /// Decrement the counter by `quantity`.
    ///
    /// Either the whole quantity is taken or nothing changes.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::InsufficientCapacity`] if fewer than `quantity`
    /// tickets remain.
    pub(crate) fn reserve(&mut self, quantity: u32) -> Result<()> {
        let remaining = self
            .available_tickets
            .checked_sub(quantity)
            .ok_or_else(|| self.insufficient(quantity))?;
        self.available_tickets = remaining;
        Ok(())
    }

    fn insufficient(&self, requested: u32) -> TicketError {
        TicketError::InsufficientCapacity {
            event_id: self.id.clone(),
            requested,
            available: self.available_tickets,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn concert(capacity: u32) -> Event {
        Event::new(
            EventId::from("concert"),
            "Summer Concert",
            Utc.with_ymd_and_hms(2025, 7, 1, 20, 0, 0).unwrap(),
            Capacity::new(capacity),
        )
    }

    #[test]
    fn test_new_event_is_fully_available() {
        let event = concert(10);
        assert_eq!(event.total_tickets(), 10);
        assert_eq!(event.available_tickets(), 10);
        assert_eq!(event.sold_tickets(), 0);
        assert!(!event.is_sold_out());
    }

    #[test]
    fn test_reserve_is_all_or_nothing() {
        let mut event = concert(10);
        event.reserve(6).unwrap();
        assert_eq!(event.available_tickets(), 4);

        let err = event.reserve(5).unwrap_err();
        assert!(matches!(
            err,
            TicketError::InsufficientCapacity { requested: 5, available: 4, .. }
        ));
        assert_eq!(event.available_tickets(), 4);

        event.reserve(4).unwrap();
        assert!(event.is_sold_out());
        assert_eq!(event.sold_tickets(), 10);
    }

    #[test]
    fn test_zero_capacity_event() {
        let event = concert(0);
        assert!(event.is_sold_out());
        assert!(event.ensure_available(1).is_err());
        assert!(event.ensure_available(0).is_ok());
    }

    #[test]
    fn test_restore_rejects_available_above_total() {
        let date = Utc.with_ymd_and_hms(2025, 1, 1, 0, 0, 0).unwrap();
        assert!(Event::restore(EventId::from("a"), "A", date, 5, 3).is_ok());
        let err = Event::restore(EventId::from("b"), "B", date, 5, 6).unwrap_err();
        assert!(matches!(err, TicketError::InvalidArgument(_)));
    }

    #[test]
    fn test_capacity_from_signed_wire_value() {
        assert_eq!(Capacity::try_from(0_i64).unwrap(), Capacity::new(0));
        assert_eq!(Capacity::try_from(100_i64).unwrap().value(), 100);
        assert!(matches!(
            Capacity::try_from(-1_i64),
            Err(TicketError::InvalidArgument(_))
        ));
        assert!(Capacity::try_from(i64::from(u32::MAX) + 1).is_err());
        assert!(Capacity::try_from(i64::from(MAX_EVENT_CAPACITY)).is_ok());
        assert!(Capacity::try_from(i64::from(MAX_EVENT_CAPACITY) + 1).is_err());
        assert!(Capacity::try_from(i64::from(u32::MAX)).is_err());
    }

    #[test]
    fn test_pascal_case_record_is_accepted() {
        let json = r#"{"ID":"a1","Name":"Concert","Date":"2025-01-01T20:00:00Z","TotalTickets":10,"AvailableTickets":4}"#;
        let event: Event = serde_json::from_str(json).unwrap();
        assert_eq!(event.id().as_str(), "a1");
        assert_eq!(event.name(), "Concert");
        assert_eq!(event.total_tickets(), 10);
        assert_eq!(event.available_tickets(), 4);

        let written = serde_json::to_value(&event).unwrap();
        assert_eq!(written["totalTickets"], 10);
        assert!(written.get("TotalTickets").is_none());
    }

    #[test]
    fn test_json_field_names() {
        let mut event = concert(10);
        event.reserve(3).unwrap();
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["id"], "concert");
        assert_eq!(json["name"], "Summer Concert");
        assert_eq!(json["date"], "2025-07-01T20:00:00Z");
        assert_eq!(json["totalTickets"], 10);
        assert_eq!(json["availableTickets"], 7);
    }
}
