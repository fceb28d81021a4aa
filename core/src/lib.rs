//! # Ticket Reservation Core
//!
//! Inventory store and booking protocol for ticketed events.
//!
//! The crate holds a catalogue of events, sells tickets against each event's finite
//! capacity, and snapshots the whole catalogue to a JSON file between runs. It is
//! transport-agnostic: HTTP and CLI adapters live in other crates and call into
//! [`TicketService`].
//!
//! ## Components
//!
//! ```text
//! ┌──────────────────────────────────────────────┐
//! │               TicketService                  │  ← logging, metrics
//! │  create_event / list_events / book_tickets   │
//! │  initialize / save / shutdown                │
//! ├───────────────────────┬──────────────────────┤
//! │    InventoryStore     │     SnapshotFile     │
//! │  RwLock<map>          │  load: JSON → events │
//! │   └ Mutex<Event> each │  save: tmp + rename  │
//! ├───────────────────────┴──────────────────────┤
//! │   IdSource (event + ticket ids)  TicketLedger│
//! └──────────────────────────────────────────────┘
//! ```
//!
//! ## Guarantees
//!
//! - **No oversell**: the sum of successful bookings for an event never exceeds its
//!   capacity, however many callers book concurrently.
//! - **Atomic bookings**: a booking either returns exactly N tickets and takes N from
//!   the counter, or fails and takes nothing.
//! - **Visibility**: once `create_event` returns, every caller sees the event.
//!
//! ## Example
//!
//! ```
//! use chrono::Utc;
//! use ticket_reservation_core::{Capacity, TicketError, TicketService};
//!
//! let service = TicketService::default();
//! let event = service.create_event("Concert", Utc::now(), Capacity::new(10))?;
//!
//! let tickets = service.book_tickets(event.id(), 6)?;
//! assert_eq!(tickets.len(), 6);
//!
//! let err = service.book_tickets(event.id(), 5).unwrap_err();
//! assert!(matches!(err, TicketError::InsufficientCapacity { available: 4, .. }));
//! # Ok::<(), TicketError>(())
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod environment;
pub mod error;
pub mod event;
pub mod ledger;
pub mod metrics;
pub mod snapshot;
pub mod service;
pub mod store;

pub use environment::{IdSource, UuidIdSource};
pub use error::{Result, TicketError};
pub use event::{
    Capacity, Event, EventId, MAX_EVENT_CAPACITY, MAX_TICKETS_PER_BOOKING, TicketId,
};
pub use ledger::{DiscardLedger, InMemoryTicketLedger, TicketLedger};
pub use service::TicketService;
pub use snapshot::SnapshotFile;
pub use store::{Booking, InventoryStore};
