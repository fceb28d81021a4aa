//! HTTP request handlers.

pub mod events;
pub mod health;
pub mod metrics;

pub use events::{book_tickets, create_event, get_event, list_events};
pub use health::health_check;
