//! # Ticket Reservation Testing
//!
//! Testing utilities and helpers for the ticket reservation workspace.
//!
//! This crate provides:
//! - Deterministic implementations of the [`IdSource`] capability
//! - Fixture helpers for stores and services
//! - Property-based testing strategies
//! - A Given-When-Then harness for bookings
//!
//! ## Example
//!
//! ```
//! use ticket_reservation_testing::{test_date, test_service};
//! use ticket_reservation_core::Capacity;
//!
//! let service = test_service();
//! let event = service.create_event("Concert", test_date(), Capacity::new(2)).unwrap();
//! assert_eq!(event.id().as_str(), "evt-000001");
//! ```

use ticket_reservation_core::IdSource;


pub use booking_test::{BookingTest, assertions};

/// Mock implementations of the `IdSource` capability.
pub mod mocks {
    use super::IdSource;
    use std::sync::atomic::{AtomicU64, Ordering};
    use ticket_reservation_core::{Result, TicketError};

    /// Predictable ids: `prefix-000001`, `prefix-000002`, ...
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_reservation_testing::mocks::SequentialIdSource;
    /// use ticket_reservation_core::IdSource;
    ///
    /// let ids = SequentialIdSource::new("t");
    /// assert_eq!(ids.next_id().unwrap(), "t-000001");
    /// assert_eq!(ids.next_id().unwrap(), "t-000002");
    /// ```
    #[derive(Debug)]
    pub struct SequentialIdSource {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdSource {
        /// Create a source whose first id is `{prefix}-000001`
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }

        /// Number of ids handed out so far
        #[must_use]
        pub fn issued(&self) -> u64 {
            self.next.load(Ordering::SeqCst).saturating_sub(1)
        }
    }

    impl IdSource for SequentialIdSource {
        fn next_id(&self) -> Result<String> {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            Ok(format!("{}-{n:06}", self.prefix))
        }
    }

    /// Hands out a fixed number of ids, then fails with `AllocationFailure`.
    #[derive(Debug)]
    pub struct FailingIdSource {
        inner: SequentialIdSource,
        remaining: AtomicU64,
    }

    impl FailingIdSource {
        /// Succeed `budget` times, then fail forever
        #[must_use]
        pub fn after(budget: u64) -> Self {
            Self {
                inner: SequentialIdSource::new("id"),
                remaining: AtomicU64::new(budget),
            }
        }
    }

    impl IdSource for FailingIdSource {
        fn next_id(&self) -> Result<String> {
            self.remaining
                .fetch_update(Ordering::SeqCst, Ordering::SeqCst, |n| n.checked_sub(1))
                .map_err(|_| TicketError::AllocationFailure("id budget exhausted".to_string()))?;
            self.inner.next_id()
        }
    }

    /// Always returns the same id.
    ///
    /// Used to exercise duplicate-id handling in the store.
    #[derive(Debug, Clone)]
    pub struct ConstantIdSource(pub String);

    impl IdSource for ConstantIdSource {
        fn next_id(&self) -> Result<String> {
            Ok(self.0.clone())
        }
    }
}

/// Test helpers and fixtures.
pub mod helpers {
    use super::mocks::SequentialIdSource;
    use chrono::{DateTime, TimeZone, Utc};
    use std::sync::Arc;
    use ticket_reservation_core::{InventoryStore, TicketService};

    /// Fixed event date for deterministic tests (2025-01-01 20:00:00 UTC)
    #[must_use]
    pub fn test_date() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 1, 1, 20, 0, 0)
            .single()
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH)
    }

    /// Empty store whose event ids start at `evt-000001`
    #[must_use]
    pub fn test_store() -> InventoryStore {
        InventoryStore::new(Arc::new(SequentialIdSource::new("evt")))
    }

    /// Service over [`test_store`]
    #[must_use]
    pub fn test_service() -> TicketService {
        TicketService::new(test_store())
    }

    /// Route `tracing` output to the test harness. Safe to call repeatedly.
    pub fn init_test_tracing() {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| "warn".into()),
            )
            .with_test_writer()
            .try_init();
    }
}

/// Property-based testing strategies using proptest.
pub mod properties {
    use proptest::collection::vec;
    use proptest::prelude::*;

    /// Event capacities, including zero
    pub fn capacity() -> impl Strategy<Value = u32> {
        0_u32..=200
    }

    /// A sequence of positive booking quantities
    pub fn booking_requests() -> impl Strategy<Value = Vec<u32>> {
        vec(1_u32..=25, 0..40)
    }

    /// Event names as they might arrive from a client
    pub fn event_name() -> impl Strategy<Value = String> {
        "[A-Za-z][A-Za-z0-9 ]{0,30}"
    }
}

// Re-export commonly used items
pub use helpers::{init_test_tracing, test_date, test_service, test_store};
pub use mocks::{ConstantIdSource, FailingIdSource, SequentialIdSource};
