//! Injected capabilities.
//!
//! The store never generates identifiers itself; it asks an [`IdSource`]. Production
//! code uses [`UuidIdSource`], tests inject deterministic sources from the testing
//! crate.
//!
//! ```ignore
//! // Production - random UUIDs
//! let store = InventoryStore::new(Arc::new(UuidIdSource));
//!
//! // Test - predictable ids
//! let store = InventoryStore::new(Arc::new(SequentialIdSource::new("evt")));
//! ```

use crate::error::Result;
use uuid::Uuid;

/// Produces globally-unique opaque string tokens.
///
/// Used for both event ids and ticket ids. Implementations must be safe to call
/// from many threads at once and must never hand out the same token twice.
pub trait IdSource: Send + Sync {
    /// Produce the next unique token.
    ///
    /// # Errors
    ///
    /// Returns [`TicketError::AllocationFailure`](crate::TicketError::AllocationFailure)
    /// if no identifier can be produced.
    fn next_id(&self) -> Result<String>;
}

/// Random UUID v4 identifiers.
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidIdSource;

impl IdSource for UuidIdSource {
    fn next_id(&self) -> Result<String> {
        Ok(Uuid::new_v4().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    #[allow(clippy::unwrap_used)] // Test code
    fn test_uuid_ids_are_unique() {
        let source = UuidIdSource;
        let ids: HashSet<String> = (0..1000).map(|_| source.next_id().unwrap()).collect();
        assert_eq!(ids.len(), 1000);
    }
}
