//! Tests for the deterministic id sources and fixtures

#![allow(clippy::unwrap_used)] // Tests can unwrap
#![allow(clippy::expect_used)] // Tests can expect

use std::sync::Arc;
use ticket_reservation_core::{Capacity, InventoryStore, TicketError};
use ticket_reservation_testing::{
    BookingTest, ConstantIdSource, FailingIdSource, assertions, test_date, test_service,
};

#[test]
fn test_service_fixture_uses_sequential_ids() {
    let service = test_service();

    let first = service
        .create_event("First", test_date(), Capacity::new(1))
        .unwrap();
    let second = service
        .create_event("Second", test_date(), Capacity::new(1))
        .unwrap();

    assert_eq!(first.id().as_str(), "evt-000001");
    assert_eq!(second.id().as_str(), "evt-000002");
}

#[test]
fn test_failing_id_source_surfaces_allocation_failure() {
    let store = InventoryStore::new(Arc::new(FailingIdSource::after(0)));

    let err = store
        .create_event("Unlucky", test_date(), Capacity::new(5))
        .unwrap_err();

    assert!(matches!(err, TicketError::AllocationFailure(_)));
    assert!(store.is_empty());
}

#[test]
fn test_constant_id_source_rejects_second_event() {
    let store = InventoryStore::new(Arc::new(ConstantIdSource("dup".to_string())));

    store
        .create_event("Original", test_date(), Capacity::new(5))
        .unwrap();
    let err = store
        .create_event("Clash", test_date(), Capacity::new(5))
        .unwrap_err();

    assert!(matches!(err, TicketError::AllocationFailure(_)));
    assert_eq!(store.len(), 1);
    assert_eq!(store.list_events()[0].name(), "Original");
}

#[test]
fn test_booking_harness_on_zero_capacity() {
    BookingTest::new()
        .given_capacity(0)
        .when_booking(1)
        .then_result(assertions::assert_insufficient_capacity)
        .then_event(|event| {
            assert!(event.is_sold_out());
            assert_eq!(event.total_tickets(), 0);
        })
        .run();
}
