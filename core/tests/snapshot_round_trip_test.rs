//! Snapshot persistence across service restarts.

#![allow(clippy::expect_used, clippy::unwrap_used)] // Test code can use unwrap/expect

use std::fs;
use std::sync::{Arc, Barrier};
use std::thread;
use ticket_reservation_core::{Capacity, EventId, SnapshotFile, TicketError, TicketService};
use ticket_reservation_testing::{init_test_tracing, test_date, test_service};
use tempfile::TempDir;

#[test]
fn test_restart_preserves_partially_sold_events() {
    init_test_tracing();
    let dir = TempDir::new().unwrap();
    let snapshot = SnapshotFile::new(dir.path().join("events.json"));

    let service = test_service();
    let concert = service
        .create_event("Concert", test_date(), Capacity::new(100))
        .unwrap();
    let play = service
        .create_event("Play", test_date(), Capacity::new(30))
        .unwrap();
    service.book_tickets(concert.id(), 58).unwrap();
    service.book_tickets(play.id(), 30).unwrap();
    service.shutdown(&snapshot).unwrap();

    let restarted = TicketService::default();
    assert_eq!(restarted.initialize(&snapshot), 2);

    let concert_after = restarted.get_event(concert.id()).unwrap();
    assert_eq!(concert_after.name(), "Concert");
    assert_eq!(concert_after.date(), test_date());
    assert_eq!(concert_after.total_tickets(), 100);
    assert_eq!(concert_after.available_tickets(), 42);
    assert!(restarted.get_event(play.id()).unwrap().is_sold_out());

    // Counters keep working after the restart.
    let err = restarted.book_tickets(concert.id(), 43).unwrap_err();
    assert!(matches!(err, TicketError::InsufficientCapacity { available: 42, .. }));
    assert_eq!(restarted.book_tickets(concert.id(), 42).unwrap().len(), 42);
}

#[test]
fn test_first_run_without_snapshot() {
    let dir = TempDir::new().unwrap();
    let snapshot = SnapshotFile::new(dir.path().join("database").join("events.json"));

    let service = test_service();
    assert_eq!(service.initialize(&snapshot), 0);
    assert!(service.list_events().is_empty());

    service
        .create_event("Opening Night", test_date(), Capacity::new(5))
        .unwrap();
    assert_eq!(service.save(&snapshot).unwrap(), 1);
    assert!(snapshot.path().exists());
}

#[test]
fn test_corrupt_snapshot_starts_empty() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(&path, b"{ not json").unwrap();
    let snapshot = SnapshotFile::new(&path);

    assert!(matches!(
        snapshot.load(),
        Err(TicketError::CorruptSnapshot { .. })
    ));

    let service = test_service();
    assert_eq!(service.initialize(&snapshot), 0);
    assert!(service.list_events().is_empty());
}

#[test]
fn test_available_above_total_is_corrupt() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        br#"{"events":[{"id":"a","name":"Bad","date":"2025-01-01T20:00:00Z","totalTickets":5,"availableTickets":9}]}"#,
    )
    .unwrap();

    let err = SnapshotFile::new(&path).load().unwrap_err();
    assert!(matches!(err, TicketError::CorruptSnapshot { .. }));
}

#[test]
fn test_snapshot_file_uses_camel_case_fields() {
    let dir = TempDir::new().unwrap();
    let snapshot = SnapshotFile::new(dir.path().join("events.json"));
    let service = test_service();
    let event = service
        .create_event("Gala", test_date(), Capacity::new(12))
        .unwrap();
    service.book_tickets(event.id(), 2).unwrap();
    service.save(&snapshot).unwrap();

    let raw: serde_json::Value =
        serde_json::from_slice(&fs::read(snapshot.path()).unwrap()).unwrap();
    let saved = &raw["events"][0];
    assert_eq!(saved["id"], "evt-000001");
    assert_eq!(saved["name"], "Gala");
    assert_eq!(saved["totalTickets"], 12);
    assert_eq!(saved["availableTickets"], 10);
}

#[test]
fn test_save_to_unwritable_location_fails() {
    let dir = TempDir::new().unwrap();
    let blocker = dir.path().join("not-a-dir");
    fs::write(&blocker, b"file").unwrap();
    let snapshot = SnapshotFile::new(blocker.join("events.json"));

    let service = test_service();
    let err = service.save(&snapshot).unwrap_err();
    assert!(matches!(err, TicketError::SnapshotWrite { .. }));
}

#[test]
fn test_pascal_case_snapshot_is_loaded_and_rewritten() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("events.json");
    fs::write(
        &path,
        br#"{"events":[{"ID":"a1","Name":"Concert","Date":"2025-01-01T20:00:00Z","TotalTickets":10,"AvailableTickets":4}]}"#,
    )
    .unwrap();
    let snapshot = SnapshotFile::new(&path);

    let service = test_service();
    assert_eq!(service.initialize(&snapshot), 1);
    let event = service.get_event(&EventId::from("a1")).unwrap();
    assert_eq!(event.name(), "Concert");
    assert_eq!(event.date(), test_date());
    assert_eq!(event.available_tickets(), 4);

    service.shutdown(&snapshot).unwrap();
    let raw: serde_json::Value = serde_json::from_slice(&fs::read(&path).unwrap()).unwrap();
    assert_eq!(raw["events"][0]["id"], "a1");
    assert_eq!(raw["events"][0]["availableTickets"], 4);
}

#[test]
fn test_concurrent_file_saves_do_not_collide() {
    let dir = TempDir::new().unwrap();
    let snapshot = Arc::new(SnapshotFile::new(dir.path().join("events.json")));
    let service = test_service();
    let event = service
        .create_event("Gala", test_date(), Capacity::new(8))
        .unwrap();
    let events = Arc::new(vec![event]);

    for _ in 0..50 {
        let barrier = Arc::new(Barrier::new(4));
        let handles: Vec<_> = (0..4)
            .map(|_| {
                let snapshot = Arc::clone(&snapshot);
                let events = Arc::clone(&events);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    snapshot.save(&events)
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap().unwrap();
        }
    }

    assert_eq!(snapshot.load().unwrap(), *events);
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
}
