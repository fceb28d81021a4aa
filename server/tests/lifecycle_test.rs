//! End-to-end lifecycle: load snapshot, serve, shut down, save.

#![allow(clippy::unwrap_used, clippy::expect_used)] // Test code can use unwrap/expect

use serde_json::{Value, json};
use std::sync::Arc;
use std::time::Duration;
use tempfile::TempDir;
use ticket_reservation_core::{Capacity, SnapshotFile};
use ticket_reservation_server::{Config, TicketServer};
use ticket_reservation_testing::{test_date, test_service};
use tokio::net::TcpListener;
use tokio::sync::oneshot;

fn config(dir: &TempDir, interval: Option<Duration>) -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        snapshot_path: dir.path().join("database").join("events.json"),
        snapshot_interval: interval,
        metrics_enabled: false,
        ..Config::default()
    }
}

#[tokio::test]
async fn test_requests_are_persisted_on_shutdown() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, None);
    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());

    let (stop, stopped) = oneshot::channel::<()>();
    let server = TicketServer::new(&config, None);
    let running = tokio::spawn(server.run(listener, async {
        let _ = stopped.await;
    }));

    let client = reqwest::Client::new();
    let event: Value = client
        .post(format!("{base}/events/create"))
        .json(&json!({"name": "Launch", "date": "2025-03-01T18:00:00Z", "totalTickets": "10"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    let tickets: Vec<String> = client
        .post(format!("{base}/events/book"))
        .json(&json!({"eventID": event["id"], "numTickets": "3"}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(tickets.len(), 3);

    stop.send(()).unwrap();
    running.await.unwrap().unwrap();

    let saved = SnapshotFile::new(&config.snapshot_path).load().unwrap();
    assert_eq!(saved.len(), 1);
    assert_eq!(saved[0].name(), "Launch");
    assert_eq!(saved[0].available_tickets(), 7);
}

#[tokio::test]
async fn test_existing_snapshot_is_served() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, None);

    let seed = test_service();
    let event = seed
        .create_event("Restored", test_date(), Capacity::new(4))
        .unwrap();
    seed.book_tickets(event.id(), 1).unwrap();
    seed.save(&SnapshotFile::new(&config.snapshot_path)).unwrap();

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let base = format!("http://{}", listener.local_addr().unwrap());
    let (stop, stopped) = oneshot::channel::<()>();
    let running = tokio::spawn(TicketServer::new(&config, None).run(listener, async {
        let _ = stopped.await;
    }));

    let listed: Value = reqwest::get(format!("{base}/events"))
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(listed[0]["id"], "evt-000001");
    assert_eq!(listed[0]["availableTickets"], 3);

    stop.send(()).unwrap();
    running.await.unwrap().unwrap();
}

#[tokio::test]
async fn test_autosave_writes_while_running() {
    let dir = TempDir::new().unwrap();
    let config = config(&dir, Some(Duration::from_millis(50)));
    let service = Arc::new(test_service());

    let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
    let (stop, stopped) = oneshot::channel::<()>();
    let server = TicketServer::with_service(&config, Arc::clone(&service), None);
    let running = tokio::spawn(server.run(listener, async {
        let _ = stopped.await;
    }));

    // The missing snapshot loads as empty, so create after start-up.
    tokio::time::sleep(Duration::from_millis(20)).await;
    service
        .create_event("Created later", test_date(), Capacity::new(2))
        .unwrap();

    let snapshot = SnapshotFile::new(&config.snapshot_path);
    let mut saved = Vec::new();
    for _ in 0..100 {
        tokio::time::sleep(Duration::from_millis(20)).await;
        saved = snapshot.load().unwrap();
        if !saved.is_empty() {
            break;
        }
    }
    assert!(
        saved.iter().any(|e| e.name() == "Created later"),
        "autosave should have written the event"
    );

    stop.send(()).unwrap();
    running.await.unwrap().unwrap();
}
