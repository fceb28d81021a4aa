//! Business metrics for ticket sales.
//!
//! Recorded through the `metrics` facade; nothing is exported unless the binary
//! installs a recorder.
//!
//! # Exported Metrics
//!
//! ## Counters
//! - `ticketing_events_created_total` - Total events created
//! - `ticketing_tickets_sold_total` - Total tickets sold
//! - `ticketing_bookings_total{status}` - Booking attempts by outcome
//! - `ticketing_snapshots_saved_total` - Successful snapshot writes
//!
//! ## Gauges
//! - `ticketing_tickets_available{event_id}` - Remaining tickets per event
//! - `ticketing_events` - Events currently held

use metrics::{describe_counter, describe_gauge};

/// Register descriptions for every business metric.
///
/// Call once at startup, after the recorder is installed.
pub fn register_business_metrics() {
    describe_counter!(
        "ticketing_events_created_total",
        "Total number of events created"
    );
    describe_counter!(
        "ticketing_tickets_sold_total",
        "Total number of tickets sold"
    );
    describe_counter!(
        "ticketing_bookings_total",
        "Booking attempts by status (succeeded, not_found, insufficient_capacity, ...)"
    );
    describe_counter!(
        "ticketing_snapshots_saved_total",
        "Total number of snapshot files written"
    );
    describe_gauge!(
        "ticketing_tickets_available",
        "Current number of available tickets per event"
    );
    describe_gauge!("ticketing_events", "Number of events in the inventory");

    tracing::info!("Business metrics registered");
}

/// Record an event created.
pub fn record_event_created(total_tickets: u32) {
    metrics::counter!("ticketing_events_created_total").increment(1);
    metrics::gauge!("ticketing_events").increment(1.0);
    tracing::debug!(total_tickets, "Recorded event_created metric");
}

/// Record a successful booking.
pub fn record_booking_succeeded(quantity: u32) {
    metrics::counter!("ticketing_bookings_total", "status" => "succeeded").increment(1);
    metrics::counter!("ticketing_tickets_sold_total").increment(u64::from(quantity));
}

/// Record a rejected booking.
///
/// # Arguments
///
/// * `reason` - Error kind, e.g. `insufficient_capacity`
pub fn record_booking_rejected(reason: &'static str) {
    metrics::counter!("ticketing_bookings_total", "status" => reason).increment(1);
}

/// Update the available tickets gauge for an event.
pub fn update_tickets_available(event_id: &str, available: u32) {
    metrics::gauge!("ticketing_tickets_available", "event_id" => event_id.to_owned())
        .set(f64::from(available));
}

/// Reset the event count gauge after a restore.
#[allow(clippy::cast_precision_loss)] // Event counts stay far below 2^52
pub fn set_event_count(count: usize) {
    metrics::gauge!("ticketing_events").set(count as f64);
}

/// Record a snapshot written to disk.
pub fn record_snapshot_saved(events: usize) {
    metrics::counter!("ticketing_snapshots_saved_total").increment(1);
    tracing::debug!(events, "Recorded snapshot_saved metric");
}
