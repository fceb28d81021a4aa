//! Event and booking endpoints.
//!
//! - `GET  /events` - every event, ordered by date
//! - `GET  /events/:id` - one event
//! - `POST /events/create` - create an event
//! - `POST /events/book` - book tickets, returns the ticket ids

use crate::error::AppError;
use crate::extractors::CorrelationId;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ticket_reservation_core::{Capacity, Event, EventId, TicketId};

// ============================================================================
// Request Types
// ============================================================================

/// A ticket count as sent by clients: a JSON number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TicketCount {
    /// `5`
    Number(i64),
    /// `"5"`
    Text(String),
}

impl TicketCount {
    /// Integer value, rejecting non-numeric text.
    ///
    /// # Errors
    ///
    /// Returns a 400 error naming `field` if the text is not an integer.
    pub fn parse(&self, field: &str) -> Result<i64, AppError> {
        match self {
            Self::Number(n) => Ok(*n),
            Self::Text(text) => text
                .trim()
                .parse()
                .map_err(|_| AppError::bad_request(format!("Failed to parse {field}"))),
        }
    }
}

/// Request to create a new event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateEventRequest {
    /// Display name
    pub name: String,
    /// RFC 3339 timestamp
    pub date: String,
    /// Capacity
    pub total_tickets: TicketCount,
}

/// Request to book tickets.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookTicketsRequest {
    /// Event to book against
    #[serde(rename = "eventID", alias = "eventId")]
    pub event_id: String,
    /// Tickets wanted
    #[serde(rename = "numTickets")]
    pub num_tickets: TicketCount,
}

// ============================================================================
// Handlers
// ============================================================================

/// List every event.
///
/// # Example
///
/// ```bash
/// curl http://localhost:8080/events
/// ```
#[allow(clippy::unused_async)]
pub async fn list_events(State(state): State<AppState>) -> Json<Vec<Event>> {
    Json(state.service.list_events())
}

/// Get one event by id.
///
/// # Errors
///
/// 404 if the event does not exist.
#[allow(clippy::unused_async)]
pub async fn get_event(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Event>, AppError> {
    let event = state.service.get_event(&EventId::new(id))?;
    Ok(Json(event))
}

/// Create a new event.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events/create \
///   -H "Content-Type: application/json" \
///   -d '{"name": "Summer Concert", "date": "2025-07-01T20:00:00Z", "totalTickets": "100"}'
/// ```
///
/// # Errors
///
/// 400 for a malformed body, date or ticket count; 500 if no id can be generated.
#[allow(clippy::unused_async)]
pub async fn create_event(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    payload: Result<Json<CreateEventRequest>, JsonRejection>,
) -> Result<Json<Event>, AppError> {
    let Json(request) = payload?;

    let date = DateTime::parse_from_rfc3339(request.date.trim())
        .map_err(|_| AppError::bad_request("Failed to parse date"))?
        .with_timezone(&Utc);
    let capacity = Capacity::try_from(request.total_tickets.parse("totalTickets")?)?;

    let event = state.service.create_event(request.name, date, capacity)?;

    tracing::debug!(
        correlation_id = %correlation_id,
        event_id = %event.id(),
        "Create request served"
    );
    Ok(Json(event))
}

/// Book tickets for an event.
///
/// # Example
///
/// ```bash
/// curl -X POST http://localhost:8080/events/book \
///   -H "Content-Type: application/json" \
///   -d '{"eventID": "7c0e...", "numTickets": 2}'
/// ```
///
/// # Errors
///
/// - 400 for a malformed body or a ticket count below one
/// - 404 if the event does not exist
/// - 409 if not enough tickets remain
#[allow(clippy::unused_async)]
pub async fn book_tickets(
    State(state): State<AppState>,
    correlation_id: CorrelationId,
    payload: Result<Json<BookTicketsRequest>, JsonRejection>,
) -> Result<Json<Vec<TicketId>>, AppError> {
    let Json(request) = payload?;

    let requested = request.num_tickets.parse("numTickets")?;
    let quantity = u32::try_from(requested)
        .map_err(|_| AppError::bad_request(format!("Invalid number of tickets: {requested}")))?;
    let event_id = EventId::new(request.event_id);

    let tickets = state.service.book_tickets(&event_id, quantity)?;

    tracing::debug!(
        correlation_id = %correlation_id,
        event_id = %event_id,
        quantity,
        "Booking request served"
    );
    Ok(Json(tickets))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)] // Test code
mod tests {
    use super::*;

    #[test]
    fn test_ticket_count_accepts_number_and_text() {
        let number: TicketCount = serde_json::from_str("7").unwrap();
        let text: TicketCount = serde_json::from_str("\" 7 \"").unwrap();

        assert_eq!(number.parse("n").unwrap(), 7);
        assert_eq!(text.parse("n").unwrap(), 7);
        assert!(TicketCount::Text("seven".into()).parse("n").is_err());
    }

    #[test]
    fn test_book_request_accepts_both_id_spellings() {
        let upper: BookTicketsRequest =
            serde_json::from_str(r#"{"eventID": "a", "numTickets": "1"}"#).unwrap();
        let camel: BookTicketsRequest =
            serde_json::from_str(r#"{"eventId": "a", "numTickets": 1}"#).unwrap();

        assert_eq!(upper.event_id, "a");
        assert_eq!(camel.event_id, "a");
    }
}
