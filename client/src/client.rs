//! Typed HTTP client for the ticket server.

use crate::error::{ClientError, Result};
use chrono::{DateTime, SecondsFormat, Utc};
use reqwest::{Response, Url};
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;
use std::time::Duration;
use ticket_reservation_core::{Event, EventId, TicketId};

/// Per-request timeout.
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Error body returned by the server on non-2xx responses.
#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    code: String,
    message: String,
}

/// Client for the ticket server's JSON API.
///
/// # Example
///
/// ```no_run
/// use ticket_reservation_client::TicketClient;
///
/// # async fn run() -> Result<(), ticket_reservation_client::ClientError> {
/// let client = TicketClient::new("http://localhost:8080")?;
/// for event in client.list_events().await? {
///     println!("{}: {} left", event.name(), event.available_tickets());
/// }
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct TicketClient {
    http: reqwest::Client,
    base_url: Url,
}

impl TicketClient {
    /// Client for the server at `base_url`, e.g. `http://localhost:8080`.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidUrl`] if `base_url` is not an absolute http(s) URL
    /// - [`ClientError::Http`] if the HTTP client cannot be built
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        let raw = base_url.into();
        let parsed = Url::parse(&raw).map_err(|e| ClientError::InvalidUrl {
            url: raw.clone(),
            reason: e.to_string(),
        })?;
        if parsed.cannot_be_a_base() {
            return Err(ClientError::InvalidUrl {
                url: raw,
                reason: "not a base URL".to_string(),
            });
        }

        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            base_url: parsed,
        })
    }

    /// Server base URL
    #[must_use]
    pub fn base_url(&self) -> &str {
        self.base_url.as_str()
    }

    /// `GET /events`
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx responses.
    pub async fn list_events(&self) -> Result<Vec<Event>> {
        let response = self.http.get(self.url(&["events"])?).send().await?;
        decode(response).await
    }

    /// `GET /events/:id`
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx responses (404 for an unknown id).
    pub async fn get_event(&self, event_id: &EventId) -> Result<Event> {
        let response = self
            .http
            .get(self.url(&["events", event_id.as_str()])?)
            .send()
            .await?;
        decode(response).await
    }

    /// `POST /events/create`
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx responses.
    pub async fn create_event(
        &self,
        name: &str,
        date: DateTime<Utc>,
        total_tickets: u32,
    ) -> Result<Event> {
        let body = json!({
            "name": name,
            "date": date.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            "totalTickets": total_tickets,
        });
        let response = self
            .http
            .post(self.url(&["events", "create"])?)
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// `POST /events/book`
    ///
    /// # Errors
    ///
    /// Transport failures and non-2xx responses (409 when sold out).
    pub async fn book_tickets(&self, event_id: &EventId, tickets: u32) -> Result<Vec<TicketId>> {
        let body = json!({
            "eventID": event_id,
            "numTickets": tickets,
        });
        let response = self
            .http
            .post(self.url(&["events", "book"])?)
            .json(&body)
            .send()
            .await?;
        decode(response).await
    }

    /// Base URL with `segments` appended, each percent-encoded as one path segment.
    fn url(&self, segments: &[&str]) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|()| ClientError::InvalidUrl {
                url: self.base_url.to_string(),
                reason: "not a base URL".to_string(),
            })?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }

    let text = response.text().await?;
    let (code, message) = match serde_json::from_str::<ApiErrorBody>(&text) {
        Ok(body) => (body.code, body.message),
        Err(_) => (format!("HTTP_{}", status.as_u16()), text),
    };
    tracing::debug!(status = status.as_u16(), code = %code, "Server rejected request");

    Err(ClientError::Api {
        status: status.as_u16(),
        code,
        message,
    })
}
