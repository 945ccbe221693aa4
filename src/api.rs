//! The roster REST API.
//!
//! | Verb | Path | Answer |
//! |---|---|---|
//! | `GET` | `/astronauts`, `/astronauts/{page}` | a [`Page`] |
//! | `POST` | `/astronauts` | `{ message, data: Astronaut }` |
//! | `POST` | `/astronauts/example` | `{ message }` after seeding the examples |
//! | `PUT` | `/astronauts/{id}` | `{ message, data: Astronaut }` |
//! | `DELETE` | `/astronauts/{id}` | `{ message }` |
//! | `GET` | `/healthz`, `/readyz` | liveness / readiness probes |
//!
//! Successes are `200`. Failures are `400` or `404` with an [`Envelope`]
//! whose `message` is meant for display. The server answers `413` for a
//! body past its limit before any handler runs.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, info};

use crate::astronaut::{Astronaut, AstronautFields};
use crate::health;
use crate::request::Request;
use crate::response::{IntoResponse, Response};
use crate::router::Router;
use crate::seed;
use crate::status::Status;
use crate::store::{Page, Roster, StoreError};
use crate::validation::{ValidationError, validate};

/// Response body for mutations and errors.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Envelope<T> {
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> Envelope<T> {
    pub fn message(message: impl Into<String>) -> Self {
        Self { message: message.into(), data: None }
    }

    pub fn with_data(message: impl Into<String>, data: T) -> Self {
        Self { message: message.into(), data: Some(data) }
    }
}

/// Builds the router for the whole API over `roster`.
pub fn routes(roster: Arc<Roster>) -> Router<Roster> {
    Router::with_shared(roster)
        .get("/astronauts", list)
        .get("/astronauts/{page}", list)
        .post("/astronauts", create)
        .post("/astronauts/example", seed_examples)
        .put("/astronauts/{id}", update)
        .delete("/astronauts/{id}", remove)
        .get("/healthz", health::liveness)
        .get("/readyz", health::readiness)
}

// ── Errors ────────────────────────────────────────────────────────────────────

#[derive(Debug, thiserror::Error)]
enum ApiError {
    #[error("{0}")]
    PageNotFound(StoreError),
    #[error("{0}")]
    InvalidFields(ValidationError),
    #[error("malformed body: {0}")]
    MalformedBody(serde_json::Error),
    #[error("id is not an integer")]
    InvalidId,
    #[error("astronaut {0} not found")]
    NotFound(i64),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            ApiError::PageNotFound(_) => (Status::BadRequest, "This Page Does Not Exist".to_owned()),
            ApiError::InvalidFields(_) => (Status::BadRequest, "Some Fields Are Incorrect".to_owned()),
            ApiError::MalformedBody(_) => (Status::BadRequest, "Request Body Is Not Valid JSON".to_owned()),
            ApiError::InvalidId => (Status::BadRequest, "ID must be an integer.".to_owned()),
            ApiError::NotFound(id) => (Status::NotFound, format!("Astronaut with ID {id} not found.")),
        };
        debug!("request rejected: {self}");
        Response::builder()
            .status(status)
            .json(&Envelope::<()>::message(message))
    }
}

// ── Handlers ──────────────────────────────────────────────────────────────────

async fn list(roster: Arc<Roster>, req: Request) -> Result<Response, ApiError> {
    // Anything that does not start with a number means the first page.
    let requested = req.param("page").and_then(leading_int);
    let page: Page = roster.page(requested).map_err(ApiError::PageNotFound)?;
    Ok(Response::json(&page))
}

async fn create(roster: Arc<Roster>, req: Request) -> Result<Response, ApiError> {
    let fields = fields_from(&req)?;
    let astronaut = roster.create(fields);
    info!(id = astronaut.id, "astronaut created");
    Ok(Response::json(&Envelope::with_data("Astronaut Created", astronaut)))
}

async fn seed_examples(roster: Arc<Roster>, _req: Request) -> Response {
    let added = roster.seed(seed::examples()).len();
    info!(added, total = roster.len(), "example astronauts added");
    Response::json(&Envelope::<()>::message(format!("Added {added} Astronauts.")))
}

async fn update(roster: Arc<Roster>, req: Request) -> Result<Response, ApiError> {
    let id = existing_id(&roster, &req)?;
    let fields = fields_from(&req)?;
    let astronaut: Astronaut = roster
        .update(id, fields)
        .map_err(|_| ApiError::NotFound(id as i64))?;
    info!(id, "astronaut updated");
    Ok(Response::json(&Envelope::with_data("Astronaut Updated.", astronaut)))
}

async fn remove(roster: Arc<Roster>, req: Request) -> Result<Response, ApiError> {
    let id = existing_id(&roster, &req)?;
    roster.delete(id).map_err(|_| ApiError::NotFound(id as i64))?;
    info!(id, "astronaut deleted");
    Ok(Response::json(&Envelope::<()>::message("Astronaut Deleted.")))
}

// ── Extraction ────────────────────────────────────────────────────────────────

/// Parses the `{id}` path parameter and checks the roster holds it.
fn existing_id(roster: &Roster, req: &Request) -> Result<u64, ApiError> {
    let raw = req.param("id").and_then(leading_int).ok_or(ApiError::InvalidId)?;
    match u64::try_from(raw) {
        Ok(id) if roster.contains(id) => Ok(id),
        _ => Err(ApiError::NotFound(raw)),
    }
}

/// Decodes and validates the request body. An empty body counts as `{}`.
fn fields_from(req: &Request) -> Result<AstronautFields, ApiError> {
    let body: Value = if req.body().iter().all(u8::is_ascii_whitespace) {
        Value::Object(Default::default())
    } else {
        req.json().map_err(ApiError::MalformedBody)?
    };
    validate(&body).map_err(ApiError::InvalidFields)
}

/// Reads the integer at the start of `s`: optional whitespace, an optional
/// sign, then digits. `"12abc"` is 12. No digits, or a value past `i64`,
/// yields `None`.
fn leading_int(s: &str) -> Option<i64> {
    let s = s.trim_start();
    let sign_len = usize::from(s.starts_with(['+', '-']));
    let digits = s[sign_len..].bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 {
        return None;
    }
    s[..sign_len + digits].parse().ok()
}
