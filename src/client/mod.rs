//! HTTP client for the roster API, plus the local view it feeds.
//!
//! ```rust,no_run
//! use astronaut_roster::client::{ApiClient, RosterView};
//!
//! # async fn run() -> Result<(), astronaut_roster::Error> {
//! let api = ApiClient::new("http://localhost:3001");
//! let mut view = RosterView::new(5);
//! view.apply_page(api.page(1).await?);
//! println!("{view}");
//! # Ok(())
//! # }
//! ```

mod view;

pub use view::{Followup, RosterView};

use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::debug;

use crate::api::Envelope;
use crate::astronaut::{Astronaut, AstronautFields};
use crate::error::Error;
use crate::store::Page;

/// Talks JSON to a running roster server.
#[derive(Clone, Debug)]
pub struct ApiClient {
    http: reqwest::Client,
    base: String,
}

impl ApiClient {
    /// `base_url` is the server root, e.g. `http://localhost:3001`.
    pub fn new(base_url: impl Into<String>) -> Self {
        let base = base_url.into().trim_end_matches('/').to_owned();
        Self { http: reqwest::Client::new(), base }
    }

    pub fn base_url(&self) -> &str {
        &self.base
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Fetches page `page` (1-indexed).
    pub async fn page(&self, page: u32) -> Result<Page, Error> {
        let response = self.http.get(self.url(&format!("/astronauts/{page}"))).send().await?;
        decode(response).await
    }

    pub async fn create(&self, fields: &AstronautFields) -> Result<Astronaut, Error> {
        let response = self.http.post(self.url("/astronauts")).json(fields).send().await?;
        record(decode(response).await?)
    }

    pub async fn update(&self, id: u64, fields: &AstronautFields) -> Result<Astronaut, Error> {
        let response = self.http.put(self.url(&format!("/astronauts/{id}"))).json(fields).send().await?;
        record(decode(response).await?)
    }

    /// Deletes `id` and returns the server's confirmation message.
    pub async fn delete(&self, id: u64) -> Result<String, Error> {
        let response = self.http.delete(self.url(&format!("/astronauts/{id}"))).send().await?;
        let envelope: Envelope<Value> = decode(response).await?;
        Ok(envelope.message)
    }

    /// Asks the server to add its example astronauts. Returns its message.
    pub async fn seed(&self) -> Result<String, Error> {
        let response = self.http.post(self.url("/astronauts/example")).send().await?;
        let envelope: Envelope<Value> = decode(response).await?;
        Ok(envelope.message)
    }
}

/// Decodes a success body as `T`, or turns a failure into [`Error::Api`]
/// carrying the envelope's message.
async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T, Error> {
    let status = response.status();
    if status.is_success() {
        return Ok(response.json().await?);
    }
    let message = match response.json::<Envelope<Value>>().await {
        Ok(envelope) => envelope.message,
        Err(e) => {
            debug!("error response without envelope: {e}");
            status.canonical_reason().unwrap_or_default().to_owned()
        }
    };
    Err(Error::Api { status: status.as_u16(), message })
}

fn record(envelope: Envelope<Astronaut>) -> Result<Astronaut, Error> {
    envelope.data.ok_or(Error::Api { status: 200, message: envelope.message })
}

