//! # astronaut-roster
//!
//! An in-memory astronaut roster behind a paginated JSON REST API, and a
//! terminal client for it.
//!
//! ## The contract
//!
//! The roster is a process-lifetime ordered list plus an ID counter. There
//! is no persistence and no authentication. Run it behind a proxy if either
//! matters.
//!
//! - **Store**: [`Roster`] pages, creates, updates, deletes and seeds records
//! - **Validation**: [`validate`] checks an inbound JSON body has every field
//! - **API**: [`api::routes`] maps HTTP verbs and paths onto the store
//! - **Client**: [`client::ApiClient`] calls the API, [`client::RosterView`]
//!   keeps a local page in sync with it
//!
//! Under the API sits a small hyper-based framework: radix-tree routing via
//! [`matchit`], type-erased async handlers over shared state, CORS, per-request
//! tracing and graceful shutdown.
//!
//! ## Quick start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use astronaut_roster::{Roster, Server, api};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), astronaut_roster::Error> {
//!     let app = api::routes(Arc::new(Roster::new()));
//!     Server::bind(([0, 0, 0, 0], 3001).into()).serve(app).await
//! }
//! ```

mod astronaut;
mod error;
mod handler;
mod method;
mod request;
mod response;
mod router;
mod seed;
mod server;
mod status;
mod store;
mod validation;

pub mod api;
pub mod client;
pub mod config;
pub mod health;
pub mod middleware;

pub use astronaut::{Astronaut, AstronautFields, SUPERPOWERS};
pub use error::Error;
pub use handler::Handler;
pub use method::{Method, UnknownMethod};
pub use request::{DEFAULT_BODY_LIMIT, Request};
pub use response::{IntoResponse, Json, Response, ResponseBuilder};
pub use router::Router;
pub use seed::examples;
pub use server::Server;
pub use status::Status;
pub use store::{DEFAULT_PAGE_SIZE, Page, Roster, StoreError};
pub use validation::{ValidationError, validate};
