//! Middleware layer.
//!
//! Cross-cutting concerns the server applies around every routed request:
//!
//! - [`cors`] answers preflights and stamps `access-control-allow-origin`
//!   on every response
//! - [`trace`] opens a per-request span and logs status and latency
//!
//! Both run inside the server's dispatch path. [`Router::oneshot`](crate::Router::oneshot)
//! bypasses them.

pub mod cors;
pub(crate) mod trace;

pub use cors::Cors;
