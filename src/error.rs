//! Unified error type.

/// The error type returned by the crate's fallible infrastructure.
///
/// Application-level failures on the server side (400, 404, ...) are
/// expressed as HTTP [`Response`](crate::Response) values, not as `Error`s.
/// This type covers binding and accepting on the server side, plus transport
/// failures and non-2xx answers seen by [`ApiClient`](crate::client::ApiClient).
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("io: {0}")]
    Io(#[from] std::io::Error),

    #[error("http client: {0}")]
    Client(#[from] reqwest::Error),

    /// The API answered with a non-success status. `message` is taken from
    /// the response envelope when one was sent.
    #[error("api responded {status}: {message}")]
    Api { status: u16, message: String },
}
