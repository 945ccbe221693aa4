//! Incoming HTTP request type.

use std::collections::HashMap;
use std::error::Error as StdError;

use bytes::Bytes;
use http_body_util::{BodyExt, LengthLimitError, Limited};
use serde::de::DeserializeOwned;

use crate::method::Method;

/// Largest body buffered by default, the same 100 kB cap `express.json()` uses.
pub const DEFAULT_BODY_LIMIT: usize = 100 * 1024;

/// Why a request body could not be buffered.
#[derive(Debug, thiserror::Error)]
pub(crate) enum BodyError {
    #[error("request body exceeds {limit} bytes")]
    TooLarge { limit: usize },
    #[error("failed to read request body: {0}")]
    Read(Box<dyn StdError + Send + Sync>),
}

/// An incoming HTTP request with its body fully buffered.
#[derive(Debug)]
pub struct Request {
    pub(crate) method: Method,
    pub(crate) path: String,
    pub(crate) headers: Vec<(String, String)>,
    pub(crate) body: Bytes,
    pub(crate) params: HashMap<String, String>,
}

impl Request {
    pub(crate) fn new(
        method: Method,
        path: impl Into<String>,
        headers: Vec<(String, String)>,
        body: impl Into<Bytes>,
        params: HashMap<String, String>,
    ) -> Self {
        Self { method, path: path.into(), headers, body: body.into(), params }
    }

    /// Buffers a hyper request into a [`Request`], reading at most `limit`
    /// body bytes.
    ///
    /// Header values that are not visible ASCII are dropped; nothing in the
    /// roster API reads them.
    pub(crate) async fn from_hyper<B>(
        req: hyper::Request<B>,
        method: Method,
        params: HashMap<String, String>,
        limit: usize,
    ) -> Result<Self, BodyError>
    where
        B: hyper::body::Body,
        B::Error: Into<Box<dyn StdError + Send + Sync>>,
    {
        let (parts, body) = req.into_parts();
        let headers = parts.headers.iter()
            .filter_map(|(k, v)| Some((k.as_str().to_owned(), v.to_str().ok()?.to_owned())))
            .collect();
        let body = match Limited::new(body, limit).collect().await {
            Ok(collected) => collected.to_bytes(),
            Err(e) if e.is::<LengthLimitError>() => return Err(BodyError::TooLarge { limit }),
            Err(e) => return Err(BodyError::Read(e)),
        };
        Ok(Self::new(method, parts.uri.path(), headers, body, params))
    }

    pub fn method(&self) -> Method { self.method }
    pub fn path(&self) -> &str { &self.path }
    pub fn headers(&self) -> &[(String, String)] { &self.headers }
    pub fn body(&self) -> &[u8] { &self.body }

    /// Case-insensitive header lookup.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Returns a named path parameter.
    ///
    /// For a route `/astronauts/{id}`, `req.param("id")` on `/astronauts/42` returns `Some("42")`.
    pub fn param(&self, key: &str) -> Option<&str> {
        self.params.get(key).map(String::as_str)
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, serde_json::Error> {
        serde_json::from_slice(&self.body)
    }
}
