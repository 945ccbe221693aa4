//! Cross-origin resource sharing.
//!
//! Browser front-ends on another origin need two things from the API:
//! a 200 answer to the `OPTIONS` preflight, and an
//! `access-control-allow-origin` header on every real response.

use http::HeaderMap;

use crate::response::Response;

const ALLOW_METHODS: &str = "GET,HEAD,PUT,PATCH,POST,DELETE";

/// CORS policy for a single allowed origin, or `*` for any.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Cors {
    origin: String,
}

impl Cors {
    pub fn new(origin: impl Into<String>) -> Self {
        Self { origin: origin.into() }
    }

    /// Any origin may call the API.
    pub fn permissive() -> Self {
        Self::new("*")
    }

    pub fn origin(&self) -> &str {
        &self.origin
    }

    fn is_wildcard(&self) -> bool {
        self.origin == "*"
    }

    /// Answers an `OPTIONS` preflight.
    ///
    /// Requested headers are reflected back verbatim, so any header the
    /// browser asks to send is allowed.
    pub(crate) fn preflight(&self, request_headers: &HeaderMap) -> Response {
        let mut response = Response::builder()
            .header("access-control-allow-methods", ALLOW_METHODS)
            .no_body();
        self.decorate(&mut response);

        let mut vary = Vec::new();
        if !self.is_wildcard() {
            vary.push("Origin");
        }
        if let Some(requested) = request_headers
            .get("access-control-request-headers")
            .and_then(|v| v.to_str().ok())
        {
            response.set_header("access-control-allow-headers", requested);
            vary.push("Access-Control-Request-Headers");
        }
        if !vary.is_empty() {
            response.set_header("vary", vary.join(", "));
        }
        response
    }

    /// Stamps the allowed origin on a response.
    pub(crate) fn decorate(&self, response: &mut Response) {
        response.set_header("access-control-allow-origin", self.origin.as_str());
        if !self.is_wildcard() {
            response.set_header("vary", "Origin");
        }
    }
}

impl Default for Cors {
    fn default() -> Self {
        Self::permissive()
    }
}
