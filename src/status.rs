//! HTTP status codes the roster API answers with.
//!
//! ```rust
//! use astronaut_roster::{Response, Status};
//!
//! // status-only, no body
//! Response::status(Status::NotFound);
//!
//! // return Status directly from a handler and it gets wrapped
//! async fn gone(
//!     _roster: std::sync::Arc<astronaut_roster::Roster>,
//!     _req: astronaut_roster::Request,
//! ) -> Status {
//!     Status::NotFound
//! }
//! ```

/// A response status.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Status {
    Ok,                  // 200
    BadRequest,          // 400
    NotFound,            // 404
    MethodNotAllowed,    // 405
    PayloadTooLarge,     // 413
    InternalServerError, // 500
}

impl Status {
    pub fn code(self) -> u16 {
        match self {
            Self::Ok                  => 200,
            Self::BadRequest          => 400,
            Self::NotFound            => 404,
            Self::MethodNotAllowed    => 405,
            Self::PayloadTooLarge     => 413,
            Self::InternalServerError => 500,
        }
    }
}

impl From<Status> for u16 {
    fn from(s: Status) -> u16 {
        s.code()
    }
}

impl From<Status> for http::StatusCode {
    fn from(s: Status) -> http::StatusCode {
        // Every variant is a registered code, so this never falls through.
        http::StatusCode::from_u16(s.code()).unwrap_or(http::StatusCode::INTERNAL_SERVER_ERROR)
    }
}
