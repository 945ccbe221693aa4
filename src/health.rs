//! Health-check handlers.
//!
//! | Probe | Path | Question |
//! |---|---|---|
//! | **Liveness** | `/healthz` | Is the process alive? |
//! | **Readiness** | `/readyz` | Can it serve traffic, and how big is the roster? |
//!
//! Both are registered by [`api::routes`](crate::api::routes).

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::{Json, Request, Response, Roster};

/// Body of `GET /readyz`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Readiness {
    pub status: String,
    pub astronauts: usize,
}

/// Always `200 OK` with body `"ok"`. If the process answers HTTP at all, it
/// is alive.
pub async fn liveness(_roster: Arc<Roster>, _req: Request) -> Response {
    Response::text("ok")
}

/// `200 OK` with `{"status":"ready","astronauts":n}`. The roster is in
/// memory, so there is nothing to wait on.
pub async fn readiness(roster: Arc<Roster>, _req: Request) -> Json<Readiness> {
    Json(Readiness { status: "ready".to_owned(), astronauts: roster.len() })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::AstronautFields;
    use crate::method::Method;
    use bytes::Bytes;

    #[tokio::test]
    async fn readiness_reports_roster_size() {
        let roster = Arc::new(Roster::new());
        roster.create(AstronautFields::new("Mae", "Jemison", "1956-10-17", "Healing"));
        let app = crate::api::routes(roster);

        let response = app.oneshot(Method::Get, "/readyz", Bytes::new()).await;
        assert_eq!(response.body(), br#"{"status":"ready","astronauts":1}"#);

        let live = app.oneshot(Method::Get, "/healthz", Bytes::new()).await;
        assert_eq!(live.body(), b"ok");
    }
}
