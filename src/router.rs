//! Radix-tree request router with shared state.
//!
//! One tree per HTTP method. O(path-length) lookup. A path that matches in
//! some other method's tree answers `405` with an `allow` header instead of
//! `404`. `HEAD` falls back to the `GET` handler with the body dropped, and
//! one trailing slash is ignored (`/astronauts/` is `/astronauts`).

use std::collections::HashMap;
use std::sync::Arc;

use bytes::Bytes;
use matchit::Router as MatchitRouter;

use crate::handler::{BoxedHandler, Handler};
use crate::method::Method;
use crate::request::Request;
use crate::response::Response;
use crate::status::Status;

/// The application router.
///
/// Owns the state `S` every handler receives as `Arc<S>`. Build it once at
/// startup and pass it to [`Server::serve`](crate::Server::serve). Each
/// registration returns `self` so calls chain.
pub struct Router<S> {
    state: Arc<S>,
    routes: HashMap<Method, MatchitRouter<BoxedHandler<S>>>,
}

/// Outcome of matching a method + path pair.
pub(crate) enum Route<S> {
    Found(BoxedHandler<S>, HashMap<String, String>),
    /// No handler for this method. Lists the methods that do match the
    /// path, which is empty for an unknown path.
    Unmatched(Vec<Method>),
}

impl<S: Send + Sync + 'static> Router<S> {
    pub fn new(state: S) -> Self {
        Self::with_shared(Arc::new(state))
    }

    /// Like [`Router::new`], for state the caller keeps a handle to.
    pub fn with_shared(state: Arc<S>) -> Self {
        Self { state, routes: HashMap::new() }
    }

    pub fn state(&self) -> &Arc<S> {
        &self.state
    }

    /// Register a handler for a method + path pair.
    ///
    /// Path parameters use `{name}` syntax and `req.param("name")` retrieves
    /// them. Panics on a path matchit rejects or that conflicts with an
    /// earlier registration, since that is a startup bug.
    pub fn on(mut self, method: Method, path: &str, handler: impl Handler<S>) -> Self {
        self.routes
            .entry(method)
            .or_default()
            .insert(path, handler.into_boxed_handler())
            .unwrap_or_else(|e| panic!("invalid route `{method} {path}`: {e}"));
        self
    }

    pub fn get(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Get, path, handler)
    }

    pub fn post(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Post, path, handler)
    }

    pub fn put(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Put, path, handler)
    }

    pub fn delete(self, path: &str, handler: impl Handler<S>) -> Self {
        self.on(Method::Delete, path, handler)
    }

    pub(crate) fn route(&self, method: Method, path: &str) -> Route<S> {
        let path = match path.strip_suffix('/') {
            Some(trimmed) if !trimmed.is_empty() => trimmed,
            _ => path,
        };

        if let Some(found) = self.lookup(method, path) {
            return found;
        }
        if method == Method::Head {
            if let Some(found) = self.lookup(Method::Get, path) {
                return found;
            }
        }

        let mut allowed: Vec<Method> = self.routes.iter()
            .filter(|(_, tree)| tree.at(path).is_ok())
            .map(|(m, _)| *m)
            .collect();
        if allowed.contains(&Method::Get) && !allowed.contains(&Method::Head) {
            allowed.push(Method::Head);
        }
        allowed.sort();
        Route::Unmatched(allowed)
    }

    fn lookup(&self, method: Method, path: &str) -> Option<Route<S>> {
        let matched = self.routes.get(&method)?.at(path).ok()?;
        let params = matched.params.iter()
            .map(|(k, v)| (k.to_owned(), v.to_owned()))
            .collect();
        Some(Route::Found(Arc::clone(matched.value), params))
    }

    /// Runs `handler` on `req`. A `HEAD` answer keeps its status and headers
    /// but loses the body.
    pub(crate) async fn call(&self, handler: BoxedHandler<S>, req: Request) -> Response {
        let head = req.method() == Method::Head;
        let mut response = handler.call(Arc::clone(&self.state), req).await;
        if head {
            response.body.clear();
        }
        response
    }

    /// Routes one in-memory request without a network connection.
    ///
    /// Same answers as the server gives, minus the middleware (no CORS
    /// headers). Handy for exercising handlers in tests.
    pub async fn oneshot(&self, method: Method, path: &str, body: impl Into<Bytes>) -> Response {
        match self.route(method, path) {
            Route::Found(handler, params) => {
                let req = Request::new(method, path, Vec::new(), body, params);
                self.call(handler, req).await
            }
            Route::Unmatched(allowed) => unmatched(&allowed),
        }
    }
}

/// `404` for an unknown path, `405` plus `allow` for a known path hit with
/// the wrong method.
pub(crate) fn unmatched(allowed: &[Method]) -> Response {
    if allowed.is_empty() {
        return Response::status(Status::NotFound);
    }
    let allow = allowed.iter().map(|m| m.as_str()).collect::<Vec<_>>().join(", ");
    Response::builder()
        .status(Status::MethodNotAllowed)
        .header("allow", &allow)
        .no_body()
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn echo_id(_: Arc<()>, req: Request) -> String {
        req.param("id").unwrap_or("none").to_owned()
    }

    async fn ok(_: Arc<()>, _: Request) -> Status {
        Status::Ok
    }

    fn app() -> Router<()> {
        Router::new(())
            .get("/items/{id}", echo_id)
            .delete("/items/{id}", ok)
            .post("/items", ok)
    }

    #[tokio::test]
    async fn extracts_path_params() {
        let response = app().oneshot(Method::Get, "/items/42", Bytes::new()).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.body(), b"42");
    }

    #[tokio::test]
    async fn unknown_path_is_404() {
        let response = app().oneshot(Method::Get, "/nope", Bytes::new()).await;
        assert_eq!(response.status_code(), 404);
    }

    #[tokio::test]
    async fn wrong_method_is_405_with_allow() {
        let response = app().oneshot(Method::Put, "/items/1", Bytes::new()).await;
        assert_eq!(response.status_code(), 405);
        assert_eq!(response.header("allow"), Some("DELETE, GET, HEAD"));
    }

    #[tokio::test]
    async fn head_falls_back_to_get() {
        let response = app().oneshot(Method::Head, "/items/42", Bytes::new()).await;
        assert_eq!(response.status_code(), 200);
        assert_eq!(response.header("content-type"), Some("text/plain; charset=utf-8"));
        assert!(response.body().is_empty());

        let post_only = app().oneshot(Method::Head, "/items", Bytes::new()).await;
        assert_eq!(post_only.status_code(), 405);
        assert_eq!(post_only.header("allow"), Some("POST"));
    }

    #[tokio::test]
    async fn trailing_slash_is_ignored() {
        let response = app().oneshot(Method::Get, "/items/7/", Bytes::new()).await;
        assert_eq!(response.body(), b"7");

        let root = Router::new(()).get("/", ok);
        assert_eq!(root.oneshot(Method::Get, "/", Bytes::new()).await.status_code(), 200);
    }

    #[test]
    #[should_panic(expected = "invalid route")]
    fn conflicting_route_panics() {
        let _ = Router::new(()).get("/items/{id}", ok).get("/items/{name}", ok);
    }
}
