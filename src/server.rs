//! HTTP server and graceful shutdown.
//!
//! On SIGTERM or Ctrl-C the server:
//! 1. Stops calling `listener.accept()`, so no new connections are taken.
//! 2. Asks every open connection to close once its current response is
//!    written. Idle keep-alive connections close immediately.
//! 3. Returns from [`Server::serve`], which lets `main` exit cleanly.
//!
//! The roster lives in memory, so a restart empties it.

use std::convert::Infallible;
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use bytes::Bytes;
use http_body_util::Full;
use hyper::body::Incoming;
use hyper::service::service_fn;
use hyper_util::rt::{TokioExecutor, TokioIo};
use hyper_util::server::conn::auto::Builder as ConnBuilder;
use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing::{Instrument, error, info, warn};

use crate::api::Envelope;
use crate::error::Error;
use crate::method::Method;
use crate::middleware::Cors;
use crate::middleware::trace::RequestTrace;
use crate::request::{BodyError, DEFAULT_BODY_LIMIT, Request};
use crate::response::Response;
use crate::router::{Route, Router, unmatched};
use crate::status::Status;

enum Bind {
    Addr(SocketAddr),
    Listener(TcpListener),
}

/// The HTTP server.
pub struct Server {
    bind: Bind,
    cors: Cors,
    body_limit: usize,
}

impl Server {
    /// Configures the server to bind to `addr` when it starts serving.
    ///
    /// ```rust,no_run
    /// use astronaut_roster::Server;
    /// let server = Server::bind(([0, 0, 0, 0], 3001).into());
    /// ```
    pub fn bind(addr: SocketAddr) -> Self {
        Self { bind: Bind::Addr(addr), cors: Cors::default(), body_limit: DEFAULT_BODY_LIMIT }
    }

    /// Serves on an already-bound listener, e.g. one on port 0 whose
    /// ephemeral address the caller needs to know up front.
    pub fn from_listener(listener: TcpListener) -> Self {
        Self { bind: Bind::Listener(listener), cors: Cors::default(), body_limit: DEFAULT_BODY_LIMIT }
    }

    /// Replaces the default permissive CORS policy.
    pub fn cors(mut self, cors: Cors) -> Self {
        self.cors = cors;
        self
    }

    /// Caps buffered request bodies at `bytes`. Larger bodies get `413`.
    pub fn body_limit(mut self, bytes: usize) -> Self {
        self.body_limit = bytes;
        self
    }

    /// Starts accepting connections and dispatching them through `router`.
    ///
    /// Returns only after a full graceful shutdown (SIGTERM or Ctrl-C,
    /// followed by all in-flight requests completing).
    pub async fn serve<S>(self, router: Router<S>) -> Result<(), Error>
    where
        S: Send + Sync + 'static,
    {
        self.serve_with_shutdown(router, shutdown_signal()).await
    }

    /// Like [`Server::serve`], but stops when `shutdown` resolves instead of
    /// on a process signal.
    pub async fn serve_with_shutdown<S, F>(self, router: Router<S>, shutdown: F) -> Result<(), Error>
    where
        S: Send + Sync + 'static,
        F: Future<Output = ()>,
    {
        let listener = match self.bind {
            Bind::Addr(addr) => TcpListener::bind(addr).await?,
            Bind::Listener(listener) => listener,
        };
        let local = listener.local_addr()?;

        let router = Arc::new(router);
        let cors = Arc::new(self.cors);
        let limit = self.body_limit;

        info!(addr = %local, cors_origin = cors.origin(), body_limit = limit, "astronaut roster listening");

        let mut tasks = tokio::task::JoinSet::new();
        let (stop_tx, stop_rx) = watch::channel(());
        tokio::pin!(shutdown);

        loop {
            tokio::select! {
                // Shutdown is checked first so a signal stops accepting even
                // when more connections are queued.
                biased;

                () = &mut shutdown => {
                    info!(in_flight = tasks.len(), "shutdown signal received, draining connections");
                    break;
                }

                res = listener.accept() => {
                    let (stream, peer) = match res {
                        Ok(v) => v,
                        Err(e) => {
                            error!("accept error: {e}");
                            continue;
                        }
                    };

                    let router = Arc::clone(&router);
                    let cors = Arc::clone(&cors);
                    let io = TokioIo::new(stream);

                    let mut stop = stop_rx.clone();

                    tasks.spawn(async move {
                        // Called once per request on the connection.
                        let svc = service_fn(move |req| {
                            let router = Arc::clone(&router);
                            let cors = Arc::clone(&cors);
                            async move { dispatch(router, cors, limit, req, peer).await }
                        });

                        let builder = ConnBuilder::new(TokioExecutor::new());
                        let conn = builder.serve_connection(io, svc);
                        tokio::pin!(conn);

                        let finished = tokio::select! {
                            res = conn.as_mut() => Some(res),
                            _ = stop.changed() => None,
                        };
                        // On shutdown, idle keep-alive connections close now and
                        // busy ones after their current response.
                        let res = match finished {
                            Some(res) => res,
                            None => {
                                conn.as_mut().graceful_shutdown();
                                conn.await
                            }
                        };
                        if let Err(e) = res {
                            error!(%peer, "connection error: {e}");
                        }
                    });
                }

                // Reap finished connection tasks so the JoinSet stays bounded.
                Some(_) = tasks.join_next(), if !tasks.is_empty() => {}
            }
        }

        // Receivers only care that the value changed.
        stop_tx.send_replace(());
        while tasks.join_next().await.is_some() {}

        info!("astronaut roster stopped");
        Ok(())
    }
}

// ── Request dispatch ──────────────────────────────────────────────────────────

/// Routes one request through the middleware and produces one response.
///
/// Every failure is turned into a status code here, so hyper never sees an
/// error.
async fn dispatch<S>(
    router: Arc<Router<S>>,
    cors: Arc<Cors>,
    limit: usize,
    req: hyper::Request<Incoming>,
    peer: SocketAddr,
) -> Result<http::Response<Full<Bytes>>, Infallible>
where
    S: Send + Sync + 'static,
{
    let path = req.uri().path().to_owned();
    let trace = RequestTrace::start(req.method().as_str(), &path, peer);

    let response = respond(&router, &cors, limit, req, &path)
        .instrument(trace.span().clone())
        .await;

    trace.finish(&response);
    Ok(response.into_inner())
}

async fn respond<S>(
    router: &Router<S>,
    cors: &Cors,
    limit: usize,
    req: hyper::Request<Incoming>,
    path: &str,
) -> Response
where
    S: Send + Sync + 'static,
{
    if req.method() == http::Method::OPTIONS {
        return cors.preflight(req.headers());
    }

    let mut response = match Method::try_from(req.method()) {
        Err(e) => {
            warn!("{e}");
            Response::status(Status::MethodNotAllowed)
        }
        Ok(method) => match router.route(method, path) {
            Route::Found(handler, params) => match Request::from_hyper(req, method, params, limit).await {
                Ok(request) => router.call(handler, request).await,
                Err(e @ BodyError::TooLarge { .. }) => {
                    warn!("{e}");
                    Response::builder()
                        .status(Status::PayloadTooLarge)
                        .json(&Envelope::<()>::message("Request Body Is Too Large"))
                }
                Err(e) => {
                    warn!("{e}");
                    Response::status(Status::BadRequest)
                }
            },
            Route::Unmatched(allowed) => unmatched(&allowed),
        },
    };

    cors.decorate(&mut response);
    response
}

// ── Shutdown signal ───────────────────────────────────────────────────────────

/// Resolves on the first shutdown signal the process receives.
///
/// On Unix this is **SIGTERM** or **SIGINT** (Ctrl-C). Elsewhere only
/// Ctrl-C is available. A handler that cannot be installed is logged and
/// its arm never fires.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            error!("failed to install Ctrl-C handler: {e}");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let sigterm = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                error!("failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let sigterm = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c   => {}
        () = sigterm  => {}
    }
}
