#![allow(dead_code)]

use std::sync::Arc;

use astronaut_roster::middleware::Cors;
use astronaut_roster::{Error, Roster, Server, api};
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// A roster server on an ephemeral localhost port.
pub struct TestServer {
    pub base: String,
    pub roster: Arc<Roster>,
    shutdown: oneshot::Sender<()>,
    handle: JoinHandle<Result<(), Error>>,
}

impl TestServer {
    pub async fn start() -> Self {
        Self::start_with(Cors::permissive(), Roster::new()).await
    }

    pub async fn start_with(cors: Cors, roster: Roster) -> Self {
        Self::configured(roster, |server| server.cors(cors)).await
    }

    pub async fn start_with_body_limit(bytes: usize) -> Self {
        Self::configured(Roster::new(), |server| server.body_limit(bytes)).await
    }

    async fn configured(roster: Roster, configure: impl FnOnce(Server) -> Server) -> Self {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let base = format!("http://{}", listener.local_addr().unwrap());
        let roster = Arc::new(roster);
        let (shutdown, signal) = oneshot::channel::<()>();

        let app = api::routes(Arc::clone(&roster));
        let handle = tokio::spawn(
            configure(Server::from_listener(listener))
                .serve_with_shutdown(app, async move {
                    let _ = signal.await;
                }),
        );

        Self { base, roster, shutdown, handle }
    }

    pub fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base)
    }

    /// Signals shutdown and waits for the drain to finish.
    pub async fn stop(self) -> Result<(), Error> {
        let _ = self.shutdown.send(());
        self.handle.await.unwrap()
    }
}
