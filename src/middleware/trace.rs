//! Per-request span with method, path, status and latency.

use std::net::SocketAddr;
use std::time::Instant;

use tracing::{Span, info, info_span, warn};

use crate::response::Response;

pub(crate) struct RequestTrace {
    span: Span,
    started: Instant,
}

impl RequestTrace {
    pub(crate) fn start(method: &str, path: &str, peer: SocketAddr) -> Self {
        Self {
            span: info_span!("request", %method, %path, %peer),
            started: Instant::now(),
        }
    }

    pub(crate) fn span(&self) -> &Span {
        &self.span
    }

    pub(crate) fn finish(self, response: &Response) {
        let _enter = self.span.enter();
        let status = response.status_code();
        let latency_us = self.started.elapsed().as_micros() as u64;
        if status >= 500 {
            warn!(status, latency_us, "request failed");
        } else {
            info!(status, latency_us, "request completed");
        }
    }
}
