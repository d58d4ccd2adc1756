//! Per-request correlation id.
//!
//! The id is bound to a task-local and to a `request` span for the duration
//! of the request future, so every log line of the request carries it and
//! nothing outlives the request.

use std::future::Future;

use axum::{
    extract::Request,
    http::{HeaderMap, HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};
use tokio::task_local;
use tracing::Instrument;
use uuid::Uuid;

pub const CORRELATION_HEADER: HeaderName = HeaderName::from_static("x-correlation-id");

task_local! {
    static CORRELATION_ID: CorrelationId;
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CorrelationId(String);

impl CorrelationId {
    pub fn generate() -> Self {
        Self(Uuid::new_v4().to_string())
    }

    /// Reuse a non-blank inbound `X-Correlation-ID` exactly as sent.
    pub fn from_headers(headers: &HeaderMap) -> Option<Self> {
        headers
            .get(&CORRELATION_HEADER)
            .and_then(|value| value.to_str().ok())
            .filter(|value| !value.trim().is_empty())
            .map(|value| Self(value.to_string()))
    }

    /// The id of the request currently being served on this task.
    pub fn current() -> Option<Self> {
        CORRELATION_ID.try_with(Clone::clone).ok()
    }

    pub async fn scope<F: Future>(self, fut: F) -> F::Output {
        CORRELATION_ID.scope(self, fut).await
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CorrelationId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// Outermost application stage: binds the id, logs start and completion,
/// echoes the id on the response.
pub async fn correlation(req: Request, next: Next) -> Response {
    let id = CorrelationId::from_headers(req.headers()).unwrap_or_else(CorrelationId::generate);
    let method = req.method().clone();
    let path = req.uri().path().to_string();
    let span = tracing::info_span!("request", correlation_id = %id);

    let header = HeaderValue::from_str(id.as_str()).ok();

    let mut response = id
        .scope(
            async move {
                tracing::info!(method = %method, path = %path, "request_started");
                let response = next.run(req).await;
                tracing::info!(
                    method = %method,
                    path = %path,
                    status_code = response.status().as_u16(),
                    "request_completed"
                );
                response
            }
            .instrument(span),
        )
        .await;

    if let Some(value) = header {
        response.headers_mut().insert(CORRELATION_HEADER, value);
    }
    response
}
