use std::any::Any;

use axum::response::{IntoResponse, Response};

use super::CorrelationId;
use crate::error::AppError;

/// Turns a handler panic into a 500 envelope. Installed inside the
/// correlation stage, so the response still carries the correlation id.
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic");

    match CorrelationId::current() {
        Some(id) => tracing::error!(correlation_id = %id, error = detail, "request_failed"),
        None => tracing::error!(error = detail, "request_failed"),
    }
    AppError::internal("An unexpected error occurred").into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    #[tokio::test]
    async fn panics_inside_a_request_scope_become_500() {
        let response = CorrelationId::generate()
            .scope(async { handle_panic(Box::new("boom")) })
            .await;
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn panics_outside_a_request_scope_become_500() {
        let response = handle_panic(Box::new(String::from("boom")));
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
