use axum::{
    Json, Router,
    extract::State,
    http::HeaderValue,
    middleware::from_fn,
    routing::get,
};
use serde_json::{Value, json};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};

use crate::{
    AppState,
    config::Config,
    error::AppError,
    middleware::{CORRELATION_HEADER, correlation, handle_panic},
    routes,
};


async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": state.config.version,
        "environment": state.config.environment,
    }))
}

async fn root(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "name": state.config.project_name,
        "version": state.config.version,
        "health": "/health",
    }))
}

async fn not_found() -> AppError {
    AppError::not_found("Route")
}

fn cors(config: &Config) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods(Any)
        .allow_headers(Any)
        .expose_headers([CORRELATION_HEADER]);

    if config.allows_any_origin() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "ignoring_invalid_cors_origin");
                None
            }
        })
        .collect();
    layer.allow_origin(origins)
}

/// `None` when the API is served from the root.
fn api_prefix(raw: &str) -> Option<String> {
    let trimmed = raw.trim().trim_end_matches('/');
    if trimmed.is_empty() {
        None
    } else if trimmed.starts_with('/') {
        Some(trimmed.to_string())
    } else {
        Some(format!("/{trimmed}"))
    }
}

/// The full application: versioned API, health endpoints and the request
/// pipeline. CORS runs first, then correlation, then panic recovery.
pub fn create_router(state: AppState) -> Router {
    let api = routes::api();
    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(health));

    let router = match api_prefix(&state.config.api_v1_prefix) {
        Some(prefix) => router.nest(&prefix, api),
        None => router.merge(api),
    };

    router
        .fallback(not_found)
        .layer(
            ServiceBuilder::new()
                .layer(cors(&state.config))
                .layer(from_fn(correlation))
                .layer(CatchPanicLayer::custom(handle_panic)),
        )
        .with_state(state)
}
