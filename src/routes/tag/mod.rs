mod handler;

use axum::{Router, routing::get};

use crate::AppState;

pub use handler::popular_tags;

pub fn routes() -> Router<AppState> {
    Router::new().route("/activities/tags/popular", get(popular_tags))
}
