mod handler;

use axum::{Router, routing::get};

use crate::AppState;

pub use handler::{feed, nearby_activities, recommendations, search_activities};

/// Static `/activities/...` segments; they take precedence over
/// `/activities/{activity_id}`.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities/search", get(search_activities))
        .route("/activities/nearby", get(nearby_activities))
        .route("/activities/feed", get(feed))
        .route("/activities/recommendations", get(recommendations))
}
