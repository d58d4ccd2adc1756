mod handler;

use axum::{
    Router,
    routing::{post, put},
};

use crate::AppState;

pub use handler::{create_review, delete_review, list_reviews, update_review};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/activities/{activity_id}/reviews",
            post(create_review).get(list_reviews),
        )
        .route("/reviews/{review_id}", put(update_review).delete(delete_review))
}
