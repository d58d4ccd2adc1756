mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::AppState;

pub use handler::{cancel_activity, create_activity, delete_activity, get_activity, update_activity};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities", post(create_activity))
        .route(
            "/activities/{activity_id}",
            get(get_activity).put(update_activity).delete(delete_activity),
        )
        .route("/activities/{activity_id}/cancel", post(cancel_activity))
}
