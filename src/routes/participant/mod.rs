mod handler;

use axum::{Router, routing::get};

use crate::AppState;

pub use handler::{get_waitlist, list_participants};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/activities/{activity_id}/participants", get(list_participants))
        .route("/activities/{activity_id}/waitlist", get(get_waitlist))
}
