mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::AppState;

pub use handler::{create_category, list_categories, update_category};

pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/categories", get(list_categories).post(create_category))
        .route("/categories/{category_id}", put(update_category))
}
