//! HTTP handlers, one module per resource.
//!
//! Handlers only extract, delegate to a service and wrap the result;
//! rendering of failures happens once in `AppError::into_response`.

pub mod activity;
pub mod category;
pub mod extract;
pub mod participant;
pub mod review;
pub mod search;
pub mod tag;

use axum::Router;

use crate::AppState;

/// Every versioned endpoint, before the prefix is applied.
pub fn api() -> Router<AppState> {
    Router::new()
        .merge(category::routes())
        .merge(search::routes())
        .merge(tag::routes())
        .merge(activity::routes())
        .merge(participant::routes())
        .merge(review::routes())
}
