use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{
    AppState,
    error::AppError,
    middleware::{CurrentUser, OptionalUser},
    models::activity::DeleteResponse,
    models::review::{Review, ReviewCreate, ReviewListQuery, ReviewUpdate, ReviewsList},
    routes::extract::{IdPath, ValidatedJson, ValidatedQuery},
};

#[axum::debug_handler]
pub async fn create_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
    ValidatedJson(input): ValidatedJson<ReviewCreate>,
) -> Result<(StatusCode, Json<Review>), AppError> {
    let review = state
        .reviews
        .create(activity_id, user.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(review)))
}

/// Anonymous callers see every review with `is_own_review = false`.
#[axum::debug_handler]
pub async fn list_reviews(
    State(state): State<AppState>,
    OptionalUser(user): OptionalUser,
    WithRejection(Path(activity_id), _): IdPath,
    ValidatedQuery(query): ValidatedQuery<ReviewListQuery>,
) -> Result<Json<ReviewsList>, AppError> {
    let requester = user.map(|principal| principal.user_id);
    Ok(Json(
        state.reviews.list(activity_id, requester, query).await?,
    ))
}

#[axum::debug_handler]
pub async fn update_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(review_id), _): IdPath,
    ValidatedJson(changes): ValidatedJson<ReviewUpdate>,
) -> Result<Json<Review>, AppError> {
    Ok(Json(
        state.reviews.update(review_id, user.user_id, changes).await?,
    ))
}

#[axum::debug_handler]
pub async fn delete_review(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(review_id), _): IdPath,
) -> Result<Json<DeleteResponse>, AppError> {
    Ok(Json(state.reviews.delete(review_id, user.user_id).await?))
}
