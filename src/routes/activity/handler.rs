use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{
    AppState,
    error::AppError,
    middleware::CurrentUser,
    models::activity::{
        Activity, ActivityCancel, ActivityCancelResponse, ActivityCreate, ActivityUpdate,
        DeleteResponse,
    },
    routes::extract::{IdPath, ValidatedJson},
};

#[axum::debug_handler]
pub async fn create_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedJson(input): ValidatedJson<ActivityCreate>,
) -> Result<(StatusCode, Json<Activity>), AppError> {
    let activity = state.activities.create(user.user_id, input).await?;
    Ok((StatusCode::CREATED, Json(activity)))
}

#[axum::debug_handler]
pub async fn get_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
) -> Result<Json<Activity>, AppError> {
    Ok(Json(state.activities.get(activity_id, user.user_id).await?))
}

#[axum::debug_handler]
pub async fn update_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
    ValidatedJson(changes): ValidatedJson<ActivityUpdate>,
) -> Result<Json<Activity>, AppError> {
    Ok(Json(
        state
            .activities
            .update(activity_id, user.user_id, changes)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn cancel_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
    ValidatedJson(input): ValidatedJson<ActivityCancel>,
) -> Result<Json<ActivityCancelResponse>, AppError> {
    Ok(Json(
        state
            .activities
            .cancel(activity_id, user.user_id, input)
            .await?,
    ))
}

#[axum::debug_handler]
pub async fn delete_activity(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
) -> Result<Json<DeleteResponse>, AppError> {
    Ok(Json(
        state.activities.delete(activity_id, user.user_id).await?,
    ))
}
