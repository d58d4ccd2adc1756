use axum::{
    Json,
    extract::{Path, State},
};
use axum_extra::extract::WithRejection;

use crate::{
    AppState,
    error::AppError,
    middleware::CurrentUser,
    models::participant::{ParticipantsList, Waitlist},
    routes::extract::IdPath,
};

#[axum::debug_handler]
pub async fn list_participants(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
) -> Result<Json<ParticipantsList>, AppError> {
    Ok(Json(
        state
            .participants
            .participants(activity_id, user.user_id)
            .await?,
    ))
}

/// Organizers and co-organizers only; enforced by the collaborator.
#[axum::debug_handler]
pub async fn get_waitlist(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    WithRejection(Path(activity_id), _): IdPath,
) -> Result<Json<Waitlist>, AppError> {
    Ok(Json(
        state.participants.waitlist(activity_id, user.user_id).await?,
    ))
}
