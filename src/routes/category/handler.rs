use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use axum_extra::extract::WithRejection;

use crate::{
    AppState,
    error::AppError,
    middleware::{AdminUser, OptionalUser},
    models::category::{Category, CategoryCreate, CategoryList, CategoryUpdate},
    routes::extract::{IdPath, ValidatedJson},
};

/// Public; a credential is accepted but not required.
#[axum::debug_handler]
pub async fn list_categories(
    State(state): State<AppState>,
    OptionalUser(_user): OptionalUser,
) -> Result<Json<CategoryList>, AppError> {
    Ok(Json(state.categories.list().await?))
}

#[axum::debug_handler]
pub async fn create_category(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
    ValidatedJson(input): ValidatedJson<CategoryCreate>,
) -> Result<(StatusCode, Json<Category>), AppError> {
    tracing::debug!(admin_id = %admin.user_id, "category_create_requested");
    let category = state.categories.create(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}

#[axum::debug_handler]
pub async fn update_category(
    State(state): State<AppState>,
    AdminUser(_admin): AdminUser,
    WithRejection(Path(category_id), _): IdPath,
    ValidatedJson(changes): ValidatedJson<CategoryUpdate>,
) -> Result<Json<Category>, AppError> {
    Ok(Json(state.categories.update(category_id, changes).await?))
}
