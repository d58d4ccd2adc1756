use axum::{Json, extract::State};

use crate::{
    AppState,
    error::AppError,
    models::tag::{PopularTags, TagQuery},
    routes::extract::ValidatedQuery,
};

/// Public.
#[axum::debug_handler]
pub async fn popular_tags(
    State(state): State<AppState>,
    ValidatedQuery(query): ValidatedQuery<TagQuery>,
) -> Result<Json<PopularTags>, AppError> {
    Ok(Json(state.tags.popular(query).await?))
}
