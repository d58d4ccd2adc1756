use axum::{Json, extract::State};

use crate::{
    AppState,
    error::AppError,
    middleware::CurrentUser,
    models::search::{
        FeedQuery, FeedResponse, NearbyQuery, RecommendationQuery, RecommendationsResponse,
        SearchQuery, SearchResponse,
    },
    routes::extract::ValidatedQuery,
};

#[axum::debug_handler]
pub async fn search_activities(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(filters): ValidatedQuery<SearchQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    Ok(Json(state.search.search(user.user_id, filters).await?))
}

#[axum::debug_handler]
pub async fn nearby_activities(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(filters): ValidatedQuery<NearbyQuery>,
) -> Result<Json<SearchResponse>, AppError> {
    Ok(Json(state.search.nearby(user.user_id, filters).await?))
}

#[axum::debug_handler]
pub async fn feed(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<FeedQuery>,
) -> Result<Json<FeedResponse>, AppError> {
    Ok(Json(state.search.feed(user.user_id, query).await?))
}

#[axum::debug_handler]
pub async fn recommendations(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    ValidatedQuery(query): ValidatedQuery<RecommendationQuery>,
) -> Result<Json<RecommendationsResponse>, AppError> {
    Ok(Json(
        state.search.recommendations(user.user_id, query).await?,
    ))
}
