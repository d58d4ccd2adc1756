use std::convert::Infallible;

use axum::{
    extract::FromRequestParts,
    http::{header::AUTHORIZATION, request::Parts},
};

use crate::{AppState, error::AppError, infrastructure::auth::Principal};

/// `Authorization` header as text. A blank value counts as missing. A value
/// that is not valid UTF-8 is kept as an empty string so it is reported as
/// malformed rather than missing.
fn authorization(parts: &Parts) -> Option<&str> {
    match parts.headers.get(AUTHORIZATION)?.to_str() {
        Ok(value) if value.trim().is_empty() => None,
        Ok(value) => Some(value),
        Err(_) => Some(""),
    }
}

/// An authenticated caller; rejects with 401.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Principal);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        state
            .verifier
            .authenticate(authorization(parts))
            .map(CurrentUser)
    }
}

/// The caller if a valid credential was sent, `None` otherwise.
#[derive(Debug, Clone)]
pub struct OptionalUser(pub Option<Principal>);

impl FromRequestParts<AppState> for OptionalUser {
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(OptionalUser(
            state.verifier.authenticate_optional(authorization(parts)),
        ))
    }
}

/// An authenticated caller holding the admin role.
#[derive(Debug, Clone)]
pub struct AdminUser(pub Principal);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        let CurrentUser(principal) = CurrentUser::from_request_parts(parts, state).await?;
        principal.require_admin().map(AdminUser)
    }
}
