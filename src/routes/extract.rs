use axum::{
    Json,
    extract::{FromRequest, FromRequestParts, Path, Query, Request},
    http::request::Parts,
};
use axum_extra::extract::WithRejection;
use serde::de::DeserializeOwned;
use uuid::Uuid;
use validator::Validate;

use crate::error::AppError;

/// A UUID path segment; a malformed id is a 422, not a 404.
pub type IdPath = WithRejection<Path<Uuid>, AppError>;

/// JSON body that has passed its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state).await?;
        value.validate()?;
        Ok(ValidatedJson(value))
    }
}

/// Query string that has passed its `validator` rules.
#[derive(Debug, Clone)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state).await?;
        value.validate()?;
        Ok(ValidatedQuery(value))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use crate::models::review::ReviewListQuery;
    use crate::models::search::NearbyQuery;
    use axum::http::Request as HttpRequest;

    async fn query(uri: &str) -> Result<ReviewListQuery, AppError> {
        let (mut parts, _) = HttpRequest::get(uri).body(()).expect("request").into_parts();
        ValidatedQuery::<ReviewListQuery>::from_request_parts(&mut parts, &())
            .await
            .map(|ValidatedQuery(value)| value)
    }

    #[tokio::test]
    async fn defaults_apply_when_absent() {
        let value = query("/reviews").await.expect("valid");
        assert_eq!((value.limit, value.offset), (50, 0));
    }

    #[tokio::test]
    async fn out_of_range_values_are_validation_errors() {
        let err = query("/reviews?limit=101").await.expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.details()["errors"][0]["loc"], serde_json::json!(["limit"]));
    }

    #[tokio::test]
    async fn unparsable_values_are_validation_errors() {
        let err = query("/reviews?offset=abc").await.expect_err("invalid");
        assert_eq!(err.kind(), ErrorKind::Validation);
        assert_eq!(err.details()["errors"][0]["loc"], serde_json::json!(["query"]));
    }

    #[tokio::test]
    async fn nan_coordinates_are_validation_errors() {
        let (mut parts, _) = HttpRequest::get("/nearby?latitude=NaN&longitude=NaN")
            .body(())
            .expect("request")
            .into_parts();
        let err = ValidatedQuery::<NearbyQuery>::from_request_parts(&mut parts, &())
            .await
            .map(|ValidatedQuery(value)| value)
            .expect_err("NaN coordinates");
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
}
