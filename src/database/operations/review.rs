use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::review::{REVIEW_COLUMNS, REVIEW_LIST_COLUMNS};
use crate::database::models::{DeletionRow, ReviewRow};
use crate::database::{CollaboratorError, Lookup, RowGroup};
use crate::models::review::{ReviewCreate, ReviewUpdate};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ReviewProcedures: Send + Sync {
    async fn create(
        &self,
        activity_id: Uuid,
        reviewer_id: Uuid,
        input: &ReviewCreate,
    ) -> Result<Lookup<ReviewRow>, CollaboratorError>;

    /// `NotFound` when the procedure returns no rows at all, which happens
    /// both for unknown activities and for activities without reviews.
    async fn list(
        &self,
        activity_id: Uuid,
        requester_id: Option<Uuid>,
        limit: i32,
        offset: i32,
    ) -> Result<Lookup<RowGroup<ReviewRow>>, CollaboratorError>;

    /// Existence check used to disambiguate an empty review listing.
    async fn activity_exists(&self, activity_id: Uuid) -> Result<bool, CollaboratorError>;

    async fn update(
        &self,
        review_id: Uuid,
        user_id: Uuid,
        changes: &ReviewUpdate,
    ) -> Result<Lookup<ReviewRow>, CollaboratorError>;

    async fn delete(
        &self,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Lookup<DeletionRow>, CollaboratorError>;
}

pub struct ReviewOperation {
    db: Arc<PgPool>,
}

impl ReviewOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl ReviewProcedures for ReviewOperation {
    async fn create(
        &self,
        activity_id: Uuid,
        reviewer_id: Uuid,
        input: &ReviewCreate,
    ) -> Result<Lookup<ReviewRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM activity.sp_create_activity_review(
                p_activity_id := $1,
                p_reviewer_user_id := $2,
                p_rating := $3,
                p_review_text := $4,
                p_is_anonymous := $5
            )
            "#
        );

        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(activity_id)
            .bind(reviewer_id)
            .bind(input.rating)
            .bind(input.review_text.as_deref())
            .bind(input.is_anonymous)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }

    async fn list(
        &self,
        activity_id: Uuid,
        requester_id: Option<Uuid>,
        limit: i32,
        offset: i32,
    ) -> Result<Lookup<RowGroup<ReviewRow>>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {REVIEW_LIST_COLUMNS} FROM activity.sp_get_activity_reviews(
                p_activity_id := $1,
                p_requesting_user_id := $2,
                p_limit := $3,
                p_offset := $4
            )
            "#
        );

        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(activity_id)
            .bind(requester_id)
            .bind(limit)
            .bind(offset)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::grouped(rows))
    }

    async fn activity_exists(&self, activity_id: Uuid) -> Result<bool, CollaboratorError> {
        let found: Option<(Uuid,)> =
            sqlx::query_as("SELECT activity_id FROM activity.activities WHERE activity_id = $1")
                .bind(activity_id)
                .fetch_optional(&*self.db)
                .await?;

        Ok(found.is_some())
    }

    async fn update(
        &self,
        review_id: Uuid,
        user_id: Uuid,
        changes: &ReviewUpdate,
    ) -> Result<Lookup<ReviewRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {REVIEW_COLUMNS} FROM activity.sp_update_review(
                p_review_id := $1,
                p_user_id := $2,
                p_rating := $3,
                p_review_text := $4,
                p_is_anonymous := $5
            )
            "#
        );

        let rows = sqlx::query_as::<_, ReviewRow>(&sql)
            .bind(review_id)
            .bind(user_id)
            .bind(changes.rating)
            .bind(changes.review_text.as_deref())
            .bind(changes.is_anonymous)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }

    async fn delete(
        &self,
        review_id: Uuid,
        user_id: Uuid,
    ) -> Result<Lookup<DeletionRow>, CollaboratorError> {
        let rows = sqlx::query_as::<_, DeletionRow>(
            r#"
            SELECT deleted, message
            FROM activity.sp_delete_review(
                p_review_id := $1,
                p_user_id := $2
            )
            "#,
        )
        .bind(review_id)
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(Lookup::first(rows))
    }
}
