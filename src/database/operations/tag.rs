use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;

use crate::database::CollaboratorError;
use crate::database::models::TagRow;

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TagProcedures: Send + Sync {
    async fn popular(
        &self,
        limit: i32,
        prefix: Option<String>,
    ) -> Result<Vec<TagRow>, CollaboratorError>;
}

pub struct TagOperation {
    db: Arc<PgPool>,
}

impl TagOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl TagProcedures for TagOperation {
    async fn popular(
        &self,
        limit: i32,
        prefix: Option<String>,
    ) -> Result<Vec<TagRow>, CollaboratorError> {
        let rows = sqlx::query_as::<_, TagRow>(
            r#"
            SELECT tag, usage_count::int8 AS usage_count
            FROM activity.sp_get_popular_tags(
                p_limit := $1,
                p_prefix := $2
            )
            "#,
        )
        .bind(limit)
        .bind(prefix)
        .fetch_all(&*self.db)
        .await?;

        Ok(rows)
    }
}
