use std::sync::Arc;

use async_trait::async_trait;
use sqlx::PgPool;
use uuid::Uuid;

use crate::database::models::CategoryRow;
use crate::database::models::category::CATEGORY_COLUMNS;
use crate::database::{CollaboratorError, Keyed, Lookup};
use crate::models::category::{CategoryCreate, CategoryUpdate};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CategoryProcedures: Send + Sync {
    /// Active categories in display order.
    async fn list(&self) -> Result<Vec<CategoryRow>, CollaboratorError>;

    /// `input.slug` must already be lower-cased.
    async fn create(&self, input: &CategoryCreate) -> Result<Lookup<CategoryRow>, CollaboratorError>;

    async fn update(
        &self,
        category_id: Uuid,
        changes: &CategoryUpdate,
    ) -> Result<Lookup<CategoryRow>, CollaboratorError>;
}

pub struct CategoryOperation {
    db: Arc<PgPool>,
}

impl CategoryOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl CategoryProcedures for CategoryOperation {
    async fn list(&self) -> Result<Vec<CategoryRow>, CollaboratorError> {
        let sql = format!("SELECT {CATEGORY_COLUMNS} FROM activity.sp_list_categories()");

        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .fetch_all(&*self.db)
            .await?;

        Ok(rows.into_iter().filter(Keyed::is_present).collect())
    }

    async fn create(&self, input: &CategoryCreate) -> Result<Lookup<CategoryRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM activity.sp_create_category(
                p_name := $1,
                p_slug := $2,
                p_description := $3,
                p_icon_url := $4,
                p_display_order := $5
            )
            "#
        );

        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(&input.name)
            .bind(&input.slug)
            .bind(input.description.as_deref())
            .bind(input.icon_url.as_deref())
            .bind(input.display_order)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }

    async fn update(
        &self,
        category_id: Uuid,
        changes: &CategoryUpdate,
    ) -> Result<Lookup<CategoryRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {CATEGORY_COLUMNS} FROM activity.sp_update_category(
                p_category_id := $1,
                p_name := $2,
                p_slug := $3,
                p_description := $4,
                p_icon_url := $5,
                p_display_order := $6,
                p_is_active := $7
            )
            "#
        );

        let rows = sqlx::query_as::<_, CategoryRow>(&sql)
            .bind(category_id)
            .bind(changes.name.as_deref())
            .bind(changes.slug.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.icon_url.as_deref())
            .bind(changes.display_order)
            .bind(changes.is_active)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }
}
