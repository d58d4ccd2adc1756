// Discovery operations
// Search, nearby, personalized feed and recommendations share one row shape

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::database::models::SummaryRow;
use crate::database::models::search::SUMMARY_COLUMNS;
use crate::database::{CollaboratorError, Lookup, RowGroup};
use crate::models::search::{NearbyQuery, SearchQuery};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SearchProcedures: Send + Sync {
    /// The language filter is premium-gated inside the procedure.
    async fn search(
        &self,
        user_id: Uuid,
        filters: &SearchQuery,
    ) -> Result<Lookup<RowGroup<SummaryRow>>, CollaboratorError>;

    async fn nearby(
        &self,
        user_id: Uuid,
        filters: &NearbyQuery,
    ) -> Result<Lookup<RowGroup<SummaryRow>>, CollaboratorError>;

    async fn feed(&self, user_id: Uuid, limit: i32) -> Result<Vec<SummaryRow>, CollaboratorError>;

    async fn recommendations(
        &self,
        user_id: Uuid,
        limit: i32,
    ) -> Result<Vec<SummaryRow>, CollaboratorError>;
}

pub struct SearchOperation {
    db: Arc<PgPool>,
}

impl SearchOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

#[async_trait]
impl SearchProcedures for SearchOperation {
    async fn search(
        &self,
        user_id: Uuid,
        filters: &SearchQuery,
    ) -> Result<Lookup<RowGroup<SummaryRow>>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {SUMMARY_COLUMNS}, total_count::int8 AS total_count
            FROM activity.sp_search_activities(
                p_user_id := $1,
                p_query := $2,
                p_category_id := $3,
                p_activity_type := $4,
                p_city := $5,
                p_language := $6,
                p_tags := $7::jsonb,
                p_date_from := $8,
                p_date_to := $9,
                p_has_spots_available := $10,
                p_limit := $11,
                p_offset := $12
            )
            "#
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(user_id)
            .bind(filters.query.as_deref())
            .bind(filters.category_id)
            .bind(filters.activity_type().map(|t| t.as_str()))
            .bind(filters.city.as_deref())
            .bind(filters.language.as_deref())
            .bind(filters.tag_list().map(Json))
            .bind(filters.date_from)
            .bind(filters.date_to)
            .bind(filters.has_spots_available)
            .bind(filters.limit)
            .bind(filters.offset)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::grouped(rows))
    }

    async fn nearby(
        &self,
        user_id: Uuid,
        filters: &NearbyQuery,
    ) -> Result<Lookup<RowGroup<SummaryRow>>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT
                {SUMMARY_COLUMNS},
                total_count::int8 AS total_count,
                distance_km::float8 AS distance_km
            FROM activity.sp_nearby_activities(
                p_user_id := $1,
                p_latitude := $2::numeric,
                p_longitude := $3::numeric,
                p_radius_km := $4::numeric,
                p_category_id := $5,
                p_date_from := $6,
                p_limit := $7,
                p_offset := $8
            )
            "#
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(user_id)
            .bind(filters.latitude)
            .bind(filters.longitude)
            .bind(filters.radius_km)
            .bind(filters.category_id)
            .bind(filters.date_from)
            .bind(filters.limit)
            .bind(filters.offset)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::grouped(rows))
    }

    async fn feed(&self, user_id: Uuid, limit: i32) -> Result<Vec<SummaryRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {SUMMARY_COLUMNS} FROM activity.sp_personalized_feed(
                p_user_id := $1,
                p_limit := $2
            )
            "#
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&*self.db)
            .await?;

        Ok(rows)
    }

    async fn recommendations(
        &self,
        user_id: Uuid,
        limit: i32,
    ) -> Result<Vec<SummaryRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {SUMMARY_COLUMNS} FROM activity.sp_recommendations(
                p_user_id := $1,
                p_limit := $2
            )
            "#
        );

        let rows = sqlx::query_as::<_, SummaryRow>(&sql)
            .bind(user_id)
            .bind(limit)
            .fetch_all(&*self.db)
            .await?;

        Ok(rows)
    }
}
