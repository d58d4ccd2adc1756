// Activity operations
// sp_create_activity, sp_get_activity_by_id, sp_update_activity,
// sp_cancel_activity, sp_delete_activity

use std::sync::Arc;

use async_trait::async_trait;
use sqlx::{PgPool, types::Json};
use uuid::Uuid;

use crate::database::models::activity::ACTIVITY_COLUMNS;
use crate::database::models::{ActivityRow, CancellationRow, DeletionRow};
use crate::database::{CollaboratorError, Lookup};
use crate::models::activity::{ActivityCreate, ActivityUpdate, Location};

#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ActivityProcedures: Send + Sync {
    /// `input.tags` must already be normalized.
    async fn create(
        &self,
        organizer_id: Uuid,
        input: &ActivityCreate,
    ) -> Result<Lookup<ActivityRow>, CollaboratorError>;

    async fn get(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Lookup<ActivityRow>, CollaboratorError>;

    async fn update(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        changes: &ActivityUpdate,
    ) -> Result<Lookup<ActivityRow>, CollaboratorError>;

    async fn cancel(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        reason: Option<String>,
    ) -> Result<Lookup<CancellationRow>, CollaboratorError>;

    async fn delete(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
    ) -> Result<Lookup<DeletionRow>, CollaboratorError>;
}

/// Activity operations against the `activity` schema.
pub struct ActivityOperation {
    db: Arc<PgPool>,
}

impl ActivityOperation {
    pub fn new(db: Arc<PgPool>) -> Self {
        Self { db }
    }
}

/// Location columns in parameter order; an absent location binds all NULLs.
struct LocationParams<'a> {
    venue_name: Option<&'a str>,
    address_line1: Option<&'a str>,
    address_line2: Option<&'a str>,
    city: Option<&'a str>,
    state_province: Option<&'a str>,
    postal_code: Option<&'a str>,
    country: Option<&'a str>,
    latitude: Option<f64>,
    longitude: Option<f64>,
    place_id: Option<&'a str>,
}

impl<'a> From<Option<&'a Location>> for LocationParams<'a> {
    fn from(location: Option<&'a Location>) -> Self {
        LocationParams {
            venue_name: location.and_then(|l| l.venue_name.as_deref()),
            address_line1: location.and_then(|l| l.address_line1.as_deref()),
            address_line2: location.and_then(|l| l.address_line2.as_deref()),
            city: location.and_then(|l| l.city.as_deref()),
            state_province: location.and_then(|l| l.state_province.as_deref()),
            postal_code: location.and_then(|l| l.postal_code.as_deref()),
            country: location.and_then(|l| l.country.as_deref()),
            latitude: location.and_then(|l| l.latitude),
            longitude: location.and_then(|l| l.longitude),
            place_id: location.and_then(|l| l.place_id.as_deref()),
        }
    }
}

#[async_trait]
impl ActivityProcedures for ActivityOperation {
    async fn create(
        &self,
        organizer_id: Uuid,
        input: &ActivityCreate,
    ) -> Result<Lookup<ActivityRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {ACTIVITY_COLUMNS} FROM activity.sp_create_activity(
                p_organizer_user_id := $1,
                p_category_id := $2,
                p_title := $3,
                p_description := $4,
                p_activity_type := $5,
                p_activity_privacy_level := $6,
                p_scheduled_at := $7,
                p_duration_minutes := $8,
                p_joinable_at_free := $9,
                p_max_participants := $10,
                p_language := $11,
                p_external_chat_id := $12,
                p_venue_name := $13,
                p_address_line1 := $14,
                p_address_line2 := $15,
                p_city := $16,
                p_state_province := $17,
                p_postal_code := $18,
                p_country := $19,
                p_latitude := $20::numeric,
                p_longitude := $21::numeric,
                p_place_id := $22,
                p_tags := $23::jsonb
            )
            "#
        );
        let location = LocationParams::from(input.location.as_ref());
        // An empty tag list is sent as NULL.
        let tags = (!input.tags.is_empty()).then(|| Json(&input.tags));

        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(organizer_id)
            .bind(input.category_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.activity_type.as_str())
            .bind(input.activity_privacy_level.as_str())
            .bind(input.scheduled_at)
            .bind(input.duration_minutes)
            .bind(input.joinable_at_free)
            .bind(input.max_participants)
            .bind(&input.language)
            .bind(input.external_chat_id.as_deref())
            .bind(location.venue_name)
            .bind(location.address_line1)
            .bind(location.address_line2)
            .bind(location.city)
            .bind(location.state_province)
            .bind(location.postal_code)
            .bind(location.country)
            .bind(location.latitude)
            .bind(location.longitude)
            .bind(location.place_id)
            .bind(tags)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }

    async fn get(
        &self,
        activity_id: Uuid,
        requester_id: Uuid,
    ) -> Result<Lookup<ActivityRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {ACTIVITY_COLUMNS} FROM activity.sp_get_activity_by_id(
                p_activity_id := $1,
                p_requesting_user_id := $2
            )
            "#
        );

        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(activity_id)
            .bind(requester_id)
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }

    async fn update(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        changes: &ActivityUpdate,
    ) -> Result<Lookup<ActivityRow>, CollaboratorError> {
        let sql = format!(
            r#"
            SELECT {ACTIVITY_COLUMNS} FROM activity.sp_update_activity(
                p_activity_id := $1,
                p_user_id := $2,
                p_category_id := $3,
                p_title := $4,
                p_description := $5,
                p_activity_type := $6,
                p_activity_privacy_level := $7,
                p_scheduled_at := $8,
                p_duration_minutes := $9,
                p_joinable_at_free := $10,
                p_max_participants := $11,
                p_language := $12,
                p_external_chat_id := $13,
                p_venue_name := $14,
                p_address_line1 := $15,
                p_address_line2 := $16,
                p_city := $17,
                p_state_province := $18,
                p_postal_code := $19,
                p_country := $20,
                p_latitude := $21::numeric,
                p_longitude := $22::numeric,
                p_place_id := $23,
                p_tags := $24::jsonb
            )
            "#
        );
        let location = LocationParams::from(changes.location.as_ref());

        let rows = sqlx::query_as::<_, ActivityRow>(&sql)
            .bind(activity_id)
            .bind(user_id)
            .bind(changes.category_id)
            .bind(changes.title.as_deref())
            .bind(changes.description.as_deref())
            .bind(changes.activity_type.map(|t| t.as_str()))
            .bind(changes.activity_privacy_level.map(|p| p.as_str()))
            .bind(changes.scheduled_at)
            .bind(changes.duration_minutes)
            .bind(changes.joinable_at_free)
            .bind(changes.max_participants)
            .bind(changes.language.as_deref())
            .bind(changes.external_chat_id.as_deref())
            .bind(location.venue_name)
            .bind(location.address_line1)
            .bind(location.address_line2)
            .bind(location.city)
            .bind(location.state_province)
            .bind(location.postal_code)
            .bind(location.country)
            .bind(location.latitude)
            .bind(location.longitude)
            .bind(location.place_id)
            .bind(changes.tags.as_ref().map(Json))
            .fetch_all(&*self.db)
            .await?;

        Ok(Lookup::first(rows))
    }

    async fn cancel(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
        reason: Option<String>,
    ) -> Result<Lookup<CancellationRow>, CollaboratorError> {
        let rows = sqlx::query_as::<_, CancellationRow>(
            r#"
            SELECT
                activity_id,
                status::text AS status,
                cancelled_at,
                participants_notified_count
            FROM activity.sp_cancel_activity(
                p_activity_id := $1,
                p_user_id := $2,
                p_cancellation_reason := $3
            )
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .bind(reason)
        .fetch_all(&*self.db)
        .await?;

        Ok(Lookup::first(rows))
    }

    async fn delete(
        &self,
        activity_id: Uuid,
        user_id: Uuid,
    ) -> Result<Lookup<DeletionRow>, CollaboratorError> {
        let rows = sqlx::query_as::<_, DeletionRow>(
            r#"
            SELECT deleted, message
            FROM activity.sp_delete_activity(
                p_activity_id := $1,
                p_user_id := $2
            )
            "#,
        )
        .bind(activity_id)
        .bind(user_id)
        .fetch_all(&*self.db)
        .await?;

        Ok(Lookup::first(rows))
    }
}
