// Activity rows
// Results of sp_create_activity, sp_get_activity_by_id, sp_update_activity,
// sp_cancel_activity and sp_delete_activity

use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::database::Keyed;

/// Shared projection of the full activity result.
///
/// Enum columns are read as text, numerics as float8 and tags as jsonb so the
/// row decodes the same way whatever the procedure's declared types are.
pub const ACTIVITY_COLUMNS: &str = r#"
    activity_id,
    organizer_user_id,
    organizer_username,
    organizer_first_name,
    organizer_main_photo_url,
    organizer_is_verified,
    category_id,
    category_name,
    title,
    description,
    activity_type::text AS activity_type,
    activity_privacy_level::text AS activity_privacy_level,
    status::text AS status,
    scheduled_at,
    duration_minutes,
    joinable_at_free,
    max_participants,
    current_participants_count,
    waitlist_count,
    location_id,
    venue_name,
    address_line1,
    address_line2,
    city,
    state_province,
    postal_code,
    country,
    latitude::float8 AS latitude,
    longitude::float8 AS longitude,
    place_id,
    to_jsonb(tags) AS tags,
    language,
    external_chat_id,
    created_at,
    updated_at,
    completed_at,
    cancelled_at,
    user_participation_status::text AS user_participation_status,
    user_can_join,
    user_can_edit,
    is_blocked
"#;

/// One activity with organizer, category, location and caller annotations
/// flattened into columns.
#[derive(Debug, Clone, FromRow)]
pub struct ActivityRow {
    pub activity_id: Option<Uuid>,
    pub organizer_user_id: Uuid,
    pub organizer_username: String,
    pub organizer_first_name: Option<String>,
    pub organizer_main_photo_url: Option<String>,
    pub organizer_is_verified: Option<bool>,
    pub category_id: Option<Uuid>,
    pub category_name: Option<String>,
    pub title: String,
    pub description: String,
    pub activity_type: String,
    pub activity_privacy_level: String,
    pub status: String,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub joinable_at_free: Option<DateTime<Utc>>,
    pub max_participants: i32,
    pub current_participants_count: i32,
    pub waitlist_count: Option<i32>,
    pub location_id: Option<Uuid>,
    pub venue_name: Option<String>,
    pub address_line1: Option<String>,
    pub address_line2: Option<String>,
    pub city: Option<String>,
    pub state_province: Option<String>,
    pub postal_code: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub place_id: Option<String>,
    pub tags: Option<Json<Vec<String>>>,
    pub language: String,
    pub external_chat_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub user_participation_status: Option<String>,
    pub user_can_join: Option<bool>,
    pub user_can_edit: Option<bool>,
    pub is_blocked: Option<bool>,
}

impl Keyed for ActivityRow {
    fn is_present(&self) -> bool {
        self.activity_id.is_some()
    }
}

/// Result of sp_cancel_activity.
#[derive(Debug, Clone, FromRow)]
pub struct CancellationRow {
    pub activity_id: Option<Uuid>,
    pub status: String,
    pub cancelled_at: DateTime<Utc>,
    pub participants_notified_count: i32,
}

impl Keyed for CancellationRow {
    fn is_present(&self) -> bool {
        self.activity_id.is_some()
    }
}

/// Result of sp_delete_activity and sp_delete_review.
#[derive(Debug, Clone, FromRow)]
pub struct DeletionRow {
    pub deleted: Option<bool>,
    pub message: String,
}

impl Keyed for DeletionRow {
    fn is_present(&self) -> bool {
        self.deleted.is_some()
    }
}
