use chrono::{DateTime, Utc};
use sqlx::{FromRow, types::Json};
use uuid::Uuid;

use crate::database::Keyed;

/// Projection shared by the search, nearby, feed and recommendation procedures.
pub const SUMMARY_COLUMNS: &str = r#"
    activity_id,
    title,
    description,
    activity_type::text AS activity_type,
    scheduled_at,
    duration_minutes,
    max_participants,
    current_participants_count,
    city,
    language,
    to_jsonb(tags) AS tags,
    organizer_username,
    organizer_is_verified,
    category_name
"#;

/// A discovery row. `total_count` comes only from search and nearby,
/// `distance_km` only from nearby.
#[derive(Debug, Clone, Default, FromRow)]
pub struct SummaryRow {
    pub activity_id: Option<Uuid>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub activity_type: Option<String>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i32>,
    pub max_participants: Option<i32>,
    pub current_participants_count: Option<i32>,
    pub city: Option<String>,
    pub language: Option<String>,
    pub tags: Option<Json<Vec<String>>>,
    pub organizer_username: Option<String>,
    pub organizer_is_verified: Option<bool>,
    pub category_name: Option<String>,
    #[sqlx(default)]
    pub total_count: Option<i64>,
    #[sqlx(default)]
    pub distance_km: Option<f64>,
}

impl Keyed for SummaryRow {
    fn is_present(&self) -> bool {
        self.activity_id.is_some()
    }
}
