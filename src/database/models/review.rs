use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Keyed;

/// Columns common to every review procedure. The listing procedure adds the
/// aggregates; see [`REVIEW_LIST_COLUMNS`].
pub const REVIEW_COLUMNS: &str = r#"
    review_id,
    activity_id,
    reviewer_user_id,
    reviewer_username,
    reviewer_first_name,
    reviewer_main_photo_url,
    reviewer_is_verified,
    rating,
    review_text,
    is_anonymous,
    created_at,
    updated_at
"#;

pub const REVIEW_LIST_COLUMNS: &str = r#"
    review_id,
    activity_id,
    reviewer_user_id,
    reviewer_username,
    reviewer_first_name,
    reviewer_main_photo_url,
    reviewer_is_verified,
    rating,
    review_text,
    is_anonymous,
    created_at,
    updated_at,
    is_own_review,
    total_reviews::int8 AS total_reviews,
    average_rating::float8 AS average_rating
"#;

/// A review row. Single-review procedures leave the listing columns out,
/// which `#[sqlx(default)]` turns into `None`.
#[derive(Debug, Clone, Default, FromRow)]
pub struct ReviewRow {
    pub review_id: Option<Uuid>,
    pub activity_id: Uuid,
    pub reviewer_user_id: Option<Uuid>,
    pub reviewer_username: Option<String>,
    pub reviewer_first_name: Option<String>,
    pub reviewer_main_photo_url: Option<String>,
    pub reviewer_is_verified: Option<bool>,
    pub rating: Option<i32>,
    pub review_text: Option<String>,
    pub is_anonymous: Option<bool>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
    #[sqlx(default)]
    pub is_own_review: Option<bool>,
    #[sqlx(default)]
    pub total_reviews: Option<i64>,
    #[sqlx(default)]
    pub average_rating: Option<f64>,
}

impl Keyed for ReviewRow {
    fn is_present(&self) -> bool {
        self.review_id.is_some()
    }
}
