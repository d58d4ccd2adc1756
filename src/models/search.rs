use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::activity::ActivityType;
use super::{parse_column, required, validate_finite};
use crate::database::models::SummaryRow;
use crate::error::AppError;

const MAX_SEARCH_TAGS: usize = 10;

fn default_page_limit() -> i32 {
    20
}

fn default_radius_km() -> f64 {
    10.0
}

fn default_recommendation_limit() -> i32 {
    10
}

fn split_tags(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|tag| !tag.is_empty())
        .map(str::to_string)
        .collect()
}

fn validate_tag_filter(raw: &str) -> Result<(), ValidationError> {
    if split_tags(raw).len() > MAX_SEARCH_TAGS {
        return Err(ValidationError::new("length")
            .with_message("Maximum 10 tags allowed".into()));
    }
    Ok(())
}

/// Query string of `GET /activities/search`.
///
/// `tags` is a comma-separated list. An unrecognised `activity_type` is
/// ignored rather than rejected.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct SearchQuery {
    #[validate(length(max = 255))]
    pub query: Option<String>,
    pub category_id: Option<Uuid>,
    pub activity_type: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 5))]
    pub language: Option<String>,
    #[validate(custom(function = "validate_tag_filter"))]
    pub tags: Option<String>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub has_spots_available: Option<bool>,
    #[serde(default = "default_page_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i32,
}

impl Default for SearchQuery {
    fn default() -> Self {
        SearchQuery {
            query: None,
            category_id: None,
            activity_type: None,
            city: None,
            language: None,
            tags: None,
            date_from: None,
            date_to: None,
            has_spots_available: None,
            limit: default_page_limit(),
            offset: 0,
        }
    }
}

impl SearchQuery {
    pub fn activity_type(&self) -> Option<ActivityType> {
        self.activity_type.as_deref().and_then(|value| value.parse().ok())
    }

    /// `None` when no usable tag was given.
    pub fn tag_list(&self) -> Option<Vec<String>> {
        self.tags
            .as_deref()
            .map(split_tags)
            .filter(|tags| !tags.is_empty())
    }
}

/// Query string of `GET /activities/nearby`.
#[derive(Debug, Clone, Deserialize, Validate)]
pub struct NearbyQuery {
    #[validate(range(min = -90.0, max = 90.0), custom(function = "validate_finite"))]
    pub latitude: f64,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "validate_finite"))]
    pub longitude: f64,
    #[serde(default = "default_radius_km")]
    #[validate(range(exclusive_min = 0.0, max = 100.0))]
    pub radius_km: f64,
    pub category_id: Option<Uuid>,
    pub date_from: Option<DateTime<Utc>>,
    #[serde(default = "default_page_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct FeedQuery {
    #[serde(default = "default_page_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i32,
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct RecommendationQuery {
    #[serde(default = "default_recommendation_limit")]
    #[validate(range(min = 1, max = 50))]
    pub limit: i32,
}

/// Compact activity view used by every discovery listing.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivitySummary {
    pub activity_id: Uuid,
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub max_participants: i32,
    pub current_participants_count: i32,
    pub city: Option<String>,
    pub language: String,
    pub tags: Vec<String>,
    pub organizer_username: String,
    pub organizer_is_verified: bool,
    pub category_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub distance_km: Option<f64>,
}

impl TryFrom<SummaryRow> for ActivitySummary {
    type Error = AppError;

    fn try_from(row: SummaryRow) -> Result<Self, Self::Error> {
        let activity_id = required(row.activity_id, "activity_id")?;
        let max_participants = required(row.max_participants, "max_participants")?;
        let current_participants_count =
            required(row.current_participants_count, "current_participants_count")?;

        if current_participants_count > max_participants {
            tracing::error!(
                activity_id = %activity_id,
                current = current_participants_count,
                max = max_participants,
                "activity_over_capacity"
            );
            return Err(AppError::internal("An internal error occurred"));
        }

        Ok(ActivitySummary {
            activity_id,
            title: required(row.title, "title")?,
            description: required(row.description, "description")?,
            activity_type: parse_column(
                &required(row.activity_type, "activity_type")?,
                "activity_type",
            )?,
            scheduled_at: required(row.scheduled_at, "scheduled_at")?,
            duration_minutes: row.duration_minutes,
            max_participants,
            current_participants_count,
            city: row.city,
            language: required(row.language, "language")?,
            tags: row.tags.map(|tags| tags.0).unwrap_or_default(),
            organizer_username: required(row.organizer_username, "organizer_username")?,
            organizer_is_verified: row.organizer_is_verified.unwrap_or(false),
            category_name: row.category_name,
            distance_km: row.distance_km,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SearchResponse {
    pub total_results: i64,
    pub limit: i32,
    pub offset: i32,
    pub activities: Vec<ActivitySummary>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FeedResponse {
    pub activities: Vec<ActivitySummary>,
    pub reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationsResponse {
    pub activities: Vec<ActivitySummary>,
    pub recommendation_reason: Option<String>,
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use sqlx::types::Json;

    pub fn summary_row(title: &str) -> SummaryRow {
        SummaryRow {
            activity_id: Some(Uuid::new_v4()),
            title: Some(title.to_string()),
            description: Some("Something to do together".to_string()),
            activity_type: Some("standard".to_string()),
            scheduled_at: Some(Utc::now()),
            duration_minutes: None,
            max_participants: Some(10),
            current_participants_count: Some(2),
            city: Some("Ghent".to_string()),
            language: Some("en".to_string()),
            tags: Some(Json(vec!["music".to_string()])),
            organizer_username: Some("host".to_string()),
            organizer_is_verified: Some(false),
            category_name: None,
            total_count: Some(1),
            distance_km: None,
        }
    }
}
