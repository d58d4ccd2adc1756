use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::{parse_column, required, string_enum, validate_finite};
use crate::database::models::{ActivityRow, CancellationRow, DeletionRow};
use crate::error::AppError;

string_enum! {
    ActivityType {
        Standard => "standard",
        Xxl => "xxl",
        WomensOnly => "womens_only",
        MensOnly => "mens_only",
    }
}

impl Default for ActivityType {
    fn default() -> Self {
        ActivityType::Standard
    }
}

string_enum! {
    PrivacyLevel {
        Public => "public",
        FriendsOnly => "friends_only",
        InviteOnly => "invite_only",
    }
}

impl Default for PrivacyLevel {
    fn default() -> Self {
        PrivacyLevel::Public
    }
}

string_enum! {
    /// Lifecycle of an activity. Cancelled and completed are terminal.
    ActivityStatus {
        Draft => "draft",
        Published => "published",
        Cancelled => "cancelled",
        Completed => "completed",
    }
}

fn default_language() -> String {
    "en".to_string()
}

/// Where an activity takes place.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
pub struct Location {
    #[validate(length(max = 255))]
    pub venue_name: Option<String>,
    #[validate(length(max = 255))]
    pub address_line1: Option<String>,
    #[validate(length(max = 255))]
    pub address_line2: Option<String>,
    #[validate(length(max = 100))]
    pub city: Option<String>,
    #[validate(length(max = 100))]
    pub state_province: Option<String>,
    #[validate(length(max = 20))]
    pub postal_code: Option<String>,
    #[validate(length(max = 100))]
    pub country: Option<String>,
    #[validate(range(min = -90.0, max = 90.0), custom(function = "validate_finite"))]
    pub latitude: Option<f64>,
    #[validate(range(min = -180.0, max = 180.0), custom(function = "validate_finite"))]
    pub longitude: Option<f64>,
    #[validate(length(max = 255))]
    pub place_id: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ActivityCreate {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub title: String,
    #[validate(length(min = 10))]
    pub description: String,
    #[serde(default)]
    pub activity_type: ActivityType,
    #[serde(default)]
    pub activity_privacy_level: PrivacyLevel,
    pub scheduled_at: DateTime<Utc>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    pub joinable_at_free: Option<DateTime<Utc>>,
    #[validate(range(min = 2, max = 1000))]
    pub max_participants: i32,
    #[validate(nested)]
    pub location: Option<Location>,
    #[serde(default)]
    #[validate(length(max = 20, message = "Maximum 20 tags allowed"))]
    pub tags: Vec<String>,
    #[serde(default = "default_language")]
    #[validate(length(min = 2, max = 5))]
    pub language: String,
    #[validate(length(max = 255))]
    pub external_chat_id: Option<String>,
}

/// Partial update; absent fields are left unchanged by the collaborator.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityUpdate {
    pub category_id: Option<Uuid>,
    #[validate(length(min = 1, max = 255))]
    pub title: Option<String>,
    #[validate(length(min = 10))]
    pub description: Option<String>,
    pub activity_type: Option<ActivityType>,
    pub activity_privacy_level: Option<PrivacyLevel>,
    pub scheduled_at: Option<DateTime<Utc>>,
    #[validate(range(min = 1))]
    pub duration_minutes: Option<i32>,
    pub joinable_at_free: Option<DateTime<Utc>>,
    #[validate(range(min = 2, max = 1000))]
    pub max_participants: Option<i32>,
    #[validate(nested)]
    pub location: Option<Location>,
    #[validate(length(max = 20, message = "Maximum 20 tags allowed"))]
    pub tags: Option<Vec<String>>,
    #[validate(length(min = 2, max = 5))]
    pub language: Option<String>,
    #[validate(length(max = 255))]
    pub external_chat_id: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ActivityCancel {
    #[validate(length(max = 500))]
    pub cancellation_reason: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Organizer {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryRef {
    pub category_id: Uuid,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LocationInfo {
    pub location_id: Uuid,
    #[serde(flatten)]
    pub details: Location,
}

/// Full activity view, annotated for the requesting user.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Activity {
    pub activity_id: Uuid,
    pub organizer: Organizer,
    pub category: Option<CategoryRef>,
    pub title: String,
    pub description: String,
    pub activity_type: ActivityType,
    pub activity_privacy_level: PrivacyLevel,
    pub status: ActivityStatus,
    pub scheduled_at: DateTime<Utc>,
    pub duration_minutes: Option<i32>,
    pub joinable_at_free: Option<DateTime<Utc>>,
    pub max_participants: i32,
    pub current_participants_count: i32,
    pub waitlist_count: i32,
    pub location: Option<LocationInfo>,
    pub tags: Vec<String>,
    pub language: String,
    pub external_chat_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub completed_at: Option<DateTime<Utc>>,
    pub cancelled_at: Option<DateTime<Utc>>,
    pub user_participation_status: Option<String>,
    pub user_can_join: bool,
    pub user_can_edit: bool,
    pub is_blocked: bool,
}

impl TryFrom<ActivityRow> for Activity {
    type Error = AppError;

    fn try_from(row: ActivityRow) -> Result<Self, Self::Error> {
        let activity_id = required(row.activity_id, "activity_id")?;

        if row.current_participants_count > row.max_participants {
            tracing::error!(
                activity_id = %activity_id,
                current = row.current_participants_count,
                max = row.max_participants,
                "activity_over_capacity"
            );
            return Err(AppError::internal("An internal error occurred"));
        }

        let category = match (row.category_id, row.category_name) {
            (Some(category_id), Some(name)) => Some(CategoryRef { category_id, name }),
            _ => None,
        };

        let location = row.location_id.map(|location_id| LocationInfo {
            location_id,
            details: Location {
                venue_name: row.venue_name,
                address_line1: row.address_line1,
                address_line2: row.address_line2,
                city: row.city,
                state_province: row.state_province,
                postal_code: row.postal_code,
                country: row.country,
                latitude: row.latitude,
                longitude: row.longitude,
                place_id: row.place_id,
            },
        });

        Ok(Activity {
            activity_id,
            organizer: Organizer {
                user_id: row.organizer_user_id,
                username: row.organizer_username,
                first_name: row.organizer_first_name,
                main_photo_url: row.organizer_main_photo_url,
                is_verified: row.organizer_is_verified.unwrap_or(false),
            },
            category,
            title: row.title,
            description: row.description,
            activity_type: parse_column(&row.activity_type, "activity_type")?,
            activity_privacy_level: parse_column(
                &row.activity_privacy_level,
                "activity_privacy_level",
            )?,
            status: parse_column(&row.status, "status")?,
            scheduled_at: row.scheduled_at,
            duration_minutes: row.duration_minutes,
            joinable_at_free: row.joinable_at_free,
            max_participants: row.max_participants,
            current_participants_count: row.current_participants_count,
            waitlist_count: row.waitlist_count.unwrap_or(0),
            location,
            tags: row.tags.map(|tags| tags.0).unwrap_or_default(),
            language: row.language,
            external_chat_id: row.external_chat_id,
            created_at: row.created_at,
            updated_at: row.updated_at,
            completed_at: row.completed_at,
            cancelled_at: row.cancelled_at,
            user_participation_status: row.user_participation_status,
            user_can_join: row.user_can_join.unwrap_or(false),
            user_can_edit: row.user_can_edit.unwrap_or(false),
            is_blocked: row.is_blocked.unwrap_or(false),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ActivityCancelResponse {
    pub activity_id: Uuid,
    pub status: ActivityStatus,
    pub cancelled_at: DateTime<Utc>,
    pub participants_notified: i32,
    pub message: String,
}

impl TryFrom<CancellationRow> for ActivityCancelResponse {
    type Error = AppError;

    fn try_from(row: CancellationRow) -> Result<Self, Self::Error> {
        Ok(ActivityCancelResponse {
            activity_id: required(row.activity_id, "activity_id")?,
            status: parse_column(&row.status, "status")?,
            cancelled_at: row.cancelled_at,
            participants_notified: row.participants_notified_count,
            message: "Activity cancelled successfully. All participants have been notified."
                .to_string(),
        })
    }
}

/// `{deleted, message}` as reported by the collaborator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DeleteResponse {
    pub deleted: bool,
    pub message: String,
}

impl From<DeletionRow> for DeleteResponse {
    fn from(row: DeletionRow) -> Self {
        DeleteResponse {
            deleted: row.deleted.unwrap_or(false),
            message: row.message,
        }
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;
    use sqlx::types::Json;

    /// A published activity row with sensible defaults for tests.
    pub fn activity_row(activity_id: Uuid, organizer: Uuid) -> ActivityRow {
        ActivityRow {
            activity_id: Some(activity_id),
            organizer_user_id: organizer,
            organizer_username: "organizer".to_string(),
            organizer_first_name: Some("Ada".to_string()),
            organizer_main_photo_url: None,
            organizer_is_verified: Some(true),
            category_id: None,
            category_name: None,
            title: "Sunday hike".to_string(),
            description: "A relaxed hike around the lake".to_string(),
            activity_type: "standard".to_string(),
            activity_privacy_level: "public".to_string(),
            status: "published".to_string(),
            scheduled_at: Utc::now(),
            duration_minutes: Some(120),
            joinable_at_free: None,
            max_participants: 10,
            current_participants_count: 3,
            waitlist_count: Some(0),
            location_id: None,
            venue_name: None,
            address_line1: None,
            address_line2: None,
            city: None,
            state_province: None,
            postal_code: None,
            country: None,
            latitude: None,
            longitude: None,
            place_id: None,
            tags: Some(Json(vec!["hiking".to_string()])),
            language: "en".to_string(),
            external_chat_id: None,
            created_at: Utc::now(),
            updated_at: None,
            completed_at: None,
            cancelled_at: None,
            user_participation_status: None,
            user_can_join: Some(true),
            user_can_edit: Some(false),
            is_blocked: Some(false),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::fixtures::activity_row;
    use super::*;
    use crate::error::ErrorKind;
    use rstest::rstest;
    use serde_json::json;

    fn create_body(tags: usize) -> serde_json::Value {
        json!({
            "title": "Board games",
            "description": "Weekly board game evening",
            "scheduled_at": "2030-01-01T18:00:00Z",
            "max_participants": 8,
            "tags": (0..tags).map(|i| format!("tag{i}")).collect::<Vec<_>>(),
        })
    }

    #[test]
    fn create_defaults_are_applied() {
        let input: ActivityCreate = serde_json::from_value(create_body(0)).expect("payload");
        assert_eq!(input.activity_type, ActivityType::Standard);
        assert_eq!(input.activity_privacy_level, PrivacyLevel::Public);
        assert_eq!(input.language, "en");
        assert!(input.validate().is_ok());
    }

    #[test]
    fn twenty_one_tags_are_rejected() {
        let input: ActivityCreate = serde_json::from_value(create_body(21)).expect("payload");
        let errors = input.validate().expect_err("too many tags");
        assert!(errors.field_errors().contains_key("tags"));

        let input: ActivityCreate = serde_json::from_value(create_body(20)).expect("payload");
        assert!(input.validate().is_ok());
    }

    #[rstest]
    #[case(1)]
    #[case(1001)]
    fn capacity_outside_bounds_is_rejected(#[case] max: i32) {
        let mut body = create_body(0);
        body["max_participants"] = json!(max);
        let input: ActivityCreate = serde_json::from_value(body).expect("payload");
        assert!(input.validate().is_err());
    }

    #[test]
    fn nested_location_is_validated() {
        let mut body = create_body(0);
        body["location"] = json!({"latitude": 91.0, "longitude": 0.0});
        let input: ActivityCreate = serde_json::from_value(body).expect("payload");
        assert!(input.validate().is_err());
    }

    #[test]
    fn location_rejects_nan_coordinates() {
        let location = Location {
            latitude: Some(f64::NAN),
            longitude: Some(0.0),
            ..Location::default()
        };
        assert!(location.validate().is_err());
        assert!(Location::default().validate().is_ok());
    }

    #[test]
    fn unknown_activity_type_fails_to_deserialize() {
        let mut body = create_body(0);
        body["activity_type"] = json!("mega");
        assert!(serde_json::from_value::<ActivityCreate>(body).is_err());
    }

    #[test]
    fn row_converts_into_nested_view() {
        let id = Uuid::new_v4();
        let organizer = Uuid::new_v4();
        let mut row = activity_row(id, organizer);
        row.category_id = Some(Uuid::new_v4());
        row.category_name = Some("Outdoors".to_string());
        row.location_id = Some(Uuid::new_v4());
        row.city = Some("Utrecht".to_string());

        let activity = Activity::try_from(row).expect("valid row");
        assert_eq!(activity.activity_id, id);
        assert_eq!(activity.organizer.user_id, organizer);
        assert_eq!(activity.category.expect("category").name, "Outdoors");
        assert_eq!(
            activity.location.expect("location").details.city.as_deref(),
            Some("Utrecht")
        );
        assert_eq!(activity.tags, vec!["hiking"]);
    }

    #[test]
    fn over_capacity_rows_are_rejected() {
        let mut row = activity_row(Uuid::new_v4(), Uuid::new_v4());
        row.current_participants_count = 11;
        let err = Activity::try_from(row).expect_err("invariant");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }

    #[test]
    fn unknown_status_column_is_internal() {
        let mut row = activity_row(Uuid::new_v4(), Uuid::new_v4());
        row.status = "archived".to_string();
        let err = Activity::try_from(row).expect_err("bad status");
        assert_eq!(err.kind(), ErrorKind::Internal);
    }
}
