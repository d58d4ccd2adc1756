// Participant and waitlist rows
// Both procedures repeat the activity aggregates on every row and return a
// single NULL-user row when the list is empty

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Keyed;

pub const PARTICIPANT_COLUMNS: &str = r#"
    activity_id,
    total_participants::int8 AS total_participants,
    max_participants,
    user_id,
    username,
    first_name,
    main_photo_url,
    is_verified,
    role::text AS role,
    participation_status::text AS participation_status,
    attendance_status::text AS attendance_status,
    joined_at
"#;

pub const WAITLIST_COLUMNS: &str = r#"
    activity_id,
    total_waitlist::int8 AS total_waitlist,
    user_id,
    username,
    first_name,
    main_photo_url,
    is_verified,
    created_at,
    notified_at
"#;

/// A row of sp_get_activity_participants.
#[derive(Debug, Clone, FromRow)]
pub struct ParticipantRow {
    pub activity_id: Uuid,
    pub total_participants: i64,
    pub max_participants: i32,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: Option<bool>,
    pub role: Option<String>,
    pub participation_status: Option<String>,
    pub attendance_status: Option<String>,
    pub joined_at: Option<DateTime<Utc>>,
}

impl Keyed for ParticipantRow {
    fn is_present(&self) -> bool {
        self.user_id.is_some()
    }
}

/// A row of sp_get_activity_waitlist. The procedure's own position column is
/// not read; positions are recomputed from `created_at`.
#[derive(Debug, Clone, FromRow)]
pub struct WaitlistRow {
    pub activity_id: Uuid,
    pub total_waitlist: i64,
    pub user_id: Option<Uuid>,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: Option<bool>,
    /// When the user joined the waitlist.
    pub created_at: Option<DateTime<Utc>>,
    pub notified_at: Option<DateTime<Utc>>,
}

impl Keyed for WaitlistRow {
    fn is_present(&self) -> bool {
        self.user_id.is_some()
    }
}
