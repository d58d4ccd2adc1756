use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use super::{parse_column, required, string_enum};
use crate::database::models::{ParticipantRow, WaitlistRow};
use crate::error::AppError;

string_enum! {
    ParticipantRole {
        Organizer => "organizer",
        CoOrganizer => "co_organizer",
        Member => "member",
    }
}

string_enum! {
    ParticipationStatus {
        Registered => "registered",
        Waitlisted => "waitlisted",
        Declined => "declined",
        Cancelled => "cancelled",
    }
}

string_enum! {
    AttendanceStatus {
        Registered => "registered",
        Attended => "attended",
        NoShow => "no_show",
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Participant {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: bool,
    pub role: ParticipantRole,
    pub participation_status: ParticipationStatus,
    pub attendance_status: AttendanceStatus,
    pub joined_at: DateTime<Utc>,
}

impl TryFrom<ParticipantRow> for Participant {
    type Error = AppError;

    fn try_from(row: ParticipantRow) -> Result<Self, Self::Error> {
        Ok(Participant {
            user_id: required(row.user_id, "user_id")?,
            username: required(row.username, "username")?,
            first_name: row.first_name,
            main_photo_url: row.main_photo_url,
            is_verified: row.is_verified.unwrap_or(false),
            role: parse_column(&required(row.role, "role")?, "role")?,
            participation_status: parse_column(
                &required(row.participation_status, "participation_status")?,
                "participation_status",
            )?,
            attendance_status: parse_column(
                &required(row.attendance_status, "attendance_status")?,
                "attendance_status",
            )?,
            joined_at: required(row.joined_at, "joined_at")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParticipantsList {
    pub activity_id: Uuid,
    pub total_participants: i64,
    pub max_participants: i32,
    pub participants: Vec<Participant>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WaitlistEntry {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: bool,
    /// 1-based, dense, in join order.
    pub position: u32,
    pub joined_at: DateTime<Utc>,
    pub notified_at: Option<DateTime<Utc>>,
}

impl TryFrom<WaitlistRow> for WaitlistEntry {
    type Error = AppError;

    /// Position is left at 0; the caller assigns it after ordering.
    fn try_from(row: WaitlistRow) -> Result<Self, Self::Error> {
        Ok(WaitlistEntry {
            user_id: required(row.user_id, "user_id")?,
            username: required(row.username, "username")?,
            first_name: row.first_name,
            main_photo_url: row.main_photo_url,
            is_verified: row.is_verified.unwrap_or(false),
            position: 0,
            joined_at: required(row.created_at, "created_at")?,
            notified_at: row.notified_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Waitlist {
    pub activity_id: Uuid,
    pub total_waitlist: i64,
    pub waitlist: Vec<WaitlistEntry>,
}
