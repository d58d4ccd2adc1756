use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use super::required;
use crate::database::models::ReviewRow;
use crate::error::AppError;

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ReviewCreate {
    #[validate(range(min = 1, max = 5))]
    pub rating: i32,
    #[validate(length(max = 2000))]
    pub review_text: Option<String>,
    #[serde(default)]
    pub is_anonymous: bool,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ReviewUpdate {
    #[validate(range(min = 1, max = 5))]
    pub rating: Option<i32>,
    #[validate(length(max = 2000))]
    pub review_text: Option<String>,
    pub is_anonymous: Option<bool>,
}

fn default_review_limit() -> i32 {
    50
}

#[derive(Debug, Clone, Copy, Deserialize, Validate)]
pub struct ReviewListQuery {
    #[serde(default = "default_review_limit")]
    #[validate(range(min = 1, max = 100))]
    pub limit: i32,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub offset: i32,
}

impl Default for ReviewListQuery {
    fn default() -> Self {
        ReviewListQuery {
            limit: default_review_limit(),
            offset: 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Reviewer {
    pub user_id: Uuid,
    pub username: String,
    pub first_name: Option<String>,
    pub main_photo_url: Option<String>,
    pub is_verified: bool,
}

/// A review as seen by one caller. `reviewer` is `None` for anonymous reviews.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Review {
    pub review_id: Uuid,
    pub activity_id: Uuid,
    pub reviewer: Option<Reviewer>,
    pub rating: i32,
    pub review_text: Option<String>,
    pub is_anonymous: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub is_own_review: bool,
}

impl Review {
    /// Build the caller's view of a review row.
    pub fn for_requester(row: ReviewRow, requester: Option<Uuid>) -> Result<Self, AppError> {
        let is_anonymous = row.is_anonymous.unwrap_or(false);
        let is_own_review = requester.is_some()
            && (row.is_own_review.unwrap_or(false) || row.reviewer_user_id == requester);

        let reviewer = match (is_anonymous, row.reviewer_user_id) {
            (false, Some(user_id)) => Some(Reviewer {
                user_id,
                username: required(row.reviewer_username, "reviewer_username")?,
                first_name: row.reviewer_first_name,
                main_photo_url: row.reviewer_main_photo_url,
                is_verified: row.reviewer_is_verified.unwrap_or(false),
            }),
            _ => None,
        };

        Ok(Review {
            review_id: required(row.review_id, "review_id")?,
            activity_id: row.activity_id,
            reviewer,
            rating: required(row.rating, "rating")?,
            review_text: row.review_text,
            is_anonymous,
            created_at: required(row.created_at, "created_at")?,
            updated_at: row.updated_at,
            is_own_review,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReviewsList {
    pub activity_id: Uuid,
    pub total_reviews: i64,
    pub average_rating: Option<f64>,
    pub reviews: Vec<Review>,
}

impl ReviewsList {
    pub fn empty(activity_id: Uuid) -> Self {
        ReviewsList {
            activity_id,
            total_reviews: 0,
            average_rating: None,
            reviews: Vec::new(),
        }
    }
}
