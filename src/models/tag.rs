use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::database::models::TagRow;

pub const DEFAULT_TAG_LIMIT: i32 = 50;
pub const MAX_TAG_LIMIT: i32 = 100;

/// Query string of `GET /activities/tags/popular`. `limit` is clamped by the
/// service instead of being rejected.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct TagQuery {
    pub limit: Option<i32>,
    #[validate(length(max = 100))]
    pub prefix: Option<String>,
}

impl TagQuery {
    pub fn effective_limit(&self) -> i32 {
        self.limit
            .unwrap_or(DEFAULT_TAG_LIMIT)
            .clamp(1, MAX_TAG_LIMIT)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Tag {
    pub tag: String,
    pub usage_count: i64,
}

impl From<TagRow> for Tag {
    fn from(row: TagRow) -> Self {
        Tag {
            tag: row.tag,
            usage_count: row.usage_count,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PopularTags {
    pub tags: Vec<Tag>,
}
