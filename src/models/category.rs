use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use super::required;
use crate::database::models::CategoryRow;
use crate::error::AppError;

/// Slugs are ASCII letters, digits, `-` and `_`; case is folded by the service.
fn validate_slug(slug: &str) -> Result<(), ValidationError> {
    let valid = slug
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
    if valid {
        Ok(())
    } else {
        Err(ValidationError::new("slug").with_message(
            "Slug must contain only lowercase letters, numbers, and hyphens".into(),
        ))
    }
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct CategoryCreate {
    #[validate(length(min = 1, max = 100))]
    pub name: String,
    #[validate(length(min = 1, max = 100), custom(function = "validate_slug"))]
    pub slug: String,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub icon_url: Option<String>,
    #[serde(default)]
    #[validate(range(min = 0))]
    pub display_order: i32,
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct CategoryUpdate {
    #[validate(length(min = 1, max = 100))]
    pub name: Option<String>,
    #[validate(length(min = 1, max = 100), custom(function = "validate_slug"))]
    pub slug: Option<String>,
    pub description: Option<String>,
    #[validate(length(max = 500))]
    pub icon_url: Option<String>,
    #[validate(range(min = 0))]
    pub display_order: Option<i32>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Category {
    pub category_id: Uuid,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl TryFrom<CategoryRow> for Category {
    type Error = AppError;

    fn try_from(row: CategoryRow) -> Result<Self, Self::Error> {
        Ok(Category {
            category_id: required(row.category_id, "category_id")?,
            name: row.name,
            slug: row.slug,
            description: row.description,
            icon_url: row.icon_url,
            display_order: row.display_order,
            is_active: row.is_active,
            created_at: row.created_at,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CategoryList {
    pub categories: Vec<Category>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use serde_json::json;

    #[rstest]
    #[case("outdoor-sports", true)]
    #[case("Board_Games", true)]
    #[case("art & craft", false)]
    #[case("café", false)]
    fn slug_characters(#[case] slug: &str, #[case] valid: bool) {
        let input: CategoryCreate =
            serde_json::from_value(json!({"name": "Any", "slug": slug})).expect("payload");
        assert_eq!(input.validate().is_ok(), valid);
    }

    #[test]
    fn negative_display_order_is_rejected() {
        let input: CategoryUpdate =
            serde_json::from_value(json!({"display_order": -1})).expect("payload");
        assert!(input.validate().is_err());
    }
}
