use chrono::{DateTime, Utc};
use sqlx::FromRow;
use uuid::Uuid;

use crate::database::Keyed;

pub const CATEGORY_COLUMNS: &str = r#"
    category_id,
    name,
    slug,
    description,
    icon_url,
    display_order,
    is_active,
    created_at
"#;

/// A row of sp_list_categories, sp_create_category or sp_update_category.
#[derive(Debug, Clone, FromRow)]
pub struct CategoryRow {
    pub category_id: Option<Uuid>,
    pub name: String,
    pub slug: String,
    pub description: Option<String>,
    pub icon_url: Option<String>,
    pub display_order: i32,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Keyed for CategoryRow {
    fn is_present(&self) -> bool {
        self.category_id.is_some()
    }
}
