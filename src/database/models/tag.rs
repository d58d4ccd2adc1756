use sqlx::FromRow;

/// A row of sp_get_popular_tags.
#[derive(Debug, Clone, PartialEq, Eq, FromRow)]
pub struct TagRow {
    pub tag: String,
    pub usage_count: i64,
}
