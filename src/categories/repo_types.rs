use serde::Serialize;
use sqlx::FromRow;

/// Category record in the database.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Category {
    pub id: i64,
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}

/// Writable fields of a category.
#[derive(Debug, Clone)]
pub struct CategoryData {
    pub name: String,
    pub description: Option<String>,
    pub icon: Option<String>,
}
