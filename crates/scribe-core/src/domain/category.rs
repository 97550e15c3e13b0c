use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Category entity - each post belongs to exactly one category.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A category together with its post count, computed at read time.
#[derive(Debug, Clone)]
pub struct CategoryWithCount {
    pub category: Category,
    pub post_count: u64,
}
