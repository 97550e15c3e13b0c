use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tag entity - many-to-many with posts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Tag {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A tag together with its post count, computed at read time.
#[derive(Debug, Clone)]
pub struct TagWithCount {
    pub tag: Tag,
    pub post_count: u64,
}
