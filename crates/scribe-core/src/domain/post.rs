use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::{Category, Tag};

/// Post entity - a published article with derived slug and read time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub content: String,
    pub excerpt: Option<String>,
    pub read_time: i32,
    pub category_id: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    /// Create a new post with generated ID and timestamps. `slug` and
    /// `read_time` are expected to be freshly derived from `title`/`content`.
    pub fn new(
        title: String,
        slug: String,
        content: String,
        excerpt: Option<String>,
        read_time: i32,
        category_id: i32,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            title,
            slug,
            content,
            excerpt,
            read_time,
            category_id,
            created_at: now,
            updated_at: now,
        }
    }
}

/// A post with its relations resolved, as returned by the store read paths.
#[derive(Debug, Clone)]
pub struct PostDetail {
    pub post: Post,
    pub category: Category,
    pub tags: Vec<Tag>,
}
