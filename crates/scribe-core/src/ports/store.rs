use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, CategoryWithCount, Post, PostDetail, Tag, TagWithCount};
use crate::error::StoreError;
use crate::filter::PostQuery;

/// Scalar change set for a post update. `None` leaves the column untouched;
/// `excerpt` is doubly optional so an explicit clear (`Some(None)`) is
/// distinguishable from "not supplied".
#[derive(Debug, Clone, Default)]
pub struct PostChanges {
    pub title: Option<String>,
    pub slug: Option<String>,
    pub content: Option<String>,
    pub read_time: Option<i32>,
    pub excerpt: Option<Option<String>>,
    pub category_id: Option<i32>,
}

#[derive(Debug, Clone)]
pub struct NewCategory {
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct CategoryChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
}

#[derive(Debug, Clone)]
pub struct NewTag {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct TagChanges {
    pub name: Option<String>,
}

/// Post persistence operations.
///
/// Read paths resolve the category and tag relations. Tag reconciliation is
/// deliberately split into [`clear_tags`](PostStore::clear_tags) and
/// [`connect_tags`](PostStore::connect_tags): the lifecycle manager issues
/// them as two sequential writes with no transaction around them, so a
/// concurrent reader (or a failure between the two) observes a post with an
/// empty tag set.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Count posts matching the predicate.
    async fn count(&self, query: &PostQuery) -> Result<u64, StoreError>;

    /// Fetch one page of matching posts, newest first, relations resolved.
    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, StoreError>;

    /// Fetch a single post with relations resolved.
    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostDetail>, StoreError>;

    /// Whether a post with this exact title exists, optionally excluding one id.
    async fn title_exists(&self, title: &str, exclude: Option<Uuid>) -> Result<bool, StoreError>;

    /// Persist a new post and connect its initial tag set.
    async fn insert(&self, post: Post, tag_ids: &[i32]) -> Result<PostDetail, StoreError>;

    /// Apply a scalar change set and return the updated row with relations.
    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<PostDetail, StoreError>;

    /// Remove all tag associations for a post.
    async fn clear_tags(&self, id: Uuid) -> Result<(), StoreError>;

    /// Connect a set of tags to a post. Callers clear first.
    async fn connect_tags(&self, id: Uuid, tag_ids: &[i32]) -> Result<(), StoreError>;

    /// Delete a post; its tag associations go with it.
    async fn delete(&self, id: Uuid) -> Result<(), StoreError>;
}

/// Category persistence operations. Counts are derived at read time.
#[async_trait]
pub trait CategoryStore: Send + Sync {
    /// All categories ordered by name ascending, each with its post count.
    async fn find_all(&self) -> Result<Vec<CategoryWithCount>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryWithCount>, StoreError>;

    async fn name_exists(&self, name: &str, exclude: Option<i32>) -> Result<bool, StoreError>;

    async fn insert(&self, category: NewCategory) -> Result<Category, StoreError>;

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}

/// Tag persistence operations. Counts are derived at read time.
#[async_trait]
pub trait TagStore: Send + Sync {
    /// All tags ordered by name ascending, each with its post count.
    async fn find_all(&self) -> Result<Vec<TagWithCount>, StoreError>;

    async fn find_by_id(&self, id: i32) -> Result<Option<TagWithCount>, StoreError>;

    async fn name_exists(&self, name: &str, exclude: Option<i32>) -> Result<bool, StoreError>;

    async fn insert(&self, tag: NewTag) -> Result<Tag, StoreError>;

    async fn update(&self, id: i32, changes: TagChanges) -> Result<Tag, StoreError>;

    async fn delete(&self, id: i32) -> Result<(), StoreError>;
}
