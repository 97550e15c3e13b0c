//! In-memory store implementation.
//!
//! Backs the server when no database is configured and doubles as the test
//! fake for the core services. Behavior mirrors the PostgreSQL adapter:
//! reference checks surface as constraint violations, reads resolve
//! relations, and pages are ordered newest first. Data is lost on restart.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI32, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use scribe_core::domain::{Category, CategoryWithCount, Post, PostDetail, Tag, TagWithCount};
use scribe_core::error::StoreError;
use scribe_core::filter::PostQuery;
use scribe_core::ports::{
    CategoryChanges, CategoryStore, NewCategory, NewTag, PostChanges, PostStore, TagChanges,
    TagStore,
};

#[derive(Default)]
struct Tables {
    posts: HashMap<Uuid, Post>,
    categories: HashMap<i32, Category>,
    tags: HashMap<i32, Tag>,
    post_tags: HashMap<Uuid, Vec<i32>>,
}

/// In-memory store over async-locked tables with sequence counters for the
/// integer keys.
#[derive(Default)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
    category_seq: AtomicI32,
    tag_seq: AtomicI32,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Tables {
    fn matches(&self, post: &Post, query: &PostQuery) -> bool {
        if let Some(needle) = &query.title_contains {
            if !post.title.to_lowercase().contains(&needle.to_lowercase()) {
                return false;
            }
        }
        if let Some((start, end)) = query.created_within {
            if post.created_at < start || post.created_at >= end {
                return false;
            }
        }
        if let Some(category_id) = query.category_id {
            if post.category_id != category_id {
                return false;
            }
        }
        if let Some(tag_id) = query.tag_id {
            let tagged = self
                .post_tags
                .get(&post.id)
                .is_some_and(|ids| ids.contains(&tag_id));
            if !tagged {
                return false;
            }
        }
        true
    }

    fn detail(&self, post: &Post) -> Result<PostDetail, StoreError> {
        let category = self
            .categories
            .get(&post.category_id)
            .cloned()
            .ok_or_else(|| StoreError::Query("post references a missing category".to_string()))?;
        let tags = self
            .post_tags
            .get(&post.id)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.tags.get(id).cloned())
                    .collect()
            })
            .unwrap_or_default();

        Ok(PostDetail {
            post: post.clone(),
            category,
            tags,
        })
    }

    fn check_tags_exist(&self, tag_ids: &[i32]) -> Result<(), StoreError> {
        if let Some(missing) = tag_ids.iter().find(|id| !self.tags.contains_key(id)) {
            return Err(StoreError::Constraint(format!(
                "foreign key violation: tag {missing} does not exist"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl PostStore for InMemoryStore {
    async fn count(&self, query: &PostQuery) -> Result<u64, StoreError> {
        let tables = self.tables.read().await;
        let count = tables
            .posts
            .values()
            .filter(|post| tables.matches(post, query))
            .count();
        Ok(count as u64)
    }

    async fn find_page(
        &self,
        query: &PostQuery,
        offset: u64,
        limit: u64,
    ) -> Result<Vec<PostDetail>, StoreError> {
        let tables = self.tables.read().await;
        let mut matching: Vec<&Post> = tables
            .posts
            .values()
            .filter(|post| tables.matches(post, query))
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        matching
            .into_iter()
            .skip(offset as usize)
            .take(limit as usize)
            .map(|post| tables.detail(post))
            .collect()
    }

    async fn find_by_id(&self, id: Uuid) -> Result<Option<PostDetail>, StoreError> {
        let tables = self.tables.read().await;
        match tables.posts.get(&id) {
            Some(post) => tables.detail(post).map(Some),
            None => Ok(None),
        }
    }

    async fn title_exists(&self, title: &str, exclude: Option<Uuid>) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .posts
            .values()
            .any(|post| post.title == title && Some(post.id) != exclude))
    }

    async fn insert(&self, post: Post, tag_ids: &[i32]) -> Result<PostDetail, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.values().any(|row| row.title == post.title) {
            return Err(StoreError::Constraint(
                "duplicate key value violates unique constraint on title".to_string(),
            ));
        }
        if !tables.categories.contains_key(&post.category_id) {
            return Err(StoreError::Constraint(format!(
                "foreign key violation: category {} does not exist",
                post.category_id
            )));
        }
        tables.check_tags_exist(tag_ids)?;

        let id = post.id;
        tables.post_tags.insert(id, tag_ids.to_vec());
        tables.posts.insert(id, post);

        let post = tables.posts[&id].clone();
        tables.detail(&post)
    }

    async fn update(&self, id: Uuid, changes: PostChanges) -> Result<PostDetail, StoreError> {
        let mut tables = self.tables.write().await;
        if let Some(category_id) = changes.category_id {
            if !tables.categories.contains_key(&category_id) {
                return Err(StoreError::Constraint(format!(
                    "foreign key violation: category {category_id} does not exist"
                )));
            }
        }

        let post = tables.posts.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(title) = changes.title {
            post.title = title;
        }
        if let Some(slug) = changes.slug {
            post.slug = slug;
        }
        if let Some(content) = changes.content {
            post.content = content;
        }
        if let Some(read_time) = changes.read_time {
            post.read_time = read_time;
        }
        if let Some(excerpt) = changes.excerpt {
            post.excerpt = excerpt;
        }
        if let Some(category_id) = changes.category_id {
            post.category_id = category_id;
        }
        post.updated_at = Utc::now();

        let post = post.clone();
        tables.detail(&post)
    }

    async fn clear_tags(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.post_tags.insert(id, Vec::new());
        Ok(())
    }

    async fn connect_tags(&self, id: Uuid, tag_ids: &[i32]) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.check_tags_exist(tag_ids)?;
        let assigned = tables.post_tags.entry(id).or_default();
        for tag_id in tag_ids {
            if !assigned.contains(tag_id) {
                assigned.push(*tag_id);
            }
        }
        Ok(())
    }

    async fn delete(&self, id: Uuid) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        tables.posts.remove(&id).ok_or(StoreError::NotFound)?;
        tables.post_tags.remove(&id);
        Ok(())
    }
}

#[async_trait]
impl CategoryStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<CategoryWithCount>, StoreError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<CategoryWithCount> = tables
            .categories
            .values()
            .map(|category| CategoryWithCount {
                category: category.clone(),
                post_count: tables
                    .posts
                    .values()
                    .filter(|post| post.category_id == category.id)
                    .count() as u64,
            })
            .collect();
        entries.sort_by(|a, b| a.category.name.cmp(&b.category.name));
        Ok(entries)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<CategoryWithCount>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.categories.get(&id).map(|category| CategoryWithCount {
            category: category.clone(),
            post_count: tables
                .posts
                .values()
                .filter(|post| post.category_id == id)
                .count() as u64,
        }))
    }

    async fn name_exists(&self, name: &str, exclude: Option<i32>) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .categories
            .values()
            .any(|category| category.name == name && Some(category.id) != exclude))
    }

    async fn insert(&self, new: NewCategory) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.categories.values().any(|c| c.name == new.name) {
            return Err(StoreError::Constraint(
                "duplicate key value violates unique constraint on name".to_string(),
            ));
        }
        let id = self.category_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let category = Category {
            id,
            name: new.name,
            description: new.description,
            created_at: now,
            updated_at: now,
        };
        tables.categories.insert(id, category.clone());
        Ok(category)
    }

    async fn update(&self, id: i32, changes: CategoryChanges) -> Result<Category, StoreError> {
        let mut tables = self.tables.write().await;
        let category = tables.categories.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            category.name = name;
        }
        if let Some(description) = changes.description {
            category.description = description;
        }
        category.updated_at = Utc::now();
        Ok(category.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.posts.values().any(|post| post.category_id == id) {
            return Err(StoreError::Constraint(
                "foreign key violation: category is still referenced".to_string(),
            ));
        }
        tables.categories.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

#[async_trait]
impl TagStore for InMemoryStore {
    async fn find_all(&self) -> Result<Vec<TagWithCount>, StoreError> {
        let tables = self.tables.read().await;
        let mut entries: Vec<TagWithCount> = tables
            .tags
            .values()
            .map(|tag| TagWithCount {
                tag: tag.clone(),
                post_count: tables
                    .post_tags
                    .values()
                    .filter(|ids| ids.contains(&tag.id))
                    .count() as u64,
            })
            .collect();
        entries.sort_by(|a, b| a.tag.name.cmp(&b.tag.name));
        Ok(entries)
    }

    async fn find_by_id(&self, id: i32) -> Result<Option<TagWithCount>, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables.tags.get(&id).map(|tag| TagWithCount {
            tag: tag.clone(),
            post_count: tables
                .post_tags
                .values()
                .filter(|ids| ids.contains(&id))
                .count() as u64,
        }))
    }

    async fn name_exists(&self, name: &str, exclude: Option<i32>) -> Result<bool, StoreError> {
        let tables = self.tables.read().await;
        Ok(tables
            .tags
            .values()
            .any(|tag| tag.name == name && Some(tag.id) != exclude))
    }

    async fn insert(&self, new: NewTag) -> Result<Tag, StoreError> {
        let mut tables = self.tables.write().await;
        if tables.tags.values().any(|t| t.name == new.name) {
            return Err(StoreError::Constraint(
                "duplicate key value violates unique constraint on name".to_string(),
            ));
        }
        let id = self.tag_seq.fetch_add(1, Ordering::SeqCst) + 1;
        let now = Utc::now();
        let tag = Tag {
            id,
            name: new.name,
            created_at: now,
            updated_at: now,
        };
        tables.tags.insert(id, tag.clone());
        Ok(tag)
    }

    async fn update(&self, id: i32, changes: TagChanges) -> Result<Tag, StoreError> {
        let mut tables = self.tables.write().await;
        let tag = tables.tags.get_mut(&id).ok_or(StoreError::NotFound)?;
        if let Some(name) = changes.name {
            tag.name = name;
        }
        tag.updated_at = Utc::now();
        Ok(tag.clone())
    }

    async fn delete(&self, id: i32) -> Result<(), StoreError> {
        let mut tables = self.tables.write().await;
        if tables.post_tags.values().any(|ids| ids.contains(&id)) {
            return Err(StoreError::Constraint(
                "foreign key violation: tag is still referenced".to_string(),
            ));
        }
        tables.tags.remove(&id).ok_or(StoreError::NotFound)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn category_ids_are_sequential() {
        let store = InMemoryStore::new();
        let first = CategoryStore::insert(
            &store,
            NewCategory {
                name: "Tech".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let second = CategoryStore::insert(
            &store,
            NewCategory {
                name: "Life".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        assert_eq!(first.id, 1);
        assert_eq!(second.id, 2);
    }

    #[tokio::test]
    async fn insert_rejects_missing_category() {
        let store = InMemoryStore::new();
        let post = Post::new(
            "Orphan".to_string(),
            "orphan".to_string(),
            "Body".to_string(),
            None,
            1,
            42,
        );
        let err = PostStore::insert(&store, post, &[]).await.unwrap_err();
        assert!(matches!(err, StoreError::Constraint(_)));
    }

    #[tokio::test]
    async fn delete_severs_tag_associations() {
        let store = InMemoryStore::new();
        let category = CategoryStore::insert(
            &store,
            NewCategory {
                name: "Tech".to_string(),
                description: None,
            },
        )
        .await
        .unwrap();
        let tag = TagStore::insert(
            &store,
            NewTag {
                name: "rust".to_string(),
            },
        )
        .await
        .unwrap();
        let post = Post::new(
            "A".to_string(),
            "a".to_string(),
            "Body".to_string(),
            None,
            1,
            category.id,
        );
        let detail = PostStore::insert(&store, post, &[tag.id]).await.unwrap();

        PostStore::delete(&store, detail.post.id).await.unwrap();

        let entry = TagStore::find_by_id(&store, tag.id).await.unwrap().unwrap();
        assert_eq!(entry.post_count, 0);
        TagStore::delete(&store, tag.id).await.unwrap();
    }
}
