//! Post lifecycle manager.
//!
//! Orchestrates create/read/update/delete for posts: uniqueness pre-checks,
//! slug/read-time derivation, filter compilation, pagination, and the
//! two-phase tag reconciliation on update.

use std::sync::Arc;

use chrono::Utc;
use scribe_shared::Field;
use scribe_shared::dto::{CreatePostRequest, PostListItem, PostResponse, UpdatePostRequest};
use scribe_shared::response::ListResponse;
use uuid::Uuid;

use crate::derive::{read_time_minutes, slug_from_title};
use crate::domain::Post;
use crate::error::DomainError;
use crate::filter::PostFilters;
use crate::pagination::PageRequest;
use crate::ports::{PostChanges, PostStore};
use crate::project::{post_list_item, post_response};
use crate::validate;

const TITLE_TAKEN: &str = "Title already exist, please change your title";

#[derive(Clone)]
pub struct PostService {
    store: Arc<dyn PostStore>,
}

impl PostService {
    pub fn new(store: Arc<dyn PostStore>) -> Self {
        Self { store }
    }

    /// Create a post. The title must not be taken; slug and read time are
    /// derived before the row is written.
    pub async fn create(&self, req: CreatePostRequest) -> Result<PostResponse, DomainError> {
        validate::create_post(&req)?;

        if self.store.title_exists(&req.title, None).await? {
            return Err(DomainError::conflict(TITLE_TAKEN));
        }

        let slug = slug_from_title(&req.title);
        let read_time = read_time_minutes(&req.content);
        let post = Post::new(
            req.title,
            slug,
            req.content,
            req.excerpt,
            read_time,
            req.category_id,
        );
        let tag_ids = req.tags.unwrap_or_default();

        let detail = self.store.insert(post, &tag_ids).await?;
        tracing::info!(post_id = %detail.post.id, "post created");
        Ok(post_response(detail))
    }

    pub async fn get(&self, id: Uuid) -> Result<PostResponse, DomainError> {
        let detail = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))?;
        Ok(post_response(detail))
    }

    /// List posts: compile the filters once, use the same predicate for the
    /// count and the page query, order newest first, and project to the
    /// lightweight list shape.
    pub async fn list(
        &self,
        page: Option<u64>,
        limit: Option<u64>,
        filters: PostFilters,
    ) -> Result<ListResponse<PostListItem>, DomainError> {
        let request = PageRequest::new(page, limit)?;
        let query = filters.compile(Utc::now())?;

        let total = self.store.count(&query).await?;
        let rows = self
            .store
            .find_page(&query, request.offset(), request.limit)
            .await?;

        Ok(ListResponse {
            data: rows.into_iter().map(post_list_item).collect(),
            pagination: request.envelope(total),
        })
    }

    /// Apply a partial update. Supplying `title` re-derives the slug and
    /// supplying `content` re-derives the read time, so neither is ever
    /// stale. Tag reconciliation runs only when `tags` is supplied: clear
    /// all associations, then connect the new set if non-empty. The two
    /// writes are not atomic; a failure in between leaves the post with no
    /// tags. After reconciling, the post is re-fetched because the scalar
    /// update result no longer reflects the tag relations.
    pub async fn update(
        &self,
        id: Uuid,
        req: UpdatePostRequest,
    ) -> Result<PostResponse, DomainError> {
        validate::update_post(&req)?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))?;

        if let Field::Set(title) = &req.title {
            if *title != existing.post.title && self.store.title_exists(title, Some(id)).await? {
                return Err(DomainError::conflict(TITLE_TAKEN));
            }
        }

        let mut changes = PostChanges::default();
        if let Field::Set(title) = &req.title {
            changes.slug = Some(slug_from_title(title));
            changes.title = Some(title.clone());
        }
        if let Field::Set(content) = &req.content {
            changes.read_time = Some(read_time_minutes(content));
            changes.content = Some(content.clone());
        }
        match req.excerpt {
            Field::Set(excerpt) => changes.excerpt = Some(Some(excerpt)),
            Field::Null => changes.excerpt = Some(None),
            Field::Absent => {}
        }
        if let Field::Set(category_id) = req.category_id {
            changes.category_id = Some(category_id);
        }

        let updated = self.store.update(id, changes).await?;

        let detail = match req.tags {
            Field::Set(tag_ids) => {
                self.store.clear_tags(id).await?;
                if !tag_ids.is_empty() {
                    self.store.connect_tags(id, &tag_ids).await?;
                }
                tracing::debug!(post_id = %id, tags = tag_ids.len(), "tag set reconciled");
                self.store
                    .find_by_id(id)
                    .await?
                    .ok_or_else(|| DomainError::Internal("post vanished mid-update".to_string()))?
            }
            _ => updated,
        };

        Ok(post_response(detail))
    }

    pub async fn delete(&self, id: Uuid) -> Result<(), DomainError> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Post"))?;
        self.store.delete(id).await?;
        tracing::info!(post_id = %id, "post deleted");
        Ok(())
    }
}
