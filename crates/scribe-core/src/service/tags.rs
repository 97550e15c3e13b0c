//! Tag lifecycle: thin CRUD with a blocked-delete-while-referenced rule.

use std::sync::Arc;

use scribe_shared::Field;
use scribe_shared::dto::{CreateTagRequest, TagResponse, UpdateTagRequest};

use crate::domain::TagWithCount;
use crate::error::DomainError;
use crate::ports::{NewTag, TagChanges, TagStore};
use crate::project::tag_response;
use crate::validate;

const NAME_TAKEN: &str = "Tag name already exists, please choose a different name";
const HAS_POSTS: &str = "Cannot delete tag that has posts. Please remove or reassign posts first.";

#[derive(Clone)]
pub struct TagService {
    store: Arc<dyn TagStore>,
}

impl TagService {
    pub fn new(store: Arc<dyn TagStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: CreateTagRequest) -> Result<TagResponse, DomainError> {
        validate::create_tag(&req)?;

        if self.store.name_exists(&req.name, None).await? {
            return Err(DomainError::conflict(NAME_TAKEN));
        }

        let tag = self.store.insert(NewTag { name: req.name }).await?;
        Ok(tag_response(TagWithCount { tag, post_count: 0 }))
    }

    pub async fn list(&self) -> Result<Vec<TagResponse>, DomainError> {
        let tags = self.store.find_all().await?;
        Ok(tags.into_iter().map(tag_response).collect())
    }

    pub async fn get(&self, id: i32) -> Result<TagResponse, DomainError> {
        let entry = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag"))?;
        Ok(tag_response(entry))
    }

    pub async fn update(&self, id: i32, req: UpdateTagRequest) -> Result<TagResponse, DomainError> {
        validate::update_tag(&req)?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag"))?;

        if let Field::Set(name) = &req.name {
            if *name != existing.tag.name && self.store.name_exists(name, Some(id)).await? {
                return Err(DomainError::conflict(NAME_TAKEN));
            }
        }

        let mut changes = TagChanges::default();
        if let Field::Set(name) = req.name {
            changes.name = Some(name);
        }

        let tag = self.store.update(id, changes).await?;
        Ok(tag_response(TagWithCount { tag, post_count: 0 }))
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Tag"))?;

        if existing.post_count > 0 {
            return Err(DomainError::conflict(HAS_POSTS));
        }

        self.store.delete(id).await?;
        tracing::info!(tag_id = id, "tag deleted");
        Ok(())
    }
}
