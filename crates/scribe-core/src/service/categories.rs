//! Category lifecycle: thin CRUD with a blocked-delete-while-referenced rule.

use std::sync::Arc;

use scribe_shared::Field;
use scribe_shared::dto::{CategoryResponse, CreateCategoryRequest, UpdateCategoryRequest};

use crate::domain::CategoryWithCount;
use crate::error::DomainError;
use crate::ports::{CategoryChanges, CategoryStore, NewCategory};
use crate::project::category_response;
use crate::validate;

const NAME_TAKEN: &str = "Category name already exists, please choose a different name";
const HAS_POSTS: &str = "Cannot delete category that has posts. Please remove or reassign posts first.";

#[derive(Clone)]
pub struct CategoryService {
    store: Arc<dyn CategoryStore>,
}

impl CategoryService {
    pub fn new(store: Arc<dyn CategoryStore>) -> Self {
        Self { store }
    }

    pub async fn create(&self, req: CreateCategoryRequest) -> Result<CategoryResponse, DomainError> {
        validate::create_category(&req)?;

        if self.store.name_exists(&req.name, None).await? {
            return Err(DomainError::conflict(NAME_TAKEN));
        }

        let category = self
            .store
            .insert(NewCategory {
                name: req.name,
                description: req.description,
            })
            .await?;
        Ok(category_response(CategoryWithCount {
            category,
            post_count: 0,
        }))
    }

    pub async fn list(&self) -> Result<Vec<CategoryResponse>, DomainError> {
        let categories = self.store.find_all().await?;
        Ok(categories.into_iter().map(category_response).collect())
    }

    pub async fn get(&self, id: i32) -> Result<CategoryResponse, DomainError> {
        let entry = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))?;
        Ok(category_response(entry))
    }

    pub async fn update(
        &self,
        id: i32,
        req: UpdateCategoryRequest,
    ) -> Result<CategoryResponse, DomainError> {
        validate::update_category(&req)?;

        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))?;

        if let Field::Set(name) = &req.name {
            if *name != existing.category.name && self.store.name_exists(name, Some(id)).await? {
                return Err(DomainError::conflict(NAME_TAKEN));
            }
        }

        let mut changes = CategoryChanges::default();
        if let Field::Set(name) = req.name {
            changes.name = Some(name);
        }
        match req.description {
            Field::Set(description) => changes.description = Some(Some(description)),
            Field::Null => changes.description = Some(None),
            Field::Absent => {}
        }

        let category = self.store.update(id, changes).await?;
        Ok(category_response(CategoryWithCount {
            category,
            post_count: 0,
        }))
    }

    pub async fn delete(&self, id: i32) -> Result<(), DomainError> {
        let existing = self
            .store
            .find_by_id(id)
            .await?
            .ok_or_else(|| DomainError::not_found("Category"))?;

        if existing.post_count > 0 {
            return Err(DomainError::conflict(HAS_POSTS));
        }

        self.store.delete(id).await?;
        tracing::info!(category_id = id, "category deleted");
        Ok(())
    }
}
