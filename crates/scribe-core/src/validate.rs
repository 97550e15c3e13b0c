//! Request-body validation, applied before any lifecycle logic runs.

use scribe_shared::Field;
use scribe_shared::dto::{
    CreateCategoryRequest, CreatePostRequest, CreateTagRequest, UpdateCategoryRequest,
    UpdatePostRequest, UpdateTagRequest,
};

use crate::error::DomainError;

const MAX_TITLE_LEN: usize = 200;
const MAX_EXCERPT_LEN: usize = 500;
const MAX_NAME_LEN: usize = 100;

pub fn create_post(req: &CreatePostRequest) -> Result<(), DomainError> {
    title(&req.title)?;
    content(&req.content)?;
    if let Some(excerpt) = &req.excerpt {
        excerpt_len(excerpt)?;
    }
    category_id(req.category_id)?;
    if let Some(tags) = &req.tags {
        tag_ids(tags)?;
    }
    Ok(())
}

pub fn update_post(req: &UpdatePostRequest) -> Result<(), DomainError> {
    match &req.title {
        Field::Set(value) => title(value)?,
        Field::Null => return Err(DomainError::validation("Title must not be null")),
        Field::Absent => {}
    }
    match &req.content {
        Field::Set(value) => content(value)?,
        Field::Null => return Err(DomainError::validation("Content must not be null")),
        Field::Absent => {}
    }
    if let Field::Set(value) = &req.excerpt {
        excerpt_len(value)?;
    }
    match req.category_id {
        Field::Set(value) => category_id(value)?,
        Field::Null => return Err(DomainError::validation("Category ID must not be null")),
        Field::Absent => {}
    }
    match &req.tags {
        Field::Set(value) => tag_ids(value)?,
        Field::Null => return Err(DomainError::validation("Tags must not be null")),
        Field::Absent => {}
    }
    Ok(())
}

pub fn create_category(req: &CreateCategoryRequest) -> Result<(), DomainError> {
    name(&req.name, "Category")
}

pub fn update_category(req: &UpdateCategoryRequest) -> Result<(), DomainError> {
    match &req.name {
        Field::Set(value) => name(value, "Category")?,
        Field::Null => return Err(DomainError::validation("Category name must not be null")),
        Field::Absent => {}
    }
    Ok(())
}

pub fn create_tag(req: &CreateTagRequest) -> Result<(), DomainError> {
    name(&req.name, "Tag")
}

pub fn update_tag(req: &UpdateTagRequest) -> Result<(), DomainError> {
    match &req.name {
        Field::Set(value) => name(value, "Tag")?,
        Field::Null => return Err(DomainError::validation("Tag name must not be null")),
        Field::Absent => {}
    }
    Ok(())
}

fn title(value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation("Title is required"));
    }
    if value.chars().count() > MAX_TITLE_LEN {
        return Err(DomainError::validation(
            "Title must be less than 200 characters",
        ));
    }
    Ok(())
}

fn content(value: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation("Content is required"));
    }
    Ok(())
}

fn excerpt_len(value: &str) -> Result<(), DomainError> {
    if value.chars().count() > MAX_EXCERPT_LEN {
        return Err(DomainError::validation(
            "Excerpt must be less than 500 characters",
        ));
    }
    Ok(())
}

fn category_id(value: i32) -> Result<(), DomainError> {
    if value < 1 {
        return Err(DomainError::validation(
            "Category ID must be a positive integer",
        ));
    }
    Ok(())
}

fn tag_ids(values: &[i32]) -> Result<(), DomainError> {
    if values.iter().any(|id| *id < 1) {
        return Err(DomainError::validation("Tag ID must be a positive integer"));
    }
    Ok(())
}

fn name(value: &str, entity: &str) -> Result<(), DomainError> {
    if value.is_empty() {
        return Err(DomainError::validation(format!("{entity} name is required")));
    }
    if value.chars().count() > MAX_NAME_LEN {
        return Err(DomainError::validation(format!(
            "{entity} name must be less than 100 characters"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn create_req() -> CreatePostRequest {
        CreatePostRequest {
            title: "A Post".to_string(),
            content: "Body".to_string(),
            excerpt: None,
            category_id: 1,
            tags: None,
        }
    }

    #[test]
    fn accepts_minimal_create() {
        assert!(create_post(&create_req()).is_ok());
    }

    #[test]
    fn rejects_empty_title_and_content() {
        let mut req = create_req();
        req.title = String::new();
        assert!(create_post(&req).is_err());

        let mut req = create_req();
        req.content = String::new();
        assert!(create_post(&req).is_err());
    }

    #[test]
    fn rejects_overlong_title() {
        let mut req = create_req();
        req.title = "x".repeat(201);
        assert!(create_post(&req).is_err());
    }

    #[test]
    fn rejects_non_positive_ids() {
        let mut req = create_req();
        req.category_id = 0;
        assert!(create_post(&req).is_err());

        let mut req = create_req();
        req.tags = Some(vec![1, 0]);
        assert!(create_post(&req).is_err());
    }

    #[test]
    fn update_allows_null_excerpt_only() {
        let req = UpdatePostRequest {
            excerpt: Field::Null,
            ..Default::default()
        };
        assert!(update_post(&req).is_ok());

        let req = UpdatePostRequest {
            title: Field::Null,
            ..Default::default()
        };
        assert!(update_post(&req).is_err());

        let req = UpdatePostRequest {
            tags: Field::Null,
            ..Default::default()
        };
        assert!(update_post(&req).is_err());
    }

    #[test]
    fn empty_update_is_valid() {
        assert!(update_post(&UpdatePostRequest::default()).is_ok());
    }

    #[test]
    fn category_name_bounds() {
        let req = CreateCategoryRequest {
            name: String::new(),
            description: None,
        };
        assert!(create_category(&req).is_err());

        let req = CreateCategoryRequest {
            name: "x".repeat(101),
            description: None,
        };
        assert!(create_category(&req).is_err());
    }
}
