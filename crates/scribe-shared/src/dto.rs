//! Data Transfer Objects - request/response types for the API.
//!
//! All bodies use camelCase keys on the wire. Optional response fields
//! (`excerpt`, `description`) are omitted entirely rather than serialized
//! as `null`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::field::Field;

/// Request to create a post.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    pub title: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub category_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<i32>>,
}

/// Partial update for a post. Every field is tri-state: a missing key leaves
/// the stored value untouched, an explicit `null` is only meaningful for
/// `excerpt` (clearing it), and `tags: []` removes all tag associations.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[serde(default)]
    pub title: Field<String>,
    #[serde(default)]
    pub content: Field<String>,
    #[serde(default)]
    pub excerpt: Field<String>,
    #[serde(default)]
    pub category_id: Field<i32>,
    #[serde(default)]
    pub tags: Field<Vec<i32>>,
}

/// Full post view returned by create/get/update.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostResponse {
    pub id: String,
    pub title: String,
    pub slug: String,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub category_id: i32,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: CategorySummary,
    pub tags: Vec<TagSummary>,
}

/// Lighter post view used in list responses. Omits `content` and
/// `categoryId`; the resolved category summary is still present.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListItem {
    pub id: String,
    pub title: String,
    pub slug: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub excerpt: Option<String>,
    pub read_time: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub category: CategorySummary,
    pub tags: Vec<TagSummary>,
}

/// Resolved category reference embedded in post views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategorySummary {
    pub id: i32,
    pub name: String,
}

/// Resolved tag reference embedded in post views.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TagSummary {
    pub id: i32,
    pub name: String,
}

/// Request to create a category.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryRequest {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

/// Partial update for a category. `description: null` clears the stored
/// description; a missing key leaves it untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryRequest {
    #[serde(default)]
    pub name: Field<String>,
    #[serde(default)]
    pub description: Field<String>,
}

/// Category view. `postCount` is always present, defaulting to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryResponse {
    pub id: i32,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub post_count: u64,
}

/// Request to create a tag.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateTagRequest {
    pub name: String,
}

/// Partial update for a tag.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateTagRequest {
    #[serde(default)]
    pub name: Field<String>,
}

/// Tag view. `postCount` is always present, defaulting to 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TagResponse {
    pub id: i32,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub post_count: u64,
}
