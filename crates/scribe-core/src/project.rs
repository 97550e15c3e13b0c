//! Maps persisted entities onto their public response shapes.

use scribe_shared::dto::{
    CategoryResponse, CategorySummary, PostListItem, PostResponse, TagResponse, TagSummary,
};

use crate::domain::{CategoryWithCount, PostDetail, TagWithCount};

/// Full detail view: everything, including `content` and the raw
/// `categoryId`, plus the resolved category and tag summaries.
pub fn post_response(detail: PostDetail) -> PostResponse {
    let PostDetail {
        post,
        category,
        tags,
    } = detail;
    PostResponse {
        id: post.id.to_string(),
        title: post.title,
        slug: post.slug,
        content: post.content,
        excerpt: post.excerpt,
        category_id: post.category_id,
        read_time: post.read_time,
        created_at: post.created_at,
        updated_at: post.updated_at,
        category: CategorySummary {
            id: category.id,
            name: category.name,
        },
        tags: tag_summaries(tags),
    }
}

/// Lighter list view: omits `content` and `categoryId`.
pub fn post_list_item(detail: PostDetail) -> PostListItem {
    let PostDetail {
        post,
        category,
        tags,
    } = detail;
    PostListItem {
        id: post.id.to_string(),
        title: post.title,
        slug: post.slug,
        excerpt: post.excerpt,
        read_time: post.read_time,
        created_at: post.created_at,
        updated_at: post.updated_at,
        category: CategorySummary {
            id: category.id,
            name: category.name,
        },
        tags: tag_summaries(tags),
    }
}

pub fn category_response(entry: CategoryWithCount) -> CategoryResponse {
    let CategoryWithCount {
        category,
        post_count,
    } = entry;
    CategoryResponse {
        id: category.id,
        name: category.name,
        description: category.description,
        created_at: category.created_at,
        updated_at: category.updated_at,
        post_count,
    }
}

pub fn tag_response(entry: TagWithCount) -> TagResponse {
    let TagWithCount { tag, post_count } = entry;
    TagResponse {
        id: tag.id,
        name: tag.name,
        created_at: tag.created_at,
        updated_at: tag.updated_at,
        post_count,
    }
}

fn tag_summaries(tags: Vec<crate::domain::Tag>) -> Vec<TagSummary> {
    tags.into_iter()
        .map(|tag| TagSummary {
            id: tag.id,
            name: tag.name,
        })
        .collect()
}
