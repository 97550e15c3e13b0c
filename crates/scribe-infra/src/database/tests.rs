//! Lifecycle tests over the in-memory store, plus SeaORM mock smoke tests.

use std::sync::Arc;

use chrono::{Datelike, Utc};

use scribe_core::DomainError;
use scribe_core::filter::PostFilters;
use scribe_core::service::{CategoryService, PostService, TagService};
use scribe_shared::Field;
use scribe_shared::dto::{
    CreateCategoryRequest, CreatePostRequest, CreateTagRequest, UpdatePostRequest,
    UpdateTagRequest,
};

use super::memory::InMemoryStore;

struct Services {
    posts: PostService,
    categories: CategoryService,
    tags: TagService,
}

fn services() -> Services {
    let store = Arc::new(InMemoryStore::new());
    Services {
        posts: PostService::new(store.clone()),
        categories: CategoryService::new(store.clone()),
        tags: TagService::new(store),
    }
}

async fn tech_category(services: &Services) -> i32 {
    services
        .categories
        .create(CreateCategoryRequest {
            name: "Tech".to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id
}

fn post_request(title: &str, category_id: i32) -> CreatePostRequest {
    CreatePostRequest {
        title: title.to_string(),
        content: "Some body text".to_string(),
        excerpt: None,
        category_id,
        tags: None,
    }
}

#[tokio::test]
async fn create_derives_slug_and_read_time() {
    let services = services();
    let category_id = tech_category(&services).await;

    let post = services
        .posts
        .create(post_request("Hello World", category_id))
        .await
        .unwrap();

    assert_eq!(post.slug, "hello-world");
    assert_eq!(post.read_time, 1);
    assert_eq!(post.category.name, "Tech");
    assert!(post.tags.is_empty());
}

#[tokio::test]
async fn duplicate_title_conflicts_before_any_write() {
    let services = services();
    let category_id = tech_category(&services).await;

    services
        .posts
        .create(post_request("Hello World", category_id))
        .await
        .unwrap();
    let err = services
        .posts
        .create(post_request("Hello World", category_id))
        .await
        .unwrap_err();

    assert!(matches!(err, DomainError::Conflict(_)));
    let listing = services
        .posts
        .list(None, None, PostFilters::default())
        .await
        .unwrap();
    assert_eq!(listing.pagination.total, 1);
}

#[tokio::test]
async fn update_with_empty_tags_clears_associations() {
    let services = services();
    let category_id = tech_category(&services).await;
    let tag = services
        .tags
        .create(CreateTagRequest {
            name: "rust".to_string(),
        })
        .await
        .unwrap();

    let mut req = post_request("Tagged", category_id);
    req.tags = Some(vec![tag.id]);
    let post = services.posts.create(req).await.unwrap();
    assert_eq!(post.tags.len(), 1);

    let id = post.id.parse().unwrap();
    let updated = services
        .posts
        .update(
            id,
            UpdatePostRequest {
                tags: Field::Set(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert!(updated.tags.is_empty());
    let refetched = services.posts.get(id).await.unwrap();
    assert!(refetched.tags.is_empty());
}

#[tokio::test]
async fn update_without_tags_leaves_associations_untouched() {
    let services = services();
    let category_id = tech_category(&services).await;
    let tag = services
        .tags
        .create(CreateTagRequest {
            name: "rust".to_string(),
        })
        .await
        .unwrap();

    let mut req = post_request("Tagged", category_id);
    req.tags = Some(vec![tag.id]);
    let post = services.posts.create(req).await.unwrap();

    let id = post.id.parse().unwrap();
    let updated = services
        .posts
        .update(
            id,
            UpdatePostRequest {
                content: Field::Set("Fresh body".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.tags.len(), 1);
    assert_eq!(updated.content, "Fresh body");
}

#[tokio::test]
async fn update_title_rederives_slug_and_checks_uniqueness() {
    let services = services();
    let category_id = tech_category(&services).await;

    services
        .posts
        .create(post_request("First Post", category_id))
        .await
        .unwrap();
    let second = services
        .posts
        .create(post_request("Second Post", category_id))
        .await
        .unwrap();
    let id = second.id.parse().unwrap();

    let err = services
        .posts
        .update(
            id,
            UpdatePostRequest {
                title: Field::Set("First Post".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let renamed = services
        .posts
        .update(
            id,
            UpdatePostRequest {
                title: Field::Set("Second Post Revised".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.slug, "second-post-revised");
}

#[tokio::test]
async fn explicit_null_clears_excerpt_but_absent_keeps_it() {
    let services = services();
    let category_id = tech_category(&services).await;

    let mut req = post_request("With Excerpt", category_id);
    req.excerpt = Some("teaser".to_string());
    let post = services.posts.create(req).await.unwrap();
    let id = post.id.parse().unwrap();

    let untouched = services
        .posts
        .update(
            id,
            UpdatePostRequest {
                content: Field::Set("New body".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(untouched.excerpt.as_deref(), Some("teaser"));

    let cleared = services
        .posts
        .update(
            id,
            UpdatePostRequest {
                excerpt: Field::Null,
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(cleared.excerpt, None);
}

#[tokio::test]
async fn missing_post_is_not_found() {
    let services = services();

    let id = uuid::Uuid::new_v4();
    assert!(matches!(
        services.posts.get(id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        services
            .posts
            .update(id, UpdatePostRequest::default())
            .await
            .unwrap_err(),
        DomainError::NotFound { .. }
    ));
    assert!(matches!(
        services.posts.delete(id).await.unwrap_err(),
        DomainError::NotFound { .. }
    ));
}

#[tokio::test]
async fn list_filters_by_category_and_projects_list_view() {
    let services = services();
    let tech = tech_category(&services).await;
    let life = services
        .categories
        .create(CreateCategoryRequest {
            name: "Life".to_string(),
            description: None,
        })
        .await
        .unwrap()
        .id;

    services
        .posts
        .create(post_request("A", tech))
        .await
        .unwrap();
    services
        .posts
        .create(post_request("B", life))
        .await
        .unwrap();

    let filters = PostFilters {
        category_id: Some(tech),
        ..Default::default()
    };
    let listing = services.posts.list(None, None, filters).await.unwrap();

    assert_eq!(listing.data.len(), 1);
    assert_eq!(listing.pagination.total, 1);
    assert_eq!(listing.data[0].title, "A");

    let row = serde_json::to_value(&listing.data[0]).unwrap();
    assert!(row.get("content").is_none());
    assert!(row.get("categoryId").is_none());
    assert_eq!(row["category"]["name"], "Tech");
}

#[tokio::test]
async fn list_search_is_case_insensitive() {
    let services = services();
    let category_id = tech_category(&services).await;

    services
        .posts
        .create(post_request("Rust Ownership", category_id))
        .await
        .unwrap();
    services
        .posts
        .create(post_request("Garbage Collection", category_id))
        .await
        .unwrap();

    let filters = PostFilters {
        search: Some("rust".to_string()),
        ..Default::default()
    };
    let listing = services.posts.list(None, None, filters).await.unwrap();
    assert_eq!(listing.data.len(), 1);
    assert_eq!(listing.data[0].title, "Rust Ownership");
}

#[tokio::test]
async fn list_filters_by_tag() {
    let services = services();
    let category_id = tech_category(&services).await;
    let tag = services
        .tags
        .create(CreateTagRequest {
            name: "rust".to_string(),
        })
        .await
        .unwrap();

    let mut tagged = post_request("Tagged", category_id);
    tagged.tags = Some(vec![tag.id]);
    services.posts.create(tagged).await.unwrap();
    services
        .posts
        .create(post_request("Untagged", category_id))
        .await
        .unwrap();

    let filters = PostFilters {
        tag_id: Some(tag.id),
        ..Default::default()
    };
    let listing = services.posts.list(None, None, filters).await.unwrap();
    assert_eq!(listing.data.len(), 1);
    assert_eq!(listing.data[0].title, "Tagged");
}

#[tokio::test]
async fn list_filters_by_creation_month() {
    let services = services();
    let category_id = tech_category(&services).await;
    services
        .posts
        .create(post_request("Fresh", category_id))
        .await
        .unwrap();

    let now = Utc::now();
    let this_month = PostFilters {
        month: Some(now.month()),
        year: Some(now.year()),
        ..Default::default()
    };
    let listing = services.posts.list(None, None, this_month).await.unwrap();
    assert_eq!(listing.pagination.total, 1);

    let past = PostFilters {
        month: Some(now.month()),
        year: Some(1999),
        ..Default::default()
    };
    let listing = services.posts.list(None, None, past).await.unwrap();
    assert_eq!(listing.pagination.total, 0);
}

#[tokio::test]
async fn list_paginates_newest_first() {
    let services = services();
    let category_id = tech_category(&services).await;
    for n in 0..7 {
        services
            .posts
            .create(post_request(&format!("Post {n}"), category_id))
            .await
            .unwrap();
    }

    let first = services
        .posts
        .list(None, None, PostFilters::default())
        .await
        .unwrap();
    assert_eq!(first.data.len(), 6);
    assert_eq!(first.pagination.total, 7);
    assert_eq!(first.pagination.total_pages, 2);
    assert!(first.pagination.has_next);
    assert!(!first.pagination.has_prev);

    let second = services
        .posts
        .list(Some(2), None, PostFilters::default())
        .await
        .unwrap();
    assert_eq!(second.data.len(), 1);
    assert!(!second.pagination.has_next);
    assert!(second.pagination.has_prev);
}

#[tokio::test]
async fn referenced_category_cannot_be_deleted() {
    let services = services();
    let category_id = tech_category(&services).await;
    let post = services
        .posts
        .create(post_request("A", category_id))
        .await
        .unwrap();

    let err = services.categories.delete(category_id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    services
        .posts
        .delete(post.id.parse().unwrap())
        .await
        .unwrap();
    services.categories.delete(category_id).await.unwrap();
}

#[tokio::test]
async fn referenced_tag_cannot_be_deleted() {
    let services = services();
    let category_id = tech_category(&services).await;
    let tag = services
        .tags
        .create(CreateTagRequest {
            name: "rust".to_string(),
        })
        .await
        .unwrap();

    let mut req = post_request("Tagged", category_id);
    req.tags = Some(vec![tag.id]);
    let post = services.posts.create(req).await.unwrap();

    let err = services.tags.delete(tag.id).await.unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    services
        .posts
        .update(
            post.id.parse().unwrap(),
            UpdatePostRequest {
                tags: Field::Set(vec![]),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    services.tags.delete(tag.id).await.unwrap();
}

#[tokio::test]
async fn duplicate_names_conflict_and_renames_recheck() {
    let services = services();
    services
        .tags
        .create(CreateTagRequest {
            name: "rust".to_string(),
        })
        .await
        .unwrap();
    let second = services
        .tags
        .create(CreateTagRequest {
            name: "tokio".to_string(),
        })
        .await
        .unwrap();

    let err = services
        .tags
        .create(CreateTagRequest {
            name: "rust".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));

    let err = services
        .tags
        .update(
            second.id,
            UpdateTagRequest {
                name: Field::Set("rust".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, DomainError::Conflict(_)));
}

#[tokio::test]
async fn category_listing_counts_posts() {
    let services = services();
    let category_id = tech_category(&services).await;
    services
        .posts
        .create(post_request("A", category_id))
        .await
        .unwrap();
    services
        .posts
        .create(post_request("B", category_id))
        .await
        .unwrap();

    let listing = services.categories.list().await.unwrap();
    assert_eq!(listing.len(), 1);
    assert_eq!(listing[0].post_count, 2);

    let fetched = services.categories.get(category_id).await.unwrap();
    assert_eq!(fetched.post_count, 2);
}

#[cfg(feature = "postgres")]
mod mock {
    use sea_orm::{DatabaseBackend, MockDatabase};

    use super::super::entity::category;
    use super::super::postgres::PostgresCategoryStore;
    use scribe_core::ports::CategoryStore;

    #[tokio::test]
    async fn finds_category_with_count() {
        let now = chrono::Utc::now();
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![category::Model {
                id: 1,
                name: "Tech".to_owned(),
                description: None,
                created_at: now.into(),
                updated_at: now.into(),
            }]])
            .append_query_results(vec![vec![std::collections::BTreeMap::from([(
                "num_items",
                sea_orm::Value::BigInt(Some(2)),
            )])]])
            .into_connection();

        let store = PostgresCategoryStore::new(db);

        let entry = store.find_by_id(1).await.unwrap().unwrap();
        assert_eq!(entry.category.name, "Tech");
        assert_eq!(entry.post_count, 2);
    }

    #[tokio::test]
    async fn missing_category_is_none() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<category::Model>::new()])
            .into_connection();

        let store = PostgresCategoryStore::new(db);

        assert!(store.find_by_id(99).await.unwrap().is_none());
    }
}
