//! Post handlers.

use actix_web::{HttpResponse, web};
use serde::Deserialize;
use uuid::Uuid;

use scribe_core::filter::PostFilters;
use scribe_shared::dto::{CreatePostRequest, UpdatePostRequest};
use scribe_shared::response::{Data, Message};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Query parameters for the post listing: pagination plus optional filters.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListPostsQuery {
    pub page: Option<u64>,
    pub limit: Option<u64>,
    pub month: Option<u32>,
    pub year: Option<i32>,
    pub search: Option<String>,
    pub category_id: Option<i32>,
    pub tag_id: Option<i32>,
}

/// POST /api/posts
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state.posts.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(Data::new(post)))
}

/// GET /api/posts
pub async fn list(
    state: web::Data<AppState>,
    query: web::Query<ListPostsQuery>,
) -> AppResult<HttpResponse> {
    let query = query.into_inner();
    let filters = PostFilters {
        month: query.month,
        year: query.year,
        search: query.search,
        category_id: query.category_id,
        tag_id: query.tag_id,
    };

    let listing = state.posts.list(query.page, query.limit, filters).await?;
    Ok(HttpResponse::Ok().json(listing))
}

/// GET /api/posts/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<String>) -> AppResult<HttpResponse> {
    let post = state.posts.get(parse_post_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(Data::new(post)))
}

/// PUT /api/posts/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let post = state
        .posts
        .update(parse_post_id(&path)?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Data::new(post)))
}

/// DELETE /api/posts/{id}
pub async fn delete(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    state.posts.delete(parse_post_id(&path)?).await?;
    Ok(HttpResponse::Ok().json(Message::new("Post deleted successfully")))
}

/// Post ids are opaque strings to callers; anything that is not a valid id
/// behaves exactly like an id with no row behind it.
fn parse_post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::NotFound("Post not found".to_string()))
}
