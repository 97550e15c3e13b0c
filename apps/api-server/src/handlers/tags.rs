//! Tag handlers.

use actix_web::{HttpResponse, web};

use scribe_shared::dto::{CreateTagRequest, UpdateTagRequest};
use scribe_shared::response::{Data, Message};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn tag_id(raw: i32) -> Result<i32, AppError> {
    if raw < 1 {
        return Err(AppError::Validation(
            "Tag ID must be a positive integer".to_string(),
        ));
    }
    Ok(raw)
}

/// POST /api/tags
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateTagRequest>,
) -> AppResult<HttpResponse> {
    let tag = state.tags.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(Data::new(tag)))
}

/// GET /api/tags
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let tags = state.tags.list().await?;
    Ok(HttpResponse::Ok().json(Data::new(tags)))
}

/// GET /api/tags/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let tag = state.tags.get(tag_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(Data::new(tag)))
}

/// PUT /api/tags/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateTagRequest>,
) -> AppResult<HttpResponse> {
    let tag = state
        .tags
        .update(tag_id(path.into_inner())?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Data::new(tag)))
}

/// DELETE /api/tags/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    state.tags.delete(tag_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(Message::new("Tag deleted successfully")))
}
