//! Category handlers.

use actix_web::{HttpResponse, web};

use scribe_shared::dto::{CreateCategoryRequest, UpdateCategoryRequest};
use scribe_shared::response::{Data, Message};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

fn category_id(raw: i32) -> Result<i32, AppError> {
    if raw < 1 {
        return Err(AppError::Validation(
            "Category ID must be a positive integer".to_string(),
        ));
    }
    Ok(raw)
}

/// POST /api/categories
pub async fn create(
    state: web::Data<AppState>,
    body: web::Json<CreateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state.categories.create(body.into_inner()).await?;
    Ok(HttpResponse::Created().json(Data::new(category)))
}

/// GET /api/categories
pub async fn list(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    let categories = state.categories.list().await?;
    Ok(HttpResponse::Ok().json(Data::new(categories)))
}

/// GET /api/categories/{id}
pub async fn get(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    let category = state.categories.get(category_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(Data::new(category)))
}

/// PUT /api/categories/{id}
pub async fn update(
    state: web::Data<AppState>,
    path: web::Path<i32>,
    body: web::Json<UpdateCategoryRequest>,
) -> AppResult<HttpResponse> {
    let category = state
        .categories
        .update(category_id(path.into_inner())?, body.into_inner())
        .await?;
    Ok(HttpResponse::Ok().json(Data::new(category)))
}

/// DELETE /api/categories/{id}
pub async fn delete(state: web::Data<AppState>, path: web::Path<i32>) -> AppResult<HttpResponse> {
    state.categories.delete(category_id(path.into_inner())?).await?;
    Ok(HttpResponse::Ok().json(Message::new("Category deleted successfully")))
}
