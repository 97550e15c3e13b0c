//! HTTP-level tests over the in-memory state: routing, status codes, and
//! the `{data}` / `{error}` wire shapes.

use actix_http::Request;
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, test, web};
use serde_json::{Value, json};

use crate::handlers::configure_routes;
use crate::state::AppState;

async fn test_app() -> impl Service<Request, Response = ServiceResponse, Error = actix_web::Error>
{
    test::init_service(
        App::new()
            .app_data(web::Data::new(AppState::in_memory()))
            .configure(configure_routes),
    )
    .await
}

async fn create_category<S>(app: &S, name: &str) -> i32
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/categories")
        .set_json(json!({"name": name}))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    body["data"]["id"].as_i64().expect("category id") as i32
}

async fn create_post<S>(app: &S, title: &str, category_id: i32) -> Value
where
    S: Service<Request, Response = ServiceResponse, Error = actix_web::Error>,
{
    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({
            "title": title,
            "content": "Some body text",
            "categoryId": category_id,
        }))
        .to_request();
    let resp = test::call_service(app, req).await;
    assert_eq!(resp.status(), 201);
    let body: Value = test::read_body_json(resp).await;
    body["data"].clone()
}

#[actix_rt::test]
async fn health_endpoint_reports_ok() {
    let app = test_app().await;
    let req = test::TestRequest::get().uri("/api/health").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["status"], "ok");
}

#[actix_rt::test]
async fn create_post_returns_created_with_derived_fields() {
    let app = test_app().await;
    let category_id = create_category(&app, "Tech").await;

    let post = create_post(&app, "Hello World", category_id).await;

    assert_eq!(post["slug"], "hello-world");
    assert_eq!(post["readTime"], 1);
    assert_eq!(post["category"]["name"], "Tech");
    assert_eq!(post["tags"], json!([]));
    assert!(post.get("excerpt").is_none());
}

#[actix_rt::test]
async fn duplicate_title_is_bad_request_with_error_body() {
    let app = test_app().await;
    let category_id = create_category(&app, "Tech").await;
    create_post(&app, "Hello World", category_id).await;

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({
            "title": "Hello World",
            "content": "Another body",
            "categoryId": category_id,
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Title already exist, please change your title");
}

#[actix_rt::test]
async fn malformed_post_id_is_not_found() {
    let app = test_app().await;
    let req = test::TestRequest::get()
        .uri("/api/posts/definitely-not-an-id")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 404);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Post not found");
}

#[actix_rt::test]
async fn listing_wraps_rows_in_pagination_envelope() {
    let app = test_app().await;
    let category_id = create_category(&app, "Tech").await;
    create_post(&app, "A", category_id).await;

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts?categoryId={category_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["pagination"]["page"], 1);
    assert_eq!(body["pagination"]["limit"], 6);
    assert_eq!(body["pagination"]["total"], 1);
    assert_eq!(body["pagination"]["totalPages"], 1);
    assert_eq!(body["pagination"]["hasNext"], false);
    assert_eq!(body["pagination"]["hasPrev"], false);

    let row = &body["data"][0];
    assert_eq!(row["title"], "A");
    assert!(row.get("content").is_none());
    assert!(row.get("categoryId").is_none());
}

#[actix_rt::test]
async fn out_of_range_filter_is_bad_request() {
    let app = test_app().await;
    let req = test::TestRequest::get()
        .uri("/api/posts?month=13")
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Month must be between 1-12");
}

#[actix_rt::test]
async fn update_clears_tags_with_empty_array() {
    let app = test_app().await;
    let category_id = create_category(&app, "Tech").await;

    let req = test::TestRequest::post()
        .uri("/api/tags")
        .set_json(json!({"name": "rust"}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let tag: Value = test::read_body_json(resp).await;
    let tag_id = tag["data"]["id"].as_i64().unwrap();

    let req = test::TestRequest::post()
        .uri("/api/posts")
        .set_json(json!({
            "title": "Tagged",
            "content": "Body",
            "categoryId": category_id,
            "tags": [tag_id],
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 201);
    let post: Value = test::read_body_json(resp).await;
    let post_id = post["data"]["id"].as_str().unwrap().to_string();
    assert_eq!(post["data"]["tags"][0]["name"], "rust");

    let req = test::TestRequest::put()
        .uri(&format!("/api/posts/{post_id}"))
        .set_json(json!({"tags": []}))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let updated: Value = test::read_body_json(resp).await;
    assert_eq!(updated["data"]["tags"], json!([]));
}

#[actix_rt::test]
async fn delete_returns_message_and_then_not_found() {
    let app = test_app().await;
    let category_id = create_category(&app, "Tech").await;
    let post = create_post(&app, "Ephemeral", category_id).await;
    let post_id = post["id"].as_str().unwrap();

    let req = test::TestRequest::delete()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 200);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["message"], "Post deleted successfully");

    let req = test::TestRequest::get()
        .uri(&format!("/api/posts/{post_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), 404);
}

#[actix_rt::test]
async fn referenced_category_delete_is_rejected() {
    let app = test_app().await;
    let category_id = create_category(&app, "Tech").await;
    create_post(&app, "Pinned", category_id).await;

    let req = test::TestRequest::delete()
        .uri(&format!("/api/categories/{category_id}"))
        .to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(
        body["error"],
        "Cannot delete category that has posts. Please remove or reassign posts first."
    );
}

#[actix_rt::test]
async fn non_positive_category_id_is_bad_request() {
    let app = test_app().await;
    let req = test::TestRequest::get().uri("/api/categories/0").to_request();
    let resp = test::call_service(&app, req).await;

    assert_eq!(resp.status(), 400);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Category ID must be a positive integer");
}
