//! End-to-end HTTP tests through the real router.

mod common;

use axum::http::{Method, StatusCode};
use serde_json::{json, Value};

use common::{send, TestContext};

async fn signup(app: &axum::Router, email: &str) -> String {
    let body = json!({ "email": email, "password": "johndoe123" }).to_string();
    let (status, json) = send(app, Method::POST, "/signup", None, Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED, "{}", json);
    json["data"]["access_token"].as_str().unwrap().to_string()
}

async fn create_service(app: &axum::Router, token: &str, name: &str) -> (StatusCode, Value) {
    let body = json!({ "name": name, "description": "Handles every API request" }).to_string();
    send(app, Method::POST, "/service", Some(token), Some(&body)).await
}

async fn first_service_id(app: &axum::Router, token: &str) -> i64 {
    let (status, json) = send(app, Method::GET, "/services", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    json["data"][0]["service_id"].as_i64().unwrap()
}

#[tokio::test]
async fn test_ping_and_health() {
    let ctx = TestContext::new().await;
    let app = ctx.router();

    let (status, body) = send(&app, Method::GET, "/ping", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, Value::String("pong".into()));

    let (status, body) = send(&app, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["database"], "healthy");
}

#[tokio::test]
async fn test_signup_then_duplicate() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let body = json!({ "email": "jd@gmail.com", "password": "johndoe123" }).to_string();

    let (status, json) = send(&app, Method::POST, "/signup", None, Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(json["success"], true);
    assert_eq!(json["data"]["email"], "jd@gmail.com");
    assert!(json["data"]["access_token"].is_string());
    assert!(json["data"].get("password_hash").is_none());

    let (status, json) = send(&app, Method::POST, "/signup", None, Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "EMAIL_EXISTS");
    assert_eq!(json["error"]["message"], "Try using a different email.");
}

#[tokio::test]
async fn test_signup_validation() {
    let ctx = TestContext::new().await;
    let app = ctx.router();

    let short = json!({ "email": "jd@gmail.com", "password": "short" }).to_string();
    let (status, json) = send(&app, Method::POST, "/signup", None, Some(&short)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");

    let bad_email = json!({ "email": "not-an-email", "password": "johndoe123" }).to_string();
    let (status, _) = send(&app, Method::POST, "/signup", None, Some(&bad_email)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_malformed_json_is_unprocessable() {
    let ctx = TestContext::new().await;
    let app = ctx.router();

    let (status, json) = send(&app, Method::POST, "/signup", None, Some("{not json")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(json["error"]["code"], "UNPROCESSABLE_ENTITY");
}

#[tokio::test]
async fn test_login() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    signup(&app, "jd@gmail.com").await;

    let good = json!({ "email": "jd@gmail.com", "password": "johndoe123" }).to_string();
    let (status, json) = send(&app, Method::POST, "/login", None, Some(&good)).await;
    assert_eq!(status, StatusCode::OK);
    let token = json["data"]["access_token"].as_str().unwrap();

    let (status, json) = send(&app, Method::GET, "/user", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"]["email"], "jd@gmail.com");

    let bad = json!({ "email": "jd@gmail.com", "password": "wrongpass" }).to_string();
    let (status, json) = send(&app, Method::POST, "/login", None, Some(&bad)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(json["error"]["message"], "Authentication failed");
}

#[tokio::test]
async fn test_protected_routes_require_token() {
    let ctx = TestContext::new().await;
    let app = ctx.router();

    for (method, uri) in [
        (Method::GET, "/user"),
        (Method::GET, "/services"),
        (Method::GET, "/service/1"),
        (Method::DELETE, "/service/1/version/1"),
    ] {
        let (status, _) = send(&app, method.clone(), uri, None, None).await;
        assert_eq!(status, StatusCode::UNAUTHORIZED, "{} {}", method, uri);
    }

    let (status, _) = send(&app, Method::GET, "/user", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_update_current_user_email() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "jd@gmail.com").await;
    signup(&app, "taken@gmail.com").await;

    let taken = json!({ "email": "taken@gmail.com" }).to_string();
    let (status, _) = send(&app, Method::PUT, "/user", Some(&token), Some(&taken)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let fresh = json!({ "email": "john@gmail.com" }).to_string();
    let (status, _) = send(&app, Method::PUT, "/user", Some(&token), Some(&fresh)).await;
    assert_eq!(status, StatusCode::OK);

    let (_, json) = send(&app, Method::GET, "/user", Some(&token), None).await;
    assert_eq!(json["data"]["email"], "john@gmail.com");
}

#[tokio::test]
async fn test_service_names_are_per_user() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let alice = signup(&app, "alice@gmail.com").await;
    let bob = signup(&app, "bob@gmail.com").await;

    let (status, _) = create_service(&app, &alice, "backend").await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = create_service(&app, &alice, "backend").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "Service with same name exists.");

    let (status, _) = create_service(&app, &bob, "backend").await;
    assert_eq!(status, StatusCode::CREATED);
}

#[tokio::test]
async fn test_service_validation() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "alice@gmail.com").await;

    let body = json!({ "name": "ab", "description": "too short" }).to_string();
    let (status, json) = send(&app, Method::POST, "/service", Some(&token), Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["code"], "VALIDATION_ERROR");
}

#[tokio::test]
async fn test_empty_listing_is_no_content() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "alice@gmail.com").await;

    let (status, body) = send(&app, Method::GET, "/services", Some(&token), None).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert_eq!(body, Value::Null);
}

#[tokio::test]
async fn test_listing_query_parameters() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "alice@gmail.com").await;
    for name in ["alpha", "bravo", "charlie"] {
        create_service(&app, &token, name).await;
    }

    let (status, json) = send(
        &app,
        Method::GET,
        "/services?limit=2&orderBy=DESC",
        Some(&token),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = json["data"]
        .as_array()
        .unwrap()
        .iter()
        .map(|s| s["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, ["charlie", "bravo"]);
    assert_eq!(json["data"][0]["versions_count"], 0);

    let (status, json) = send(&app, Method::GET, "/services?name=rav", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"].as_array().unwrap().len(), 1);

    let (status, _) = send(&app, Method::GET, "/services?limit=ten", Some(&token), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_service_lifecycle() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "alice@gmail.com").await;
    create_service(&app, &token, "backend").await;
    let id = first_service_id(&app, &token).await;

    let update = json!({ "name": "gateway", "description": "Routes every inbound request" })
        .to_string();
    let uri = format!("/service/{}", id);
    let (status, _) = send(&app, Method::PUT, &uri, Some(&token), Some(&update)).await;
    assert_eq!(status, StatusCode::OK);

    let (status, json) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(json["data"][0]["name"], "gateway");
    assert!(json["data"][0]["version"].is_null());

    let (status, _) = send(&app, Method::DELETE, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    let (status, _) = send(&app, Method::GET, &uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_foreign_and_bogus_ids_are_not_found() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let alice = signup(&app, "alice@gmail.com").await;
    let mallory = signup(&app, "mallory@gmail.com").await;
    create_service(&app, &alice, "backend").await;
    let id = first_service_id(&app, &alice).await;
    let uri = format!("/service/{}", id);

    let (status, _) = send(&app, Method::GET, &uri, Some(&mallory), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    let (status, _) = send(&app, Method::DELETE, &uri, Some(&mallory), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let (status, _) = send(&app, Method::GET, "/service/abc", Some(&alice), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_version_lifecycle() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "alice@gmail.com").await;
    create_service(&app, &token, "backend").await;
    let id = first_service_id(&app, &token).await;
    let uri = format!("/service/{}/version", id);
    let body = json!({ "version": "v1.0.0", "changelog": "Initial release" }).to_string();

    let (status, _) = send(&app, Method::POST, &uri, Some(&token), Some(&body)).await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, json) = send(&app, Method::POST, &uri, Some(&token), Some(&body)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(json["error"]["message"], "Service with same version exists.");

    let (_, json) = send(&app, Method::GET, "/services", Some(&token), None).await;
    assert_eq!(json["data"][0]["versions_count"], 1);

    let (_, json) = send(&app, Method::GET, &format!("/service/{}", id), Some(&token), None).await;
    assert_eq!(json["data"][0]["version"], "v1.0.0");
    assert_eq!(json["data"][0]["changelog"], "Initial release");
    let version_id = json["data"][0]["sv_id"].as_i64().unwrap();

    let delete_uri = format!("/service/{}/version/{}", id, version_id);
    let (status, _) = send(&app, Method::DELETE, &delete_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);
    let (status, _) = send(&app, Method::DELETE, &delete_uri, Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_version_for_missing_service() {
    let ctx = TestContext::new().await;
    let app = ctx.router();
    let token = signup(&app, "alice@gmail.com").await;
    let body = json!({ "version": "v1.0.0" }).to_string();

    let (status, json) =
        send(&app, Method::POST, "/service/9999/version", Some(&token), Some(&body)).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(json["error"]["message"], "Service not found");
}
