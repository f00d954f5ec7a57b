/// End-to-end tests of sign-up, sign-in and the authorization gate

mod common;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::Duration;
use common::TestContext;
use serde_json::json;
use std::sync::Arc;
use tasklist_shared::auth::clock::FixedClock;
use tasklist_shared::auth::jwt::{issue_token, SigningKey};
use tasklist_shared::models::account::NewAccount;
use tasklist_shared::store::{AccountDirectory, InMemoryAccountDirectory, InMemoryTodoStore};

#[tokio::test]
async fn test_health_is_public() {
    let ctx = TestContext::new();

    let (status, body) = ctx.send("GET", "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_sign_up_then_sign_in() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_up",
            None,
            Some(json!({ "email": "a@b.com", "username": "a", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Successfully signed up!");

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_in",
            None,
            Some(json!({ "email": "a@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["type"], "Bearer");
    assert_eq!(body["expires_in"], 86_400);

    let token = body["jwt_token"].as_str().unwrap();
    assert_eq!(token.split('.').count(), 3);

    let (status, _) = ctx.send("GET", "/v1/todos", Some(token), None).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_sign_up_validation() {
    let ctx = TestContext::new();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_up",
            None,
            Some(json!({ "email": "a@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "validation_error");
    assert_eq!(body["details"][0]["field"], "username");

    let (status, _) = ctx
        .send(
            "POST",
            "/v1/sign_up",
            None,
            Some(json!({ "email": "", "username": "a", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_duplicate_sign_up_is_internal_error() {
    let ctx = TestContext::new();
    assert_eq!(ctx.sign_up("a@b.com", "a", "pw").await, StatusCode::OK);

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_up",
            None,
            Some(json!({ "email": "a@b.com", "username": "b", "password": "pw2" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An internal error occurred");
}

#[tokio::test]
async fn test_sign_in_failures() {
    let ctx = TestContext::new();
    assert_eq!(ctx.sign_up("a@b.com", "a", "pw").await, StatusCode::OK);

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_in",
            None,
            Some(json!({ "email": "a@b.com", "password": "wrong" })),
        )
        .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "incorrect password");

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_in",
            None,
            Some(json!({ "email": "nobody@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no such user: nobody@b.com");
}

#[tokio::test]
async fn test_malformed_json_is_bad_request() {
    let ctx = TestContext::new();

    let request = Request::builder()
        .method("POST")
        .uri("/v1/sign_in")
        .header("content-type", "application/json")
        .body(Body::from("{not json"))
        .unwrap();

    let (status, body) = ctx.call(request).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");
}

#[tokio::test]
async fn test_gate_rejection_classes() {
    let ctx = TestContext::new();
    let token = ctx.register("a@b.com", "pw").await;

    let (status, _) = ctx.send("GET", "/v1/todos", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let request = Request::builder()
        .uri("/v1/todos")
        .header("authorization", format!("Basic {}", token))
        .body(Body::empty())
        .unwrap();
    let (status, _) = ctx.call(request).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, body) = ctx.send("GET", "/v1/todos", Some("garbage"), None).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "bad_request");

    let forged = issue_token(
        "a@b.com",
        &SigningKey::new("another-secret-that-is-at-least-32-bytes").unwrap(),
        common::t0(),
        Duration::hours(24),
    )
    .unwrap();
    let (status, _) = ctx.send("GET", "/v1/todos", Some(&forged), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_from_other_server_rejected() {
    let ours = TestContext::new();
    let theirs = TestContext::with_secret("a-completely-different-secret-32-bytes!!");

    ours.register("a@b.com", "pw").await;
    let foreign = theirs.register("a@b.com", "pw").await;

    let (status, _) = ours.send("GET", "/v1/todos", Some(&foreign), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_token_expires_at_end_of_window() {
    let ctx = TestContext::new();
    let token = ctx.register("a@b.com", "pw").await;

    ctx.clock.advance(Duration::seconds(86_399));
    let (status, _) = ctx.send("GET", "/v1/todos", Some(&token), None).await;
    assert_eq!(status, StatusCode::OK);

    ctx.clock.advance(Duration::seconds(1));
    let (status, body) = ctx.send("GET", "/v1/todos", Some(&token), None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["message"], "Token expired");
}

#[tokio::test]
async fn test_deleted_account_token_is_not_found() {
    let ctx = TestContext::new();
    let token = ctx.register("a@b.com", "pw").await;

    ctx.directory.remove("a@b.com").await;

    let (status, body) = ctx.send("GET", "/v1/todos", Some(&token), None).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["message"], "no such user: a@b.com");
}

#[tokio::test]
async fn test_corrupted_stored_hash_is_internal_error() {
    let ctx = TestContext::new();
    ctx.directory
        .create_account(NewAccount {
            email: "a@b.com".to_string(),
            username: "a".to_string(),
            password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHRzYWx0".to_string(),
        })
        .await
        .unwrap();

    let (status, body) = ctx
        .send(
            "POST",
            "/v1/sign_in",
            None,
            Some(json!({ "email": "a@b.com", "password": "pw" })),
        )
        .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["message"], "An internal error occurred");
}

#[test]
fn test_state_rejects_unbounded_token_validity() {
    let mut config = common::test_config(common::SECRET);
    config.jwt.validity_secs = 10_000_000_000_000;

    let state = tasklist_api::app::AppState::new(
        config,
        Arc::new(InMemoryAccountDirectory::new()),
        Arc::new(InMemoryTodoStore::new()),
        Arc::new(FixedClock::new(common::t0())),
    );
    assert!(state.is_err());
}
