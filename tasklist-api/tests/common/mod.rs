//! Common test utilities for integration tests
//!
//! Builds the full router over in-memory stores, a fixed clock and a cheap
//! hashing policy, and wraps request/response plumbing.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use chrono::{DateTime, TimeZone, Utc};
use serde_json::Value;
use std::sync::Arc;
use tasklist_api::app::{build_router, AppState};
use tasklist_api::config::{ApiConfig, Config, DatabaseConfig, JwtConfig, PasswordConfig};
use tasklist_shared::auth::clock::FixedClock;
use tasklist_shared::store::{InMemoryAccountDirectory, InMemoryTodoStore};
use tower::Service as _;

pub const SECRET: &str = "integration-test-secret-at-least-32-bytes";

/// Test context containing the router and its backing stores
pub struct TestContext {
    pub app: axum::Router,
    pub clock: Arc<FixedClock>,
    pub directory: Arc<InMemoryAccountDirectory>,
    pub todos: Arc<InMemoryTodoStore>,
}

pub fn t0() -> DateTime<Utc> {
    Utc.timestamp_opt(1_700_000_000, 0).unwrap()
}

pub fn test_config(secret: &str) -> Config {
    Config {
        api: ApiConfig::default(),
        database: DatabaseConfig {
            url: "postgresql://unused/tasklist".to_string(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: secret.to_string(),
            validity_secs: 86_400,
        },
        password: PasswordConfig {
            memory_kib: 1024,
            iterations: 1,
            parallelism: 1,
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_secret(SECRET)
    }

    pub fn with_secret(secret: &str) -> Self {
        let clock = Arc::new(FixedClock::new(t0()));
        let directory = Arc::new(InMemoryAccountDirectory::new());
        let todos = Arc::new(InMemoryTodoStore::new());

        let state = AppState::new(
            test_config(secret),
            directory.clone(),
            todos.clone(),
            clock.clone(),
        )
        .unwrap();

        Self {
            app: build_router(state),
            clock,
            directory,
            todos,
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    pub async fn send(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        let request = match body {
            Some(body) => builder
                .header("content-type", "application/json")
                .body(Body::from(body.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.call(request).await
    }

    pub async fn call(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        let json = if body.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&body).unwrap_or_else(|_| {
                Value::String(String::from_utf8_lossy(&body).into_owned())
            })
        };

        (status, json)
    }

    pub async fn sign_up(&self, email: &str, username: &str, password: &str) -> StatusCode {
        let (status, _) = self
            .send(
                "POST",
                "/v1/sign_up",
                None,
                Some(serde_json::json!({
                    "email": email,
                    "username": username,
                    "password": password,
                })),
            )
            .await;
        status
    }

    /// Signs up and signs in, returning the bearer token
    pub async fn register(&self, email: &str, password: &str) -> String {
        assert_eq!(self.sign_up(email, "user", password).await, StatusCode::OK);

        let (status, body) = self
            .send(
                "POST",
                "/v1/sign_in",
                None,
                Some(serde_json::json!({ "email": email, "password": password })),
            )
            .await;
        assert_eq!(status, StatusCode::OK, "sign in failed: {}", body);

        body["jwt_token"].as_str().unwrap().to_string()
    }
}
