//! Common test utilities for API integration tests
//!
//! Builds the full router over an in-memory store and provides helpers to
//! register accounts and send JSON requests through it.

#![allow(dead_code)]

use axum::body::Body;
use axum::http::{Request, StatusCode};
use serde_json::{json, Value};
use std::sync::Arc;
use tasktrack_api::app::{build_router, AppState};
use tasktrack_api::config::{ApiConfig, Config, JwtConfig, StorageBackend, StorageConfig};
use tasktrack_shared::store::memory::MemoryStore;
use tower::Service as _;

pub const JWT_SECRET: &str = "test-secret-key-at-least-32-bytes-long";

/// Test context containing the router and its backing store
pub struct TestContext {
    pub app: axum::Router,
    pub store: Arc<MemoryStore>,
}

/// A registered account and its credential
pub struct TestAccount {
    pub id: String,
    pub username: String,
    pub token: String,
}

impl TestAccount {
    pub fn auth_header(&self) -> String {
        format!("Bearer {}", self.token)
    }
}

pub fn test_config(max_page_size: i64) -> Config {
    Config {
        api: ApiConfig {
            host: "127.0.0.1".to_string(),
            port: 0,
            cors_origins: vec!["*".to_string()],
            max_page_size,
        },
        storage: StorageConfig {
            backend: StorageBackend::Memory,
            database_url: String::new(),
            max_connections: 1,
        },
        jwt: JwtConfig {
            secret: JWT_SECRET.to_string(),
        },
    }
}

impl TestContext {
    pub fn new() -> Self {
        Self::with_max_page_size(100)
    }

    pub fn with_max_page_size(max_page_size: i64) -> Self {
        let store = Arc::new(MemoryStore::new());
        let state = AppState::new(store.clone(), test_config(max_page_size));

        Self {
            app: build_router(state),
            store,
        }
    }

    /// Sends a request and returns the status and parsed JSON body
    ///
    /// Non-JSON bodies come back as a JSON string.
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

        self.dispatch(request).await
    }

    /// Sends a JSON-typed request with a body passed through verbatim
    pub async fn send_raw(
        &self,
        method: &str,
        uri: &str,
        token: Option<&str>,
        body: &str,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder()
            .method(method)
            .uri(uri)
            .header("content-type", "application/json");
        if let Some(token) = token {
            builder = builder.header("authorization", format!("Bearer {}", token));
        }

        self.dispatch(builder.body(Body::from(body.to_string())).unwrap())
            .await
    }

    async fn dispatch(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.app.clone().call(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let value = serde_json::from_slice(&bytes)
            .unwrap_or_else(|_| Value::String(String::from_utf8_lossy(&bytes).into_owned()));

        (status, value)
    }

    /// Registers an account through the API
    pub async fn register(&self, username: &str, role: &str) -> TestAccount {
        let (status, body) = self
            .send(
                "POST",
                "/api/auth/register",
                None,
                Some(json!({
                    "username": username,
                    "email": format!("{}@example.com", username),
                    "password": "password123",
                    "role": role,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {}", body);

        TestAccount {
            id: body["id"].as_str().unwrap().to_string(),
            username: body["username"].as_str().unwrap().to_string(),
            token: body["token"].as_str().unwrap().to_string(),
        }
    }

    /// Creates a task through the API and returns its JSON
    pub async fn create_task(&self, owner: &TestAccount, title: &str, status: &str) -> Value {
        let (code, body) = self
            .send(
                "POST",
                "/api/tasks",
                Some(&owner.token),
                Some(json!({
                    "title": title,
                    "description": format!("{} description", title),
                    "status": status,
                })),
            )
            .await;
        assert_eq!(code, StatusCode::CREATED, "create failed: {}", body);
        body
    }
}
