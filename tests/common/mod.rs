//! Common utilities for integration tests
//!
//! Shared setup for driving the API in-process and for running the
//! `taskpro` binary in an isolated environment.

use assert_cmd::Command;
use axum::{
    body::Body,
    http::{header, Method, Request, StatusCode},
    Router,
};
use serde_json::Value;
use sqlx::SqlitePool;
use std::path::PathBuf;
use taskpro::api::server::{create_router, AppState};
use taskpro::auth::AuthSettings;
use taskpro::db::{create_pool, run_migrations};
use tempfile::TempDir;
use tower::ServiceExt;

pub const TEST_SECRET: &str = "integration-test-secret";

const TASKPRO_VARS: [&str; 7] = [
    "TASKPRO_HOST",
    "TASKPRO_PORT",
    "TASKPRO_DATABASE_PATH",
    "TASKPRO_JWT_SECRET",
    "TASKPRO_TOKEN_TTL_HOURS",
    "TASKPRO_BCRYPT_COST",
    "TASKPRO_LOG_RETENTION_DAYS",
];

/// Get the path to the `taskpro` binary
#[allow(dead_code)]
pub fn taskpro_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_taskpro"))
}

/// Create a Command for `taskpro` with no inherited `TASKPRO_*` settings
#[allow(dead_code)]
pub fn taskpro_command() -> Command {
    let mut cmd = Command::new(taskpro_binary());
    for var in TASKPRO_VARS {
        cmd.env_remove(var);
    }
    cmd.env_remove("RUST_LOG");
    cmd
}

/// An API instance backed by a throwaway database
#[allow(dead_code)]
pub struct TestApp {
    pub router: Router,
    pub pool: SqlitePool,
    pub state: AppState,
    pub _temp_dir: TempDir,
}

#[allow(dead_code)]
impl TestApp {
    pub async fn new() -> Self {
        let temp_dir = TempDir::new().unwrap();
        let pool = create_pool(&temp_dir.path().join("taskpro.db"))
            .await
            .unwrap();
        run_migrations(&pool).await.unwrap();

        let state = AppState::new(pool.clone(), test_auth_settings());
        let router = create_router(state.clone());

        Self {
            router,
            pool,
            state,
            _temp_dir: temp_dir,
        }
    }

    /// Send a request and decode the JSON response body (`Null` when empty)
    pub async fn request(
        &self,
        method: Method,
        uri: &str,
        token: Option<&str>,
        body: Option<Value>,
    ) -> (StatusCode, Value) {
        let mut builder = Request::builder().method(method).uri(uri);
        if let Some(t) = token {
            builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", t));
        }

        let request = match body {
            Some(json) => builder
                .header(header::CONTENT_TYPE, "application/json")
                .body(Body::from(json.to_string()))
                .unwrap(),
            None => builder.body(Body::empty()).unwrap(),
        };

        self.send(request).await
    }

    pub async fn send(&self, request: Request<Body>) -> (StatusCode, Value) {
        let response = self.router.clone().oneshot(request).await.unwrap();
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();

        let json = if bytes.is_empty() {
            Value::Null
        } else {
            serde_json::from_slice(&bytes).unwrap_or(Value::Null)
        };

        (status, json)
    }

    /// Register a user and return `(token, user_id)`
    pub async fn register(&self, name: &str, email: &str, password: &str) -> (String, i64) {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/register",
                None,
                Some(serde_json::json!({
                    "name": name,
                    "email": email,
                    "password": password,
                })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "register failed: {body}");

        (
            body["token"].as_str().unwrap().to_string(),
            body["user"]["id"].as_i64().unwrap(),
        )
    }

    /// Create a task and return its JSON representation
    pub async fn create_task(&self, token: &str, title: &str) -> Value {
        let (status, body) = self
            .request(
                Method::POST,
                "/api/tasks",
                Some(token),
                Some(serde_json::json!({ "title": title })),
            )
            .await;
        assert_eq!(status, StatusCode::CREATED, "create failed: {body}");
        body
    }
}

/// Cheapest bcrypt cost so the suite stays fast
#[allow(dead_code)]
pub fn test_auth_settings() -> AuthSettings {
    AuthSettings::new(TEST_SECRET.as_bytes(), 24, taskpro::config::MIN_BCRYPT_COST)
}
