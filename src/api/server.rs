use axum::{
    http::{header, Method, StatusCode},
    response::{IntoResponse, Json},
    routing::get,
    Router,
};
use serde::Serialize;
use sqlx::SqlitePool;
use std::sync::Arc;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::AuthSettings;
use crate::config::ServerConfig;
use crate::db::{create_pool, run_migrations};
use crate::error::{Result, TaskProError};

/// Server state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub db_pool: SqlitePool,
    pub auth: Arc<AuthSettings>,
}

impl AppState {
    pub fn new(db_pool: SqlitePool, auth: AuthSettings) -> Self {
        Self {
            db_pool,
            auth: Arc::new(auth),
        }
    }
}

/// API server instance
pub struct ApiServer {
    config: ServerConfig,
}

/// Health check response
#[derive(Serialize)]
struct HealthResponse {
    status: String,
    service: String,
    version: String,
}

impl ApiServer {
    pub fn new(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Run the API server until Ctrl-C
    pub async fn run(self) -> Result<()> {
        if self.config.uses_dev_secret() {
            tracing::warn!(
                "No JWT secret configured, using the development secret. Set {} in production",
                crate::config::ENV_JWT_SECRET
            );
        }

        let db_pool = create_pool(&self.config.database_path).await?;
        run_migrations(&db_pool).await?;

        let state = AppState::new(db_pool.clone(), AuthSettings::from_config(&self.config));
        let app = create_router(state);

        let addr = self.config.bind_addr();
        let listener = tokio::net::TcpListener::bind(&addr).await.map_err(|e| {
            TaskProError::ConfigError(format!("Failed to bind to {}: {}", addr, e))
        })?;

        tracing::info!("TaskPro API listening on {}", addr);
        tracing::info!("Database: {}", self.config.database_path.display());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        db_pool.close().await;
        tracing::info!("TaskPro API stopped");

        Ok(())
    }
}

/// Create the Axum router with all routes and middleware
pub fn create_router(state: AppState) -> Router {
    use super::routes;

    let api_routes = Router::new()
        .route("/health", get(health_handler))
        .merge(routes::api_routes(state.clone()));

    Router::new()
        .nest("/api", api_routes)
        .fallback(not_found_handler)
        .with_state(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods([
                    Method::GET,
                    Method::POST,
                    Method::PUT,
                    Method::DELETE,
                    Method::OPTIONS,
                ])
                .allow_headers([header::CONTENT_TYPE, header::AUTHORIZATION]),
        )
        .layer(TraceLayer::new_for_http())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

/// Health check handler
async fn health_handler() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        service: "taskpro".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

/// 404 Not Found handler
async fn not_found_handler() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(serde_json::json!({
            "code": "NOT_FOUND",
            "message": "Not found"
        })),
    )
}
