use axum::{
    middleware,
    routing::{get, post},
    Router,
};

use super::handlers;
use super::middleware::require_auth;
use super::server::AppState;

/// Create API router with all endpoints
pub fn api_routes(state: AppState) -> Router<AppState> {
    // Everything below requires a valid bearer token
    let protected = Router::new()
        .route("/me", get(handlers::me))
        .route("/tasks", get(handlers::list_tasks).post(handlers::create_task))
        .route("/tasks/stats", get(handlers::task_stats))
        .route(
            "/tasks/:id",
            get(handlers::get_task)
                .put(handlers::update_task)
                .delete(handlers::delete_task),
        )
        .route_layer(middleware::from_fn_with_state(state, require_auth));

    Router::new()
        .route("/register", post(handlers::register))
        .route("/login", post(handlers::login))
        .merge(protected)
}
