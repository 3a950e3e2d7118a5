use axum::{
    extract::{
        rejection::{JsonRejection, PathRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    response::Json,
    Extension,
};

use super::server::AppState;
use crate::auth::{AuthService, AuthUser};
use crate::db::models::{
    AuthResponse, CreateTaskRequest, LoginRequest, MessageResponse, RegisterRequest, Task,
    TaskListQuery, TaskStats, UpdateTaskRequest, User,
};
use crate::error::{Result, TaskProError};
use crate::tasks::{TaskManager, TaskService};
use crate::users::UserManager;

/// Register a new account and sign it in
pub async fn register(
    State(state): State<AppState>,
    payload: std::result::Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<AuthResponse>)> {
    let req = json_body(payload)?;
    let auth = AuthService::new(UserManager::new(&state.db_pool), &state.auth);

    let response = auth.register(&req).await?;
    Ok((StatusCode::CREATED, Json(response)))
}

/// Exchange email and password for a token
pub async fn login(
    State(state): State<AppState>,
    payload: std::result::Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<AuthResponse>> {
    let req = json_body(payload)?;
    let auth = AuthService::new(UserManager::new(&state.db_pool), &state.auth);

    Ok(Json(auth.login(&req).await?))
}

/// Profile of the authenticated user
pub async fn me(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<User>> {
    let auth = AuthService::new(UserManager::new(&state.db_pool), &state.auth);
    Ok(Json(auth.current_user(&user).await?))
}

/// List the caller's tasks, newest first
pub async fn list_tasks(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    query: std::result::Result<Query<TaskListQuery>, QueryRejection>,
) -> Result<Json<Vec<Task>>> {
    let Query(query) = query.map_err(|e| {
        tracing::debug!("Rejected task list query: {}", e);
        TaskProError::InvalidInput("Invalid query parameters".to_string())
    })?;
    let service = TaskService::new(TaskManager::new(&state.db_pool));

    Ok(Json(service.list_tasks(user.user_id, query.done).await?))
}

pub async fn task_stats(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
) -> Result<Json<TaskStats>> {
    let service = TaskService::new(TaskManager::new(&state.db_pool));
    Ok(Json(service.get_stats(user.user_id).await?))
}

/// Get a single task by ID
pub async fn get_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<Task>> {
    let id = task_id(id)?;
    let service = TaskService::new(TaskManager::new(&state.db_pool));

    Ok(Json(service.get_task(id, user.user_id).await?))
}

/// Create a new task
pub async fn create_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    payload: std::result::Result<Json<CreateTaskRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<Task>)> {
    let req = json_body(payload)?;
    let service = TaskService::new(TaskManager::new(&state.db_pool));

    let task = service.create_task(user.user_id, &req).await?;
    Ok((StatusCode::CREATED, Json(task)))
}

/// Update a task
pub async fn update_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
    payload: std::result::Result<Json<UpdateTaskRequest>, JsonRejection>,
) -> Result<Json<Task>> {
    let id = task_id(id)?;
    let req = json_body(payload)?;
    let service = TaskService::new(TaskManager::new(&state.db_pool));

    Ok(Json(service.update_task(id, user.user_id, &req).await?))
}

/// Delete a task
pub async fn delete_task(
    State(state): State<AppState>,
    Extension(user): Extension<AuthUser>,
    id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<MessageResponse>> {
    let id = task_id(id)?;
    let service = TaskService::new(TaskManager::new(&state.db_pool));

    service.delete_task(id, user.user_id).await?;
    Ok(Json(MessageResponse {
        message: "Task deleted successfully".to_string(),
    }))
}

fn json_body<T>(payload: std::result::Result<Json<T>, JsonRejection>) -> Result<T> {
    match payload {
        Ok(Json(body)) => Ok(body),
        Err(rejection) => {
            tracing::debug!("Rejected request body: {}", rejection.body_text());
            Err(TaskProError::InvalidInput(
                "Invalid request body".to_string(),
            ))
        },
    }
}

fn task_id(id: std::result::Result<Path<i64>, PathRejection>) -> Result<i64> {
    id.map(|Path(id)| id)
        .map_err(|_| TaskProError::InvalidInput("Invalid task ID".to_string()))
}
