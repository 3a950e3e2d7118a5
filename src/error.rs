use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum TaskProError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Task not found")]
    TaskNotFound(i64),

    #[error("User not found")]
    UserNotFound(i64),

    #[error("{0}")]
    InvalidInput(String),

    #[error("email already registered")]
    EmailTaken,

    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("{0}")]
    Unauthorized(String),

    #[error("Password hashing error: {0}")]
    PasswordHashError(#[from] bcrypt::BcryptError),

    #[error("Token error: {0}")]
    TokenError(#[from] jsonwebtoken::errors::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON serialization error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
}

impl TaskProError {
    pub fn to_error_code(&self) -> &'static str {
        match self {
            TaskProError::TaskNotFound(_) => "TASK_NOT_FOUND",
            TaskProError::UserNotFound(_) => "USER_NOT_FOUND",
            TaskProError::DatabaseError(_) => "DATABASE_ERROR",
            TaskProError::InvalidInput(_) => "INVALID_INPUT",
            TaskProError::EmailTaken => "EMAIL_TAKEN",
            TaskProError::InvalidCredentials => "INVALID_CREDENTIALS",
            TaskProError::Unauthorized(_) => "UNAUTHORIZED",
            TaskProError::ConfigError(_) => "CONFIG_ERROR",
            _ => "INTERNAL_ERROR",
        }
    }

    pub fn status_code(&self) -> StatusCode {
        match self {
            TaskProError::TaskNotFound(_) | TaskProError::UserNotFound(_) => StatusCode::NOT_FOUND,
            TaskProError::InvalidInput(_) | TaskProError::EmailTaken => StatusCode::BAD_REQUEST,
            TaskProError::InvalidCredentials | TaskProError::Unauthorized(_) => {
                StatusCode::UNAUTHORIZED
            },
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Errors that are the client's fault carry their own message; anything
    /// else is reported generically so storage details never leak.
    pub fn to_error_response(&self) -> ErrorResponse {
        let message = if self.status_code().is_server_error() {
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        ErrorResponse {
            code: self.to_error_code().to_string(),
            message,
        }
    }
}

impl IntoResponse for TaskProError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            crate::log_error!(self, "request failed");
        }
        (status, Json(self.to_error_response())).into_response()
    }
}

pub type Result<T> = std::result::Result<T, TaskProError>;
