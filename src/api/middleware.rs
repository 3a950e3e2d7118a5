use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};

use super::server::AppState;
use crate::error::TaskProError;

/// Reject requests without a valid `Authorization: Bearer <token>` header.
///
/// On success the caller's [`crate::auth::AuthUser`] is stored in the request
/// extensions for handlers to pick up with `Extension<AuthUser>`.
pub async fn require_auth(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, TaskProError> {
    let value = request
        .headers()
        .get(header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Authorization header required"))?;

    let token = value
        .to_str()
        .ok()
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| unauthorized("Bearer token required"))?;

    let user = state.auth.verify_token(token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected bearer token");
        unauthorized("Invalid token")
    })?;

    tracing::trace!(user_id = user.user_id, "Authenticated request");
    request.extensions_mut().insert(user);

    Ok(next.run(request).await)
}

fn unauthorized(message: &str) -> TaskProError {
    TaskProError::Unauthorized(message.to_string())
}
