//! bcrypt password hashing.
//!
//! bcrypt is deliberately slow, so both operations run on tokio's blocking
//! pool instead of stalling the request executor.

use crate::error::{Result, TaskProError};

/// bcrypt only looks at the first 72 bytes of its input
pub const MAX_PASSWORD_BYTES: usize = 72;

pub async fn hash_password(password: &str, cost: u32) -> Result<String> {
    let password = password.to_owned();

    let hash = tokio::task::spawn_blocking(move || bcrypt::hash(password, cost))
        .await
        .map_err(|e| TaskProError::Internal(format!("password hashing task failed: {}", e)))??;

    Ok(hash)
}

pub async fn verify_password(password: &str, hash: &str) -> Result<bool> {
    let password = password.to_owned();
    let hash = hash.to_owned();

    let matches = tokio::task::spawn_blocking(move || bcrypt::verify(password, &hash))
        .await
        .map_err(|e| TaskProError::Internal(format!("password verify task failed: {}", e)))??;

    Ok(matches)
}
