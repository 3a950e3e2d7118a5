//! Registration, login and token verification.
//!
//! - [`password`]: bcrypt hashing and verification
//! - [`jwt`]: token signing and verification

pub mod jwt;
pub mod password;

use chrono::Duration;

use crate::backend::UserBackend;
use crate::config::ServerConfig;
use crate::db::models::{AuthResponse, LoginRequest, RegisterRequest, User};
use crate::error::{Result, TaskProError};
use jwt::JwtKeys;
use password::MAX_PASSWORD_BYTES;

/// Longest accepted name or email, in characters
pub const MAX_FIELD_LEN: usize = 255;

/// Process-wide authentication settings
#[derive(Debug, Clone)]
pub struct AuthSettings {
    keys: JwtKeys,
    bcrypt_cost: u32,
}

impl AuthSettings {
    pub fn new(secret: &[u8], token_ttl_hours: i64, bcrypt_cost: u32) -> Self {
        Self {
            keys: JwtKeys::new(secret, Duration::hours(token_ttl_hours)),
            bcrypt_cost,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::new(
            config.jwt_secret.as_bytes(),
            config.token_ttl_hours,
            config.bcrypt_cost,
        )
    }

    pub fn keys(&self) -> &JwtKeys {
        &self.keys
    }

    pub fn bcrypt_cost(&self) -> u32 {
        self.bcrypt_cost
    }

    /// Resolve a bearer token to the identity it was issued for
    pub fn verify_token(&self, token: &str) -> Result<AuthUser> {
        let claims = self.keys.verify(token)?;
        Ok(AuthUser {
            user_id: claims.user_id,
            email: claims.email,
            name: claims.name,
        })
    }
}

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq)]
pub struct AuthUser {
    pub user_id: i64,
    pub email: String,
    pub name: String,
}

pub struct AuthService<'a, U> {
    users: U,
    settings: &'a AuthSettings,
}

impl<'a, U: UserBackend> AuthService<'a, U> {
    pub fn new(users: U, settings: &'a AuthSettings) -> Self {
        Self { users, settings }
    }

    pub async fn register(&self, req: &RegisterRequest) -> Result<AuthResponse> {
        let name = req.name.trim();
        let email = normalize_email(&req.email);

        if name.is_empty() || email.is_empty() || req.password.trim().is_empty() {
            return Err(TaskProError::InvalidInput(
                "All fields are required".to_string(),
            ));
        }

        if name.chars().count() > MAX_FIELD_LEN {
            return Err(TaskProError::InvalidInput(format!(
                "Name must be at most {} characters",
                MAX_FIELD_LEN
            )));
        }

        if email.chars().count() > MAX_FIELD_LEN || !is_valid_email(&email) {
            return Err(TaskProError::InvalidInput(
                "Invalid email address".to_string(),
            ));
        }

        if req.password.len() > MAX_PASSWORD_BYTES {
            return Err(TaskProError::InvalidInput(format!(
                "Password must be at most {} bytes",
                MAX_PASSWORD_BYTES
            )));
        }

        // The UNIQUE index still decides under concurrency
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(TaskProError::EmailTaken);
        }

        let hash = password::hash_password(&req.password, self.settings.bcrypt_cost).await?;
        let user = self.users.create_user(name, &email, &hash).await?;
        let token = self.settings.keys.issue(&user)?;

        crate::log_auth_operation!("register", user.id, user.email);
        Ok(AuthResponse { user, token })
    }

    pub async fn login(&self, req: &LoginRequest) -> Result<AuthResponse> {
        let email = normalize_email(&req.email);

        if email.is_empty() || req.password.is_empty() {
            return Err(TaskProError::InvalidCredentials);
        }

        let Some(user) = self.users.find_by_email(&email).await? else {
            tracing::debug!(email = %email, "Login for unknown email");
            return Err(TaskProError::InvalidCredentials);
        };

        let matches = match password::verify_password(&req.password, &user.password_hash).await {
            Ok(m) => m,
            Err(e) => {
                tracing::warn!(user_id = user.id, error = %e, "Stored password hash is unusable");
                false
            },
        };

        if !matches {
            return Err(TaskProError::InvalidCredentials);
        }

        let token = self.settings.keys.issue(&user)?;

        crate::log_auth_operation!("login", user.id, user.email);
        Ok(AuthResponse { user, token })
    }

    pub async fn current_user(&self, auth: &AuthUser) -> Result<User> {
        self.users.get_user(auth.user_id).await
    }
}

fn normalize_email(email: &str) -> String {
    email.trim().to_lowercase()
}

fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }

    match email.split_once('@') {
        Some((local, domain)) => !local.is_empty() && !domain.is_empty() && !domain.contains('@'),
        None => false,
    }
}
