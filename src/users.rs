use crate::backend::UserBackend;
use crate::db::models::User;
use crate::error::{Result, TaskProError};
use chrono::Utc;
use sqlx::SqlitePool;

const USER_COLUMNS: &str = "id, name, email, password_hash, created_at";

/// SQLite-backed user repository
pub struct UserManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> UserManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

impl UserBackend for UserManager<'_> {
    async fn create_user(&self, name: &str, email: &str, password_hash: &str) -> Result<User> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO users (name, email, password_hash, created_at)
            VALUES (?, ?, ?, ?)
            "#,
        )
        .bind(name)
        .bind(email)
        .bind(password_hash)
        .bind(now)
        .execute(self.pool)
        .await;

        let result = match result {
            Ok(r) => r,
            // The UNIQUE constraint is the source of truth; a pre-check alone would race
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(TaskProError::EmailTaken)
            },
            Err(e) => return Err(e.into()),
        };

        self.get_user(result.last_insert_rowid()).await
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE email = ? LIMIT 1",
            USER_COLUMNS
        ))
        .bind(email)
        .fetch_optional(self.pool)
        .await?;

        Ok(user)
    }

    async fn get_user(&self, id: i64) -> Result<User> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {} FROM users WHERE id = ?",
            USER_COLUMNS
        ))
        .bind(id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(TaskProError::UserNotFound(id))?;

        Ok(user)
    }
}
