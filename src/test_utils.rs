#[cfg(test)]
pub mod test_helpers {
    use crate::auth::AuthSettings;
    use crate::backend::UserBackend;
    use crate::db::models::User;
    use crate::db::{create_pool, run_migrations};
    use crate::users::UserManager;
    use sqlx::SqlitePool;
    use tempfile::TempDir;

    pub const TEST_SECRET: &str = "test-secret";

    pub struct TestContext {
        pub pool: SqlitePool,
        pub _temp_dir: TempDir,
    }

    impl TestContext {
        pub async fn new() -> Self {
            let temp_dir = TempDir::new().unwrap();
            let db_path = temp_dir.path().join("taskpro.db");

            let pool = create_pool(&db_path).await.unwrap();
            run_migrations(&pool).await.unwrap();

            Self {
                pool,
                _temp_dir: temp_dir,
            }
        }

        pub fn pool(&self) -> &SqlitePool {
            &self.pool
        }

        /// Insert a user directly, skipping password hashing
        pub async fn create_user(&self, email: &str) -> User {
            UserManager::new(&self.pool)
                .create_user("Test User", email, "not-a-real-hash")
                .await
                .unwrap()
        }
    }

    /// Auth settings with the cheapest bcrypt cost so tests stay fast
    pub fn test_auth_settings() -> AuthSettings {
        AuthSettings::new(TEST_SECRET.as_bytes(), 24, crate::config::MIN_BCRYPT_COST)
    }
}
