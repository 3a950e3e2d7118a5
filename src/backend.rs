//! Storage trait abstractions.
//!
//! The services in [`crate::auth`] and [`crate::tasks`] only talk to storage
//! through these traits. [`crate::users::UserManager`] and
//! [`crate::tasks::TaskManager`] are the SQLite implementations.

use std::future::Future;

use crate::db::models::{Task, TaskStats, User};
use crate::error::Result;
use crate::tasks::{NewTask, TaskUpdate};

/// User account storage.
pub trait UserBackend: Send + Sync {
    /// Insert a user. A duplicate email yields [`crate::error::TaskProError::EmailTaken`].
    fn create_user(
        &self,
        name: &str,
        email: &str,
        password_hash: &str,
    ) -> impl Future<Output = Result<User>> + Send;

    fn find_by_email(&self, email: &str) -> impl Future<Output = Result<Option<User>>> + Send;

    fn get_user(&self, id: i64) -> impl Future<Output = Result<User>> + Send;
}

/// Per-user task storage. Every operation is scoped by `user_id`; a task owned
/// by someone else behaves exactly like a missing one.
pub trait TaskBackend: Send + Sync {
    // ── Read ────────────────────────────────────────────────────────

    fn list_tasks(
        &self,
        user_id: i64,
        done: Option<bool>,
    ) -> impl Future<Output = Result<Vec<Task>>> + Send;

    fn get_task(&self, id: i64, user_id: i64) -> impl Future<Output = Result<Task>> + Send;

    fn get_stats(&self, user_id: i64) -> impl Future<Output = Result<TaskStats>> + Send;

    // ── Write ───────────────────────────────────────────────────────

    fn create_task(
        &self,
        user_id: i64,
        task: NewTask<'_>,
    ) -> impl Future<Output = Result<Task>> + Send;

    fn update_task(
        &self,
        id: i64,
        user_id: i64,
        update: TaskUpdate<'_>,
    ) -> impl Future<Output = Result<Task>> + Send;

    fn delete_task(&self, id: i64, user_id: i64) -> impl Future<Output = Result<()>> + Send;
}
