use crate::backend::TaskBackend;
use crate::db::models::{CreateTaskRequest, Task, TaskStats, UpdateTaskRequest};
use crate::error::{Result, TaskProError};
use chrono::Utc;
use sqlx::SqlitePool;

/// Longest accepted title, in characters
pub const MAX_TITLE_LEN: usize = 255;

const TASK_COLUMNS: &str = "id, title, description, done, user_id, created_at, updated_at";

/// Fields of a task about to be inserted
#[derive(Debug, Clone, Copy)]
pub struct NewTask<'a> {
    pub title: &'a str,
    pub description: &'a str,
    pub done: bool,
}

/// Partial update; `None` leaves the column as it is
#[derive(Debug, Clone, Copy, Default)]
pub struct TaskUpdate<'a> {
    pub title: Option<&'a str>,
    pub description: Option<&'a str>,
    pub done: Option<bool>,
}

impl TaskUpdate<'_> {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none() && self.done.is_none()
    }
}

/// SQLite-backed task repository
pub struct TaskManager<'a> {
    pool: &'a SqlitePool,
}

impl<'a> TaskManager<'a> {
    pub fn new(pool: &'a SqlitePool) -> Self {
        Self { pool }
    }
}

impl TaskBackend for TaskManager<'_> {
    async fn list_tasks(&self, user_id: i64, done: Option<bool>) -> Result<Vec<Task>> {
        let mut builder: sqlx::QueryBuilder<sqlx::Sqlite> =
            sqlx::QueryBuilder::new(format!("SELECT {} FROM tasks WHERE user_id = ", TASK_COLUMNS));
        builder.push_bind(user_id);

        if let Some(d) = done {
            builder.push(" AND done = ").push_bind(d);
        }

        builder.push(" ORDER BY created_at DESC, id DESC");

        let tasks = builder
            .build_query_as::<Task>()
            .fetch_all(self.pool)
            .await?;

        Ok(tasks)
    }

    async fn get_task(&self, id: i64, user_id: i64) -> Result<Task> {
        let task = sqlx::query_as::<_, Task>(&format!(
            "SELECT {} FROM tasks WHERE id = ? AND user_id = ?",
            TASK_COLUMNS
        ))
        .bind(id)
        .bind(user_id)
        .fetch_optional(self.pool)
        .await?
        .ok_or(TaskProError::TaskNotFound(id))?;

        Ok(task)
    }

    async fn get_stats(&self, user_id: i64) -> Result<TaskStats> {
        let row = sqlx::query_as::<_, (i64, i64)>(
            r#"SELECT
                COUNT(*) as total,
                COALESCE(SUM(CASE WHEN done THEN 1 ELSE 0 END), 0)
            FROM tasks
            WHERE user_id = ?"#,
        )
        .bind(user_id)
        .fetch_one(self.pool)
        .await?;

        Ok(TaskStats {
            total: row.0,
            done: row.1,
            pending: row.0 - row.1,
        })
    }

    async fn create_task(&self, user_id: i64, task: NewTask<'_>) -> Result<Task> {
        let now = Utc::now();

        let result = sqlx::query(
            r#"
            INSERT INTO tasks (title, description, done, user_id, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(task.title)
        .bind(task.description)
        .bind(task.done)
        .bind(user_id)
        .bind(now)
        .bind(now)
        .execute(self.pool)
        .await?;

        self.get_task(result.last_insert_rowid(), user_id).await
    }

    async fn update_task(&self, id: i64, user_id: i64, update: TaskUpdate<'_>) -> Result<Task> {
        if update.is_empty() {
            return self.get_task(id, user_id).await;
        }

        // Build dynamic update query using QueryBuilder for SQL injection safety
        let mut builder: sqlx::QueryBuilder<sqlx::Sqlite> =
            sqlx::QueryBuilder::new("UPDATE tasks SET updated_at = ");
        builder.push_bind(Utc::now());

        if let Some(t) = update.title {
            builder.push(", title = ").push_bind(t);
        }

        if let Some(d) = update.description {
            builder.push(", description = ").push_bind(d);
        }

        if let Some(done) = update.done {
            builder.push(", done = ").push_bind(done);
        }

        builder
            .push(" WHERE id = ")
            .push_bind(id)
            .push(" AND user_id = ")
            .push_bind(user_id);

        let result = builder.build().execute(self.pool).await?;
        if result.rows_affected() == 0 {
            return Err(TaskProError::TaskNotFound(id));
        }

        self.get_task(id, user_id).await
    }

    async fn delete_task(&self, id: i64, user_id: i64) -> Result<()> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = ? AND user_id = ?")
            .bind(id)
            .bind(user_id)
            .execute(self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(TaskProError::TaskNotFound(id));
        }

        Ok(())
    }
}

/// Validation and ownership rules on top of a [`TaskBackend`]
pub struct TaskService<B> {
    backend: B,
}

impl<B: TaskBackend> TaskService<B> {
    pub fn new(backend: B) -> Self {
        Self { backend }
    }

    pub async fn list_tasks(&self, user_id: i64, done: Option<bool>) -> Result<Vec<Task>> {
        let tasks = self.backend.list_tasks(user_id, done).await?;
        tracing::debug!(user_id, count = tasks.len(), "Listed tasks");
        Ok(tasks)
    }

    pub async fn get_task(&self, id: i64, user_id: i64) -> Result<Task> {
        self.backend.get_task(id, user_id).await
    }

    pub async fn get_stats(&self, user_id: i64) -> Result<TaskStats> {
        self.backend.get_stats(user_id).await
    }

    pub async fn create_task(&self, user_id: i64, req: &CreateTaskRequest) -> Result<Task> {
        let title = validate_title(&req.title)?;

        let task = self
            .backend
            .create_task(
                user_id,
                NewTask {
                    title,
                    description: req.description.as_deref().unwrap_or(""),
                    done: req.done.unwrap_or(false),
                },
            )
            .await?;

        crate::log_task_operation!("create", task.id, user_id);
        Ok(task)
    }

    pub async fn update_task(&self, id: i64, user_id: i64, req: &UpdateTaskRequest) -> Result<Task> {
        let title = req.title.as_deref().map(validate_title).transpose()?;

        let update = TaskUpdate {
            title,
            description: req.description.as_deref(),
            done: req.done,
        };

        let task = self.backend.update_task(id, user_id, update).await?;

        crate::log_task_operation!("update", id, user_id);
        Ok(task)
    }

    pub async fn delete_task(&self, id: i64, user_id: i64) -> Result<()> {
        self.backend.delete_task(id, user_id).await?;

        crate::log_task_operation!("delete", id, user_id);
        Ok(())
    }
}

fn validate_title(title: &str) -> Result<&str> {
    let title = title.trim();

    if title.is_empty() {
        return Err(TaskProError::InvalidInput("Title is required".to_string()));
    }

    if title.chars().count() > MAX_TITLE_LEN {
        return Err(TaskProError::InvalidInput(format!(
            "Title must be at most {} characters",
            MAX_TITLE_LEN
        )));
    }

    Ok(title)
}
