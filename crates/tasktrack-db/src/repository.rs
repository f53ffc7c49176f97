use async_trait::async_trait;
use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    config::DbConfig,
    error::Error,
    models::{NewTask, Task, TaskRecord, TASK_COLUMNS},
    Result,
};

/// The data-access contract consumed by outer layers.
///
/// Every call is one statement against the store. `update_task` and
/// `delete_task` report success for zero matched rows and return the
/// affected-row count so stricter callers can tell the cases apart.
#[async_trait]
pub trait TaskStore: Send + Sync {
    async fn list_all(&self) -> Result<Vec<Task>>;

    /// Returns the store-assigned id of the new task.
    async fn create_task(&self, task: &NewTask) -> Result<i64>;

    async fn tasks_by_author(&self, author_id: i64) -> Result<Vec<Task>>;

    async fn tasks_by_label(&self, label: &str) -> Result<Vec<Task>>;

    async fn update_task(&self, task_id: i64, close_date: i64) -> Result<u64>;

    async fn delete_task(&self, task_id: i64) -> Result<u64>;
}

/// Postgres-backed task repository over a shared connection pool.
#[derive(Clone)]
pub struct TaskRepository {
    pool: PgPool,
}

impl TaskRepository {
    /// Create the pool and open a first connection. An unreachable store is
    /// reported as `Error::Connection`; retry policy belongs to the caller.
    pub async fn connect(config: &DbConfig) -> Result<Self> {
        tracing::info!(url = %config.redacted_url(), "Connecting to task store");

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(config.acquire_timeout)
            .connect_with(config.options.clone())
            .await
            .map_err(Error::connect)?;

        Ok(Self { pool })
    }

    /// Wrap a pool the caller already owns.
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Wait for checked-out connections to return, then close the pool.
    pub async fn close(&self) {
        self.pool.close().await;
    }
}

fn into_tasks(records: Vec<TaskRecord>) -> Vec<Task> {
    records.into_iter().map(Task::from).collect()
}

#[async_trait]
impl TaskStore for TaskRepository {
    #[tracing::instrument(skip(self))]
    async fn list_all(&self) -> Result<Vec<Task>> {
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {} FROM tasks",
            TASK_COLUMNS
        ))
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = records.len(), "Listed tasks");
        Ok(into_tasks(records))
    }

    #[tracing::instrument(skip(self, task), fields(author_id = task.author_id, assigned_id = task.assigned_id))]
    async fn create_task(&self, task: &NewTask) -> Result<i64> {
        task.validate()?;

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO tasks (author_id, assigned_id, title, content)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(task.author_id)
        .bind(task.assigned_id)
        .bind(&task.title)
        .bind(&task.content)
        .fetch_one(&self.pool)
        .await?;

        tracing::debug!(task_id = id, "Created task");
        Ok(id)
    }

    #[tracing::instrument(skip(self))]
    async fn tasks_by_author(&self, author_id: i64) -> Result<Vec<Task>> {
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            "SELECT {} FROM tasks WHERE tasks.author_id = $1",
            TASK_COLUMNS
        ))
        .bind(author_id)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = records.len(), "Listed tasks by author");
        Ok(into_tasks(records))
    }

    #[tracing::instrument(skip(self))]
    async fn tasks_by_label(&self, label: &str) -> Result<Vec<Task>> {
        // Duplicate label names yield the union of their tasks; each task
        // appears at most once.
        let records = sqlx::query_as::<_, TaskRecord>(&format!(
            r#"
            SELECT {} FROM tasks
            WHERE tasks.id IN (
                SELECT tasks_labels.task_id
                FROM tasks_labels
                JOIN labels ON labels.id = tasks_labels.label_id
                WHERE labels.name = $1
            )
            "#,
            TASK_COLUMNS
        ))
        .bind(label)
        .fetch_all(&self.pool)
        .await?;

        tracing::debug!(count = records.len(), "Listed tasks by label");
        Ok(into_tasks(records))
    }

    #[tracing::instrument(skip(self))]
    async fn update_task(&self, task_id: i64, close_date: i64) -> Result<u64> {
        let result = sqlx::query("UPDATE tasks SET closed = $2 WHERE id = $1")
            .bind(task_id)
            .bind(close_date)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        if affected == 0 {
            tracing::debug!("No task matched for close");
        }
        Ok(affected)
    }

    #[tracing::instrument(skip(self))]
    async fn delete_task(&self, task_id: i64) -> Result<u64> {
        let result = sqlx::query("DELETE FROM tasks WHERE id = $1")
            .bind(task_id)
            .execute(&self.pool)
            .await?;

        let affected = result.rows_affected();
        if affected == 0 {
            tracing::debug!("No task matched for delete");
        }
        Ok(affected)
    }
}
