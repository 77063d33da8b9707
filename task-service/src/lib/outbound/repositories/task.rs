use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use sqlx::FromRow;
use sqlx::PgPool;

use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskDescription;
use crate::domain::task::models::TaskId;
use crate::domain::task::models::TaskTitle;
use crate::domain::task::ports::TaskRepository;
use crate::domain::user::models::UserId;
use crate::task::errors::TaskError;

pub struct PostgresTaskRepository {
    pool: PgPool,
}

impl PostgresTaskRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, FromRow)]
struct TaskRow {
    id: i64,
    title: String,
    description: Option<String>,
    is_done: bool,
    created_at: DateTime<Utc>,
    user_id: i64,
}

impl TryFrom<TaskRow> for Task {
    type Error = TaskError;

    fn try_from(row: TaskRow) -> Result<Self, Self::Error> {
        Ok(Task {
            id: TaskId(row.id),
            title: TaskTitle::new(row.title)?,
            description: row.description.map(TaskDescription::new).transpose()?,
            is_done: row.is_done,
            created_at: row.created_at,
            user_id: UserId(row.user_id),
        })
    }
}

#[async_trait]
impl TaskRepository for PostgresTaskRepository {
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        let rows = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, description, is_done, created_at, user_id
            FROM tasks
            WHERE user_id = $1
            ORDER BY created_at DESC
            "#,
        )
        .bind(user_id.0)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        rows.into_iter().map(Task::try_from).collect()
    }

    async fn create(
        &self,
        command: CreateTaskCommand,
        user_id: &UserId,
    ) -> Result<Task, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            INSERT INTO tasks (title, description, user_id)
            VALUES ($1, $2, $3)
            RETURNING id, title, description, is_done, created_at, user_id
            "#,
        )
        .bind(command.title.as_str())
        .bind(command.description.as_ref().map(|d| d.as_str()))
        .bind(user_id.0)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.try_into()
    }

    async fn find_for_user(
        &self,
        task_id: &TaskId,
        user_id: &UserId,
    ) -> Result<Option<Task>, TaskError> {
        let row = sqlx::query_as::<_, TaskRow>(
            r#"
            SELECT id, title, description, is_done, created_at, user_id
            FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id.0)
        .bind(user_id.0)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        row.map(Task::try_from).transpose()
    }

    async fn set_done(
        &self,
        task_id: &TaskId,
        user_id: &UserId,
        is_done: bool,
    ) -> Result<(), TaskError> {
        let result = sqlx::query(
            r#"
            UPDATE tasks
            SET is_done = $3
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id.0)
        .bind(user_id.0)
        .bind(is_done)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(task_id.to_string()));
        }

        Ok(())
    }

    async fn delete(&self, task_id: &TaskId, user_id: &UserId) -> Result<(), TaskError> {
        let result = sqlx::query(
            r#"
            DELETE FROM tasks
            WHERE id = $1 AND user_id = $2
            "#,
        )
        .bind(task_id.0)
        .bind(user_id.0)
        .execute(&self.pool)
        .await
        .map_err(|e| TaskError::DatabaseError(e.to_string()))?;

        if result.rows_affected() == 0 {
            return Err(TaskError::NotFound(task_id.to_string()));
        }

        Ok(())
    }
}
