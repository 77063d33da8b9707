use std::sync::Arc;

use async_trait::async_trait;

use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::user::models::UserId;
use crate::task::errors::TaskError;
use crate::task::ports::TaskRepository;
use crate::task::ports::TaskServicePort;

/// Domain service implementation for task operations.
pub struct TaskService<R>
where
    R: TaskRepository,
{
    repository: Arc<R>,
}

impl<R> TaskService<R>
where
    R: TaskRepository,
{
    /// Create a new task service with an injected repository.
    pub fn new(repository: Arc<R>) -> Self {
        Self { repository }
    }
}

#[async_trait]
impl<R> TaskServicePort for TaskService<R>
where
    R: TaskRepository,
{
    async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError> {
        self.repository.list_by_user(user_id).await
    }

    async fn create_task(
        &self,
        command: CreateTaskCommand,
        user_id: &UserId,
    ) -> Result<Task, TaskError> {
        let task = self.repository.create(command, user_id).await?;

        tracing::info!(task_id = %task.id, user_id = %user_id, "Task created");

        Ok(task)
    }

    async fn toggle_task(&self, task_id: &TaskId, user_id: &UserId) -> Result<Task, TaskError> {
        let task = self
            .repository
            .find_for_user(task_id, user_id)
            .await?
            .ok_or(TaskError::NotFound(task_id.to_string()))?;

        let is_done = !task.is_done;
        self.repository.set_done(task_id, user_id, is_done).await?;

        Ok(Task { is_done, ..task })
    }

    async fn delete_task(&self, task_id: &TaskId, user_id: &UserId) -> Result<(), TaskError> {
        self.repository.delete(task_id, user_id).await?;

        tracing::info!(task_id = %task_id, user_id = %user_id, "Task deleted");

        Ok(())
    }
}
