use async_trait::async_trait;

use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::domain::user::models::UserId;
use crate::task::errors::TaskError;

/// Port for task domain service operations.
///
/// Every operation is scoped to the owning user; a task belonging to
/// someone else behaves exactly like a missing one.
#[async_trait]
pub trait TaskServicePort: Send + Sync + 'static {
    /// List all tasks owned by a user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_tasks(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError>;

    /// Create a new task for a user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create_task(
        &self,
        command: CreateTaskCommand,
        user_id: &UserId,
    ) -> Result<Task, TaskError>;

    /// Flip a task's done-state and return it with the new state.
    ///
    /// # Errors
    /// * `NotFound` - Task does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn toggle_task(&self, task_id: &TaskId, user_id: &UserId) -> Result<Task, TaskError>;

    /// Delete a task.
    ///
    /// # Errors
    /// * `NotFound` - Task does not exist or belongs to another user
    /// * `DatabaseError` - Database operation failed
    async fn delete_task(&self, task_id: &TaskId, user_id: &UserId) -> Result<(), TaskError>;
}

/// Persistence operations for the task aggregate.
#[async_trait]
pub trait TaskRepository: Send + Sync + 'static {
    /// Retrieve all tasks owned by a user.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn list_by_user(&self, user_id: &UserId) -> Result<Vec<Task>, TaskError>;

    /// Persist a new task and return it with its assigned id.
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn create(
        &self,
        command: CreateTaskCommand,
        user_id: &UserId,
    ) -> Result<Task, TaskError>;

    /// Retrieve a task by id, only if owned by the given user.
    ///
    /// # Returns
    /// Optional task entity (None if missing or owned by someone else)
    ///
    /// # Errors
    /// * `DatabaseError` - Database operation failed
    async fn find_for_user(
        &self,
        task_id: &TaskId,
        user_id: &UserId,
    ) -> Result<Option<Task>, TaskError>;

    /// Set a task's done-state, only if owned by the given user.
    ///
    /// # Errors
    /// * `NotFound` - No owned row was updated
    /// * `DatabaseError` - Database operation failed
    async fn set_done(
        &self,
        task_id: &TaskId,
        user_id: &UserId,
        is_done: bool,
    ) -> Result<(), TaskError>;

    /// Remove a task, only if owned by the given user.
    ///
    /// # Errors
    /// * `NotFound` - No owned row was deleted
    /// * `DatabaseError` - Database operation failed
    async fn delete(&self, task_id: &TaskId, user_id: &UserId) -> Result<(), TaskError>;
}
