use std::fmt;

use chrono::DateTime;
use chrono::Utc;

use crate::task::errors::TaskDescriptionError;
use crate::task::errors::TaskIdError;
use crate::task::errors::TaskTitleError;
use crate::user::models::UserId;

/// Task aggregate entity.
///
/// A single to-do item owned by one user.
#[derive(Debug, Clone)]
pub struct Task {
    pub id: TaskId,
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
    pub user_id: UserId,
}

/// Task unique identifier type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TaskId(pub i64);

impl TaskId {
    /// Parse a task ID from its string form (e.g. a path parameter).
    ///
    /// # Errors
    /// * `InvalidFormat` - String is not a valid integer id
    pub fn from_string(s: &str) -> Result<Self, TaskIdError> {
        s.parse::<i64>()
            .map(TaskId)
            .map_err(|e| TaskIdError::InvalidFormat(e.to_string()))
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task title value type
///
/// Non-empty, at most 255 characters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskTitle(String);

impl TaskTitle {
    const MAX_LENGTH: usize = 255;

    /// Create a new valid task title.
    ///
    /// # Errors
    /// * `Empty` - Title has no characters
    /// * `TooLong` - Title longer than 255 characters
    pub fn new(title: String) -> Result<Self, TaskTitleError> {
        if title.is_empty() {
            return Err(TaskTitleError::Empty);
        }
        if title.len() > Self::MAX_LENGTH {
            return Err(TaskTitleError::TooLong {
                max: Self::MAX_LENGTH,
                actual: title.len(),
            });
        }
        Ok(Self(title))
    }

    /// Get title as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for TaskTitle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

/// Task description value type
///
/// At most 1024 characters; absence is modeled with `Option` on the task.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskDescription(String);

impl TaskDescription {
    const MAX_LENGTH: usize = 1024;

    /// Create a new valid task description.
    ///
    /// # Errors
    /// * `TooLong` - Description longer than 1024 characters
    pub fn new(description: String) -> Result<Self, TaskDescriptionError> {
        if description.len() > Self::MAX_LENGTH {
            return Err(TaskDescriptionError::TooLong {
                max: Self::MAX_LENGTH,
                actual: description.len(),
            });
        }
        Ok(Self(description))
    }

    /// Get description as string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Command to create a new task with domain types
#[derive(Debug, Clone)]
pub struct CreateTaskCommand {
    pub title: TaskTitle,
    pub description: Option<TaskDescription>,
}

impl CreateTaskCommand {
    /// Construct a new create task command.
    pub fn new(title: TaskTitle, description: Option<TaskDescription>) -> Self {
        Self { title, description }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_title_bounds() {
        assert!(TaskTitle::new(String::new()).is_err());
        assert!(TaskTitle::new("t".to_string()).is_ok());
        assert!(TaskTitle::new("t".repeat(255)).is_ok());
        assert!(TaskTitle::new("t".repeat(256)).is_err());
    }

    #[test]
    fn test_description_bounds() {
        assert!(TaskDescription::new(String::new()).is_ok());
        assert!(TaskDescription::new("d".repeat(1024)).is_ok());
        assert!(TaskDescription::new("d".repeat(1025)).is_err());
    }

    #[test]
    fn test_task_id_from_string() {
        assert_eq!(TaskId::from_string("7"), Ok(TaskId(7)));
        assert!(TaskId::from_string("seven").is_err());
    }
}
