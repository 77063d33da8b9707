use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use axum::Json;
use chrono::DateTime;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;
use thiserror::Error;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::CreateTaskCommand;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskDescription;
use crate::domain::task::models::TaskTitle;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::errors::TaskDescriptionError;
use crate::task::errors::TaskTitleError;

pub async fn create_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Json(body): Json<CreateTaskRequest>,
) -> Result<ApiSuccess<CreateTaskResponseData>, ApiError> {
    state
        .task_service
        .create_task(body.try_into_command()?, &current_user.0.id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::CREATED, task.into()))
}

/// HTTP request body for creating a task (raw JSON)
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CreateTaskRequest {
    title: String,
    description: Option<String>,
}

#[derive(Debug, Clone, Error)]
enum ParseCreateTaskRequestError {
    #[error("Invalid title: {0}")]
    Title(#[from] TaskTitleError),

    #[error("Invalid description: {0}")]
    Description(#[from] TaskDescriptionError),
}

impl CreateTaskRequest {
    fn try_into_command(self) -> Result<CreateTaskCommand, ParseCreateTaskRequestError> {
        let title = TaskTitle::new(self.title)?;
        let description = self.description.map(TaskDescription::new).transpose()?;
        Ok(CreateTaskCommand::new(title, description))
    }
}

impl From<ParseCreateTaskRequestError> for ApiError {
    fn from(err: ParseCreateTaskRequestError) -> Self {
        ApiError::UnprocessableEntity(err.to_string())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateTaskResponseData {
    pub id: String,
    pub title: String,
    pub description: Option<String>,
    pub is_done: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&Task> for CreateTaskResponseData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            title: task.title.as_str().to_string(),
            description: task.description.as_ref().map(|d| d.as_str().to_string()),
            is_done: task.is_done,
            created_at: task.created_at,
        }
    }
}
