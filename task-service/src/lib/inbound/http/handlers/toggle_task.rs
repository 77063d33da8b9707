use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::Task;
use crate::domain::task::models::TaskId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::errors::TaskError;

pub async fn toggle_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<ToggleTaskResponseData>, ApiError> {
    let task_id = TaskId::from_string(&task_id).map_err(|e| TaskError::from(e))?;

    state
        .task_service
        .toggle_task(&task_id, &current_user.0.id)
        .await
        .map_err(ApiError::from)
        .map(|ref task| ApiSuccess::new(StatusCode::OK, task.into()))
}

/// The task id and its state after the flip
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ToggleTaskResponseData {
    pub id: String,
    pub is_done: bool,
}

impl From<&Task> for ToggleTaskResponseData {
    fn from(task: &Task) -> Self {
        Self {
            id: task.id.to_string(),
            is_done: task.is_done,
        }
    }
}
