use axum::extract::Path;
use axum::extract::State;
use axum::http::StatusCode;
use axum::Extension;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::task::models::TaskId;
use crate::inbound::http::middleware::CurrentUser;
use crate::inbound::http::router::AppState;
use crate::task::errors::TaskError;

pub async fn delete_task(
    State(state): State<AppState>,
    Extension(current_user): Extension<CurrentUser>,
    Path(task_id): Path<String>,
) -> Result<ApiSuccess<()>, ApiError> {
    let task_id = TaskId::from_string(&task_id).map_err(|e| TaskError::from(e))?;

    state
        .task_service
        .delete_task(&task_id, &current_user.0.id)
        .await
        .map_err(|e| ApiError::from(e))
        .map(|_| ApiSuccess::new(StatusCode::NO_CONTENT, ()))
}
