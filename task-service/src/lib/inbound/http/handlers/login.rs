use axum::extract::State;
use axum::http::StatusCode;
use axum::Form;
use chrono::Utc;
use serde::Deserialize;
use serde::Serialize;

use super::ApiError;
use super::ApiSuccess;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

pub async fn login(
    State(state): State<AppState>,
    Form(body): Form<LoginRequestBody>,
) -> Result<ApiSuccess<TokenInfo>, ApiError> {
    // A username that fails validation cannot belong to any account, so it
    // gets the same response as a credential mismatch
    let username = Username::new(body.username)
        .map_err(|_| ApiError::from(UserError::InvalidCredentials))?;

    let user = state
        .user_service
        .authenticate_user(&username, &body.password)
        .await
        .map_err(ApiError::from)?;

    let access_token = state
        .token_codec
        .issue(user.id.0, user.username.as_str(), Utc::now())
        .map_err(|e| ApiError::InternalServerError(format!("Token generation failed: {}", e)))?;

    Ok(ApiSuccess::new(
        StatusCode::OK,
        TokenInfo {
            access_token,
            token_type: "Bearer".to_string(),
        },
    ))
}

/// OAuth2 password form: username + password, form-encoded
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct LoginRequestBody {
    username: String,
    password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TokenInfo {
    pub access_token: String,
    pub token_type: String,
}
