use axum::extract::Request;
use axum::extract::State;
use axum::http::StatusCode;
use axum::http::{self};
use axum::middleware::Next;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde_json::json;

use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::inbound::http::router::AppState;
use crate::user::errors::UserError;

/// Authenticated identity for the current request.
///
/// Inserted into request extensions once the token checks out; lives and
/// dies with the request, never cached across requests.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

/// Middleware that resolves a bearer token into the current user.
///
/// Runs as an ordered pipeline: extract token, verify and decode it, load
/// the account it names, attach it for downstream handlers. The first
/// failing stage rejects the request before any business logic runs.
pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, Response> {
    let token = extract_bearer_token(&req)?;

    // Expiry may be surfaced for UX; every other decode failure gets one
    // generic message so a rejection never reveals signature detail
    let claims = state.token_codec.decode(token).map_err(|e| {
        tracing::warn!("Token validation failed: {}", e);
        match e {
            auth::JwtError::TokenExpired => unauthorized("Token expired"),
            _ => unauthorized("Invalid token"),
        }
    })?;

    let username = Username::new(claims.username).map_err(|_| unauthorized("Invalid token"))?;

    // The token was cryptographically valid; a missing account is its own
    // outcome (the user may have been deleted after issuance)
    let user = state
        .user_service
        .get_user_by_username(&username)
        .await
        .map_err(|e| match e {
            UserError::NotFound(_) => (
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "User not found"
                })),
            )
                .into_response(),
            other => {
                tracing::error!("Identity lookup failed: {}", other);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Json(json!({
                        "error": "Internal server error"
                    })),
                )
                    .into_response()
            }
        })?;

    req.extensions_mut().insert(CurrentUser(user));

    Ok(next.run(req).await)
}

fn extract_bearer_token(req: &Request) -> Result<&str, Response> {
    let auth_header = req
        .headers()
        .get(http::header::AUTHORIZATION)
        .ok_or_else(|| unauthorized("Missing Authorization header"))?;

    let auth_str = auth_header
        .to_str()
        .map_err(|_| unauthorized("Invalid Authorization header"))?;

    if !auth_str.starts_with("Bearer ") {
        return Err(unauthorized(
            "Invalid Authorization header format. Expected: Bearer <token>",
        ));
    }

    Ok(auth_str.trim_start_matches("Bearer "))
}

fn unauthorized(message: &str) -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(json!({
            "error": message
        })),
    )
        .into_response()
}
