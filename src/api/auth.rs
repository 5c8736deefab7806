use axum::{
    Json,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::IntoResponse,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::{ApiError, ApiResponse, AppState};
use crate::services::UserInfo;

pub const SESSION_USER_KEY: &str = "user_id";

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

// ============================================================================
// Middleware
// ============================================================================

/// Rejects requests without an authenticated session before any business
/// logic runs.
pub async fn auth_middleware(
    session: Session,
    request: Request,
    next: Next,
) -> Result<impl IntoResponse, ApiError> {
    if let Ok(Some(user_id)) = session.get::<i32>(SESSION_USER_KEY).await {
        tracing::Span::current().record("user_id", user_id);
        return Ok(next.run(request).await);
    }

    let response = (StatusCode::UNAUTHORIZED, "Unauthorized");
    Ok(response.into_response())
}

// ============================================================================
// Handlers
// ============================================================================

/// POST /auth/login
/// Authenticate with email and password; establishes the session.
pub async fn login(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<LoginRequest>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    if payload.email.is_empty() {
        return Err(ApiError::validation("Email is required"));
    }
    if payload.password.is_empty() {
        return Err(ApiError::validation("Password is required"));
    }

    let user = state
        .auth_service()
        .login(&payload.email, &payload.password)
        .await?
        .ok_or_else(|| ApiError::Unauthorized("Invalid credentials".to_string()))?;

    if let Err(e) = session.insert(SESSION_USER_KEY, user.id).await {
        return Err(ApiError::internal(format!("Failed to create session: {e}")));
    }

    tracing::info!("User {} logged in", user.id);

    Ok(Json(ApiResponse::success(user)))
}

/// POST /auth/logout
/// Invalidate the current session.
pub async fn logout(session: Session) -> impl IntoResponse {
    let _ = session.flush().await;
    (StatusCode::OK, "Logged out")
}

/// GET /auth/me
/// Current account data (requires authentication).
pub async fn get_current_user(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let user = state.auth_service().get_user(user_id).await?;

    Ok(Json(ApiResponse::success(user)))
}

// ============================================================================
// Helpers
// ============================================================================

/// Get the authenticated user id from the session, or reject.
pub async fn session_user_id(session: &Session) -> Result<i32, ApiError> {
    session
        .get::<i32>(SESSION_USER_KEY)
        .await
        .map_err(|e| ApiError::internal(format!("Session error: {e}")))?
        .ok_or_else(|| ApiError::Unauthorized("Not authenticated".to_string()))
}
