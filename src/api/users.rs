use axum::{Json, extract::State, http::StatusCode};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_user_id;
use super::types::{OwnerProfilePayload, RegisterPayload};
use super::validation::{parse_owner_profile, parse_register};
use super::{ApiError, ApiResponse, AppState};
use crate::services::UserInfo;

/// POST /users
/// Register a new (non-owner) account.
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<RegisterPayload>,
) -> Result<(StatusCode, Json<ApiResponse<UserInfo>>), ApiError> {
    let input = parse_register(&payload).map_err(ApiError::ValidationFailed)?;

    let user = state.auth_service().register(&input).await?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(user))))
}

/// PUT /users/property-owner
/// Attach an address and phone to the account and grant the owner flag.
pub async fn become_owner(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<OwnerProfilePayload>,
) -> Result<Json<ApiResponse<UserInfo>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let input = parse_owner_profile(&payload).map_err(ApiError::ValidationFailed)?;

    let user = state.auth_service().become_owner(user_id, &input).await?;

    Ok(Json(ApiResponse::success(user)))
}
