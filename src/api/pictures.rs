use axum::{
    Json,
    extract::{Multipart, Path, State},
    http::StatusCode,
};
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_user_id;
use super::types::{PictureDto, SwapOrderPayload};
use super::validation::validate_swap_ids;
use super::{ApiError, ApiResponse, AppState};

/// GET /rooms/{id}/pictures
/// The room's gallery, order ascending (cover first).
pub async fn list_room_pictures(
    State(state): State<Arc<AppState>>,
    Path(room_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<PictureDto>>>, ApiError> {
    let pictures = state.picture_service().list_for_room(room_id).await?;

    Ok(Json(ApiResponse::success(
        pictures.into_iter().map(PictureDto::from).collect(),
    )))
}

/// POST /pictures
/// Multipart upload: a `room_id` field plus one or more `file` parts.
/// Files are stored first, then appended to the gallery in one batch.
pub async fn upload_pictures(
    State(state): State<Arc<AppState>>,
    session: Session,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<Vec<PictureDto>>>), ApiError> {
    let user_id = session_user_id(&session).await?;

    let mut room_id: Option<i32> = None;
    let mut files: Vec<(String, Vec<u8>)> = Vec::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::validation(format!("Malformed multipart request: {e}")))?
    {
        let name = field.name().map(ToString::to_string);

        match name.as_deref() {
            Some("room_id") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::validation(format!("Invalid room_id field: {e}")))?;
                room_id = Some(
                    text.trim()
                        .parse()
                        .map_err(|_| ApiError::validation("room_id must be an integer"))?,
                );
            }
            Some("file") => {
                let name = field
                    .file_name()
                    .map(ToString::to_string)
                    .unwrap_or_else(|| "upload.jpg".to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::validation(format!("Failed to read file: {e}")))?;
                files.push((name, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let room_id = room_id.ok_or_else(|| ApiError::validation("room_id is required"))?;

    if files.is_empty() {
        return Err(ApiError::validation(
            "Image file not included in the request",
        ));
    }

    state.image_service().check_batch_size(files.len())?;

    let mut urls = Vec::with_capacity(files.len());
    for (name, bytes) in &files {
        let url = state.image_service().save_room_image(name, bytes).await?;
        urls.push(url);
    }

    let created = state
        .picture_service()
        .add_pictures(user_id, room_id, urls)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            created.into_iter().map(PictureDto::from).collect(),
        )),
    ))
}

/// PUT /pictures/order
/// Pairwise reorder: moves the first picture onto the second's position.
pub async fn swap_order(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<SwapOrderPayload>,
) -> Result<Json<ApiResponse<PictureDto>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    validate_swap_ids(&payload.ids).map_err(ApiError::ValidationFailed)?;

    let updated = state
        .picture_service()
        .swap_order(user_id, &payload.ids, payload.ascending)
        .await?;

    Ok(Json(ApiResponse::success(PictureDto::from(updated))))
}

/// DELETE /pictures/{id}
pub async fn delete_picture(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let user_id = session_user_id(&session).await?;

    state.picture_service().delete_picture(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}
