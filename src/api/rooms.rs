use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use serde::Deserialize;
use std::sync::Arc;
use tower_sessions::Session;

use super::auth::session_user_id;
use super::types::{RoomDetailsDto, RoomDto, RoomPayload, RoomSummaryDto};
use super::validation::parse_room;
use super::{ApiError, ApiResponse, AppState};
use crate::models::{RoomSearchParams, RoomSort, SortDirection};

/// Query-string filters for the public search. Every bound is optional.
#[derive(Debug, Deserialize, Default)]
pub struct SearchQuery {
    pub city_id: Option<i32>,
    pub room_type: Option<String>,
    pub bathroom_type: Option<String>,
    pub gender: Option<String>,
    pub description: Option<String>,
    pub rent_price_min: Option<i32>,
    pub rent_price_max: Option<i32>,
    pub size_min: Option<i32>,
    pub size_max: Option<i32>,
    pub number_of_rooms_min: Option<i32>,
    pub number_of_rooms_max: Option<i32>,
    pub sort_by: Option<String>,
    pub sort_dir: Option<String>,
}

impl SearchQuery {
    fn into_params(self) -> RoomSearchParams {
        use crate::models::{BathroomType, GenderPreference, RoomType};

        // Unknown enum codes and sort keys are dropped rather than
        // rejected; a lenient query just filters less.
        let sort = self
            .sort_by
            .as_deref()
            .and_then(RoomSort::parse)
            .map(|key| {
                let direction = self
                    .sort_dir
                    .as_deref()
                    .map(SortDirection::parse)
                    .unwrap_or_default();
                (key, direction)
            });

        RoomSearchParams {
            city_id: self.city_id,
            room_type: self.room_type.as_deref().and_then(RoomType::from_code),
            bathroom_type: self
                .bathroom_type
                .as_deref()
                .and_then(BathroomType::from_code),
            gender: self.gender.as_deref().and_then(GenderPreference::from_code),
            description: self.description.filter(|d| !d.is_empty()),
            rent_price_min: self.rent_price_min,
            rent_price_max: self.rent_price_max,
            size_min: self.size_min,
            size_max: self.size_max,
            number_of_rooms_min: self.number_of_rooms_min,
            number_of_rooms_max: self.number_of_rooms_max,
            sort,
        }
    }
}

/// GET /rooms
/// Public search over available (not rented) rooms.
pub async fn search_rooms(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<ApiResponse<Vec<RoomSummaryDto>>>, ApiError> {
    let params = query.into_params();

    let listings = state.room_service().search(&params).await?;

    Ok(Json(ApiResponse::success(
        listings.into_iter().map(RoomSummaryDto::from).collect(),
    )))
}

/// GET /rooms/mine
/// The authenticated owner's listings, newest first.
pub async fn list_own_rooms(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<RoomSummaryDto>>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let listings = state.room_service().list_by_owner(user_id).await?;

    Ok(Json(ApiResponse::success(
        listings.into_iter().map(RoomSummaryDto::from).collect(),
    )))
}

/// GET /rooms/{id}
/// Full listing detail, including owner contact data.
pub async fn get_room(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<RoomDetailsDto>>, ApiError> {
    let details = state.room_service().get_details(id).await?;

    Ok(Json(ApiResponse::success(RoomDetailsDto::from(details))))
}

/// POST /rooms
pub async fn create_room(
    State(state): State<Arc<AppState>>,
    session: Session,
    Json(payload): Json<RoomPayload>,
) -> Result<(StatusCode, Json<ApiResponse<RoomDto>>), ApiError> {
    let user_id = session_user_id(&session).await?;

    let input = parse_room(&payload).map_err(ApiError::ValidationFailed)?;

    let room = state.room_service().create_room(user_id, &input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(RoomDto::from(room))),
    ))
}

/// PUT /rooms/{id}
pub async fn update_room(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
    Json(payload): Json<RoomPayload>,
) -> Result<Json<ApiResponse<RoomDto>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let input = parse_room(&payload).map_err(ApiError::ValidationFailed)?;

    let room = state
        .room_service()
        .update_room(user_id, id, &input)
        .await?;

    Ok(Json(ApiResponse::success(RoomDto::from(room))))
}

/// DELETE /rooms/{id}
pub async fn delete_room(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let user_id = session_user_id(&session).await?;

    state.room_service().delete_room(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// POST /rooms/{id}/availability
/// Flip `is_rented`; silently succeeds when the room is gone.
pub async fn toggle_availability(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<Json<ApiResponse<Option<RoomDto>>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let room = state.room_service().set_availability(user_id, id).await?;

    Ok(Json(ApiResponse::success(room.map(RoomDto::from))))
}

/// POST /rooms/{id}/favorite
pub async fn add_favorite(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let user_id = session_user_id(&session).await?;

    state.room_service().add_favorite(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// DELETE /rooms/{id}/favorite
pub async fn remove_favorite(
    State(state): State<Arc<AppState>>,
    session: Session,
    Path(id): Path<i32>,
) -> Result<StatusCode, ApiError> {
    let user_id = session_user_id(&session).await?;

    state.room_service().remove_favorite(user_id, id).await?;

    Ok(StatusCode::NO_CONTENT)
}

/// GET /favorites
/// Bookmarked listings, most recently favorited first.
pub async fn list_favorites(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<RoomSummaryDto>>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let listings = state.room_service().list_favorites(user_id).await?;

    Ok(Json(ApiResponse::success(
        listings.into_iter().map(RoomSummaryDto::from).collect(),
    )))
}

/// GET /favorites/ids
/// Bookmarked room ids for quick client-side lookups.
pub async fn list_favorite_ids(
    State(state): State<Arc<AppState>>,
    session: Session,
) -> Result<Json<ApiResponse<Vec<i32>>>, ApiError> {
    let user_id = session_user_id(&session).await?;

    let ids = state.room_service().favorite_room_ids(user_id).await?;

    Ok(Json(ApiResponse::success(ids)))
}
