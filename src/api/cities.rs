use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use std::sync::Arc;

use super::types::ProvinceDto;
use super::{ApiError, ApiResponse, AppState};
use crate::services::CityHit;

#[derive(Debug, Deserialize, Default)]
pub struct CityQuery {
    #[serde(default)]
    pub query: String,
}

/// GET /cities?query=
/// Autocomplete: prefix match below 4 chars, substring from there on.
pub async fn search_cities(
    State(state): State<Arc<AppState>>,
    Query(params): Query<CityQuery>,
) -> Result<Json<ApiResponse<Vec<CityHit>>>, ApiError> {
    let hits = state.city_service().search(&params.query).await?;

    Ok(Json(ApiResponse::success(hits)))
}

/// GET /cities/provinces
pub async fn list_provinces(
    State(state): State<Arc<AppState>>,
) -> Result<Json<ApiResponse<Vec<ProvinceDto>>>, ApiError> {
    let provinces = state.city_service().list_provinces().await?;

    Ok(Json(ApiResponse::success(
        provinces
            .into_iter()
            .map(|p| ProvinceDto {
                id: p.id,
                name: p.name,
                abbreviation: p.abbreviation,
            })
            .collect(),
    )))
}

/// GET /cities/province/{id}
pub async fn list_cities_by_province(
    State(state): State<Arc<AppState>>,
    Path(province_id): Path<i32>,
) -> Result<Json<ApiResponse<Vec<CityHit>>>, ApiError> {
    let cities = state.city_service().list_by_province(province_id).await?;

    Ok(Json(ApiResponse::success(cities)))
}
