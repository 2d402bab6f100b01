//! Occupancy overview and slot inspection

use axum::{
    extract::{Path, State},
    Json,
};

use super::dto::{AreaDto, SlotDto};
use crate::domain::{AreaCode, SlotLocation};
use crate::interfaces::http::common::{domain_error, ApiResponse, ApiResult};
use crate::interfaces::http::modules::sessions::ParkingState;

#[utoipa::path(
    get,
    path = "/api/v1/areas",
    tag = "Areas",
    responses(
        (
            status = 200,
            description = "Occupancy per area, declared order",
            body = ApiResponse<Vec<AreaDto>>
        )
    )
)]
pub async fn list_areas(State(state): State<ParkingState>) -> ApiResult<Vec<AreaDto>> {
    let areas = state
        .service
        .occupancy()
        .await
        .into_iter()
        .map(AreaDto::from)
        .collect();
    Ok(Json(ApiResponse::success(areas)))
}

#[utoipa::path(
    get,
    path = "/api/v1/areas/{code}/slots/{index}",
    tag = "Areas",
    params(
        ("code" = String, Path, description = "Area code, e.g. A"),
        ("index" = usize, Path, description = "Slot index, 0-based")
    ),
    responses(
        (status = 200, description = "Slot state", body = ApiResponse<SlotDto>),
        (status = 400, description = "Malformed area code"),
        (status = 404, description = "Unknown area or index out of range")
    )
)]
pub async fn get_slot(
    State(state): State<ParkingState>,
    Path((code, index)): Path<(String, usize)>,
) -> ApiResult<SlotDto> {
    let area = AreaCode::parse(&code).map_err(domain_error)?;
    let location = SlotLocation::new(area, index);
    let record = state.service.inspect(location).await.map_err(domain_error)?;
    Ok(Json(ApiResponse::success(SlotDto::new(location, record))))
}
