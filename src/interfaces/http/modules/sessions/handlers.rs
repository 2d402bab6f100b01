//! Check-in, check-out and session lookup handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};

use super::dto::{CheckInRequest, CheckInResponse, CheckOutRequest, CheckOutResponse, SessionDto};
use crate::application::ParkingService;
use crate::domain::DomainError;
use crate::interfaces::http::common::{
    bad_request, domain_error, ApiError, ApiResponse, ApiResult, ValidatedJson,
};

/// State shared by every parking route
#[derive(Clone)]
pub struct ParkingState {
    pub service: Arc<ParkingService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/check-in",
    tag = "Sessions",
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Vehicle parked", body = ApiResponse<CheckInResponse>),
        (status = 400, description = "Invalid plate"),
        (status = 409, description = "Area full or plate already parked"),
        (status = 422, description = "Request validation failed")
    )
)]
pub async fn check_in(
    State(state): State<ParkingState>,
    ValidatedJson(req): ValidatedJson<CheckInRequest>,
) -> Result<(StatusCode, Json<ApiResponse<CheckInResponse>>), ApiError> {
    let Some(class) = req.class() else {
        return Err(bad_request(format!("Unknown vehicle class {}", req.vehicle_class)));
    };

    let check_in = state
        .service
        .check_in(class, &req.plate)
        .await
        .map_err(domain_error)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(check_in.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/sessions/check-out",
    tag = "Sessions",
    request_body = CheckOutRequest,
    responses(
        (
            status = 200,
            description = "Vehicle exited, fee computed",
            body = ApiResponse<CheckOutResponse>
        ),
        (status = 404, description = "Vehicle not parked"),
        (status = 500, description = "Receipt could not be stored, vehicle still parked")
    )
)]
pub async fn check_out(
    State(state): State<ParkingState>,
    ValidatedJson(req): ValidatedJson<CheckOutRequest>,
) -> ApiResult<CheckOutResponse> {
    let outcome = state
        .service
        .check_out(&req.plate)
        .await
        .map_err(domain_error)?;

    Ok(Json(ApiResponse::success(CheckOutResponse::from_outcome(
        outcome,
        state.service.tariffs(),
    ))))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions",
    tag = "Sessions",
    responses(
        (
            status = 200,
            description = "Parked vehicles in area order",
            body = ApiResponse<Vec<SessionDto>>
        )
    )
)]
pub async fn list_sessions(State(state): State<ParkingState>) -> ApiResult<Vec<SessionDto>> {
    let now = state.service.now();
    let sessions = state
        .service
        .active_sessions()
        .await
        .into_iter()
        .map(|s| SessionDto::from_session(s, now))
        .collect();
    Ok(Json(ApiResponse::success(sessions)))
}

#[utoipa::path(
    get,
    path = "/api/v1/sessions/{plate}",
    tag = "Sessions",
    params(("plate" = String, Path, description = "License plate (URL-encoded)")),
    responses(
        (status = 200, description = "Active session", body = ApiResponse<SessionDto>),
        (status = 404, description = "Vehicle not parked")
    )
)]
pub async fn get_session(
    State(state): State<ParkingState>,
    Path(plate): Path<String>,
) -> ApiResult<SessionDto> {
    let now = state.service.now();
    match state.service.find(&plate).await {
        Some(session) => Ok(Json(ApiResponse::success(SessionDto::from_session(
            session, now,
        )))),
        None => Err(domain_error(DomainError::VehicleNotFound(
            plate.trim().to_string(),
        ))),
    }
}
