//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, Json};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::application::ParkingService;

#[derive(Clone)]
pub struct HealthState {
    pub service: Arc<ParkingService>,
    pub started_at: Arc<Instant>,
}

/// Service health with a one-line occupancy summary
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub total_slots: usize,
    pub occupied_slots: usize,
    pub notification_subscribers: usize,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is up", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> Json<HealthResponse> {
    let areas = state.service.occupancy().await;

    Json(HealthResponse {
        status: "ok".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
        uptime_seconds: state.started_at.elapsed().as_secs(),
        total_slots: areas.iter().map(|a| a.capacity).sum(),
        occupied_slots: areas.iter().map(|a| a.occupied).sum(),
        notification_subscribers: state.service.event_bus().subscriber_count(),
    })
}
