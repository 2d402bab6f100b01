//! Prometheus scrape endpoint
//!
//! Renders whatever the global `metrics-exporter-prometheus` recorder holds:
//! parking counters (`parking_check_ins_total`, `parking_check_outs_total`,
//! `parking_rejections_total`, `parking_revenue_total`), the
//! `parking_slots_occupied` gauge and the HTTP request metrics.

use axum::{extract::State, http::StatusCode, response::IntoResponse};
use metrics_exporter_prometheus::PrometheusHandle;

#[derive(Clone)]
pub struct MetricsState {
    pub handle: PrometheusHandle,
}

/// `GET /metrics`
pub async fn prometheus_metrics(State(state): State<MetricsState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [("content-type", "text/plain; version=0.0.4; charset=utf-8")],
        state.handle.render(),
    )
}
