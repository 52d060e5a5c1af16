//! Health check handlers for the combined, liveness, and readiness probes.

use axum::{extract::State, http::StatusCode, response::IntoResponse, Json};
use tracing::info;

use crate::{
    health::{HealthReport, ReportStatus},
    AppState,
};

pub async fn handle_health(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /health - Running all health probes");

    report_response(state.health.check().await)
}

pub async fn handle_liveness(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /health/liveness - Probe-free liveness check");

    report_response(state.health.liveness())
}

pub async fn handle_readiness(State(state): State<AppState>) -> impl IntoResponse {
    info!("GET /health/readiness - Database readiness probe");

    report_response(state.health.readiness().await)
}

fn report_response(report: HealthReport) -> (StatusCode, Json<HealthReport>) {
    let status_code = match report.status {
        ReportStatus::Ok => StatusCode::OK,
        ReportStatus::Error => StatusCode::SERVICE_UNAVAILABLE,
    };

    (status_code, Json(report))
}
