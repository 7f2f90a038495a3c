//! GET /health: checks the completion service and the document store.

use std::sync::Arc;

use axum::{Json, extract::State, http::StatusCode};
use question_tagger::HealthReport;
use serde::Serialize;

use crate::core::app_state::AppState;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub ok: bool,
    #[serde(flatten)]
    pub report: HealthReport,
}

/// 200 when both collaborators answer, 503 otherwise. Never fails.
pub async fn health(State(state): State<Arc<AppState>>) -> (StatusCode, Json<HealthResponse>) {
    let report = state.tagger.health().await;
    let ok = report.ok();
    let status = if ok {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(HealthResponse { ok, report }))
}
