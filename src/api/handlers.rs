use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::Json;
use std::sync::Arc;

use crate::anomaly::types::AddressReport;

use super::types::*;
use super::AppState;

type ApiResult<T> = Result<Json<T>, (StatusCode, Json<ErrorResponse>)>;

fn api_error(status: StatusCode, msg: impl Into<String>) -> (StatusCode, Json<ErrorResponse>) {
    (status, Json(ErrorResponse { error: msg.into() }))
}

pub async fn health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        sanctioned_addresses: state.pipeline.sanction_count(),
    })
}

pub async fn analyze_address(
    State(state): State<Arc<AppState>>,
    Path(address): Path<String>,
) -> ApiResult<AddressReport> {
    let address = address.trim();
    if address.is_empty() {
        return Err(api_error(
            StatusCode::BAD_REQUEST,
            "Address must not be empty",
        ));
    }

    // Analysis never fails for data reasons; the worst case is a NoData
    // report with zero scores.
    Ok(Json(state.pipeline.analyze(address).await))
}
