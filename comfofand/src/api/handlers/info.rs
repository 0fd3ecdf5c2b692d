//! Info handlers for service information and root endpoint

use crate::api::error::ApiError;
use crate::api::AppState;

use axum::{extract::State, Json};
use comfofan_core::api::{ApiResponse, InfoResponse};
use serde_json::{json, Value};
use tracing::debug;

/// Handle the root endpoint.
///
/// Useful for health checks and verifying the API is accessible.
///
/// # Endpoint
///
/// `GET /`
pub(crate) async fn root() -> Result<Json<ApiResponse<Value>>, ApiError> {
    debug!("Request: GET /");

    let data = json!({
        "service": "comfofan API Server",
        "version": env!("CARGO_PKG_VERSION"),
        "status": "ok"
    });

    Ok(Json(ApiResponse::success(data)))
}

/// Describe the fan entity served by this daemon.
///
/// # Endpoint
///
/// `GET /api/v0/info`
pub(crate) async fn get_info(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<InfoResponse>>, ApiError> {
    debug!("Request: GET /api/v0/info");

    let fan = &state.fan;
    let info = InfoResponse {
        version: env!("CARGO_PKG_VERSION").to_string(),
        unique_id: fan.unique_id().to_string(),
        name: fan.name().to_string(),
        speed_count: fan.speed_count(),
        preset_modes: fan.preset_modes().to_vec(),
        supported_features: fan.supported_features(),
        uptime: state.start_time.elapsed().as_secs(),
    };

    Ok(Json(ApiResponse::success(info)))
}
