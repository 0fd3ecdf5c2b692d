//! Fan handlers for status and control endpoints

use crate::api::error::ApiError;
use crate::api::AppState;
use crate::{api_fail, api_ok};
use axum::{
    extract::{Query, State},
    Json,
};
use comfofan_bridge::VentilationFan;
use comfofan_core::api::{ApiResponse, FanStatusResponse};
use comfofan_core::{percentage_to_speed, VentilationMode};
use serde::Deserialize;

use tracing::debug;

/// Query parameters for the turn-on endpoint.
#[derive(Deserialize)]
pub(crate) struct TurnOnQuery {
    /// Requested percentage (0-100)
    pub percentage: Option<i32>,
    /// Requested preset mode; wins over `percentage`
    pub preset_mode: Option<String>,
}

/// Query parameters for the percentage endpoint.
#[derive(Deserialize)]
pub(crate) struct PercentageQuery {
    pub value: Option<i32>,
}

/// Query parameters for the preset mode endpoint.
#[derive(Deserialize)]
pub(crate) struct PresetQuery {
    pub mode: Option<String>,
}

fn fan_status(fan: &VentilationFan) -> FanStatusResponse {
    let state = fan.state();
    FanStatusResponse {
        percentage: state.percentage,
        preset_mode: state.preset_mode,
        is_on: state.is_on(),
        speed: state.percentage.map(percentage_to_speed),
    }
}

/// Retrieves the current fan state.
///
/// Both attributes stay `null` until the bridge reports them or a command
/// succeeds.
///
/// # Endpoint
///
/// `GET /api/v0/fan/status`
pub(crate) async fn get_status(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FanStatusResponse>>, ApiError> {
    debug!("Request: GET /api/v0/fan/status");
    api_ok!(fan_status(&state.fan))
}

/// Turns the fan on.
///
/// # Endpoint
///
/// `GET /api/v0/fan/on?percentage=50` or `GET /api/v0/fan/on?preset_mode=auto`
///
/// # Behavior
///
/// - `preset_mode` given: only the mode is changed
/// - `percentage` given: the matching speed is requested
/// - neither: the fan starts at the lowest speed
pub(crate) async fn turn_on(
    State(state): State<AppState>,
    Query(params): Query<TurnOnQuery>,
) -> Result<Json<ApiResponse<FanStatusResponse>>, ApiError> {
    debug!("Request: GET /api/v0/fan/on");

    let preset_mode = params
        .preset_mode
        .as_deref()
        .map(str::parse::<VentilationMode>)
        .transpose()?;

    state.fan.turn_on(params.percentage, preset_mode).await?;
    api_ok!(fan_status(&state.fan))
}

/// Turns the fan off (away speed).
///
/// # Endpoint
///
/// `GET /api/v0/fan/off`
pub(crate) async fn turn_off(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<FanStatusResponse>>, ApiError> {
    debug!("Request: GET /api/v0/fan/off");

    state.fan.turn_off().await?;
    api_ok!(fan_status(&state.fan))
}

/// Sets the fan percentage.
///
/// # Validation
///
/// - Values outside 0-100 are rejected with 400; nothing is sent to the bridge
///
/// # Endpoint
///
/// `GET /api/v0/fan/percentage?value=50`
pub(crate) async fn set_percentage(
    State(state): State<AppState>,
    Query(params): Query<PercentageQuery>,
) -> Result<Json<ApiResponse<FanStatusResponse>>, ApiError> {
    debug!("Request: GET /api/v0/fan/percentage");

    let Some(value) = params.value else {
        return api_fail!("Missing 'value' parameter");
    };

    state.fan.set_percentage(value).await?;
    api_ok!(fan_status(&state.fan))
}

/// Sets the preset mode.
///
/// # Endpoint
///
/// `GET /api/v0/fan/preset?mode=auto`
pub(crate) async fn set_preset_mode(
    State(state): State<AppState>,
    Query(params): Query<PresetQuery>,
) -> Result<Json<ApiResponse<FanStatusResponse>>, ApiError> {
    debug!("Request: GET /api/v0/fan/preset");

    let Some(mode) = params.mode else {
        return api_fail!("Missing 'mode' parameter");
    };

    state.fan.set_preset_mode(&mode).await?;
    api_ok!(fan_status(&state.fan))
}
