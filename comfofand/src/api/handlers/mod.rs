//! API request handlers for the comfofan daemon REST API.
//!
//! # Handler Modules
//!
//! - [`info`] - Service information and root endpoint
//! - [`fans`] - Fan status and control (percentage, preset mode, on/off)
//!
//! All handlers accept `State<AppState>`, return
//! `Result<Json<ApiResponse<T>>, ApiError>` and log through `tracing`.

pub mod fans;
pub mod info;
