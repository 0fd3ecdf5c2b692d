//! API models for the comfofan REST API
//!
//! Request and response models shared by the daemon and any client.

use crate::types::{SupportedFeatures, VentilationMode, VentilationSpeed};
use serde::{Deserialize, Serialize};

/// Generic API response wrapper
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status")]
pub enum ApiResponse<T> {
    #[serde(rename = "success")]
    Success { data: T },
    #[serde(rename = "error")]
    Error { error: String },
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn success(data: T) -> Self {
        Self::Success { data }
    }

    /// Create an error response
    pub fn error(error: String) -> Self {
        Self::Error { error }
    }
}

/// Server information response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InfoResponse {
    /// Server version
    pub version: String,
    /// Unique id of the fan entity (the bridge uuid)
    pub unique_id: String,
    /// Display name of the fan entity
    pub name: String,
    /// Number of active speed steps
    pub speed_count: usize,
    /// Preset modes the fan accepts
    pub preset_modes: Vec<VentilationMode>,
    /// Advertised feature flags
    pub supported_features: SupportedFeatures,
    /// Server uptime in seconds
    pub uptime: u64,
}

/// Fan status response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FanStatusResponse {
    /// Current percentage, if known
    pub percentage: Option<u8>,
    /// Current preset mode, if known
    pub preset_mode: Option<VentilationMode>,
    /// Whether the fan runs above the away level, if known
    pub is_on: Option<bool>,
    /// Discrete speed matching the current percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub speed: Option<VentilationSpeed>,
}
