//! Error types for the comfofan system

use thiserror::Error;

/// Core error type for comfofan operations
#[derive(Error, Debug)]
pub enum ComfoFanError {
    /// Requested percentage is outside 0-100
    #[error("Percentage out of range: {value} (must be 0-100)")]
    OutOfRange { value: i32 },

    /// Preset mode is not a known ventilation mode
    #[error("Invalid preset mode: '{0}'. Valid options: auto, manual")]
    InvalidPresetMode(String),

    /// Speed name is not a known ventilation speed
    #[error("Invalid ventilation speed: '{0}'. Valid options: away, low, medium, high")]
    InvalidSpeed(String),

    /// Bridge communication errors
    #[error("Bridge error: {0}")]
    Bridge(String),

    /// The bridge stopped delivering updates
    #[error("Bridge disconnected")]
    BridgeDisconnected,

    /// Configuration-related errors
    #[error("Configuration error: {0}")]
    Config(String),

    /// I/O errors
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization errors
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl ComfoFanError {
    /// Whether this error was caused by invalid caller input
    pub fn is_validation(&self) -> bool {
        matches!(
            self,
            ComfoFanError::OutOfRange { .. }
                | ComfoFanError::InvalidPresetMode(_)
                | ComfoFanError::InvalidSpeed(_)
        )
    }
}

/// Result type alias for comfofan operations
pub type Result<T> = std::result::Result<T, ComfoFanError>;

impl From<serde_json::Error> for ComfoFanError {
    fn from(err: serde_json::Error) -> Self {
        ComfoFanError::Serialization(err.to_string())
    }
}
