//! comfofan core library
//!
//! Shared types, speed mapping, and configuration for controlling a
//! ComfoConnect ventilation unit as a fan. Used by the bridge crate and the
//! daemon.

pub mod api;
pub mod config;
pub mod error;
pub mod percentage;
pub mod sensors;
pub mod types;

// Re-export commonly used types
pub use config::{default_config_path, BridgeConfig, ServerConfig, StaticConfig};
pub use error::*;
pub use percentage::*;
pub use sensors::*;
pub use types::*;
