//! Configuration types for comfofan
//!
//! [`StaticConfig`] holds the server and bridge settings, loaded once at
//! startup from a TOML file.

mod paths;
mod static_config;

pub use paths::default_config_path;
pub use static_config::{BridgeConfig, ServerConfig, StaticConfig};
