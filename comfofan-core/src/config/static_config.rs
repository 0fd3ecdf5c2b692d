//! Static configuration loaded once at startup
//!
//! This configuration is read-only after the daemon starts.

use serde::{Deserialize, Serialize};

use crate::error::{ComfoFanError, Result};
use crate::types::{VentilationMode, VentilationSpeed};

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Server hostname
    pub hostname: String,
    /// Server port
    pub port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            hostname: "localhost".to_string(),
            port: 3100,
        }
    }
}

/// Bridge configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BridgeConfig {
    /// Bridge identifier, also used as the fan's unique id
    pub uuid: String,
    /// Display name of the fan entity
    pub name: String,
    /// Speed the simulated bridge starts at
    pub initial_speed: VentilationSpeed,
    /// Mode the simulated bridge starts in
    pub initial_mode: VentilationMode,
}

impl Default for BridgeConfig {
    fn default() -> Self {
        Self {
            uuid: "00000000000000000000000000000001".to_string(),
            name: "ComfoAir".to_string(),
            initial_speed: VentilationSpeed::Low,
            initial_mode: VentilationMode::Auto,
        }
    }
}

/// Static configuration for the comfofan daemon.
///
/// Located at `~/.config/comfofan/config.toml` by default.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct StaticConfig {
    /// Server configuration (hostname, port)
    pub server: ServerConfig,

    /// Bridge configuration (identity, initial state)
    pub bridge: BridgeConfig,
}

impl StaticConfig {
    /// Parse StaticConfig from TOML string.
    pub fn from_toml(content: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// Serialize StaticConfig to TOML string.
    pub fn to_toml(&self) -> std::result::Result<String, toml::ser::Error> {
        toml::to_string_pretty(self)
    }

    /// Reject settings the daemon cannot run with
    pub fn validate(&self) -> Result<()> {
        if self.bridge.uuid.trim().is_empty() {
            return Err(ComfoFanError::Config(
                "bridge.uuid must not be empty".to_string(),
            ));
        }
        if self.server.port == 0 {
            return Err(ComfoFanError::Config(
                "server.port must be non-zero".to_string(),
            ));
        }
        Ok(())
    }
}
