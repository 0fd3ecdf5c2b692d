//! Configuration loading
//!
//! Reads the TOML configuration file, creating it with defaults on first run.

use comfofan_core::{ComfoFanError, Result, StaticConfig};
use std::path::Path;
use tokio::fs;
use tracing::{debug, info};

/// Load the static configuration from `path`
///
/// A missing file is created with default values. A file that fails to
/// parse or validate is an error; it is never overwritten.
pub(crate) async fn load(path: &Path) -> Result<StaticConfig> {
    debug!("Loading configuration from: {}", path.display());

    if !fs::try_exists(path).await? {
        info!(
            "Configuration file not found: {}. Creating with defaults.",
            path.display()
        );
        let config = StaticConfig::default();
        save(path, &config).await?;
        return Ok(config);
    }

    let contents = fs::read_to_string(path)
        .await
        .map_err(|e| ComfoFanError::Config(format!("Failed to read config file: {}", e)))?;

    let config = StaticConfig::from_toml(&contents)
        .map_err(|e| ComfoFanError::Config(format!("Failed to parse config file: {}", e)))?;
    config.validate()?;

    debug!("Configuration: {:?}", config);
    Ok(config)
}

/// Write the configuration to `path`, creating parent directories
pub(crate) async fn save(path: &Path, config: &StaticConfig) -> Result<()> {
    let contents = config
        .to_toml()
        .map_err(|e| ComfoFanError::Config(format!("Failed to serialize config: {}", e)))?;

    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).await?;
    }

    fs::write(path, contents)
        .await
        .map_err(|e| ComfoFanError::Config(format!("Failed to write config file: {}", e)))?;

    info!("Configuration saved to {}", path.display());
    Ok(())
}
