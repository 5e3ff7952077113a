//! Device configuration loading.

use std::path::Path;

use anyhow::{Context, Result};
use ghostpoint_device::DeviceConfig;
use tracing::{info, warn};

use crate::error::CliError;

/// Load the device configuration.
///
/// No path means defaults. A path that does not exist also yields defaults,
/// so a fresh install runs without any setup.
pub fn load(path: Option<&Path>) -> Result<DeviceConfig> {
    let Some(path) = path else {
        return Ok(DeviceConfig::default());
    };

    if !path.exists() {
        warn!(path = %path.display(), "config file not found, using defaults");
        return Ok(DeviceConfig::default());
    }

    let text = std::fs::read_to_string(path)
        .with_context(|| format!("Failed to read config file {}", path.display()))?;
    let config = DeviceConfig::from_json(&text)
        .map_err(|e| CliError::InvalidConfiguration(e.to_string()))
        .with_context(|| format!("Failed to load config file {}", path.display()))?;

    info!(path = %path.display(), "loaded device configuration");
    Ok(config)
}
