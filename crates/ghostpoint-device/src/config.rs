//! Device configuration.

use serde::{Deserialize, Serialize};

use crate::error::{DeviceError, DeviceResult};

/// Default poll interval (microseconds).
pub const DEFAULT_INTERVAL_US: u32 = 8000;

/// Default lower bound for the poll interval (microseconds).
pub const DEFAULT_MIN_INTERVAL_US: u32 = 5000;

/// Largest ring the info report can describe comfortably.
pub const MAX_QUEUE_CAPACITY: usize = 1 << 16;

/// Tunables fixed at device construction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Poll interval the device starts with (microseconds).
    pub default_interval_us: u32,
    /// Floor below which interval changes are rejected (microseconds).
    pub min_interval_us: u32,
    /// Ring size, one slot of which is never used.
    pub queue_capacity: usize,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            default_interval_us: DEFAULT_INTERVAL_US,
            min_interval_us: DEFAULT_MIN_INTERVAL_US,
            queue_capacity: ghostpoint_queue::DEFAULT_CAPACITY,
        }
    }
}

impl DeviceConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if any value is out of range.
    pub fn validate(&self) -> DeviceResult<()> {
        if self.min_interval_us == 0 {
            return Err(DeviceError::invalid_configuration(
                "min_interval_us must be greater than 0",
            ));
        }
        if self.default_interval_us < self.min_interval_us {
            return Err(DeviceError::invalid_configuration(format!(
                "default_interval_us ({}) is below min_interval_us ({})",
                self.default_interval_us, self.min_interval_us
            )));
        }
        if self.queue_capacity < ghostpoint_queue::MIN_CAPACITY {
            return Err(DeviceError::invalid_configuration(
                "queue_capacity must be at least 2",
            ));
        }
        if self.queue_capacity > MAX_QUEUE_CAPACITY {
            return Err(DeviceError::invalid_configuration(format!(
                "queue_capacity must not exceed {MAX_QUEUE_CAPACITY}"
            )));
        }
        Ok(())
    }

    /// Parse and validate a JSON document. Missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` for malformed JSON or invalid values.
    pub fn from_json(json: &str) -> DeviceResult<Self> {
        let config: Self = serde_json::from_str(json)
            .map_err(|e| DeviceError::invalid_configuration(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize as pretty-printed JSON.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfiguration` if serialization fails.
    pub fn to_json(&self) -> DeviceResult<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| DeviceError::invalid_configuration(e.to_string()))
    }

    /// Create a configuration builder.
    #[must_use]
    pub fn builder() -> DeviceConfigBuilder {
        DeviceConfigBuilder::default()
    }
}

/// Builder for `DeviceConfig`.
#[derive(Debug, Default)]
pub struct DeviceConfigBuilder {
    config: DeviceConfig,
}

impl DeviceConfigBuilder {
    /// Set the starting poll interval in microseconds.
    #[must_use]
    pub fn default_interval_us(mut self, us: u32) -> Self {
        self.config.default_interval_us = us;
        self
    }

    /// Set the interval floor in microseconds.
    #[must_use]
    pub fn min_interval_us(mut self, us: u32) -> Self {
        self.config.min_interval_us = us;
        self
    }

    /// Set the ring size.
    #[must_use]
    pub fn queue_capacity(mut self, capacity: usize) -> Self {
        self.config.queue_capacity = capacity;
        self
    }

    /// Build the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn build(self) -> DeviceResult<DeviceConfig> {
        self.config.validate()?;
        Ok(self.config)
    }
}
