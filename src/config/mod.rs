//! Configuration for the conflict detection engine.
//!
//! Configuration is loaded with precedence: caller overrides > Env vars > Config file > Defaults
//!
//! # Example config file (calguard.toml)
//! ```toml
//! minimum_travel_buffer_minutes = 45
//! utc_offset_minutes = 120
//!
//! [[environmental_windows]]
//! start_hour = 10
//! end_hour = 14
//! ```

mod defaults;

pub use defaults::*;

use crate::error::EngineError;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

/// A recurring daily blackout window in local hours, half-open [start_hour, end_hour).
///
/// Windows where `start_hour > end_hour` wrap around midnight, e.g.
/// `{22, 6}` covers 22:00-23:59 and 00:00-05:59. Equal hours are rejected
/// at validation: a zero-length window is indistinguishable from a typo.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BlackoutWindow {
    pub start_hour: u8,
    pub end_hour: u8,
}

impl BlackoutWindow {
    /// Create a window with validation
    pub fn new(start_hour: u8, end_hour: u8) -> Result<Self, EngineError> {
        let window = Self {
            start_hour,
            end_hour,
        };
        window.validate()?;
        Ok(window)
    }

    /// Check whether a local hour of day falls inside this window
    pub fn contains_hour(&self, hour: u8) -> bool {
        if self.start_hour < self.end_hour {
            self.start_hour <= hour && hour < self.end_hour
        } else {
            // wraparound across midnight
            hour >= self.start_hour || hour < self.end_hour
        }
    }

    fn validate(&self) -> Result<(), EngineError> {
        if self.start_hour >= HOURS_PER_DAY || self.end_hour >= HOURS_PER_DAY {
            return Err(EngineError::InvalidConfiguration {
                reason: format!(
                    "blackout window hours must be 0-23, got {}-{}",
                    self.start_hour, self.end_hour
                ),
            });
        }
        if self.start_hour == self.end_hour {
            return Err(EngineError::InvalidConfiguration {
                reason: format!("blackout window {}-{} is empty", self.start_hour, self.end_hour),
            });
        }
        Ok(())
    }
}

/// Detection configuration, supplied per locale/tenant by an external source.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DetectionConfig {
    /// Recurring daily windows during which scheduling is discouraged
    /// (e.g. utility-outage periods)
    pub environmental_windows: Vec<BlackoutWindow>,
    /// Minimum gap between same-organizer appointments at different properties
    pub minimum_travel_buffer_minutes: i64,
    /// The calendar locale's offset from UTC, used to resolve local hours
    pub utc_offset_minutes: i32,
}

impl Default for DetectionConfig {
    fn default() -> Self {
        Self {
            environmental_windows: Vec::new(),
            minimum_travel_buffer_minutes: DEFAULT_TRAVEL_BUFFER_MINUTES,
            utc_offset_minutes: 0,
        }
    }
}

impl DetectionConfig {
    /// Load configuration with precedence: overrides > Env > File > Defaults
    ///
    /// # Arguments
    /// * `config_path` - Optional path to TOML config file
    /// * `overrides` - Caller overrides to apply on top
    pub fn load(
        config_path: Option<&str>,
        overrides: ConfigOverrides,
    ) -> Result<Self, EngineError> {
        let mut figment = Figment::new().merge(Serialized::defaults(DetectionConfig::default()));

        // Layer 1: Config file (if provided)
        if let Some(path) = config_path {
            figment = figment.merge(Toml::file(path));
        }

        // Layer 2: Environment variables with CALGUARD_ prefix
        figment = figment.merge(Env::prefixed("CALGUARD_"));

        // Layer 3: Caller overrides
        figment = figment.merge(Serialized::defaults(overrides));

        let config: Self = figment
            .extract()
            .map_err(|e| EngineError::InvalidConfiguration {
                reason: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from environment and optional config file only (no overrides)
    pub fn from_env(config_path: Option<&str>) -> Result<Self, EngineError> {
        Self::load(config_path, ConfigOverrides::default())
    }

    /// The travel buffer expressed in seconds
    pub fn travel_buffer_seconds(&self) -> i64 {
        self.minimum_travel_buffer_minutes * SECONDS_PER_MINUTE
    }

    /// Check all settings are in range
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.minimum_travel_buffer_minutes < 0 {
            return Err(EngineError::InvalidConfiguration {
                reason: format!(
                    "minimum_travel_buffer_minutes must be non-negative, got {}",
                    self.minimum_travel_buffer_minutes
                ),
            });
        }
        if self.utc_offset_minutes.abs() > MAX_UTC_OFFSET_MINUTES {
            return Err(EngineError::InvalidConfiguration {
                reason: format!(
                    "utc_offset_minutes must be within ±{}, got {}",
                    MAX_UTC_OFFSET_MINUTES, self.utc_offset_minutes
                ),
            });
        }
        for window in &self.environmental_windows {
            window.validate()?;
        }
        Ok(())
    }
}

/// Caller-supplied overrides layered on top of file and environment config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigOverrides {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub environmental_windows: Option<Vec<BlackoutWindow>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub minimum_travel_buffer_minutes: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub utc_offset_minutes: Option<i32>,
}
