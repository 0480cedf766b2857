//! # Configuration Module
//!
//! Handles loading and validating application settings from TOML files.
//!
//! Settings cover where the controller registry is stored, which controllers
//! to activate at startup, the input update rate and logging. Per-controller
//! state (presets, curves, calibration) lives in the registry file, not here.

use serde::de::Error;
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::controller::{ControllerIdentity, InputWrapper};
use crate::error::{FlyByWireError, Result};

/// Main settings structure
#[derive(Debug, Deserialize, Clone, Default)]
pub struct Settings {
    #[serde(default)]
    pub persistence: PersistenceSettings,

    #[serde(default)]
    pub input: InputSettings,

    #[serde(default)]
    pub logging: LoggingSettings,
}

/// Registry file location
#[derive(Debug, Deserialize, Clone)]
pub struct PersistenceSettings {
    #[serde(default = "default_registry_path")]
    pub path: String,
}

/// Input polling configuration
#[derive(Debug, Deserialize, Clone)]
pub struct InputSettings {
    #[serde(default = "default_update_rate_hz")]
    pub update_rate_hz: u32,

    #[serde(default)]
    pub startup_controllers: Vec<StartupController>,
}

/// Controller activated when the application starts
#[derive(Debug, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct StartupController {
    pub wrapper: InputWrapper,

    #[serde(default)]
    pub index: usize,
}

impl StartupController {
    #[must_use]
    pub fn identity(&self) -> ControllerIdentity {
        ControllerIdentity::new(self.wrapper, self.index)
    }
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingSettings {
    #[serde(default)]
    pub file_logging: bool,

    #[serde(default = "default_log_dir")]
    pub log_dir: String,
}

// Default value functions
fn default_registry_path() -> String { "./state/controllers.toml".to_string() }
fn default_update_rate_hz() -> u32 { 60 }
fn default_log_dir() -> String { "./logs".to_string() }

impl Default for PersistenceSettings {
    fn default() -> Self {
        Self { path: default_registry_path() }
    }
}

impl Default for InputSettings {
    fn default() -> Self {
        Self {
            update_rate_hz: default_update_rate_hz(),
            startup_controllers: Vec::new(),
        }
    }
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            file_logging: false,
            log_dir: default_log_dir(),
        }
    }
}

impl Settings {
    /// Load settings from a TOML file
    ///
    /// # Errors
    ///
    /// Returns error if:
    /// - File cannot be read
    /// - TOML parsing fails
    /// - Validation fails
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use flybywire::config::Settings;
    ///
    /// let settings = Settings::load("config/default.toml")?;
    /// # Ok::<(), Box<dyn std::error::Error>>(())
    /// ```
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let contents = fs::read_to_string(path)?;
        let settings: Settings = toml::from_str(&contents)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Validate settings values
    ///
    /// # Errors
    ///
    /// Returns error if any value is out of its valid range
    pub fn validate(&self) -> Result<()> {
        if self.persistence.path.is_empty() {
            return Err(FlyByWireError::Config(
                toml::de::Error::custom("persistence path cannot be empty")
            ));
        }

        if self.input.update_rate_hz == 0 || self.input.update_rate_hz > 1000 {
            return Err(FlyByWireError::Config(
                toml::de::Error::custom("update_rate_hz must be between 1 and 1000")
            ));
        }

        for (i, controller) in self.input.startup_controllers.iter().enumerate() {
            if self.input.startup_controllers[..i].contains(controller) {
                return Err(FlyByWireError::Config(
                    toml::de::Error::custom(format!(
                        "startup controller {} listed more than once",
                        controller.identity()
                    ))
                ));
            }
        }

        if self.logging.file_logging && self.logging.log_dir.is_empty() {
            return Err(FlyByWireError::Config(
                toml::de::Error::custom("log_dir cannot be empty when file logging is enabled")
            ));
        }

        Ok(())
    }

    /// Interval between input updates
    #[must_use]
    pub fn update_period(&self) -> std::time::Duration {
        std::time::Duration::from_micros(1_000_000 / u64::from(self.input.update_rate_hz.max(1)))
    }
}
