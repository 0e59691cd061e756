//! Session configuration: defaults, YAML persistence and validation.
//!
//! Covers:
//! - `load` / `load_from` / `save_to` (YAML file I/O with atomic write)
//! - XDG-compliant path helpers (`config_dir`, `config_path`)
//! - `validate` for the numeric tunables the event loop relies on

use crate::error::ConfigError;
use crate::types::LogLevel;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Tunables for one window session.
///
/// Window creation parameters are owned by the platform provisioner; this
/// struct only carries what the event loop and input translator consume.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Magnitude of the vertical scroll delta produced by wheel buttons.
    pub scroll_step: f32,

    /// Size of the scratch buffer used to drain the wakeup channel.
    pub wakeup_buffer_size: usize,

    /// Pixels per device-independent pixel. `None` uses the scale the
    /// provisioner detected.
    pub px_per_dp: Option<f32>,

    /// Pixels per scaled (font) pixel. `None` follows `px_per_dp`.
    pub px_per_sp: Option<f32>,

    /// Verbosity of the debug log file.
    pub log_level: LogLevel,

    /// Name given to the event loop thread.
    pub thread_name: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            scroll_step: 10.0,
            wakeup_buffer_size: 100,
            px_per_dp: None,
            px_per_sp: None,
            log_level: LogLevel::default(),
            thread_name: "x11-session".to_string(),
        }
    }
}

impl SessionConfig {
    /// Create a config with default values
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the scroll step
    pub fn with_scroll_step(mut self, step: f32) -> Self {
        self.scroll_step = step;
        self
    }

    /// Override the detected display scale
    pub fn with_scale(mut self, px_per_dp: f32) -> Self {
        self.px_per_dp = Some(px_per_dp);
        self
    }

    /// Set the log level
    pub fn with_log_level(mut self, level: LogLevel) -> Self {
        self.log_level = level;
        self
    }

    /// Load configuration from the default path, or fall back to defaults
    /// when no config file exists.
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_path();
        log::info!("Config path: {:?}", config_path);

        if config_path.exists() {
            Self::load_from(&config_path)
        } else {
            log::info!("Config file not found at {:?}, using defaults", config_path);
            Ok(Self::default())
        }
    }

    /// Load and validate configuration from an explicit path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        log::info!("Loading config from {:?}", path);
        let contents = fs::read_to_string(path)?;
        let config: SessionConfig = serde_yaml_ng::from_str(&contents)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to an explicit path.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let yaml = serde_yaml_ng::to_string(self)?;

        // Atomic save: write to temp file then rename to prevent corruption on crash
        let temp_path = path.with_extension("yaml.tmp");
        fs::write(&temp_path, &yaml)?;
        fs::rename(&temp_path, path)?;

        Ok(())
    }

    /// Check the numeric fields the event loop depends on.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Validation`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.scroll_step.is_finite() || self.scroll_step <= 0.0 {
            return Err(ConfigError::Validation(format!(
                "scroll_step must be a positive number, got {}",
                self.scroll_step
            )));
        }
        if self.wakeup_buffer_size == 0 {
            return Err(ConfigError::Validation(
                "wakeup_buffer_size must be at least 1".to_string(),
            ));
        }
        for (name, value) in [("px_per_dp", self.px_per_dp), ("px_per_sp", self.px_per_sp)] {
            if let Some(v) = value
                && (!v.is_finite() || v <= 0.0)
            {
                return Err(ConfigError::Validation(format!(
                    "{name} must be a positive number, got {v}"
                )));
            }
        }
        if self.thread_name.is_empty() || self.thread_name.contains('\0') {
            return Err(ConfigError::Validation(
                "thread_name must be non-empty and contain no NUL bytes".to_string(),
            ));
        }
        Ok(())
    }

    /// Resolve the `(px_per_dp, px_per_sp)` pair, preferring configured
    /// overrides over the scale detected by the platform.
    pub fn resolve_scale(&self, detected: f32) -> (f32, f32) {
        let dp = self.px_per_dp.unwrap_or(detected);
        let sp = self.px_per_sp.unwrap_or(dp);
        (dp, sp)
    }

    /// Directory holding the config file (XDG convention).
    pub fn config_dir() -> PathBuf {
        #[cfg(target_os = "windows")]
        {
            if let Some(config_dir) = dirs::config_dir() {
                config_dir.join("x11-session")
            } else {
                PathBuf::from(".")
            }
        }
        #[cfg(not(target_os = "windows"))]
        {
            // ~/.config/x11-session
            if let Some(home_dir) = dirs::home_dir() {
                home_dir.join(".config").join("x11-session")
            } else {
                PathBuf::from(".")
            }
        }
    }

    /// Get the configuration file path
    pub fn config_path() -> PathBuf {
        Self::config_dir().join("config.yaml")
    }
}
