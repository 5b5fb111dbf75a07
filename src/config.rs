//! Configuration file support for lazyimg.
//!
//! Component-wide defaults (lazy policy, intersection options, overlay trigger,
//! locale overrides) are loaded from JSON and shared by every component through
//! [`crate::ConfigProvider`].

use std::collections::BTreeMap;
use std::path::Path;

use lazyimg_ui::{ObserveOptions, RootMargin};
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_LAZY, DEFAULT_THRESHOLD};
use crate::error::ConfigError;
use crate::overlay::OverlayTrigger;

/// Current configuration file format version.
/// Increment this when making breaking changes to the config format.
pub const CONFIG_VERSION: u32 = 1;

/// Log level setting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Show only errors
    Error,
    /// Show errors and warnings
    Warn,
    /// Show errors, warnings, and info messages
    #[default]
    Info,
    /// Show debug-level logging
    Debug,
    /// Show all log messages including trace
    Trace,
}

impl LogLevel {
    /// Convert to log crate's LevelFilter.
    pub fn to_level_filter(&self) -> log::LevelFilter {
        match self {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Image component configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageConfig {
    /// Version of the configuration file format
    #[serde(default = "default_version")]
    pub version: u32,

    /// Lazy loading for components that don't set `lazy`
    #[serde(default = "default_lazy")]
    pub lazy_by_default: bool,

    /// Margin grown around the viewport when testing visibility
    #[serde(default)]
    pub root_margin: RootMargin,

    /// Visible ratio that counts as "entered the viewport" (0 = any overlap)
    #[serde(default = "default_threshold")]
    pub threshold: f32,

    /// Overlay trigger for components that don't set one
    #[serde(default)]
    pub default_overlay_trigger: OverlayTrigger,

    /// Log verbosity level
    #[serde(default)]
    pub log_level: LogLevel,

    /// Localized message overrides (key -> text)
    #[serde(default)]
    pub locale: BTreeMap<String, String>,
}

fn default_version() -> u32 {
    CONFIG_VERSION
}

fn default_lazy() -> bool {
    DEFAULT_LAZY
}

fn default_threshold() -> f32 {
    DEFAULT_THRESHOLD
}

impl ImageConfig {
    /// Create a new configuration with default values.
    pub fn new() -> Self {
        Self {
            version: CONFIG_VERSION,
            lazy_by_default: DEFAULT_LAZY,
            root_margin: RootMargin::ZERO,
            threshold: DEFAULT_THRESHOLD,
            default_overlay_trigger: OverlayTrigger::default(),
            log_level: LogLevel::default(),
            locale: BTreeMap::new(),
        }
    }

    /// Set the root margin from CSS-like shorthand (`"200px"`, `"10% 0px"`).
    pub fn with_root_margin(mut self, margin: &str) -> Result<Self, ConfigError> {
        self.root_margin = margin.parse()?;
        Ok(self)
    }

    /// Serialize the configuration to JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Deserialize and validate configuration from JSON.
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Read configuration from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path)?;
        let config = Self::from_json_str(&json)?;
        log::info!("Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Check values serde cannot check.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.version > CONFIG_VERSION {
            return Err(ConfigError::UnsupportedVersion {
                supported: CONFIG_VERSION,
                found: self.version,
            });
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(ConfigError::InvalidThreshold {
                value: self.threshold,
            });
        }
        Ok(())
    }

    /// Intersection options for lazy components.
    pub fn observe_options(&self) -> ObserveOptions {
        ObserveOptions::new(self.root_margin, self.threshold)
    }
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self::new()
    }
}
