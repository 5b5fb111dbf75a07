//! Error types for configuration and scenario loading.
//!
//! Image load failures are not errors in this sense: they are notifications fed
//! to the load state machine (see [`crate::ErrorEvent`]).

use lazyimg_ui::MarginParseError;
use thiserror::Error;

/// Errors that can occur while loading configuration or demo scenarios.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// I/O error while reading a file
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON parsing or serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Root margin that is not a CSS-like margin shorthand
    #[error("Invalid root margin: {0}")]
    InvalidRootMargin(#[from] MarginParseError),

    /// Intersection threshold outside `0.0..=1.0`
    #[error("Invalid threshold {value}: expected a ratio between 0.0 and 1.0")]
    InvalidThreshold {
        /// The rejected threshold
        value: f32,
    },

    /// Configuration written by a newer format version
    #[error("Unsupported config version {found} (this build reads up to {supported})")]
    UnsupportedVersion {
        /// Highest version this build understands
        supported: u32,
        /// Version found in the file
        found: u32,
    },

    /// Scenario content that cannot be run
    #[error("Invalid scenario: {message}")]
    InvalidScenario {
        /// Description of the problem
        message: String,
    },
}

impl ConfigError {
    /// Create an invalid scenario error with a message.
    pub fn invalid_scenario(message: impl Into<String>) -> Self {
        Self::InvalidScenario {
            message: message.into(),
        }
    }
}
