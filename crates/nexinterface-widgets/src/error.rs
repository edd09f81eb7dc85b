//! # Design
//!
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors so callers decide how to report them.

use thiserror::Error;

/// Result alias for configuration loading.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Result alias for widget mounting.
pub type WidgetResult<T> = Result<T, WidgetError>;

/// Errors raised while loading presentation configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Field contained an invalid value.
    #[error("invalid configuration field")]
    InvalidField {
        /// Field that failed validation.
        field: &'static str,
        /// Offending value when available.
        value: Option<String>,
        /// Machine-readable reason for the failure.
        reason: &'static str,
    },
    /// The configuration document could not be parsed.
    #[error("failed to parse configuration")]
    Parse {
        /// Underlying JSON error.
        source: serde_json::Error,
    },
}

/// Errors raised while mounting widget controllers.
#[derive(Debug, Error)]
pub enum WidgetError {
    /// Controllers schedule timers and must be mounted inside a Tokio runtime.
    #[error("async runtime unavailable")]
    RuntimeUnavailable {
        /// Underlying runtime lookup error.
        source: tokio::runtime::TryCurrentError,
    },
}
