//! # Design
//!
//! - Centralize application-level errors for bootstrap and wiring.
//! - Keep error messages constant while carrying context fields for debugging.
//! - Preserve source errors without re-logging at call sites.

use thiserror::Error;

/// Result alias for application operations.
pub type AppResult<T> = Result<T, AppError>;

/// Application-level error type.
#[derive(Debug, Error)]
pub enum AppError {
    /// Presentation configuration could not be loaded.
    #[error("configuration operation failed")]
    Config {
        /// Operation identifier.
        operation: &'static str,
        /// Source configuration error.
        source: nexinterface_widgets::ConfigError,
    },
    /// Telemetry operations failed.
    #[error("telemetry operation failed")]
    Telemetry {
        /// Operation identifier.
        operation: &'static str,
        /// Source telemetry error.
        source: nexinterface_telemetry::TelemetryError,
    },
    /// A widget controller could not be mounted.
    #[error("widget operation failed")]
    Widget {
        /// Operation identifier.
        operation: &'static str,
        /// Source widget error.
        source: nexinterface_widgets::WidgetError,
    },
    /// No declared route compiled.
    #[error("no usable routes")]
    NoRoutes {
        /// Number of declarations that were rejected.
        rejected: usize,
    },
}

impl AppError {
    pub(crate) const fn config(
        operation: &'static str,
        source: nexinterface_widgets::ConfigError,
    ) -> Self {
        Self::Config { operation, source }
    }

    pub(crate) const fn telemetry(
        operation: &'static str,
        source: nexinterface_telemetry::TelemetryError,
    ) -> Self {
        Self::Telemetry { operation, source }
    }

    pub(crate) const fn widget(
        operation: &'static str,
        source: nexinterface_widgets::WidgetError,
    ) -> Self {
        Self::Widget { operation, source }
    }
}
