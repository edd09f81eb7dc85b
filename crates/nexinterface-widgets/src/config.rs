//! Presentation timing configuration.
//!
//! Values come from a JSON document, from `NEXINTERFACE_*` environment
//! variables, or from the defaults below. Every loader validates before
//! returning.

use std::time::Duration;

use serde::Deserialize;

use crate::error::{ConfigError, ConfigResult};
use crate::presenter::PresenterOptions;

/// Length of the enter/exit transition.
pub const DEFAULT_TRANSITION_MS: u64 = 250;
/// Snackbars dismiss themselves after this long.
pub const DEFAULT_SNACKBAR_AUTO_DISMISS_MS: u64 = 6_000;
/// Resize bursts closer together than this collapse into one recomputation.
pub const DEFAULT_RESIZE_DEBOUNCE_MS: u64 = 100;
/// The exit delay is the transition shortened by this margin.
pub const EXIT_MARGIN_MS: u64 = 50;

const ENV_PREFIX: &str = "NEXINTERFACE_";

/// Timings and dismissal behaviour shared by presentation controllers.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct PresentationConfig {
    /// Enter/exit transition length in milliseconds.
    pub transition_ms: u64,
    /// Snackbar auto-dismiss delay in milliseconds.
    pub snackbar_auto_dismiss_ms: u64,
    /// Resize debounce window in milliseconds.
    pub resize_debounce_ms: u64,
    /// Shift the dialog queue on every navigation event.
    pub dialog_dismiss_on_navigation: bool,
    /// Shift the snackbar queue on every navigation event.
    pub snackbar_dismiss_on_navigation: bool,
}

impl Default for PresentationConfig {
    fn default() -> Self {
        Self {
            transition_ms: DEFAULT_TRANSITION_MS,
            snackbar_auto_dismiss_ms: DEFAULT_SNACKBAR_AUTO_DISMISS_MS,
            resize_debounce_ms: DEFAULT_RESIZE_DEBOUNCE_MS,
            dialog_dismiss_on_navigation: true,
            snackbar_dismiss_on_navigation: false,
        }
    }
}

impl PresentationConfig {
    /// Parse and validate a JSON document; missing fields take defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed JSON or unknown fields and
    /// [`ConfigError::InvalidField`] when validation fails.
    pub fn from_json_str(raw: &str) -> ConfigResult<Self> {
        let config: Self =
            serde_json::from_str(raw).map_err(|source| ConfigError::Parse { source })?;
        config.validate()?;
        Ok(config)
    }

    /// Apply `NEXINTERFACE_*` environment overrides on top of the defaults.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] when a variable cannot be parsed
    /// or the result fails validation.
    pub fn from_env() -> ConfigResult<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Apply overrides resolved through `lookup` on top of the defaults.
    ///
    /// `lookup` receives full variable names such as `NEXINTERFACE_TRANSITION_MS`.
    ///
    /// # Errors
    ///
    /// Same as [`PresentationConfig::from_env`].
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> ConfigResult<Self> {
        let mut config = Self::default();
        let var = |field: &str| lookup(&format!("{ENV_PREFIX}{}", field.to_ascii_uppercase()));

        if let Some(value) = var("transition_ms") {
            config.transition_ms = parse_millis("transition_ms", &value)?;
        }
        if let Some(value) = var("snackbar_auto_dismiss_ms") {
            config.snackbar_auto_dismiss_ms = parse_millis("snackbar_auto_dismiss_ms", &value)?;
        }
        if let Some(value) = var("resize_debounce_ms") {
            config.resize_debounce_ms = parse_millis("resize_debounce_ms", &value)?;
        }
        if let Some(value) = var("dialog_dismiss_on_navigation") {
            config.dialog_dismiss_on_navigation =
                parse_flag("dialog_dismiss_on_navigation", &value)?;
        }
        if let Some(value) = var("snackbar_dismiss_on_navigation") {
            config.snackbar_dismiss_on_navigation =
                parse_flag("snackbar_dismiss_on_navigation", &value)?;
        }

        config.validate()?;
        Ok(config)
    }

    /// Check invariants between fields.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidField`] for zero durations or a
    /// transition too short to leave a positive exit delay.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.transition_ms <= EXIT_MARGIN_MS {
            return Err(invalid(
                "transition_ms",
                self.transition_ms,
                "must exceed the exit margin",
            ));
        }
        if self.snackbar_auto_dismiss_ms == 0 {
            return Err(invalid(
                "snackbar_auto_dismiss_ms",
                self.snackbar_auto_dismiss_ms,
                "must be positive",
            ));
        }
        if self.resize_debounce_ms == 0 {
            return Err(invalid(
                "resize_debounce_ms",
                self.resize_debounce_ms,
                "must be positive",
            ));
        }
        Ok(())
    }

    /// Delay between hiding the old entry and adopting the new head.
    #[must_use]
    pub const fn exit_delay(&self) -> Duration {
        Duration::from_millis(self.transition_ms.saturating_sub(EXIT_MARGIN_MS))
    }

    /// Time the new entry spends fading in.
    #[must_use]
    pub const fn enter_duration(&self) -> Duration {
        Duration::from_millis(self.transition_ms)
    }

    /// Resize debounce window.
    #[must_use]
    pub const fn resize_debounce(&self) -> Duration {
        Duration::from_millis(self.resize_debounce_ms)
    }

    /// Presenter options for dialogs (no auto-dismiss).
    #[must_use]
    pub const fn dialog_options(&self) -> PresenterOptions {
        PresenterOptions {
            exit_delay: self.exit_delay(),
            enter_duration: self.enter_duration(),
            auto_dismiss: None,
            dismiss_on_navigation: self.dialog_dismiss_on_navigation,
            resize_debounce: self.resize_debounce(),
        }
    }

    /// Presenter options for snackbars (auto-dismiss armed).
    #[must_use]
    pub const fn snackbar_options(&self) -> PresenterOptions {
        PresenterOptions {
            exit_delay: self.exit_delay(),
            enter_duration: self.enter_duration(),
            auto_dismiss: Some(Duration::from_millis(self.snackbar_auto_dismiss_ms)),
            dismiss_on_navigation: self.snackbar_dismiss_on_navigation,
            resize_debounce: self.resize_debounce(),
        }
    }
}

fn invalid(field: &'static str, value: impl ToString, reason: &'static str) -> ConfigError {
    ConfigError::InvalidField {
        field,
        value: Some(value.to_string()),
        reason,
    }
}

fn parse_millis(field: &'static str, value: &str) -> ConfigResult<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| invalid(field, value, "expected milliseconds"))
}

fn parse_flag(field: &'static str, value: &str) -> ConfigResult<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" => Ok(false),
        _ => Err(invalid(field, value, "expected boolean")),
    }
}
