//! Action buttons carried by queued requests.

use std::fmt;
use std::sync::Arc;

/// Labelled button whose callback runs when pressed.
#[derive(Clone)]
pub struct ActionButton {
    /// Button label.
    pub label: String,
    action: Arc<dyn Fn() + Send + Sync>,
}

impl ActionButton {
    /// Construct a button running `action` when pressed.
    pub fn new<F>(label: impl Into<String>, action: F) -> Self
    where
        F: Fn() + Send + Sync + 'static,
    {
        Self {
            label: label.into(),
            action: Arc::new(action),
        }
    }

    /// Run the callback.
    pub fn invoke(&self) {
        (self.action)();
    }
}

impl fmt::Debug for ActionButton {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("ActionButton")
            .field("label", &self.label)
            .finish_non_exhaustive()
    }
}

/// Contract between queued payloads and the presenter.
pub trait Presentable {
    /// Short text used in logs.
    fn summary(&self) -> &str;

    /// Optional action button.
    fn button(&self) -> Option<&ActionButton>;
}
