//! Snackbar requests.

use nexinterface_state::QueueStore;

use crate::action::{ActionButton, Presentable};
use crate::presenter::QueuePresenter;

/// Queue of pending snackbars.
pub type SnackbarQueue = QueueStore<SnackbarRequest>;

/// Presenter driving a snackbar surface.
pub type SnackbarHost = QueuePresenter<SnackbarRequest>;

/// Snackbar description pushed by application code.
#[derive(Clone, Debug)]
pub struct SnackbarRequest {
    /// Message text.
    pub text: String,
    /// Optional action button.
    pub button: Option<ActionButton>,
}

impl SnackbarRequest {
    /// Snackbar with text only.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            button: None,
        }
    }

    /// Attach a button.
    #[must_use]
    pub fn with_button(mut self, button: ActionButton) -> Self {
        self.button = Some(button);
        self
    }
}

impl Presentable for SnackbarRequest {
    fn summary(&self) -> &str {
        &self.text
    }

    fn button(&self) -> Option<&ActionButton> {
        self.button.as_ref()
    }
}
