//! Dialog requests.

use nexinterface_state::QueueStore;

use crate::action::{ActionButton, Presentable};
use crate::presenter::QueuePresenter;

/// Queue of pending dialogs.
pub type DialogQueue = QueueStore<DialogRequest>;

/// Presenter driving a dialog surface.
pub type DialogHost = QueuePresenter<DialogRequest>;

/// Dialog description pushed by application code.
#[derive(Clone, Debug)]
pub struct DialogRequest {
    /// Headline text.
    pub headline: String,
    /// Body content, rendered by the host.
    pub body: String,
    /// Optional confirm button.
    pub button: Option<ActionButton>,
}

impl DialogRequest {
    /// Dialog without a button; dismissed through the scrim or navigation.
    pub fn new(headline: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            headline: headline.into(),
            body: body.into(),
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

impl Presentable for DialogRequest {
    fn summary(&self) -> &str {
        &self.headline
    }

    fn button(&self) -> Option<&ActionButton> {
        self.button.as_ref()
    }
}
