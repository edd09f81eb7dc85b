//! Boolean activation store (drawer open/closed).

use crate::store::Store;
use crate::subscribers::{SubscribeOptions, Subscription};

/// Observable on/off flag.
#[derive(Clone, Debug, Default)]
pub struct FlagStore {
    store: Store<bool>,
}

impl FlagStore {
    /// Construct an inactive flag.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the flag and notify observers.
    pub fn activate(&self) {
        self.store.set_state(|active| *active = true);
    }

    /// Clear the flag and notify observers.
    pub fn deactivate(&self) {
        self.store.set_state(|active| *active = false);
    }

    /// Flip the flag, returning the new value.
    pub fn toggle(&self) -> bool {
        self.store.set_state(|active| {
            *active = !*active;
            *active
        })
    }

    /// Current value.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.store.get()
    }

    /// Observe every change.
    pub fn subscribe<F>(&self, options: SubscribeOptions, observer: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.store.subscribe(options, observer)
    }
}
