//! Modal drawer controller over the shared "active" flag.

use nexinterface_router::NavigationPort;
use nexinterface_state::{FlagStore, RemovalSignal, SubscribeOptions, Subscription};
use tracing::debug;

/// Opens and closes the drawer through a shared [`FlagStore`].
///
/// Any navigation event closes the drawer, as do scrim taps and item
/// selection.
#[derive(Clone, Debug)]
pub struct DrawerController {
    flag: FlagStore,
    signal: RemovalSignal,
}

impl DrawerController {
    /// Bind `flag` to `navigation` until `signal` fires.
    #[must_use]
    pub fn mount(flag: &FlagStore, navigation: Option<&NavigationPort>, signal: &RemovalSignal) -> Self {
        if let Some(port) = navigation {
            let flag = flag.clone();
            port.listen(Some(signal), move |event| {
                if flag.is_active() {
                    debug!(pathname = %event.pathname, "navigation closed drawer");
                    flag.deactivate();
                }
            });
        }
        Self {
            flag: flag.clone(),
            signal: signal.clone(),
        }
    }

    /// Show the drawer.
    pub fn open(&self) {
        if !self.signal.is_fired() {
            self.flag.activate();
        }
    }

    /// Hide the drawer.
    pub fn close(&self) {
        if !self.signal.is_fired() {
            self.flag.deactivate();
        }
    }

    /// Flip the drawer and return the new state.
    pub fn toggle(&self) -> bool {
        if self.signal.is_fired() {
            return self.flag.is_active();
        }
        self.flag.toggle()
    }

    /// Current state.
    #[must_use]
    pub fn is_open(&self) -> bool {
        self.flag.is_active()
    }

    /// Tap on the scrim behind the drawer.
    pub fn scrim_tap(&self) {
        self.close();
    }

    /// Selecting a navigation item closes the drawer before navigating.
    pub fn select_item(&self, port: &NavigationPort, href: &str) {
        self.close();
        port.push_state(href);
    }

    /// Observe open/close changes for as long as the controller is mounted.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&bool) + Send + Sync + 'static,
    {
        self.flag
            .subscribe(SubscribeOptions::run_and_bind(&self.signal), observer)
    }
}
