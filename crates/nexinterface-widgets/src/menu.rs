//! Bottom-sheet menu controller over a shared body store.
//!
//! # Design
//! - The shared store holds the body to show; `None` means no menu.
//! - A body shows right away. Clearing the store deactivates the menu first
//!   and drops the rendered body once the exit delay elapses, so the exit
//!   transition still has content to animate.
//! - Every store change cancels a pending clear.
//! - Push, replace and pop navigation clear the store.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use nexinterface_router::NavigationPort;
use nexinterface_state::{RemovalSignal, Store, SubscribeOptions, Subscription};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{WidgetError, WidgetResult};

/// Observable menu state consumed by renderers.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MenuView<B> {
    /// Whether the sheet is shown.
    pub active: bool,
    /// Rendered body; outlives `active` by the exit delay.
    pub body: Option<B>,
}

impl<B> Default for MenuView<B> {
    fn default() -> Self {
        Self {
            active: false,
            body: None,
        }
    }
}

/// Shows whatever body the shared store holds until the signal fires.
pub struct MenuController<B> {
    inner: Arc<MenuInner<B>>,
}

struct MenuInner<B> {
    body: Store<Option<B>>,
    view: Store<MenuView<B>>,
    exit_delay: Duration,
    runtime: Handle,
    clear: Mutex<Option<JoinHandle<()>>>,
    signal: RemovalSignal,
}

impl<B> MenuController<B>
where
    B: Clone + Send + Sync + 'static,
{
    /// Follow `body` and, when given, close the menu on every navigation event.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::RuntimeUnavailable`] outside a Tokio runtime.
    pub fn mount(
        body: &Store<Option<B>>,
        exit_delay: Duration,
        navigation: Option<&NavigationPort>,
        signal: &RemovalSignal,
    ) -> WidgetResult<Self> {
        let runtime =
            Handle::try_current().map_err(|source| WidgetError::RuntimeUnavailable { source })?;
        let inner = Arc::new(MenuInner {
            body: body.clone(),
            view: Store::new(MenuView::default()),
            exit_delay,
            runtime,
            clear: Mutex::new(None),
            signal: signal.clone(),
        });

        let weak = Arc::downgrade(&inner);
        signal.on_fire(move || {
            if let Some(inner) = weak.upgrade() {
                inner.cancel_clear();
            }
        });

        let weak = Arc::downgrade(&inner);
        body.subscribe(SubscribeOptions::run_and_bind(signal), move |body| {
            if let Some(inner) = weak.upgrade() {
                inner.apply(body.clone());
            }
        });

        if let Some(port) = navigation {
            let body = body.clone();
            port.listen(Some(signal), move |event| {
                if body.read(Option::is_some) {
                    debug!(event = event.kind.event_name(), "navigation closed menu");
                    body.set_state(|body| *body = None);
                }
            });
        }

        Ok(Self { inner })
    }

    /// Put `body` into the shared store.
    pub fn show(&self, body: B) {
        if !self.inner.signal.is_fired() {
            self.inner.body.set_state(|slot| *slot = Some(body));
        }
    }

    /// Empty the shared store.
    pub fn deactivate(&self) {
        if !self.inner.signal.is_fired() {
            self.inner.body.set_state(|slot| *slot = None);
        }
    }

    /// Tap on the scrim behind the sheet.
    pub fn scrim_tap(&self) {
        self.deactivate();
    }

    /// A button inside the sheet was pressed.
    pub fn item_pressed(&self) {
        self.deactivate();
    }

    /// Current view state.
    #[must_use]
    pub fn view(&self) -> MenuView<B> {
        self.inner.view.get()
    }

    /// Returns `true` while the sheet is shown.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.inner.view.read(|view| view.active)
    }

    /// Returns `true` while a body clear is waiting for the exit delay.
    #[must_use]
    pub fn clear_pending(&self) -> bool {
        self.inner
            .lock_clear()
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }

    /// Observe view changes for as long as the controller is mounted.
    pub fn subscribe<F>(&self, observer: F) -> Subscription
    where
        F: Fn(&MenuView<B>) + Send + Sync + 'static,
    {
        self.inner
            .view
            .subscribe(SubscribeOptions::run_and_bind(&self.inner.signal), observer)
    }
}

impl<B> MenuInner<B>
where
    B: Clone + Send + Sync + 'static,
{
    fn apply(self: &Arc<Self>, body: Option<B>) {
        if self.signal.is_fired() {
            return;
        }
        let mut clear = self.lock_clear();
        if let Some(pending) = clear.take() {
            pending.abort();
        }
        match body {
            Some(body) => {
                drop(clear);
                self.view.set_state(|view| {
                    view.active = true;
                    view.body = Some(body);
                });
            }
            None => {
                if self.view.read(|view| view.body.is_some()) {
                    *clear = Some(self.spawn_clear());
                }
                drop(clear);
                self.view.set_state(|view| view.active = false);
            }
        }
    }

    fn spawn_clear(self: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let delay = self.exit_delay;
        self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = weak.upgrade()
                && !inner.signal.is_fired()
            {
                debug!("menu body cleared");
                inner.view.set_state(|view| {
                    if !view.active {
                        view.body = None;
                    }
                });
            }
        })
    }
}

impl<B> MenuInner<B> {
    fn cancel_clear(&self) {
        if let Some(pending) = self.lock_clear().take() {
            pending.abort();
        }
    }

    fn lock_clear(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.clear.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl<B> fmt::Debug for MenuController<B>
where
    B: Clone + Send + Sync + 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("MenuController")
            .field("exit_delay", &self.inner.exit_delay)
            .field("active", &self.is_active())
            .field("clear_pending", &self.clear_pending())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexinterface_router::MemoryHistory;

    const EXIT: Duration = Duration::from_millis(200);

    fn mounted(
        port: Option<&NavigationPort>,
    ) -> (MenuController<&'static str>, Store<Option<&'static str>>, RemovalSignal) {
        let body = Store::new(None);
        let signal = RemovalSignal::new();
        let menu = MenuController::mount(&body, EXIT, port, &signal).expect("runtime available");
        (menu, body, signal)
    }

    async fn settle(millis: u64) {
        tokio::time::sleep(Duration::from_millis(millis)).await;
    }

    #[tokio::test(start_paused = true)]
    async fn body_shows_at_once_and_clears_after_exit_delay() {
        let (menu, body, _signal) = mounted(None);
        assert!(!menu.clear_pending());

        body.set_state(|slot| *slot = Some("share"));
        assert_eq!(
            menu.view(),
            MenuView {
                active: true,
                body: Some("share")
            }
        );

        menu.scrim_tap();
        assert!(!menu.is_active());
        assert_eq!(menu.view().body, Some("share"));
        assert!(menu.clear_pending());

        settle(199).await;
        assert_eq!(menu.view().body, Some("share"));
        settle(2).await;
        assert_eq!(menu.view(), MenuView::default());
        assert_eq!(body.get(), None);
    }

    #[tokio::test(start_paused = true)]
    async fn new_body_cancels_pending_clear() {
        let (menu, _body, _signal) = mounted(None);
        menu.show("first");
        menu.item_pressed();
        settle(100).await;

        menu.show("second");
        assert!(!menu.clear_pending());
        settle(300).await;
        assert_eq!(
            menu.view(),
            MenuView {
                active: true,
                body: Some("second")
            }
        );
    }

    #[tokio::test(start_paused = true)]
    async fn every_navigation_kind_closes_menu() {
        let port = NavigationPort::new(MemoryHistory::new("/"));
        let (menu, body, _signal) = mounted(Some(&port));

        menu.show("a");
        port.push_state("/one");
        assert!(!menu.is_active());
        assert_eq!(body.get(), None);

        menu.show("b");
        port.replace_state("/two");
        assert!(!menu.is_active());

        menu.show("c");
        port.back();
        assert!(!menu.is_active());
        assert_eq!(port.pathname(), "/");
    }

    #[tokio::test(start_paused = true)]
    async fn teardown_aborts_clear_and_detaches() {
        let port = NavigationPort::new(MemoryHistory::new("/"));
        let (menu, body, signal) = mounted(Some(&port));
        menu.show("pending");
        menu.deactivate();

        signal.fire();
        settle(1_000).await;

        assert_eq!(menu.view().body, Some("pending"));
        assert_eq!(body.subscriber_count(), 0);
        assert_eq!(port.listener_count(), 0);
        assert_eq!(signal.pending_hooks(), 0);

        menu.show("ignored");
        assert_eq!(body.get(), None);
    }

    #[test]
    fn mount_requires_runtime() {
        let result = MenuController::<&'static str>::mount(
            &Store::new(None),
            EXIT,
            None,
            &RemovalSignal::new(),
        );
        assert!(matches!(result, Err(WidgetError::RuntimeUnavailable { .. })));
    }
}
