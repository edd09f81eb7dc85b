//! Queue presenter: the consumer-side state machine shared by dialogs and snackbars.
//!
//! # Design
//! - The presenter remembers the identity token of the entry it shows. Every
//!   queue notification compares that token with the current head.
//! - A head change hides the visible entry (`FadingOut`), waits the exit
//!   delay, then adopts whatever the head is at that point (`FadingIn`, or
//!   `Idle` when the queue is empty). Head changes while fading out do not
//!   restart the delay.
//! - At most one auto-dismiss timer is live; it is cleared on every head
//!   change and on every explicit dismissal.
//! - Firing the removal signal aborts every timer and detaches every
//!   listener; no presenter code runs afterwards.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;

use nexinterface_router::NavigationPort;
use nexinterface_state::{
    EntryId, QueueEntry, QueueStore, RemovalSignal, Store, SubscribeOptions, Subscription,
};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::action::Presentable;
use crate::debounce::Debouncer;
use crate::error::{WidgetError, WidgetResult};

/// Timing and dismissal behaviour for one presenter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PresenterOptions {
    /// Wait between hiding the old entry and adopting the new head.
    pub exit_delay: Duration,
    /// Time the adopted entry spends fading in.
    pub enter_duration: Duration,
    /// Shift the queue when an entry has been shown this long.
    pub auto_dismiss: Option<Duration>,
    /// Shift the queue on every navigation event.
    pub dismiss_on_navigation: bool,
    /// Resize debounce window.
    pub resize_debounce: Duration,
}

/// Visual phase of the presenter.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum PresenterPhase {
    /// Nothing in flight.
    #[default]
    Idle,
    /// The previous entry is exiting.
    FadingOut,
    /// The adopted entry is becoming visible.
    FadingIn,
}

/// Observable view state consumed by renderers.
pub struct PresenterView<P> {
    /// Current phase.
    pub phase: PresenterPhase,
    /// Whether the surface is shown.
    pub active: bool,
    /// Entry adopted at the end of the last exit delay.
    pub current: Option<Arc<QueueEntry<P>>>,
    /// Layout flag recomputed on resize (dialog scrollable / long snackbar button).
    pub layout_flag: bool,
}

impl<P> Default for PresenterView<P> {
    fn default() -> Self {
        Self {
            phase: PresenterPhase::Idle,
            active: false,
            current: None,
            layout_flag: false,
        }
    }
}

impl<P> Clone for PresenterView<P> {
    fn clone(&self) -> Self {
        Self {
            phase: self.phase,
            active: self.active,
            current: self.current.clone(),
            layout_flag: self.layout_flag,
        }
    }
}

impl<P> fmt::Debug for PresenterView<P> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("PresenterView")
            .field("phase", &self.phase)
            .field("active", &self.active)
            .field("current", &self.current.as_ref().map(|entry| entry.id))
            .field("layout_flag", &self.layout_flag)
            .finish()
    }
}

/// Presenter bound to one queue for the lifetime of its removal signal.
pub struct QueuePresenter<P> {
    inner: Arc<Inner<P>>,
}

struct Inner<P> {
    queue: QueueStore<P>,
    options: PresenterOptions,
    runtime: Handle,
    view: Store<PresenterView<P>>,
    timers: Mutex<Timers>,
    resize: Debouncer,
    signal: RemovalSignal,
}

#[derive(Default)]
struct Timers {
    remembered: Option<EntryId>,
    exiting: bool,
    generation: u64,
    transition: Option<JoinHandle<()>>,
    dismiss: Option<JoinHandle<()>>,
}

impl Timers {
    fn clear_dismiss(&mut self) {
        if let Some(handle) = self.dismiss.take() {
            handle.abort();
        }
    }

    fn abort_all(&mut self) {
        self.clear_dismiss();
        if let Some(handle) = self.transition.take() {
            handle.abort();
        }
    }
}

impl<P> QueuePresenter<P>
where
    P: Presentable + Send + Sync + 'static,
{
    /// Subscribe to `queue` and start reconciling against its head.
    ///
    /// When `navigation` is given and the options ask for it, every navigation
    /// event dismisses the current entry. Everything the presenter registers
    /// is released when `signal` fires.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::RuntimeUnavailable`] outside a Tokio runtime.
    pub fn mount(
        queue: &QueueStore<P>,
        options: PresenterOptions,
        navigation: Option<&NavigationPort>,
        signal: &RemovalSignal,
    ) -> WidgetResult<Self> {
        let runtime =
            Handle::try_current().map_err(|source| WidgetError::RuntimeUnavailable { source })?;
        let inner = Arc::new(Inner {
            queue: queue.clone(),
            options,
            resize: Debouncer::new(options.resize_debounce, runtime.clone()),
            runtime,
            view: Store::new(PresenterView::default()),
            timers: Mutex::new(Timers::default()),
            signal: signal.clone(),
        });

        let weak = Arc::downgrade(&inner);
        signal.on_fire(move || {
            if let Some(inner) = weak.upgrade() {
                inner.teardown();
            }
        });

        let weak = Arc::downgrade(&inner);
        queue.subscribe(SubscribeOptions::run_and_bind(signal), move |snapshot| {
            if let Some(inner) = weak.upgrade() {
                inner.reconcile(snapshot.front().map(|entry| entry.id));
            }
        });

        if options.dismiss_on_navigation
            && let Some(port) = navigation
        {
            let weak = Arc::downgrade(&inner);
            port.listen(Some(signal), move |event| {
                if let Some(inner) = weak.upgrade() {
                    debug!(event = event.kind.event_name(), "navigation dismissed entry");
                    inner.dismiss();
                }
            });
        }

        Ok(Self { inner })
    }

    /// Backdrop/scrim tap: cancel the auto-dismiss timer and shift the queue.
    pub fn dismiss(&self) {
        self.inner.dismiss();
    }

    /// Button press on the shown entry: run its action, then dismiss.
    ///
    /// Returns `false` when nothing is shown or the shown entry has no button.
    pub fn press_action(&self) -> bool {
        let current = self
            .inner
            .view
            .read(|view| view.current.clone().filter(|_| view.active));
        let Some(button) = current.as_ref().and_then(|entry| entry.payload.button()) else {
            return false;
        };
        button.invoke();
        self.inner.dismiss();
        true
    }

    /// Recompute the layout flag once resize events settle.
    pub fn notify_resize<F>(&self, measure: F)
    where
        F: FnOnce() -> bool + Send + 'static,
    {
        if self.inner.signal.is_fired() {
            return;
        }
        let view = self.inner.view.clone();
        self.inner.resize.enqueue(move || {
            let flag = measure();
            view.set_state(|view| view.layout_flag = flag);
        });
    }

    /// Clone the current view state.
    #[must_use]
    pub fn view(&self) -> PresenterView<P> {
        self.inner.view.get()
    }

    /// Observe view changes.
    pub fn subscribe<F>(&self, options: SubscribeOptions, observer: F) -> Subscription
    where
        F: Fn(&PresenterView<P>) + Send + Sync + 'static,
    {
        self.inner.view.subscribe(options, observer)
    }

    /// Identity token of the entry the presenter last adopted.
    #[must_use]
    pub fn remembered(&self) -> Option<EntryId> {
        self.inner.lock_timers().remembered
    }

    /// Returns `true` while an auto-dismiss timer is armed.
    #[must_use]
    pub fn auto_dismiss_armed(&self) -> bool {
        self.inner
            .lock_timers()
            .dismiss
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl<P> Inner<P>
where
    P: Presentable + Send + Sync + 'static,
{
    fn reconcile(self: &Arc<Self>, head: Option<EntryId>) {
        if self.signal.is_fired() {
            return;
        }
        let previous = {
            let mut timers = self.lock_timers();
            if timers.exiting || timers.remembered == head {
                return;
            }
            timers.abort_all();
            timers.exiting = true;
            timers.generation = timers.generation.wrapping_add(1);
            timers.transition = Some(self.spawn_transition(timers.generation));
            timers.remembered
        };
        debug!(?previous, next = ?head, "head changed; fading out");
        self.view.set_state(|view| {
            view.active = false;
            view.phase = PresenterPhase::FadingOut;
        });
    }

    fn spawn_transition(self: &Arc<Self>, generation: u64) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let exit = self.options.exit_delay;
        let enter = self.options.enter_duration;
        self.runtime.spawn(async move {
            tokio::time::sleep(exit).await;
            if !weak.upgrade().is_some_and(|inner| inner.adopt_head(generation)) {
                return;
            }
            tokio::time::sleep(enter).await;
            if let Some(inner) = weak.upgrade() {
                inner.finish_enter(generation);
            }
        })
    }

    fn adopt_head(self: &Arc<Self>, generation: u64) -> bool {
        if self.signal.is_fired() {
            return false;
        }
        let head = {
            let mut timers = self.lock_timers();
            if timers.generation != generation {
                return false;
            }
            // Read under the lock so a concurrent shift reconciles against this adoption.
            let head = self.queue.head();
            timers.exiting = false;
            timers.remembered = head.as_ref().map(|entry| entry.id);
            if head.is_none() {
                timers.transition = None;
            }
            if let (Some(entry), Some(after)) = (&head, self.options.auto_dismiss) {
                timers.clear_dismiss();
                timers.dismiss = Some(self.spawn_auto_dismiss(entry.id, after));
            }
            head
        };
        let active = head.is_some();

        match &head {
            Some(entry) => debug!(entry_id = %entry.id, summary = entry.payload.summary(), "entry adopted"),
            None => debug!("queue drained; presenter idle"),
        }
        self.view.set_state(|view| {
            view.current = head;
            view.active = active;
            view.phase = if active {
                PresenterPhase::FadingIn
            } else {
                PresenterPhase::Idle
            };
        });
        active
    }

    fn finish_enter(&self, generation: u64) {
        {
            let mut timers = self.lock_timers();
            if timers.generation != generation || self.signal.is_fired() {
                return;
            }
            timers.transition = None;
        }
        self.view.set_state(|view| {
            if view.phase == PresenterPhase::FadingIn {
                view.phase = PresenterPhase::Idle;
            }
        });
    }

    fn spawn_auto_dismiss(self: &Arc<Self>, id: EntryId, after: Duration) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        self.runtime.spawn(async move {
            tokio::time::sleep(after).await;
            if let Some(inner) = weak.upgrade() {
                inner.expire(id);
            }
        })
    }

    fn expire(&self, id: EntryId) {
        if self.signal.is_fired() {
            return;
        }
        self.lock_timers().dismiss = None;
        if self.queue.head_id() == Some(id) {
            debug!(entry_id = %id, "auto-dismiss elapsed");
            self.queue.shift();
        }
    }

    fn dismiss(&self) {
        if self.signal.is_fired() {
            return;
        }
        self.lock_timers().clear_dismiss();
        self.queue.shift();
    }
}

impl<P> Inner<P> {
    fn teardown(&self) {
        self.lock_timers().abort_all();
        self.resize.cancel();
        debug!("presenter torn down");
    }

    fn lock_timers(&self) -> MutexGuard<'_, Timers> {
        self.timers
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<P> fmt::Debug for QueuePresenter<P>
where
    P: Presentable + Send + Sync + 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("QueuePresenter")
            .field("options", &self.inner.options)
            .field("view", &self.inner.view.get())
            .finish_non_exhaustive()
    }
}
