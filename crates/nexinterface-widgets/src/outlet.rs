//! Lazy route outlet: loads the selected component's module on demand.
//!
//! # Design
//! - Follows the router's selection store; an unchanged `(component, src)`
//!   pair does not reload.
//! - Each new selection bumps a generation counter and aborts the load in
//!   flight, so a slow loader can never overwrite a newer selection.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use nexinterface_router::{RouteSelection, Router};
use nexinterface_state::{RemovalSignal, Store, SubscribeOptions, Subscription};
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::error::{WidgetError, WidgetResult};

/// What the outlet currently renders.
pub enum OutletState<M> {
    /// No route selected yet.
    Empty,
    /// Loader running for `component`.
    Loading {
        /// Component being loaded.
        component: String,
    },
    /// Module loaded and ready to instantiate.
    Ready {
        /// Component identifier.
        component: String,
        /// Module returned by the loader.
        module: Arc<M>,
    },
}

impl<M> OutletState<M> {
    /// Component this state refers to, if any.
    #[must_use]
    pub fn component(&self) -> Option<&str> {
        match self {
            Self::Empty => None,
            Self::Loading { component } | Self::Ready { component, .. } => Some(component),
        }
    }

    /// Loaded module, once ready.
    #[must_use]
    pub const fn module(&self) -> Option<&Arc<M>> {
        match self {
            Self::Ready { module, .. } => Some(module),
            Self::Empty | Self::Loading { .. } => None,
        }
    }
}

impl<M> Default for OutletState<M> {
    fn default() -> Self {
        Self::Empty
    }
}

impl<M> Clone for OutletState<M> {
    fn clone(&self) -> Self {
        match self {
            Self::Empty => Self::Empty,
            Self::Loading { component } => Self::Loading {
                component: component.clone(),
            },
            Self::Ready { component, module } => Self::Ready {
                component: component.clone(),
                module: Arc::clone(module),
            },
        }
    }
}

impl<M> fmt::Debug for OutletState<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => formatter.write_str("Empty"),
            Self::Loading { component } => formatter
                .debug_struct("Loading")
                .field("component", component)
                .finish(),
            Self::Ready { component, .. } => formatter
                .debug_struct("Ready")
                .field("component", component)
                .finish_non_exhaustive(),
        }
    }
}

/// Outlet mounted under a router.
pub struct RouteOutlet<M> {
    inner: Arc<Inner<M>>,
}

struct Inner<M> {
    state: Store<OutletState<M>>,
    runtime: Handle,
    slot: Mutex<LoadSlot<M>>,
    signal: RemovalSignal,
}

struct LoadSlot<M> {
    generation: u64,
    target: Option<RouteSelection<M>>,
    task: Option<JoinHandle<()>>,
}

impl<M> RouteOutlet<M>
where
    M: Send + Sync + 'static,
{
    /// Follow `router`'s selection until `signal` fires.
    ///
    /// # Errors
    ///
    /// Returns [`WidgetError::RuntimeUnavailable`] outside a Tokio runtime.
    pub fn mount(router: &Router<M>, signal: &RemovalSignal) -> WidgetResult<Self> {
        let runtime =
            Handle::try_current().map_err(|source| WidgetError::RuntimeUnavailable { source })?;
        let inner = Arc::new(Inner {
            state: Store::new(OutletState::Empty),
            runtime,
            slot: Mutex::new(LoadSlot {
                generation: 0,
                target: None,
                task: None,
            }),
            signal: signal.clone(),
        });

        let weak = Arc::downgrade(&inner);
        signal.on_fire(move || {
            if let Some(inner) = weak.upgrade()
                && let Some(task) = inner.lock_slot().task.take()
            {
                task.abort();
            }
        });

        let weak = Arc::downgrade(&inner);
        router.subscribe(SubscribeOptions::run_and_bind(signal), move |selection| {
            if let (Some(inner), Some(selection)) = (weak.upgrade(), selection) {
                inner.select(selection);
            }
        });

        Ok(Self { inner })
    }

    /// Current outlet state.
    #[must_use]
    pub fn state(&self) -> OutletState<M> {
        self.inner.state.get()
    }

    /// Observe outlet state changes.
    pub fn subscribe<F>(&self, options: SubscribeOptions, observer: F) -> Subscription
    where
        F: Fn(&OutletState<M>) + Send + Sync + 'static,
    {
        self.inner.state.subscribe(options, observer)
    }
}

impl<M> Inner<M>
where
    M: Send + Sync + 'static,
{
    fn select(self: &Arc<Self>, selection: &RouteSelection<M>) {
        if self.signal.is_fired() {
            return;
        }
        {
            let mut slot = self.lock_slot();
            if slot
                .target
                .as_ref()
                .is_some_and(|target| target.same_target(selection))
            {
                return;
            }
            if let Some(task) = slot.task.take() {
                task.abort();
            }
            slot.generation = slot.generation.wrapping_add(1);
            slot.target = Some(selection.clone());
            slot.task = Some(self.spawn_load(slot.generation, selection));
        }
        debug!(component = %selection.component, "loading route module");
        let component = selection.component.clone();
        self.state
            .set_state(|state| *state = OutletState::Loading { component });
    }

    fn spawn_load(self: &Arc<Self>, generation: u64, selection: &RouteSelection<M>) -> JoinHandle<()> {
        let weak = Arc::downgrade(self);
        let component = selection.component.clone();
        let load = selection.load();
        self.runtime.spawn(async move {
            let module = load.await;
            if let Some(inner) = weak.upgrade() {
                inner.finish(generation, component, module);
            }
        })
    }

    fn finish(&self, generation: u64, component: String, module: M) {
        {
            let mut slot = self.lock_slot();
            if slot.generation != generation || self.signal.is_fired() {
                debug!(%component, "discarding stale route module");
                return;
            }
            slot.task = None;
        }
        debug!(%component, "route module ready");
        let module = Arc::new(module);
        self.state
            .set_state(|state| *state = OutletState::Ready { component, module });
    }
}

impl<M> Inner<M> {
    fn lock_slot(&self) -> MutexGuard<'_, LoadSlot<M>> {
        self.slot
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<M> fmt::Debug for RouteOutlet<M>
where
    M: Send + Sync + 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RouteOutlet")
            .field("state", &self.inner.state.get())
            .finish_non_exhaustive()
    }
}
