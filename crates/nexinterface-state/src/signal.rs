//! Removal signal tied to the lifetime of a widget.
//!
//! # Design
//! - A widget owns one signal and hands clones to every subscription and
//!   listener it creates.
//! - Firing runs each teardown hook exactly once; hooks registered after the
//!   signal fired run immediately so nothing outlives the owner.
//! - Hooks are keyed so a subscription cancelled before the signal fires can
//!   withdraw its hook; a long-lived signal only holds live registrations.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

type Hook = Box<dyn FnOnce() + Send>;

/// Shared cancellation token fired when the owning widget is torn down.
#[derive(Clone, Default)]
pub struct RemovalSignal {
    inner: Arc<Mutex<SignalState>>,
}

/// Key of a hook registered through [`RemovalSignal::register_hook`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HookId(u64);

#[derive(Default)]
struct SignalState {
    fired: bool,
    next_hook: u64,
    hooks: BTreeMap<u64, Hook>,
}

impl RemovalSignal {
    /// Construct a signal that has not fired yet.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` once [`RemovalSignal::fire`] has been called.
    #[must_use]
    pub fn is_fired(&self) -> bool {
        self.lock().fired
    }

    /// Register a teardown hook.
    ///
    /// The hook runs on [`RemovalSignal::fire`], or right away when the signal
    /// has already fired.
    pub fn on_fire<F>(&self, hook: F)
    where
        F: FnOnce() + Send + 'static,
    {
        let _ = self.register_hook(hook);
    }

    /// Register a teardown hook that can be withdrawn with
    /// [`RemovalSignal::cancel_hook`].
    ///
    /// Returns `None` when the signal already fired; the hook has run by then.
    #[must_use]
    pub fn register_hook<F>(&self, hook: F) -> Option<HookId>
    where
        F: FnOnce() + Send + 'static,
    {
        let mut state = self.lock();
        if state.fired {
            drop(state);
            hook();
            return None;
        }
        let id = state.next_hook;
        state.next_hook = state.next_hook.wrapping_add(1);
        state.hooks.insert(id, Box::new(hook));
        Some(HookId(id))
    }

    /// Withdraw a hook without running it.
    ///
    /// Returns `false` when the hook already ran or was withdrawn.
    pub fn cancel_hook(&self, id: HookId) -> bool {
        let hook = self.lock().hooks.remove(&id.0);
        hook.is_some()
    }

    /// Number of hooks waiting for [`RemovalSignal::fire`].
    #[must_use]
    pub fn pending_hooks(&self) -> usize {
        self.lock().hooks.len()
    }

    /// Fire the signal, running every registered hook in registration order.
    ///
    /// Subsequent calls are no-ops.
    pub fn fire(&self) {
        let hooks = {
            let mut state = self.lock();
            if state.fired {
                return;
            }
            state.fired = true;
            std::mem::take(&mut state.hooks)
        };
        for hook in hooks.into_values() {
            hook();
        }
    }

    fn lock(&self) -> MutexGuard<'_, SignalState> {
        self.inner
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl fmt::Debug for RemovalSignal {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.lock();
        formatter
            .debug_struct("RemovalSignal")
            .field("fired", &state.fired)
            .field("pending_hooks", &state.hooks.len())
            .finish()
    }
}
