//! Observer registry and subscription handles.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::signal::{HookId, RemovalSignal};

/// Callback invoked with the current value on every notification.
pub type Observer<T> = Arc<dyn Fn(&T) + Send + Sync>;

type Detach = Box<dyn FnOnce() + Send>;

/// Options accepted by `subscribe` calls.
#[derive(Clone, Debug, Default)]
pub struct SubscribeOptions {
    /// Invoke the observer once with the current state before returning.
    pub run_immediately: bool,
    /// Deregister the observer when this signal fires.
    pub signal: Option<RemovalSignal>,
}

impl SubscribeOptions {
    /// Options that run the observer immediately and bind it to `signal`.
    #[must_use]
    pub fn run_and_bind(signal: &RemovalSignal) -> Self {
        Self {
            run_immediately: true,
            signal: Some(signal.clone()),
        }
    }

    /// Options that only bind the observer to `signal`.
    #[must_use]
    pub fn bind(signal: &RemovalSignal) -> Self {
        Self {
            run_immediately: false,
            signal: Some(signal.clone()),
        }
    }
}

/// Handle returned for every registered observer.
///
/// Dropping the handle keeps the observer registered; call
/// [`Subscription::cancel`] or fire the bound [`RemovalSignal`] to detach it.
#[derive(Clone)]
pub struct Subscription {
    detach: Arc<Mutex<Option<Detach>>>,
}

impl Subscription {
    fn new(detach: Detach) -> Self {
        Self {
            detach: Arc::new(Mutex::new(Some(detach))),
        }
    }

    /// Deregister the observer. Cancelling twice is a no-op.
    pub fn cancel(&self) {
        let detach = self
            .detach
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(detach) = detach {
            detach();
        }
    }

    /// Returns `true` while the observer is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.detach
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

/// Ordered set of observers notified synchronously.
pub struct Subscribers<T> {
    registry: Arc<Mutex<Registry<T>>>,
}

struct Registry<T> {
    next_id: u64,
    observers: Vec<(u64, Observer<T>)>,
}

impl<T: 'static> Subscribers<T> {
    /// Construct an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                observers: Vec::new(),
            })),
        }
    }

    /// Register an observer, optionally bound to a removal signal.
    pub fn register(&self, observer: Observer<T>, signal: Option<&RemovalSignal>) -> Subscription {
        let id = {
            let mut registry = self.lock();
            let id = registry.next_id;
            registry.next_id = registry.next_id.wrapping_add(1);
            registry.observers.push((id, observer));
            id
        };

        let weak: Weak<Mutex<Registry<T>>> = Arc::downgrade(&self.registry);
        let bound: Arc<Mutex<Option<(RemovalSignal, HookId)>>> = Arc::default();
        let subscription = Subscription::new(Box::new({
            let bound = Arc::clone(&bound);
            move || {
                if let Some(registry) = weak.upgrade() {
                    registry
                        .lock()
                        .unwrap_or_else(PoisonError::into_inner)
                        .observers
                        .retain(|(candidate, _)| *candidate != id);
                }
                let hook = bound.lock().unwrap_or_else(PoisonError::into_inner).take();
                if let Some((signal, hook)) = hook {
                    signal.cancel_hook(hook);
                }
            }
        }));

        if let Some(signal) = signal {
            let handle = subscription.clone();
            if let Some(hook) = signal.register_hook(move || handle.cancel()) {
                *bound.lock().unwrap_or_else(PoisonError::into_inner) = Some((signal.clone(), hook));
            }
        }
        subscription
    }

    /// Invoke every observer with `value`.
    ///
    /// Observers run outside the registry lock, so an observer may register,
    /// cancel, or trigger further notifications.
    pub fn notify(&self, value: &T) {
        let observers: Vec<Observer<T>> = self
            .lock()
            .observers
            .iter()
            .map(|(_, observer)| Arc::clone(observer))
            .collect();
        for observer in observers {
            observer(value);
        }
    }

    /// Number of registered observers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().observers.len()
    }

    /// Returns `true` when no observer is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn lock(&self) -> MutexGuard<'_, Registry<T>> {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }
}

impl<T: 'static> Default for Subscribers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Clone for Subscribers<T> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<T: 'static> fmt::Debug for Subscribers<T> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Subscribers")
            .field("observers", &self.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn counting_observer(count: &Arc<AtomicUsize>) -> Observer<u32> {
        let count = Arc::clone(count);
        Arc::new(move |_value: &u32| {
            count.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn cancel_detaches_observer() {
        let subscribers = Subscribers::new();
        let count = Arc::new(AtomicUsize::new(0));
        let subscription = subscribers.register(counting_observer(&count), None);

        subscribers.notify(&1);
        subscription.cancel();
        subscription.cancel();
        subscribers.notify(&2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!subscription.is_active());
        assert!(subscribers.is_empty());
    }

    #[test]
    fn signal_detaches_every_bound_observer() {
        let subscribers = Subscribers::new();
        let signal = RemovalSignal::new();
        let count = Arc::new(AtomicUsize::new(0));
        let first = subscribers.register(counting_observer(&count), Some(&signal));
        let second = subscribers.register(counting_observer(&count), Some(&signal));
        let unbound = subscribers.register(counting_observer(&count), None);

        signal.fire();
        subscribers.notify(&7);

        assert!(!first.is_active());
        assert!(!second.is_active());
        assert!(unbound.is_active());
        assert_eq!(count.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn cancel_withdraws_signal_hook() {
        let subscribers = Subscribers::new();
        let signal = RemovalSignal::new();
        let count = Arc::new(AtomicUsize::new(0));

        for _ in 0..1_000 {
            subscribers
                .register(counting_observer(&count), Some(&signal))
                .cancel();
        }
        let live = subscribers.register(counting_observer(&count), Some(&signal));

        assert_eq!(signal.pending_hooks(), 1);
        assert_eq!(subscribers.len(), 1);

        live.cancel();
        assert_eq!(signal.pending_hooks(), 0);
        assert!(subscribers.is_empty());
    }

    #[test]
    fn register_on_fired_signal_is_inactive() {
        let subscribers = Subscribers::new();
        let signal = RemovalSignal::new();
        signal.fire();
        let count = Arc::new(AtomicUsize::new(0));

        let subscription = subscribers.register(counting_observer(&count), Some(&signal));
        subscribers.notify(&3);

        assert!(!subscription.is_active());
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn observer_may_cancel_itself_during_notify() {
        let subscribers: Subscribers<u32> = Subscribers::new();
        let slot: Arc<Mutex<Option<Subscription>>> = Arc::new(Mutex::new(None));
        let count = Arc::new(AtomicUsize::new(0));
        let observer: Observer<u32> = {
            let slot = Arc::clone(&slot);
            let count = Arc::clone(&count);
            Arc::new(move |_value: &u32| {
                count.fetch_add(1, Ordering::SeqCst);
                if let Some(subscription) = slot.lock().expect("slot lock").as_ref() {
                    subscription.cancel();
                }
            })
        };
        let subscription = subscribers.register(observer, None);
        *slot.lock().expect("slot lock") = Some(subscription);

        subscribers.notify(&1);
        subscribers.notify(&2);

        assert_eq!(count.load(Ordering::SeqCst), 1);
    }
}
