//! Generic observable store.
//!
//! # Design
//! - Every mutation goes through [`Store::set_state`] and notifies observers
//!   synchronously, before `set_state` returns.
//! - Observers receive an owned snapshot taken while the lock was held; they
//!   never touch the stored value directly.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::subscribers::{Observer, SubscribeOptions, Subscribers, Subscription};

/// Observable value with synchronous change notification.
pub struct Store<S> {
    state: Arc<Mutex<S>>,
    subscribers: Subscribers<S>,
}

impl<S> Store<S>
where
    S: Clone + Send + 'static,
{
    /// Construct a store holding `initial`.
    #[must_use]
    pub fn new(initial: S) -> Self {
        Self {
            state: Arc::new(Mutex::new(initial)),
            subscribers: Subscribers::new(),
        }
    }

    /// Clone the current state.
    #[must_use]
    pub fn get(&self) -> S {
        self.lock().clone()
    }

    /// Inspect the current state without cloning it.
    pub fn read<R>(&self, reader: impl FnOnce(&S) -> R) -> R {
        reader(&self.lock())
    }

    /// Mutate the state and notify every observer with the resulting snapshot.
    ///
    /// Observers are notified even when the mutator leaves the state unchanged.
    pub fn set_state<R>(&self, mutator: impl FnOnce(&mut S) -> R) -> R {
        let (result, snapshot) = {
            let mut state = self.lock();
            let result = mutator(&mut state);
            (result, state.clone())
        };
        self.subscribers.notify(&snapshot);
        result
    }

    /// Register an observer for future mutations.
    pub fn subscribe<F>(&self, options: SubscribeOptions, observer: F) -> Subscription
    where
        F: Fn(&S) + Send + Sync + 'static,
    {
        let observer: Observer<S> = Arc::new(observer);
        let subscription = self
            .subscribers
            .register(Arc::clone(&observer), options.signal.as_ref());
        if options.run_immediately && subscription.is_active() {
            let snapshot = self.get();
            observer(&snapshot);
        }
        subscription
    }

    /// Number of live observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }

    fn lock(&self) -> MutexGuard<'_, S> {
        self.state
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<S> Clone for Store<S> {
    fn clone(&self) -> Self {
        Self {
            state: Arc::clone(&self.state),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<S> Default for Store<S>
where
    S: Clone + Default + Send + 'static,
{
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S> fmt::Debug for Store<S>
where
    S: Clone + fmt::Debug + Send + 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("Store")
            .field("state", &*self.lock())
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::signal::RemovalSignal;
    use nexinterface_test_support::Recorder;

    #[test]
    fn set_state_notifies_before_returning() {
        let store = Store::new(0_u32);
        let recorder = Recorder::new();
        let _subscription = store.subscribe(SubscribeOptions::default(), recorder.observer(|v: &u32| *v));

        let returned = store.set_state(|value| {
            *value += 5;
            *value
        });

        assert_eq!(returned, 5);
        assert_eq!(recorder.events(), vec![5]);
        assert_eq!(store.get(), 5);
    }

    #[test]
    fn run_immediately_delivers_current_state() {
        let store = Store::new(String::from("ready"));
        let recorder = Recorder::new();
        let _subscription = store.subscribe(
            SubscribeOptions {
                run_immediately: true,
                signal: None,
            },
            recorder.observer(String::clone),
        );

        assert_eq!(recorder.events(), vec!["ready".to_string()]);
    }

    #[test]
    fn fired_signal_prevents_immediate_run() {
        let store = Store::new(1_u8);
        let signal = RemovalSignal::new();
        signal.fire();
        let recorder = Recorder::new();
        let subscription =
            store.subscribe(SubscribeOptions::run_and_bind(&signal), recorder.observer(|v: &u8| *v));

        assert!(!subscription.is_active());
        assert!(recorder.is_empty());
        assert_eq!(store.subscriber_count(), 0);
    }

    #[test]
    fn subscribe_cancel_cycles_leave_signal_empty() {
        let store = Store::new(0_u32);
        let signal = RemovalSignal::new();
        for _ in 0..10_000 {
            store
                .subscribe(SubscribeOptions::bind(&signal), |_: &u32| {})
                .cancel();
        }

        assert_eq!(store.subscriber_count(), 0);
        assert_eq!(signal.pending_hooks(), 0);
    }

    #[test]
    fn read_borrows_without_clone() {
        let store = Store::new(vec![1, 2, 3]);
        assert_eq!(store.read(Vec::len), 3);
        assert!(format!("{store:?}").contains("[1, 2, 3]"));
    }
}
