//! Observer capture helpers.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

/// Thread-safe log of values captured from observers.
#[derive(Debug)]
pub struct Recorder<T> {
    events: Arc<Mutex<Vec<T>>>,
}

impl<T> Clone for Recorder<T> {
    fn clone(&self) -> Self {
        Self {
            events: Arc::clone(&self.events),
        }
    }
}

impl<T> Default for Recorder<T> {
    fn default() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
        }
    }
}

impl<T> Recorder<T>
where
    T: Clone + Send + 'static,
{
    /// Construct an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a value.
    pub fn push(&self, value: T) {
        self.lock().push(value);
    }

    /// Build an observer that maps each notification through `map` and records it.
    pub fn observer<S, F>(&self, map: F) -> impl Fn(&S) + Send + Sync + use<T, S, F>
    where
        S: ?Sized,
        F: Fn(&S) -> T + Send + Sync + 'static,
    {
        let recorder = self.clone();
        move |value: &S| recorder.push(map(value))
    }

    /// Clone every captured value in order.
    #[must_use]
    pub fn events(&self) -> Vec<T> {
        self.lock().clone()
    }

    /// Most recent captured value.
    #[must_use]
    pub fn last(&self) -> Option<T> {
        self.lock().last().cloned()
    }

    /// Number of captured values.
    #[must_use]
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns `true` when nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop every captured value.
    pub fn clear(&self) {
        self.lock().clear();
    }

    fn lock(&self) -> MutexGuard<'_, Vec<T>> {
        self.events
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

/// Shared invocation counter.
#[derive(Clone, Debug, Default)]
pub struct Counter {
    count: Arc<AtomicUsize>,
}

impl Counter {
    /// Construct a counter starting at zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Increment by one.
    pub fn hit(&self) {
        self.count.fetch_add(1, Ordering::SeqCst);
    }

    /// Closure that increments the counter when called.
    #[must_use]
    pub fn callback(&self) -> impl Fn() + Send + Sync + use<> {
        let counter = self.clone();
        move || counter.hit()
    }

    /// Current count.
    #[must_use]
    pub fn get(&self) -> usize {
        self.count.load(Ordering::SeqCst)
    }
}
