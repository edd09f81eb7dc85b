//! Navigation port: history interception with synchronous change events.
//!
//! # Design
//! - Programmatic navigation goes through [`NavigationPort`], which forwards
//!   to the wrapped [`HistoryApi`] and then emits exactly one
//!   [`NavigationEvent`] before returning.
//! - Traversal (`back`/`forward`/`go`) emits `Pop`, mirroring the native
//!   pop-navigation event.
//! - A single process-wide port can be installed with [`install_global`];
//!   later installs return the port that is already in place.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use nexinterface_state::{Observer, RemovalSignal, Subscribers, Subscription};
use once_cell::sync::OnceCell;
use tracing::debug;

static GLOBAL_PORT: OnceCell<Arc<NavigationPort>> = OnceCell::new();

/// Kind of navigation that changed the location.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavigationKind {
    /// `push_state` was called.
    Push,
    /// `replace_state` was called.
    Replace,
    /// History traversal (back/forward/go).
    Pop,
}

impl NavigationKind {
    /// Event name as broadcast by browser hosts.
    #[must_use]
    pub const fn event_name(self) -> &'static str {
        match self {
            Self::Push => "pushstate",
            Self::Replace => "replacestate",
            Self::Pop => "popstate",
        }
    }
}

/// Location change notification.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavigationEvent {
    /// What triggered the change.
    pub kind: NavigationKind,
    /// Location path after the change.
    pub pathname: String,
}

/// Underlying history primitive wrapped by the port.
pub trait HistoryApi: Send {
    /// Append a new entry, discarding any forward entries.
    fn push_state(&mut self, url: &str);
    /// Overwrite the current entry.
    fn replace_state(&mut self, url: &str);
    /// Move `delta` entries through the history. Returns `false` when out of range.
    fn go(&mut self, delta: isize) -> bool;
    /// Path component of the current entry.
    fn pathname(&self) -> String;
}

/// In-memory history stack for hosts without a browser.
#[derive(Clone, Debug)]
pub struct MemoryHistory {
    entries: Vec<String>,
    index: usize,
}

impl MemoryHistory {
    /// Start a history whose single entry is `initial`.
    #[must_use]
    pub fn new(initial: &str) -> Self {
        Self {
            entries: vec![resolve_path("/", initial)],
            index: 0,
        }
    }

    /// Number of entries in the stack.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Always `false`; a history holds at least its initial entry.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn current(&self) -> &str {
        &self.entries[self.index]
    }
}

impl Default for MemoryHistory {
    fn default() -> Self {
        Self::new("/")
    }
}

impl HistoryApi for MemoryHistory {
    fn push_state(&mut self, url: &str) {
        let next = resolve_path(self.current(), url);
        self.entries.truncate(self.index + 1);
        self.entries.push(next);
        self.index = self.entries.len() - 1;
    }

    fn replace_state(&mut self, url: &str) {
        let next = resolve_path(self.current(), url);
        self.entries[self.index] = next;
    }

    fn go(&mut self, delta: isize) -> bool {
        match self.index.checked_add_signed(delta) {
            Some(target) if target < self.entries.len() && delta != 0 => {
                self.index = target;
                true
            }
            _ => false,
        }
    }

    fn pathname(&self) -> String {
        self.current().to_string()
    }
}

/// Resolve `url` against `base`, keeping only the path component.
fn resolve_path(base: &str, url: &str) -> String {
    let path = url
        .split(['?', '#'])
        .next()
        .unwrap_or_default();
    if path.is_empty() {
        return base.to_string();
    }
    if path.starts_with('/') {
        return path.to_string();
    }
    let directory = base.rfind('/').map_or("", |index| &base[..=index]);
    if directory.is_empty() {
        format!("/{path}")
    } else {
        format!("{directory}{path}")
    }
}

/// Navigation primitive that broadcasts every location change.
pub struct NavigationPort {
    history: Mutex<Box<dyn HistoryApi>>,
    listeners: Subscribers<NavigationEvent>,
}

impl NavigationPort {
    /// Wrap a history implementation.
    #[must_use]
    pub fn new(history: impl HistoryApi + 'static) -> Self {
        Self {
            history: Mutex::new(Box::new(history)),
            listeners: Subscribers::new(),
        }
    }

    /// Push a new entry and emit a `Push` event.
    pub fn push_state(&self, url: &str) {
        let pathname = {
            let mut history = self.lock();
            history.push_state(url);
            history.pathname()
        };
        self.emit(NavigationKind::Push, pathname);
    }

    /// Replace the current entry and emit a `Replace` event.
    pub fn replace_state(&self, url: &str) {
        let pathname = {
            let mut history = self.lock();
            history.replace_state(url);
            history.pathname()
        };
        self.emit(NavigationKind::Replace, pathname);
    }

    /// Traverse the history; emits `Pop` only when the position changed.
    pub fn go(&self, delta: isize) -> bool {
        let moved = {
            let mut history = self.lock();
            history.go(delta).then(|| history.pathname())
        };
        match moved {
            Some(pathname) => {
                self.emit(NavigationKind::Pop, pathname);
                true
            }
            None => false,
        }
    }

    /// Shorthand for `go(-1)`.
    pub fn back(&self) -> bool {
        self.go(-1)
    }

    /// Shorthand for `go(1)`.
    pub fn forward(&self) -> bool {
        self.go(1)
    }

    /// Current location path.
    #[must_use]
    pub fn pathname(&self) -> String {
        self.lock().pathname()
    }

    /// Listen for navigation events until `signal` fires or the handle is cancelled.
    pub fn listen<F>(&self, signal: Option<&RemovalSignal>, listener: F) -> Subscription
    where
        F: Fn(&NavigationEvent) + Send + Sync + 'static,
    {
        let listener: Observer<NavigationEvent> = Arc::new(listener);
        self.listeners.register(listener, signal)
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    fn emit(&self, kind: NavigationKind, pathname: String) {
        debug!(event = kind.event_name(), %pathname, "navigation");
        self.listeners.notify(&NavigationEvent { kind, pathname });
    }

    fn lock(&self) -> MutexGuard<'_, Box<dyn HistoryApi>> {
        self.history
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Default for NavigationPort {
    fn default() -> Self {
        Self::new(MemoryHistory::default())
    }
}

impl fmt::Debug for NavigationPort {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("NavigationPort")
            .field("pathname", &self.pathname())
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

/// Install `port` as the process-wide navigation port.
///
/// Only the first call installs; later calls drop their argument and return
/// the port already in place, so interception is never applied twice.
pub fn install_global(port: NavigationPort) -> Arc<NavigationPort> {
    let mut installed = false;
    let global = GLOBAL_PORT.get_or_init(|| {
        installed = true;
        Arc::new(port)
    });
    if !installed {
        debug!("navigation port already installed; reusing existing port");
    }
    Arc::clone(global)
}

/// Process-wide navigation port, if one was installed.
#[must_use]
pub fn global_port() -> Option<Arc<NavigationPort>> {
    GLOBAL_PORT.get().cloned()
}
