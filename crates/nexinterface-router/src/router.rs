//! Router: first-match-wins selection over a live list of candidates.
//!
//! # Design
//! - Candidates are matched in declaration order; the first match wins.
//! - Matching reruns on every navigation event and whenever the candidate
//!   list changes.
//! - When nothing matches, the previous selection and parameters persist.

use std::fmt;
use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex, MutexGuard};

use nexinterface_state::{RemovalSignal, Store, SubscribeOptions, Subscription};
use tracing::debug;

use crate::error::RouterResult;
use crate::navigation::NavigationPort;
use crate::params::{LocationParams, ParamsSlot};
use crate::pattern::RoutePattern;

/// Deferred module produced by a route source.
pub type LoadFuture<M> = Pin<Box<dyn Future<Output = M> + Send>>;

/// Zero-argument loader invoked lazily once a route is selected.
pub type RouteSource<M> = Arc<dyn Fn() -> LoadFuture<M> + Send + Sync>;

/// Declared `(pattern, component, loader)` tuple.
pub struct RouteCandidate<M> {
    pattern: RoutePattern,
    component: String,
    src: RouteSource<M>,
}

impl<M> RouteCandidate<M> {
    /// Compile `path` and bind it to a component and its loader.
    ///
    /// # Errors
    ///
    /// Returns [`crate::RouterError::InvalidPattern`] when `path` does not compile.
    pub fn new(
        path: &str,
        loose: bool,
        component: impl Into<String>,
        src: RouteSource<M>,
    ) -> RouterResult<Self> {
        Ok(Self {
            pattern: RoutePattern::compile(path, loose)?,
            component: component.into(),
            src,
        })
    }

    /// Declared pattern string.
    #[must_use]
    pub fn path(&self) -> &str {
        self.pattern.raw()
    }

    /// Whether the candidate matches on prefix boundaries.
    #[must_use]
    pub const fn loose(&self) -> bool {
        self.pattern.is_loose()
    }

    /// Component identifier.
    #[must_use]
    pub fn component(&self) -> &str {
        &self.component
    }

    /// Compiled pattern.
    #[must_use]
    pub const fn pattern(&self) -> &RoutePattern {
        &self.pattern
    }
}

impl<M> Clone for RouteCandidate<M> {
    fn clone(&self) -> Self {
        Self {
            pattern: self.pattern.clone(),
            component: self.component.clone(),
            src: Arc::clone(&self.src),
        }
    }
}

impl<M> fmt::Debug for RouteCandidate<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RouteCandidate")
            .field("path", &self.path())
            .field("loose", &self.loose())
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

/// Component and loader published after a successful match.
pub struct RouteSelection<M> {
    /// Pattern of the candidate that matched.
    pub path: String,
    /// Component identifier.
    pub component: String,
    /// Loader for the component's module.
    pub src: RouteSource<M>,
}

impl<M> RouteSelection<M> {
    /// Invoke the loader.
    #[must_use]
    pub fn load(&self) -> LoadFuture<M> {
        (self.src)()
    }

    /// Returns `true` when both selections carry the same component and loader.
    #[must_use]
    pub fn same_target(&self, other: &Self) -> bool {
        self.component == other.component && Arc::ptr_eq(&self.src, &other.src)
    }
}

impl<M> Clone for RouteSelection<M> {
    fn clone(&self) -> Self {
        Self {
            path: self.path.clone(),
            component: self.component.clone(),
            src: Arc::clone(&self.src),
        }
    }
}

impl<M> fmt::Debug for RouteSelection<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("RouteSelection")
            .field("path", &self.path)
            .field("component", &self.component)
            .finish_non_exhaustive()
    }
}

/// Router bound to a navigation port.
pub struct Router<M> {
    port: Arc<NavigationPort>,
    routes: Mutex<Vec<RouteCandidate<M>>>,
    params: ParamsSlot,
    selection: Store<Option<RouteSelection<M>>>,
}

impl<M> Router<M>
where
    M: Send + 'static,
{
    /// Construct a router with no candidates.
    #[must_use]
    pub fn new(port: Arc<NavigationPort>, params: ParamsSlot) -> Arc<Self> {
        Arc::new(Self {
            port,
            routes: Mutex::new(Vec::new()),
            params,
            selection: Store::new(None),
        })
    }

    /// Start listening for navigation events and compute the initial match.
    ///
    /// Listening stops when `signal` fires.
    pub fn mount(self: &Arc<Self>, signal: &RemovalSignal) -> Subscription {
        let router = Arc::downgrade(self);
        let subscription = self.port.listen(Some(signal), move |_event| {
            if let Some(router) = router.upgrade() {
                router.compute_matching();
            }
        });
        self.compute_matching();
        subscription
    }

    /// Replace every candidate and recompute.
    pub fn set_routes(&self, routes: Vec<RouteCandidate<M>>) {
        *self.lock_routes() = routes;
        self.compute_matching();
    }

    /// Append a candidate and recompute.
    pub fn add_route(&self, route: RouteCandidate<M>) {
        self.lock_routes().push(route);
        self.compute_matching();
    }

    /// Remove the first candidate declared with `path` and recompute.
    ///
    /// Returns `false` when no candidate has that pattern.
    pub fn remove_route(&self, path: &str) -> bool {
        let removed = {
            let mut routes = self.lock_routes();
            routes
                .iter()
                .position(|route| route.path() == path)
                .map(|index| routes.remove(index))
                .is_some()
        };
        if removed {
            self.compute_matching();
        }
        removed
    }

    /// Snapshot of the candidate list in declaration order.
    #[must_use]
    pub fn routes(&self) -> Vec<RouteCandidate<M>> {
        self.lock_routes().clone()
    }

    /// Match the current location against the candidates.
    ///
    /// On a match, publishes the parameters to the shared slot and the
    /// selection to observers, and returns the selection.
    pub fn compute_matching(&self) -> Option<RouteSelection<M>> {
        let pathname = self.port.pathname();
        let matched = self
            .lock_routes()
            .iter()
            .find(|route| route.pattern.is_match(&pathname))
            .cloned();

        let Some(route) = matched else {
            debug!(%pathname, "no route matched; keeping previous selection");
            return None;
        };

        let params = route.pattern.params(&pathname);
        debug!(%pathname, route = route.path(), component = route.component(), %params, "route matched");
        self.params.replace(params);

        let selection = RouteSelection {
            path: route.path().to_string(),
            component: route.component,
            src: route.src,
        };
        let published = selection.clone();
        self.selection.set_state(|current| *current = Some(published));
        Some(selection)
    }

    /// Most recent selection.
    #[must_use]
    pub fn current(&self) -> Option<RouteSelection<M>> {
        self.selection.get()
    }

    /// Observe every published selection.
    pub fn subscribe<F>(&self, options: SubscribeOptions, observer: F) -> Subscription
    where
        F: Fn(&Option<RouteSelection<M>>) + Send + Sync + 'static,
    {
        self.selection.subscribe(options, observer)
    }

    /// Shared parameters slot.
    #[must_use]
    pub const fn params(&self) -> &ParamsSlot {
        &self.params
    }

    /// Parameters published by the latest match.
    #[must_use]
    pub fn location_params(&self) -> LocationParams {
        self.params.get()
    }

    /// Navigation port the router listens to.
    #[must_use]
    pub const fn port(&self) -> &Arc<NavigationPort> {
        &self.port
    }

    fn lock_routes(&self) -> MutexGuard<'_, Vec<RouteCandidate<M>>> {
        self.routes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl<M> fmt::Debug for Router<M> {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        let routes = self
            .routes
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
            .len();
        formatter
            .debug_struct("Router")
            .field("routes", &routes)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}
