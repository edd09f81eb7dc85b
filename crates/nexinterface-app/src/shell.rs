//! Application shell: one removal signal owning every store subscription,
//! navigation listener and controller timer.

use std::sync::Arc;

use nexinterface_router::{LoadFuture, NavigationPort, ParamsSlot, RouteCandidate, RouteSource, Router};
use nexinterface_state::{FlagStore, RemovalSignal, Store};
use nexinterface_widgets::{
    DialogHost, DialogQueue, DrawerController, MenuController, PresentationConfig, RouteOutlet,
    SnackbarHost, SnackbarQueue,
};
use tracing::{debug, warn};

use crate::error::{AppError, AppResult};

/// Module produced by a page loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    /// Component identifier the page was loaded for.
    pub component: String,
    /// Human-readable title.
    pub title: String,
}

/// Static route declaration compiled into a [`RouteCandidate`].
#[derive(Debug, Clone, Copy)]
pub struct RouteDecl {
    /// Path pattern.
    pub path: &'static str,
    /// Prefix matching.
    pub loose: bool,
    /// Component identifier.
    pub component: &'static str,
    /// Page title produced by the loader.
    pub title: &'static str,
}

/// Labels shown in the bottom-sheet menu.
pub type MenuBody = Vec<String>;

/// Route table used by the binary.
pub const DEFAULT_ROUTES: &[RouteDecl] = &[
    RouteDecl {
        path: "/",
        loose: false,
        component: "home-page",
        title: "Home",
    },
    RouteDecl {
        path: "/users/:id?",
        loose: false,
        component: "user-page",
        title: "Users",
    },
    RouteDecl {
        path: "/files/*",
        loose: false,
        component: "file-browser",
        title: "Files",
    },
    RouteDecl {
        path: "/admin",
        loose: true,
        component: "admin-console",
        title: "Admin",
    },
];

/// Everything a page host needs, mounted under one removal signal.
pub struct Shell {
    /// Navigation port shared by the router and controllers.
    pub port: Arc<NavigationPort>,
    /// Router over the compiled route table.
    pub router: Arc<Router<Page>>,
    /// Pending dialogs.
    pub dialogs: DialogQueue,
    /// Dialog presenter.
    pub dialog_host: DialogHost,
    /// Pending snackbars.
    pub snackbars: SnackbarQueue,
    /// Snackbar presenter.
    pub snackbar_host: SnackbarHost,
    /// Navigation drawer.
    pub drawer: DrawerController,
    /// Shared menu body; `None` hides the menu.
    pub menu_body: Store<Option<MenuBody>>,
    /// Bottom-sheet menu.
    pub menu: MenuController<MenuBody>,
    /// Lazy page outlet.
    pub outlet: RouteOutlet<Page>,
    signal: RemovalSignal,
}

impl Shell {
    /// Compile `routes` and mount every controller on `port`.
    ///
    /// Declarations whose pattern does not compile are logged and skipped.
    ///
    /// # Errors
    ///
    /// Returns [`AppError::NoRoutes`] when no declaration compiles and
    /// [`AppError::Widget`] when called outside a Tokio runtime.
    pub fn mount(
        config: &PresentationConfig,
        port: Arc<NavigationPort>,
        routes: &[RouteDecl],
    ) -> AppResult<Self> {
        let candidates = compile_routes(routes);
        if candidates.is_empty() {
            return Err(AppError::NoRoutes {
                rejected: routes.len(),
            });
        }

        let signal = RemovalSignal::new();
        let router = Router::new(Arc::clone(&port), ParamsSlot::new());
        router.set_routes(candidates);
        router.mount(&signal);

        let dialogs = DialogQueue::new();
        let dialog_host =
            DialogHost::mount(&dialogs, config.dialog_options(), Some(&port), &signal)
                .map_err(|err| AppError::widget("dialog_host.mount", err))?;
        let snackbars = SnackbarQueue::new();
        let snackbar_host =
            SnackbarHost::mount(&snackbars, config.snackbar_options(), Some(&port), &signal)
                .map_err(|err| AppError::widget("snackbar_host.mount", err))?;
        let drawer = DrawerController::mount(&FlagStore::new(), Some(&port), &signal);
        let menu_body = Store::new(None);
        let menu = MenuController::mount(&menu_body, config.exit_delay(), Some(&port), &signal)
            .map_err(|err| AppError::widget("menu.mount", err))?;
        let outlet = RouteOutlet::mount(&router, &signal)
            .map_err(|err| AppError::widget("outlet.mount", err))?;

        Ok(Self {
            port,
            router,
            dialogs,
            dialog_host,
            snackbars,
            snackbar_host,
            drawer,
            menu_body,
            menu,
            outlet,
            signal,
        })
    }

    /// Fire the removal signal: every listener detaches and every timer stops.
    pub fn teardown(&self) {
        self.signal.fire();
    }

    /// Returns `true` once [`Shell::teardown`] ran.
    #[must_use]
    pub fn is_torn_down(&self) -> bool {
        self.signal.is_fired()
    }
}

fn compile_routes(routes: &[RouteDecl]) -> Vec<RouteCandidate<Page>> {
    routes
        .iter()
        .filter_map(|decl| {
            match RouteCandidate::new(decl.path, decl.loose, decl.component, page_source(decl)) {
                Ok(candidate) => Some(candidate),
                Err(err) => {
                    warn!(pattern = err.pattern(), error = %err, "skipping route declaration");
                    None
                }
            }
        })
        .collect()
}

fn page_source(decl: &RouteDecl) -> RouteSource<Page> {
    let component = decl.component;
    let title = decl.title;
    Arc::new(move || -> LoadFuture<Page> {
        debug!(component, "page loader invoked");
        Box::pin(async move {
            Page {
                component: component.to_string(),
                title: title.to_string(),
            }
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexinterface_router::MemoryHistory;

    #[test]
    fn invalid_declarations_are_skipped() {
        let routes = [
            RouteDecl {
                path: "/broken(",
                loose: false,
                component: "broken",
                title: "Broken",
            },
            DEFAULT_ROUTES[0],
        ];
        let compiled = compile_routes(&routes);
        assert_eq!(compiled.len(), 1);
        assert_eq!(compiled[0].component(), "home-page");
    }

    #[tokio::test]
    async fn mount_rejects_empty_route_table() {
        let port = Arc::new(NavigationPort::new(MemoryHistory::new("/")));
        let result = Shell::mount(&PresentationConfig::default(), port, &[]);
        assert!(matches!(result, Err(AppError::NoRoutes { rejected: 0 })));
    }

    #[tokio::test]
    async fn teardown_detaches_navigation_listeners() {
        let port = Arc::new(NavigationPort::new(MemoryHistory::new("/")));
        let shell = Shell::mount(&PresentationConfig::default(), Arc::clone(&port), DEFAULT_ROUTES)
            .expect("shell mounts");
        assert!(port.listener_count() > 0);

        shell.teardown();
        assert!(shell.is_torn_down());
        assert_eq!(port.listener_count(), 0);
        assert_eq!(shell.menu_body.subscriber_count(), 0);
    }

    #[tokio::test]
    async fn navigation_closes_menu() {
        let port = Arc::new(NavigationPort::new(MemoryHistory::new("/")));
        let shell = Shell::mount(&PresentationConfig::default(), Arc::clone(&port), DEFAULT_ROUTES)
            .expect("shell mounts");
        shell.menu.show(vec!["Rename".to_string()]);
        assert!(shell.menu.is_active());

        port.push_state("/users/7");
        assert!(!shell.menu.is_active());
        assert_eq!(shell.menu_body.get(), None);
        shell.teardown();
    }
}
