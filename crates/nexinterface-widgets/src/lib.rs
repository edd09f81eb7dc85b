#![forbid(unsafe_code)]
#![deny(
    warnings,
    dead_code,
    unused,
    unused_imports,
    unused_must_use,
    unreachable_pub,
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Widget-side controllers driven by the shared stores and the router.
//!
//! Layout: `config.rs` (presentation timings), `error.rs` (config + widget
//! errors), `action.rs` (action buttons and the `Presentable` contract),
//! `presenter.rs` (queue presenter state machine), `dialog.rs` and
//! `snackbar.rs` (request payloads + per-kind options), `drawer.rs`
//! (drawer flag controller), `menu.rs` (bottom-sheet menu over a shared
//! body store), `debounce.rs` (trailing-edge debouncer), `outlet.rs` (lazy
//! route outlet).

pub mod action;
pub mod config;
pub mod debounce;
pub mod dialog;
pub mod drawer;
pub mod error;
pub mod menu;
pub mod outlet;
pub mod presenter;
pub mod snackbar;

pub use action::{ActionButton, Presentable};
pub use config::PresentationConfig;
pub use debounce::Debouncer;
pub use dialog::{DialogHost, DialogQueue, DialogRequest};
pub use drawer::DrawerController;
pub use error::{ConfigError, ConfigResult, WidgetError, WidgetResult};
pub use menu::{MenuController, MenuView};
pub use outlet::{OutletState, RouteOutlet};
pub use presenter::{PresenterOptions, PresenterPhase, PresenterView, QueuePresenter};
pub use snackbar::{SnackbarHost, SnackbarQueue, SnackbarRequest};
