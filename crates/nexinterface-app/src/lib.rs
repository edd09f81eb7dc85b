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

//! Nexinterface reference host.
//!
//! Layout: `bootstrap.rs` (environment loading and boot sequence),
//! `shell.rs` (store, router and controller wiring), `session.rs` (scripted
//! navigation session), `error.rs` (application errors).

/// Application bootstrap and environment loading.
pub mod bootstrap;
/// Application-level error type.
pub mod error;
/// Scripted navigation session.
pub mod session;
/// Shell wiring for stores, router and controllers.
pub mod shell;

pub use bootstrap::run_app;
pub use error::{AppError, AppResult};
pub use session::{SessionReport, run_scripted_session};
pub use shell::{DEFAULT_ROUTES, MenuBody, Page, RouteDecl, Shell};
