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

//! Path router for Nexinterface hosts.
//!
//! Layout: `pattern.rs` (route-pattern compiler), `params.rs` (extracted
//! parameters + shared slot), `navigation.rs` (history interception port),
//! `router.rs` (first-match-wins selection over live candidates),
//! `error.rs` (router error types).

pub mod error;
pub mod navigation;
pub mod params;
pub mod pattern;
pub mod router;

pub use error::{RouterError, RouterResult};
pub use navigation::{
    HistoryApi, MemoryHistory, NavigationEvent, NavigationKind, NavigationPort, global_port,
    install_global,
};
pub use params::{LocationParams, ParamsSlot};
pub use pattern::{RoutePattern, WILDCARD_KEY};
pub use router::{LoadFuture, RouteCandidate, RouteSelection, RouteSource, Router};
