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

//! Shared test helpers used across unit and integration suites.
//! Layout: recorder.rs (observer capture), fixtures.rs (logging setup).

pub mod fixtures;
pub mod recorder;

pub use fixtures::init_test_logging;
pub use recorder::{Counter, Recorder};
