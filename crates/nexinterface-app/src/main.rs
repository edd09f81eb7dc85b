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
    clippy::cargo,
    clippy::nursery,
    rustdoc::broken_intra_doc_links,
    rustdoc::bare_urls,
    missing_docs
)]

//! Binary entrypoint that wires the Nexinterface stores and controllers
//! together and drives a scripted navigation session.

use nexinterface_app::{AppResult, run_app};

/// Bootstraps the host and returns once the session completes.
#[tokio::main]
async fn main() -> AppResult<()> {
    run_app().await
}
