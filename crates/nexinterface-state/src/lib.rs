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

//! Observable state shared between Nexinterface widgets.
//!
//! Layout: `signal.rs` (removal signal bound to a widget's lifetime),
//! `subscribers.rs` (observer registry + subscription handles), `store.rs`
//! (generic `Store<S>`), `queue.rs` (FIFO presentation queue), `flag.rs`
//! (boolean activation store).

pub mod flag;
pub mod queue;
pub mod signal;
pub mod store;
pub mod subscribers;

pub use flag::FlagStore;
pub use queue::{EntryId, QueueEntry, QueueSnapshot, QueueStore};
pub use signal::{HookId, RemovalSignal};
pub use store::Store;
pub use subscribers::{Observer, SubscribeOptions, Subscribers, Subscription};
