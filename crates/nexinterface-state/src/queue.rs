//! FIFO presentation queue shared by dialog and snackbar hosts.
//!
//! # Design
//! - Insertion order is display order; only the head is ever presented.
//! - Each push gets a fresh [`EntryId`] so hosts can tell a new occupant of
//!   the head apart from a re-render of the same one.
//! - Every push and shift (including a shift on an empty queue) emits exactly
//!   one notification carrying the new snapshot.

use std::collections::VecDeque;
use std::fmt;
use std::sync::Arc;

use tracing::debug;
use uuid::Uuid;

use crate::store::Store;
use crate::subscribers::{SubscribeOptions, Subscription};

/// Identity token assigned to every queued entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct EntryId(Uuid);

impl EntryId {
    fn generate() -> Self {
        Self(Uuid::new_v4())
    }

    /// Underlying UUID value.
    #[must_use]
    pub const fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl fmt::Display for EntryId {
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(formatter)
    }
}

/// Queued presentation request.
#[derive(Debug)]
pub struct QueueEntry<P> {
    /// Identity token unique to this push.
    pub id: EntryId,
    /// Caller-supplied description.
    pub payload: P,
}

/// Immutable view of the queue delivered to observers.
pub type QueueSnapshot<P> = VecDeque<Arc<QueueEntry<P>>>;

/// Observable FIFO of presentation requests.
pub struct QueueStore<P> {
    store: Store<QueueSnapshot<P>>,
}

impl<P> QueueStore<P>
where
    P: Send + Sync + 'static,
{
    /// Construct an empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self {
            store: Store::new(VecDeque::new()),
        }
    }

    /// Append a request and return the identity token assigned to it.
    pub fn push(&self, payload: P) -> EntryId {
        let entry = Arc::new(QueueEntry {
            id: EntryId::generate(),
            payload,
        });
        let id = entry.id;
        let queue_len = self.store.set_state(|queue| {
            queue.push_back(entry);
            queue.len()
        });
        debug!(entry_id = %id, queue_len, "queue entry pushed");
        id
    }

    /// Remove the head entry, if any. Shifting an empty queue still notifies.
    pub fn shift(&self) -> Option<Arc<QueueEntry<P>>> {
        let (removed, queue_len) = self.store.set_state(|queue| {
            let removed = queue.pop_front();
            (removed, queue.len())
        });
        match &removed {
            Some(entry) => debug!(entry_id = %entry.id, queue_len, "queue entry shifted"),
            None => debug!("shift on empty queue"),
        }
        removed
    }

    /// Current head-of-queue, if any.
    #[must_use]
    pub fn head(&self) -> Option<Arc<QueueEntry<P>>> {
        self.store.read(|queue| queue.front().cloned())
    }

    /// Identity token of the head entry, if any.
    #[must_use]
    pub fn head_id(&self) -> Option<EntryId> {
        self.store.read(|queue| queue.front().map(|entry| entry.id))
    }

    /// Clone the current ordered sequence.
    #[must_use]
    pub fn snapshot(&self) -> QueueSnapshot<P> {
        self.store.get()
    }

    /// Number of queued entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.store.read(VecDeque::len)
    }

    /// Returns `true` when nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Observe every mutation of the queue.
    pub fn subscribe<F>(&self, options: SubscribeOptions, observer: F) -> Subscription
    where
        F: Fn(&QueueSnapshot<P>) + Send + Sync + 'static,
    {
        self.store.subscribe(options, observer)
    }

    /// Number of live observers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.store.subscriber_count()
    }
}

impl<P> Default for QueueStore<P>
where
    P: Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

impl<P> Clone for QueueStore<P> {
    fn clone(&self) -> Self {
        Self {
            store: self.store.clone(),
        }
    }
}

impl<P> fmt::Debug for QueueStore<P>
where
    P: Send + Sync + 'static,
{
    fn fmt(&self, formatter: &mut fmt::Formatter<'_>) -> fmt::Result {
        formatter
            .debug_struct("QueueStore")
            .field("len", &self.len())
            .field("head", &self.head_id())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nexinterface_test_support::Recorder;

    fn ids(snapshot: &QueueSnapshot<&'static str>) -> Vec<&'static str> {
        snapshot.iter().map(|entry| entry.payload).collect()
    }

    #[test]
    fn push_appends_and_notifies_with_snapshot() {
        let queue = QueueStore::new();
        let recorder = Recorder::new();
        let _subscription = queue.subscribe(SubscribeOptions::default(), recorder.observer(ids));

        queue.push("first");
        queue.push("second");

        assert_eq!(
            recorder.events(),
            vec![vec!["first"], vec!["first", "second"]]
        );
        assert_eq!(queue.head().map(|entry| entry.payload), Some("first"));
    }

    #[test]
    fn shift_removes_head_in_push_order() {
        let queue = QueueStore::new();
        let first = queue.push("a");
        let second = queue.push("b");

        assert_eq!(queue.shift().map(|entry| entry.id), Some(first));
        assert_eq!(queue.head_id(), Some(second));
        assert_eq!(queue.shift().map(|entry| entry.id), Some(second));
        assert!(queue.is_empty());
    }

    #[test]
    fn shift_on_empty_notifies_once_with_empty_snapshot() {
        let queue: QueueStore<&'static str> = QueueStore::new();
        let recorder = Recorder::new();
        let _subscription = queue.subscribe(SubscribeOptions::default(), recorder.observer(ids));

        assert!(queue.shift().is_none());

        assert_eq!(recorder.events(), vec![Vec::<&str>::new()]);
        assert!(queue.is_empty());
    }

    #[test]
    fn identical_payloads_get_distinct_ids() {
        let queue = QueueStore::new();
        let first = queue.push("same");
        let second = queue.push("same");
        assert_ne!(first, second);
        assert_ne!(first.to_string(), second.to_string());
        assert_eq!(first.as_uuid().get_version_num(), 4);
    }

    #[test]
    fn debug_reports_length() {
        let queue = QueueStore::new();
        queue.push(1_u8);
        assert!(format!("{queue:?}").contains("len: 1"));
    }
}
