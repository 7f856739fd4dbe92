//! # Subscription registry: topic → ordered handler list.
//!
//! The registry is the only structure mutated by multiple concurrent callers
//! (subscribers/unsubscribers) and read by the dispatch loop. It is guarded
//! by a reader/writer lock with short critical sections; the read path is
//! limited to [`Registry::snapshot`], which copies the current handler list
//! so the dispatch loop never iterates live state while handlers run.
//!
//! ## Rules
//! - Topic entries are created lazily on first subscribe and removed when the
//!   last subscription goes away: registry size is proportional to **active**
//!   topics only.
//! - Subscription ids come from a process-wide atomic counter and are never
//!   reused.
//! - A snapshot is a consistent point-in-time copy: a subscribe racing with
//!   an in-progress snapshot is either fully included or fully excluded,
//!   decided at the snapshot instant, not the enqueue instant.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::{Arc, PoisonError, RwLock, RwLockReadGuard, RwLockWriteGuard};
use std::time::SystemTime;

use crate::handlers::HandlerRef;

/// Process-wide counter for subscription ids (first id is 1).
static SUB_SEQ: AtomicU64 = AtomicU64::new(1);

/// Registered binding between a topic and a handler.
///
/// Returned by `Bus::subscribe`; pass it back to `Bus::unsubscribe` to
/// remove the handler. Identity is the `id` — cloning the handle does not
/// duplicate the registration.
#[derive(Clone)]
pub struct Subscription {
    /// Globally unique, monotonically increasing id (never reused).
    pub id: u64,
    /// Topic this subscription is registered on.
    pub topic: Arc<str>,
    /// Wall-clock registration time.
    pub created_at: SystemTime,

    pub(crate) handler: HandlerRef,
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("topic", &self.topic)
            .field("created_at", &self.created_at)
            .field("handler", &self.handler.name())
            .finish()
    }
}

/// Topic → handler-list mapping behind a reader/writer lock.
pub(crate) struct Registry {
    topics: RwLock<HashMap<Arc<str>, Vec<Subscription>>>,
}

impl Registry {
    pub(crate) fn new() -> Self {
        Self {
            topics: RwLock::new(HashMap::new()),
        }
    }

    /// Registers a handler on `topic`. Never fails; always returns a fresh
    /// subscription with a new unique id, appended in insertion order.
    pub(crate) fn subscribe(&self, topic: Arc<str>, handler: HandlerRef) -> Subscription {
        let sub = Subscription {
            id: SUB_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            topic: topic.clone(),
            created_at: SystemTime::now(),
            handler,
        };

        self.write().entry(topic).or_default().push(sub.clone());
        sub
    }

    /// Removes the entry matching `sub.id` from its topic's list.
    ///
    /// No-op (not an error) if the subscription was already removed or the
    /// topic is unknown. Drops the topic entry when the list becomes empty.
    pub(crate) fn unsubscribe(&self, sub: &Subscription) {
        let mut topics = self.write();
        if let Some(list) = topics.get_mut(sub.topic.as_ref()) {
            list.retain(|s| s.id != sub.id);
            if list.is_empty() {
                topics.remove(sub.topic.as_ref());
            }
        }
    }

    /// Returns an independent copy of the current handler list for `topic`.
    ///
    /// Later registry mutation never affects a snapshot already taken.
    pub(crate) fn snapshot(&self, topic: &str) -> Vec<Subscription> {
        self.read().get(topic).cloned().unwrap_or_default()
    }

    /// Drops all subscriptions. Called once after the drain completes.
    pub(crate) fn clear(&self) {
        self.write().clear();
    }

    fn read(&self) -> RwLockReadGuard<'_, HashMap<Arc<str>, Vec<Subscription>>> {
        self.topics.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> RwLockWriteGuard<'_, HashMap<Arc<str>, Vec<Subscription>>> {
        self.topics.write().unwrap_or_else(PoisonError::into_inner)
    }
}
