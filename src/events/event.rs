//! # Transient (topic, payload) pair carried by the bus queue.
//!
//! The payload is deliberately opaque: the bus routes on the topic string
//! only and never inspects the value. Handlers downcast to the concrete
//! type they expect.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use topicbus::Payload;
//!
//! let payload: Payload = Arc::new(42u64);
//! assert_eq!(payload.downcast::<u64>().ok().as_deref(), Some(&42));
//! ```

use std::any::Any;
use std::fmt;
use std::sync::Arc;

/// Opaque event value shared between the emitter and every handler
/// invocation for that event.
///
/// Cloning is an `Arc` bump; the underlying value is never copied.
pub type Payload = Arc<dyn Any + Send + Sync>;

/// One pending delivery: the topic it was emitted on and its payload.
///
/// Consumed exactly once by the dispatch loop; the payload `Arc` is then
/// cloned per handler in the snapshot.
#[derive(Clone)]
pub struct Event {
    /// Topic the event was emitted on (exact-match routing key).
    pub topic: Arc<str>,
    /// Opaque value supplied by the emitter.
    pub payload: Payload,
}

impl Event {
    pub(crate) fn new(topic: Arc<str>, payload: Payload) -> Self {
        Self { topic, payload }
    }
}

impl fmt::Debug for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Payload is `dyn Any`; only the topic is printable.
        f.debug_struct("Event")
            .field("topic", &self.topic)
            .finish_non_exhaustive()
    }
}
