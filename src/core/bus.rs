//! # Bus: bounded event queue, dispatch loop, and drain-on-stop lifecycle.
//!
//! [`Bus`] is the process-wide publish/subscribe hub. Producers call
//! [`emit`](Bus::emit) (non-blocking, fire-and-forget); the dispatch loop
//! drains the queue in FIFO order and fans each event out to a snapshot of
//! the topic's handlers, one tracked task per handler invocation.
//!
//! ## Architecture
//! ```text
//! Producers (many):                         Dispatch loop (one):
//!   component A ──┐
//!   component B ──┼── emit ──► [bounded queue] ──► recv ──► snapshot(topic)
//!   component N ──┘   (try_send, drop on full)                  │
//!                                                 ┌─────────────┼────────────┐
//!                                                 ▼             ▼            ▼
//!                                           handler task  handler task ... task
//!                                                 │             │            │
//!                                                 └─────── TaskTracker ──────┘
//!                                                        (joined by stop())
//! ```
//!
//! ## Rules
//! - **Non-blocking emit**: producers are never suspended; a full queue or a
//!   stopped bus drops the event (logged, not an error).
//! - **FIFO dispatch initiation**: the loop starts dispatch for events in
//!   enqueue order; handler *completion* order is unspecified.
//! - **Fault isolation**: a panicking or failing handler is caught at the
//!   invocation boundary and counted as complete for the drain.
//! - **Stop-once**: concurrent/repeated [`stop`](Bus::stop) calls collapse to
//!   a single drain; every caller returns only after the drain finishes.

use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::atomic::{AtomicBool, Ordering as AtomicOrdering};
use std::sync::Arc;

use futures::FutureExt;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tokio_util::task::TaskTracker;

use crate::core::config::BusConfig;
use crate::core::registry::{Registry, Subscription};
use crate::error::HandlerError;
use crate::events::{Event, Payload};
use crate::handlers::HandlerRef;

/// Process-wide event bus.
///
/// Construct exactly one per process at startup and share it by cloning
/// (clones are cheap and refer to the same queue, registry, and lifecycle).
/// The bus does not support resurrection: after [`stop`](Bus::stop) it stays
/// stopped, and a restart requires a new instance.
#[derive(Clone)]
pub struct Bus {
    tx: mpsc::Sender<Event>,
    registry: Arc<Registry>,
    cancel: CancellationToken,
    tracker: TaskTracker,
    /// Set when stop() begins; emits observe it and drop.
    closed: Arc<AtomicBool>,
}

impl Bus {
    /// Creates the bus and starts its dispatch loop.
    ///
    /// Must be called within a tokio runtime (the loop is spawned here).
    /// The queue capacity comes from `cfg` (min 1; clamped).
    #[must_use]
    pub fn new(cfg: BusConfig) -> Self {
        let capacity = cfg.capacity.max(1);
        let (tx, rx) = mpsc::channel::<Event>(capacity);

        let registry = Arc::new(Registry::new());
        let cancel = CancellationToken::new();
        let tracker = TaskTracker::new();

        // The loop task is tracked too: stop()'s wait cannot resolve before
        // the loop has exited, so every handler the loop spawns is already
        // registered by the time the join can observe "empty".
        tracker.spawn(Self::dispatch(
            rx,
            Arc::clone(&registry),
            cancel.clone(),
            tracker.clone(),
        ));

        Self {
            tx,
            registry,
            cancel,
            tracker,
            closed: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Emits an event on `topic`. Fire-and-forget: never blocks, never fails.
    ///
    /// The payload is wrapped in an `Arc` and shared with every handler
    /// invocation. If the bus is stopped or the queue is full the event is
    /// silently dropped (observable via `tracing` only).
    pub fn emit<P>(&self, topic: impl Into<Arc<str>>, payload: P)
    where
        P: Any + Send + Sync,
    {
        let payload: Payload = Arc::new(payload);
        self.emit_payload(topic, payload);
    }

    /// Emits a pre-wrapped [`Payload`] on `topic`.
    ///
    /// Same contract as [`emit`](Bus::emit); useful when the value is already
    /// behind an `Arc` and re-wrapping would nest it.
    pub fn emit_payload(&self, topic: impl Into<Arc<str>>, payload: Payload) {
        let topic = topic.into();

        if self.closed.load(AtomicOrdering::SeqCst) {
            tracing::debug!(topic = %topic, "bus stopped; dropping event");
            return;
        }

        match self.tx.try_send(Event::new(topic.clone(), payload)) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(_)) => {
                tracing::warn!(topic = %topic, "event queue full; dropping event");
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                tracing::debug!(topic = %topic, "event queue closed; dropping event");
            }
        }
    }

    /// Registers `handler` on `topic`. Safe from any concurrent caller.
    ///
    /// Returns a [`Subscription`] handle used for removal. Whether a handler
    /// registered after an event was enqueued sees that event depends only on
    /// the dispatch-time snapshot, not on the enqueue instant.
    pub fn subscribe(&self, topic: impl Into<Arc<str>>, handler: HandlerRef) -> Subscription {
        self.registry.subscribe(topic.into(), handler)
    }

    /// Removes `sub` from its topic. No-op if already removed.
    ///
    /// A handler unsubscribed before the dispatch loop snapshots its topic is
    /// guaranteed not to receive later events.
    pub fn unsubscribe(&self, sub: &Subscription) {
        self.registry.unsubscribe(sub);
    }

    /// Stops the bus and drains in-flight work.
    ///
    /// The first caller cancels the shared token (visible to the loop and to
    /// every handler), closes the queue, and begins the drain; repeated or
    /// concurrent calls do not re-trigger it. Every caller returns only once
    /// the loop has exited and all handler invocations have completed, after
    /// which the registry is cleared.
    ///
    /// The bus never force-terminates handlers: one that ignores its
    /// cancellation token delays `stop()` indefinitely.
    pub async fn stop(&self) {
        if self
            .closed
            .compare_exchange(false, true, AtomicOrdering::SeqCst, AtomicOrdering::SeqCst)
            .is_ok()
        {
            self.cancel.cancel();
            self.tracker.close();
        }

        self.tracker.wait().await;
        self.registry.clear();
    }

    /// True once [`stop`](Bus::stop) has begun; subsequent emits are dropped.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.closed.load(AtomicOrdering::SeqCst)
    }

    /// Queue-draining loop: one per bus, lives until cancellation.
    async fn dispatch(
        mut rx: mpsc::Receiver<Event>,
        registry: Arc<Registry>,
        cancel: CancellationToken,
        tracker: TaskTracker,
    ) {
        loop {
            tokio::select! {
                biased;

                _ = cancel.cancelled() => break,

                ev = rx.recv() => {
                    let Some(ev) = ev else { break };

                    let handlers = registry.snapshot(&ev.topic);
                    if handlers.is_empty() {
                        continue;
                    }

                    for sub in handlers {
                        // Spawning on the tracker registers the invocation
                        // before it runs; the loop does not await it.
                        tracker.spawn(Self::invoke(sub, cancel.clone(), ev.payload.clone()));
                    }
                }
            }
        }
    }

    /// One handler invocation: fault-isolated, counted for the drain.
    async fn invoke(sub: Subscription, ctx: CancellationToken, payload: Payload) {
        let fut = sub.handler.on_event(ctx, payload);
        match AssertUnwindSafe(fut).catch_unwind().await {
            Ok(Ok(())) => {}
            Ok(Err(HandlerError::Canceled)) => {
                tracing::debug!(
                    handler = sub.handler.name(),
                    topic = %sub.topic,
                    "handler exited on cancellation"
                );
            }
            Ok(Err(err)) => {
                tracing::warn!(
                    handler = sub.handler.name(),
                    topic = %sub.topic,
                    id = sub.id,
                    label = err.as_label(),
                    error = %err,
                    "handler failed"
                );
            }
            Err(panic) => {
                tracing::warn!(
                    handler = sub.handler.name(),
                    topic = %sub.topic,
                    id = sub.id,
                    panic = %panic_message(&panic),
                    "handler panicked"
                );
            }
        }
    }
}

fn panic_message(panic: &(dyn Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&'static str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "non-string panic payload".to_string()
    }
}
