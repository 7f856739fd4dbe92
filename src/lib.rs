//! # topicbus
//!
//! **Topicbus** is an in-process, topic-based event bus for Rust.
//!
//! Independent components emit named events; zero or more registered
//! handlers are invoked asynchronously, each in its own task. Producers are
//! never blocked (bounded queue, drop-on-full backpressure), subscriptions
//! can change concurrently at any time, and shutdown drains all in-flight
//! handler work before returning.
//!
//! ## Architecture
//! ```text
//!   producer A   producer B   producer N          subscribe("topic", handler)
//!       │            │            │                          │
//!       └── emit ────┴── emit ────┘                          ▼
//!                    │                               ┌──────────────┐
//!                    ▼                               │   Registry   │
//!        ┌───────────────────────┐    snapshot       │ topic → subs │
//!        │  bounded event queue  │  ┌───────────────►└──────────────┘
//!        │ (try_send, drop-full) │  │
//!        └──────────┬────────────┘  │
//!                   ▼               │
//!        ┌───────────────────────┐  │
//!        │     dispatch loop     │──┘
//!        │  (FIFO, one per bus)  │──► spawn handler task (×N per event)
//!        └──────────┬────────────┘              │
//!                   │                           ▼
//!                   │              on_event(cancellation, payload)
//!                   ▼                           │
//!        ┌───────────────────────┐              │
//!        │     stop(): cancel,   │◄─────────────┘
//!        │  close, join drain    │   (TaskTracker joins loop + handlers)
//!        └───────────────────────┘
//! ```
//!
//! ## Guarantees
//! - `emit` never blocks and never fails: a full queue or a stopped bus
//!   drops the event (logged via `tracing`, invisible to the producer).
//! - Dispatch *initiation* follows queue FIFO order; handler tasks run
//!   concurrently, so completion order across handlers is unspecified.
//! - A handler unsubscribed before an event's dispatch snapshot never sees
//!   that event; snapshots are consistent point-in-time copies.
//! - Handler panics and errors are isolated per invocation.
//! - `stop()` is idempotent and returns only after the dispatch loop has
//!   exited and every in-flight handler invocation has completed.
//!
//! ## Non-guarantees
//! No cross-process delivery, no persistence or replay, no ordering across
//! topics at the handler level, no acknowledgements, no wildcard topics.
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogHandler`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use topicbus::{Bus, BusConfig, HandlerError, HandlerFn, HandlerRef, Payload};
//!
//! struct UserCreated {
//!     id: u64,
//! }
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() {
//!     let bus = Bus::new(BusConfig::default());
//!
//!     let greeter: HandlerRef = HandlerFn::arc("greeter", |_ctx: CancellationToken, payload: Payload| async move {
//!         if let Ok(user) = payload.downcast::<UserCreated>() {
//!             println!("welcome, user {}", user.id);
//!         }
//!         Ok::<_, HandlerError>(())
//!     });
//!
//!     let sub = bus.subscribe("user.created", greeter);
//!     bus.emit("user.created", UserCreated { id: 42 });
//!
//!     tokio::time::sleep(Duration::from_millis(50)).await;
//!
//!     bus.unsubscribe(&sub);
//!     bus.stop().await;
//! }
//! ```

mod core;
mod error;
mod events;
mod handlers;

// ---- Public re-exports ----

pub use core::{Bus, BusConfig, Subscription, DEFAULT_CAPACITY};
pub use error::HandlerError;
pub use events::{Event, Payload};
pub use handlers::{Handle, HandlerFn, HandlerRef};

// Optional: expose a simple built-in logging handler (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use handlers::LogHandler;
