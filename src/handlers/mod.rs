//! # Event handlers for the topicbus runtime.
//!
//! This module provides the [`Handle`] trait — the extension point for
//! reacting to events on a topic — and a closure-backed implementation
//! [`HandlerFn`] for the common case.
//!
//! ## Event flow
//! ```text
//! emit(topic, payload) ──► queue ──► dispatch loop ──► snapshot(topic)
//!                                                          │
//!                                       ┌──────────────────┼──────────────┐
//!                                       ▼                  ▼              ▼
//!                                handler task 1     handler task 2  ... task N
//!                                       │                  │              │
//!                                 on_event(ctx, payload)  (one task per handler,
//!                                                          tracked for drain)
//! ```
//!
//! Handlers run as independent tasks and must assume true parallel execution
//! with other handlers and with the dispatch of later events. The
//! `CancellationToken` passed to [`Handle::on_event`] is the bus-wide
//! shutdown signal; long-running handlers should observe it cooperatively.

mod handle;
mod handler_fn;

pub use handle::{Handle, HandlerRef};
pub use handler_fn::HandlerFn;

#[cfg(feature = "logging")]
mod log;
#[cfg(feature = "logging")]
pub use log::LogHandler;
