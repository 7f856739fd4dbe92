//! Core runtime: bus lifecycle, dispatch loop, and subscription registry.
//!
//! ## Wiring
//! ```text
//! emit(topic, payload)                       subscribe / unsubscribe
//!        │                                            │
//!        ▼                                            ▼
//! [bounded mpsc queue] ──► dispatch loop ──► Registry::snapshot(topic)
//!   (try_send, drop           │                       │
//!    on full/stopped)         │         one tracked task per handler
//!                             ▼                       ▼
//!                      CancellationToken ──► Handle::on_event(ctx, payload)
//!                             ▲                       │
//!                             │                       ▼
//!                          stop() ◄───────────── TaskTracker::wait
//!                     (stop-once, drains loop + handlers, clears registry)
//! ```
//!
//! ## Contents
//! - [`Bus`] — emit / subscribe / unsubscribe / stop
//! - [`BusConfig`] — queue capacity
//! - [`Subscription`] — registration handle (unique id)

mod bus;
mod config;
mod registry;

pub use bus::Bus;
pub use config::{BusConfig, DEFAULT_CAPACITY};
pub use registry::Subscription;
