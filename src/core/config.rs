//! # Bus configuration.
//!
//! Provides [`BusConfig`], the settings applied at [`Bus::new`](crate::Bus::new).
//!
//! ## Sentinel values
//! - `capacity = 0` → clamped to 1 by the bus (the queue always holds at
//!   least one pending event).

/// Default capacity of the pending-event queue.
pub const DEFAULT_CAPACITY: usize = 128;

/// Configuration for a [`Bus`](crate::Bus) instance.
///
/// ## Field semantics
/// - `capacity`: maximum number of pending events between producers and the
///   dispatch loop. When full, further `emit` calls drop their event rather
///   than block (backpressure-via-drop).
#[derive(Clone, Debug)]
pub struct BusConfig {
    /// Capacity of the bounded event queue (min 1; clamped by the bus).
    pub capacity: usize,
}

impl Default for BusConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_CAPACITY,
        }
    }
}
