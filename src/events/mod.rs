//! Event data model.
//!
//! An [`Event`] is the unit that travels through the bus queue: a topic
//! string plus an opaque [`Payload`]. Events are transient — created by
//! `Bus::emit`, consumed once by the dispatch loop, never stored.

mod event;

pub use event::{Event, Payload};
