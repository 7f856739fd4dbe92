//! Error types used by event handlers.
//!
//! The bus itself exposes no fallible operations: `emit` is fire-and-forget,
//! `subscribe` always succeeds, and `stop` is idempotent. [`HandlerError`]
//! exists so handler implementations can signal failure idiomatically; the
//! bus catches it at the invocation boundary, logs it, and moves on — it is
//! never surfaced to the emitting producer.

use thiserror::Error;

/// # Errors produced by a handler invocation.
///
/// Returned from [`Handle::on_event`](crate::Handle::on_event). A failing
/// handler never affects the dispatch loop, other handlers, or the producer
/// that emitted the event.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler execution failed.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Handler observed bus cancellation and exited early.
    #[error("handler canceled")]
    Canceled,
}

impl HandlerError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use topicbus::HandlerError;
    ///
    /// let err = HandlerError::Fail { error: "boom".into() };
    /// assert_eq!(err.as_label(), "handler_failed");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Canceled => "handler_canceled",
        }
    }
}
