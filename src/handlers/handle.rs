//! # Core handler trait.
//!
//! `Handle` is implemented by anything that wants to receive events for a
//! topic. Each invocation runs in its own task; implementations may be slow
//! (I/O, batching) without blocking the dispatch loop, other handlers, or
//! producers.
//!
//! A handler receives the bus-wide [`CancellationToken`] and should check it
//! periodically to exit promptly during shutdown — the bus waits for every
//! in-flight invocation before `stop()` returns, and never force-terminates.

use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Payload;

/// Shared handle to a handler (`Arc<dyn Handle>`).
pub type HandlerRef = Arc<dyn Handle>;

/// # Asynchronous, cancellation-aware event handler.
///
/// # Example
/// ```
/// use async_trait::async_trait;
/// use tokio_util::sync::CancellationToken;
/// use topicbus::{Handle, HandlerError, Payload};
///
/// struct Audit;
///
/// #[async_trait]
/// impl Handle for Audit {
///     async fn on_event(&self, ctx: CancellationToken, payload: Payload) -> Result<(), HandlerError> {
///         if ctx.is_cancelled() {
///             return Err(HandlerError::Canceled);
///         }
///         let _ = payload; // write audit record...
///         Ok(())
///     }
///
///     fn name(&self) -> &str { "audit" }
/// }
/// ```
#[async_trait]
pub trait Handle: Send + Sync + 'static {
    /// Handles a single event.
    ///
    /// # Parameters
    /// - `ctx`: bus-wide cancellation token, cancelled when `stop()` begins
    /// - `payload`: shared opaque value; downcast to the expected type
    ///
    /// Errors are caught at the invocation boundary and logged; they do not
    /// propagate anywhere.
    async fn on_event(&self, ctx: CancellationToken, payload: Payload) -> Result<(), HandlerError>;

    /// Human-readable name (for logs/metrics).
    fn name(&self) -> &str {
        std::any::type_name::<Self>()
    }
}
