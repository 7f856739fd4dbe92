//! # Simple logging handler for debugging and demos.
//!
//! [`LogHandler`] emits a `tracing` line for every event it receives.
//! Enabled via the `logging` feature. Primarily useful for development and
//! examples — implement a custom [`Handle`] for structured logging or
//! metrics collection in real applications.

use async_trait::async_trait;
use std::borrow::Cow;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::error::HandlerError;
use crate::events::Payload;
use crate::handlers::handle::Handle;

/// Tracing-based demo handler.
///
/// The label is usually the topic it was subscribed to; the bus does not
/// pass the topic to handlers, so the label is fixed at construction.
pub struct LogHandler {
    label: Cow<'static, str>,
}

impl LogHandler {
    /// Creates a handler that logs every event under `label`.
    pub fn new(label: impl Into<Cow<'static, str>>) -> Self {
        Self { label: label.into() }
    }

    /// Creates the handler as a shared `Arc`.
    pub fn arc(label: impl Into<Cow<'static, str>>) -> Arc<Self> {
        Arc::new(Self::new(label))
    }
}

#[async_trait]
impl Handle for LogHandler {
    async fn on_event(&self, _ctx: CancellationToken, _payload: Payload) -> Result<(), HandlerError> {
        info!(topic = %self.label, "event received");
        Ok(())
    }

    fn name(&self) -> &str {
        "log"
    }
}
