//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(CancellationToken, Payload) -> Fut`,
//! producing a fresh future per invocation. Invocations of the same handler
//! for different events may run concurrently; shared state belongs in an
//! explicit `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use topicbus::{HandlerError, HandlerFn, HandlerRef, Payload};
//!
//! let h: HandlerRef = HandlerFn::arc("greeter", |_ctx: CancellationToken, payload: Payload| async move {
//!     if let Ok(name) = payload.downcast::<String>() {
//!         println!("hello, {name}");
//!     }
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(h.name(), "greeter");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Payload;
use crate::handlers::handle::Handle;

/// Closure-backed handler implementation.
///
/// Wraps a closure that *creates* a new future per event.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    ///
    /// Prefer [`HandlerFn::arc`] when you immediately need a [`HandlerRef`](crate::HandlerRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self { name: name.into(), f }
    }

    /// Creates the handler and returns it as a shared `Arc`.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

#[async_trait]
impl<F, Fut> Handle for HandlerFn<F>
where
    F: Fn(CancellationToken, Payload) -> Fut + Send + Sync + 'static, // Fn, not FnMut
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    async fn on_event(&self, ctx: CancellationToken, payload: Payload) -> Result<(), HandlerError> {
        (self.f)(ctx, payload).await
    }

    fn name(&self) -> &str {
        &self.name
    }
}
