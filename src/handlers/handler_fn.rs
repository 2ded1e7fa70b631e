//! # Function-backed handler (`HandlerFn`)
//!
//! [`HandlerFn`] wraps a closure `F: Fn(Event<T>, CancellationToken) -> Fut`,
//! producing a fresh future per invocation. Shared state goes into an explicit
//! `Arc<...>` captured by the closure.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use eventvisor::{Event, HandlerError, HandlerFn, HandlerRef};
//!
//! let h: HandlerRef<String> = HandlerFn::arc("printer", |ev: Event<String>, _ctx: CancellationToken| async move {
//!     println!("{}", ev.data());
//!     Ok::<_, HandlerError>(())
//! });
//!
//! assert_eq!(h.name(), "printer");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Event;
use crate::gate::CompletionGate;
use crate::handlers::{Counted, Handler};

/// Function-backed handler implementation.
#[derive(Debug)]
pub struct HandlerFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F> HandlerFn<F> {
    /// Creates a new function-backed handler.
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the handler and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }

    /// Creates the handler wrapped in [`Counted`], so each finished invocation
    /// counts `gate` down regardless of outcome.
    pub fn counted(
        name: impl Into<Cow<'static, str>>,
        gate: Arc<CompletionGate>,
        f: F,
    ) -> Arc<Counted<Self>> {
        Arc::new(Counted::new(Self::new(name, f), gate))
    }
}

#[async_trait]
impl<T, F, Fut> Handler<T> for HandlerFn<F>
where
    T: Send + Sync + 'static,
    F: Fn(Event<T>, CancellationToken) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), HandlerError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn handle(&self, event: Event<T>, ctx: CancellationToken) -> Result<(), HandlerError> {
        (self.f)(event, ctx).await
    }
}
