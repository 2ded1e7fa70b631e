//! # Handler trait.
//!
//! A handler receives each [`Event`] whose topic matched its selector, plus a
//! [`CancellationToken`] derived from the reactor's runtime token. It should
//! check the token at safe points and exit with [`HandlerError::Canceled`]
//! when asked to stop.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Event;

/// Shared handle to a handler.
pub type HandlerRef<T> = Arc<dyn Handler<T>>;

/// # Asynchronous, cancelable event handler.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use eventvisor::{Event, Handler, HandlerError};
///
/// struct Receiver;
///
/// #[async_trait]
/// impl Handler<String> for Receiver {
///     fn name(&self) -> &str { "receiver" }
///
///     async fn handle(&self, event: Event<String>, ctx: CancellationToken) -> Result<(), HandlerError> {
///         if ctx.is_cancelled() {
///             return Err(HandlerError::Canceled);
///         }
///         println!("{}", event.data());
///         Ok(())
///     }
/// }
/// ```
#[async_trait]
pub trait Handler<T>: Send + Sync + 'static
where
    T: Send + Sync + 'static,
{
    /// Returns a stable, human-readable name used in reports.
    fn name(&self) -> &str;

    /// Processes one event.
    ///
    /// Runs on a dispatcher worker, never on the thread that called `notify`.
    async fn handle(&self, event: Event<T>, ctx: CancellationToken) -> Result<(), HandlerError>;
}
