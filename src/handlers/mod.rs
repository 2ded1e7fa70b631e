//! # Handler abstractions.
//!
//! - [`Handler`] - trait for async, cancelable event handlers
//! - [`HandlerFn`] - closure-backed handler
//! - [`HandlerRef`] - shared handle (`Arc<dyn Handler<T>>`)
//! - [`Counted`] - wrapper that counts every finished invocation down on a
//!   [`CompletionGate`](crate::CompletionGate)

mod counted;
mod handler;
mod handler_fn;

pub use counted::Counted;
pub use handler::{Handler, HandlerRef};
pub use handler_fn::HandlerFn;
