//! Runtime reports: types and broadcast bus.
//!
//! Reports describe what the dispatch machinery did with each invocation
//! (completed, failed, panicked, timed out, dropped) and how shutdown went.
//! They are the failure sink channel: nothing here ever reaches the caller
//! of [`Reactor::notify`](crate::Reactor::notify).
//!
//! ## Contents
//! - [`ReportKind`], [`Report`] classification and metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Reactor` (drops, shutdown), `runner::run_once`,
//!   `SinkSet` workers (overflow/panic).
//! - **Consumers**: the reactor's sink listener, which fans out to `SinkSet`.

mod bus;
mod report;

pub use bus::Bus;
pub use report::{Report, ReportKind};
