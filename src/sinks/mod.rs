//! # Failure sinks for the eventvisor runtime.
//!
//! This module provides the [`Sink`] trait and built-in implementations for
//! handling runtime [`Report`](crate::Report)s broadcast through the
//! [`Bus`](crate::Bus).
//!
//! ## Architecture
//! ```text
//! run_once ── publish(Report) ──► Bus ──► sink_listener ──► SinkSet::emit
//!                                                         ┌──────┼──────┐
//!                                                         ▼      ▼      ▼
//!                                                      LogSink Metrics Custom
//! ```

mod set;
mod sink;

#[cfg(feature = "logging")]
mod log;

#[cfg(feature = "logging")]
pub use log::LogSink;
pub use set::SinkSet;
pub use sink::Sink;
