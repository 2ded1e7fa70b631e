//! # Report sink trait.
//!
//! Provides [`Sink`] an extension point for plugging custom failure/outcome
//! handling into the runtime.
//!
//! Each sink gets:
//! - **Dedicated worker task** (runs independently)
//! - **Per-sink bounded queue** (capacity via [`Sink::queue_capacity`])
//! - **Panic isolation** (panics are caught and reported as `ReportKind::SinkPanicked`)
//!
//! ## Example
//! ```rust
//! use async_trait::async_trait;
//! use eventvisor::{Report, Sink};
//!
//! struct Alerts;
//!
//! #[async_trait]
//! impl Sink for Alerts {
//!     async fn on_report(&self, report: &Report) {
//!         if report.is_handler_failure() {
//!             // page someone
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "alerts" }
//! }
//! ```

use async_trait::async_trait;

use crate::reports::Report;

/// Receiver of runtime reports.
///
/// ### Implementation requirements
/// - Use async I/O; avoid blocking the executor.
/// - Handle errors internally; do not panic.
/// - Slow processing affects only this sink's queue.
#[async_trait]
pub trait Sink: Send + Sync + 'static {
    /// Processes a single report, in FIFO order per sink.
    async fn on_report(&self, report: &Report);

    /// Returns the sink name used in overflow/panic reports.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Returns the preferred queue capacity for this sink (clamped to at least 1).
    ///
    /// Default: 1024.
    fn queue_capacity(&self) -> usize {
        1024
    }
}
