//! # LogSink — structured report logger
//!
//! Writes every [`Report`] as a `tracing` event under the `eventvisor` target.
//! Failures log at `WARN`/`ERROR`, routine outcomes at `DEBUG`.
//!
//! ## Example output (with `tracing-subscriber` fmt layer)
//! ```text
//! DEBUG eventvisor: handler completed topic="jokes" handler="receiver" event_seq=3
//!  WARN eventvisor: handler failed topic="jokes" handler="receiver" event_seq=4 reason="boom"
//! ERROR eventvisor: handler panicked topic="jokes" handler="receiver" event_seq=5 reason="oops"
//!  INFO eventvisor: all invocations stopped within grace
//! ```

use async_trait::async_trait;
use tracing::{debug, error, info, warn};

use crate::reports::{Report, ReportKind};
use crate::sinks::Sink;

/// Report sink backed by `tracing`.
#[derive(Default, Debug)]
pub struct LogSink;

impl LogSink {
    /// Construct a new [`LogSink`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Sink for LogSink {
    async fn on_report(&self, r: &Report) {
        let topic = r.topic.as_ref().map(|t| t.as_str()).unwrap_or("-");
        let handler = r.handler.as_deref().unwrap_or("-");
        let reason = r.reason.as_deref().unwrap_or("-");

        match r.kind {
            ReportKind::HandlerCompleted => {
                debug!(target: "eventvisor", topic, handler, event_seq = r.event_seq, "handler completed");
            }
            ReportKind::HandlerFailed => {
                warn!(target: "eventvisor", topic, handler, event_seq = r.event_seq, reason, "handler failed");
            }
            ReportKind::HandlerPanicked => {
                error!(target: "eventvisor", topic, handler, event_seq = r.event_seq, reason, "handler panicked");
            }
            ReportKind::HandlerTimedOut => {
                warn!(target: "eventvisor", topic, handler, event_seq = r.event_seq, timeout_ms = r.timeout_ms, "handler timed out");
            }
            ReportKind::EventDropped => {
                debug!(target: "eventvisor", topic, event_seq = r.event_seq, reason, "event dropped");
            }
            ReportKind::ShutdownRequested => {
                info!(target: "eventvisor", "shutdown requested");
            }
            ReportKind::AllStoppedWithin => {
                info!(target: "eventvisor", "all invocations stopped within grace");
            }
            ReportKind::GraceExceeded => {
                error!(target: "eventvisor", reason, "grace exceeded");
            }
            ReportKind::SinkOverflow => {
                warn!(target: "eventvisor", sink = handler, reason, "sink overflow");
            }
            ReportKind::SinkPanicked => {
                error!(target: "eventvisor", sink = handler, reason, "sink panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
