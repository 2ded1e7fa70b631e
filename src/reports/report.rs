//! # Runtime reports emitted by the reactor and its workers.
//!
//! The [`ReportKind`] enum classifies reports across three categories:
//! - **Invocation outcomes**: what happened to one (handler, event) pair
//! - **Routing**: events that reached no handler
//! - **Shutdown / sink health**: lifecycle of the reactor and its sinks
//!
//! ## Example
//! ```rust
//! use eventvisor::{Report, ReportKind};
//!
//! let r = Report::new(ReportKind::HandlerFailed)
//!     .with_topic("jokes")
//!     .with_handler("receiver")
//!     .with_reason("boom");
//!
//! assert_eq!(r.kind, ReportKind::HandlerFailed);
//! assert_eq!(r.handler.as_deref(), Some("receiver"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::{Duration, SystemTime};

use crate::topics::Topic;

/// Global sequence counter for report ordering.
static REPORT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReportKind {
    // === Invocation outcomes ===
    /// Handler returned `Ok(())`, or `Err(Canceled)` after cancellation.
    ///
    /// Sets: `topic`, `handler`, `event_seq`.
    HandlerCompleted,

    /// Handler returned an error (including timeout).
    ///
    /// Sets: `topic`, `handler`, `event_seq`, `reason`.
    HandlerFailed,

    /// Handler panicked; the panic was caught and the worker slot released.
    ///
    /// Sets: `topic`, `handler`, `event_seq`, `reason` (panic message).
    HandlerPanicked,

    /// Invocation exceeded the configured handler timeout.
    /// Always followed by `HandlerFailed` for the same invocation.
    ///
    /// Sets: `topic`, `handler`, `event_seq`, `timeout_ms`.
    HandlerTimedOut,

    // === Routing ===
    /// Event was not dispatched.
    ///
    /// Sets: `topic`, `event_seq`, `reason` (`no_subscriber` or `dispatcher_closed`).
    EventDropped,

    // === Shutdown ===
    /// Reactor shutdown started.
    ShutdownRequested,

    /// All queued and running invocations finished within the grace period.
    AllStoppedWithin,

    /// Grace period exceeded; invocations were still in flight.
    ///
    /// Sets: `reason` (number in flight).
    GraceExceeded,

    // === Sink health ===
    /// A sink panicked while processing a report.
    ///
    /// Sets: `handler` (sink name), `reason` (panic message).
    SinkPanicked,

    /// A sink dropped a report (queue full or worker closed).
    ///
    /// Sets: `handler` (sink name), `reason`.
    SinkOverflow,
}

/// Runtime report with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`ReportKind`]
#[derive(Clone, Debug)]
pub struct Report {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Report classification.
    pub kind: ReportKind,

    /// Topic the event was notified on.
    pub topic: Option<Topic>,
    /// Handler (or sink) name.
    pub handler: Option<Arc<str>>,
    /// Sequence number of the event involved.
    pub event_seq: Option<u64>,
    /// Human-readable reason (errors, panic info, drop cause).
    pub reason: Option<Arc<str>>,
    /// Handler timeout in milliseconds (compact).
    pub timeout_ms: Option<u32>,
}

impl Report {
    /// Creates a new report of the given kind with current timestamp and next sequence number.
    pub fn new(kind: ReportKind) -> Self {
        Self {
            seq: REPORT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            topic: None,
            handler: None,
            event_seq: None,
            reason: None,
            timeout_ms: None,
        }
    }

    /// Attaches a topic.
    #[inline]
    pub fn with_topic(mut self, topic: impl Into<Topic>) -> Self {
        self.topic = Some(topic.into());
        self
    }

    /// Attaches a handler or sink name.
    #[inline]
    pub fn with_handler(mut self, name: impl Into<Arc<str>>) -> Self {
        self.handler = Some(name.into());
        self
    }

    /// Attaches the sequence number of the event involved.
    #[inline]
    pub fn with_event_seq(mut self, seq: u64) -> Self {
        self.event_seq = Some(seq);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Attaches a timeout duration (stored as milliseconds).
    #[inline]
    pub fn with_timeout(mut self, d: Duration) -> Self {
        let ms = d.as_millis().min(u128::from(u32::MAX)) as u32;
        self.timeout_ms = Some(ms);
        self
    }

    /// Creates a sink overflow report.
    #[inline]
    pub fn sink_overflow(sink: &'static str, reason: &'static str) -> Self {
        Report::new(ReportKind::SinkOverflow)
            .with_handler(sink)
            .with_reason(format!("sink={sink} reason={reason}"))
    }

    /// Creates a sink panic report.
    #[inline]
    pub fn sink_panicked(sink: &'static str, info: String) -> Self {
        Report::new(ReportKind::SinkPanicked)
            .with_handler(sink)
            .with_reason(info)
    }

    #[inline]
    pub fn is_sink_overflow(&self) -> bool {
        matches!(self.kind, ReportKind::SinkOverflow)
    }

    /// Returns `true` for reports describing a failed invocation.
    #[inline]
    pub fn is_handler_failure(&self) -> bool {
        matches!(
            self.kind,
            ReportKind::HandlerFailed | ReportKind::HandlerPanicked
        )
    }
}
