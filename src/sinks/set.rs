//! # Non-blocking report fan-out to multiple sinks.
//!
//! ```text
//! emit(report)
//!     │
//!     ├──► [queue 1] ──► worker 1 ──► sink1.on_report()
//!     │    (bounded)         └──────► panic → SinkPanicked
//!     └──► [queue N] ──► worker N ──► sinkN.on_report()
//! ```
//!
//! ## Rules
//! - **Non-blocking**: `emit()` returns immediately (uses `try_send`)
//! - **Overflow**: report dropped for that sink only, `SinkOverflow` published
//! - **Isolation**: slow/panicking sink doesn't affect others
//! - **Per-sink FIFO**: each sink sees reports in order

use std::sync::Arc;

use futures::FutureExt;
use tokio::{sync::mpsc, task::JoinHandle};

use crate::panic::panic_message;
use crate::reports::{Bus, Report};
use crate::sinks::Sink;

struct SinkChannel {
    name: &'static str,
    sender: mpsc::Sender<Arc<Report>>,
}

/// Fan-out coordinator for multiple report sinks.
pub struct SinkSet {
    channels: Vec<SinkChannel>,
    workers: Vec<JoinHandle<()>>,
    bus: Bus,
}

impl SinkSet {
    /// Creates a new set and spawns one worker task per sink.
    ///
    /// Must be called from within a tokio runtime.
    #[must_use]
    pub fn new(sinks: Vec<Arc<dyn Sink>>, bus: Bus) -> Self {
        let mut channels = Vec::with_capacity(sinks.len());
        let mut workers = Vec::with_capacity(sinks.len());

        for sink in sinks {
            let cap = sink.queue_capacity().max(1);
            let name = sink.name();
            let (tx, mut rx) = mpsc::channel::<Arc<Report>>(cap);
            let bus_for_worker = bus.clone();

            let handle = tokio::spawn(async move {
                while let Some(report) = rx.recv().await {
                    let fut = sink.on_report(report.as_ref());
                    if let Err(payload) = std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                        bus_for_worker.publish(Report::sink_panicked(
                            sink.name(),
                            panic_message(&*payload),
                        ));
                    }
                }
            });
            channels.push(SinkChannel { name, sender: tx });
            workers.push(handle);
        }
        Self {
            channels,
            workers,
            bus,
        }
    }

    /// Returns the number of sinks.
    pub fn len(&self) -> usize {
        self.channels.len()
    }

    /// Returns `true` if no sinks are installed.
    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }

    /// Emits a report to all sinks without waiting.
    ///
    /// Overflow reports are not re-published when they themselves overflow.
    pub fn emit(&self, report: Report) {
        let report = Arc::new(report);
        let is_overflow = report.is_sink_overflow();

        for channel in &self.channels {
            let reason = match channel.sender.try_send(Arc::clone(&report)) {
                Ok(()) => continue,
                Err(mpsc::error::TrySendError::Full(_)) => "full",
                Err(mpsc::error::TrySendError::Closed(_)) => "closed",
            };
            if !is_overflow {
                self.bus.publish(Report::sink_overflow(channel.name, reason));
            }
        }
    }

    /// Drops all senders and awaits every worker, draining queued reports.
    pub async fn shutdown(self) {
        drop(self.channels);
        for h in self.workers {
            let _ = h.await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportKind;
    use async_trait::async_trait;
    use std::sync::Mutex;

    #[derive(Default)]
    struct Collect(Mutex<Vec<ReportKind>>);

    #[async_trait]
    impl Sink for Collect {
        async fn on_report(&self, report: &Report) {
            self.0.lock().unwrap().push(report.kind);
        }
        fn name(&self) -> &'static str {
            "collect"
        }
    }

    struct Explode;

    #[async_trait]
    impl Sink for Explode {
        async fn on_report(&self, _report: &Report) {
            panic!("sink exploded");
        }
        fn name(&self) -> &'static str {
            "explode"
        }
    }

    #[tokio::test]
    async fn test_emit_reaches_all_sinks_in_order() {
        let a = Arc::new(Collect::default());
        let b = Arc::new(Collect::default());
        let sinks: Vec<Arc<dyn Sink>> = vec![a.clone(), b.clone()];
        let set = SinkSet::new(sinks, Bus::new(8));

        set.emit(Report::new(ReportKind::HandlerCompleted));
        set.emit(Report::new(ReportKind::HandlerFailed));
        set.shutdown().await;

        let expected = vec![ReportKind::HandlerCompleted, ReportKind::HandlerFailed];
        assert_eq!(*a.0.lock().unwrap(), expected);
        assert_eq!(*b.0.lock().unwrap(), expected);
    }

    #[tokio::test]
    async fn test_sink_panic_is_reported_and_isolated() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let ok = Arc::new(Collect::default());
        let sinks: Vec<Arc<dyn Sink>> = vec![Arc::new(Explode), ok.clone()];
        let set = SinkSet::new(sinks, bus);

        set.emit(Report::new(ReportKind::HandlerCompleted));
        set.shutdown().await;

        let report = rx.recv().await.unwrap();
        assert_eq!(report.kind, ReportKind::SinkPanicked);
        assert_eq!(report.handler.as_deref(), Some("explode"));
        assert_eq!(report.reason.as_deref(), Some("sink exploded"));
        assert_eq!(ok.0.lock().unwrap().len(), 1);
    }
}
