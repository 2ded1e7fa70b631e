//! # Report bus for broadcasting runtime reports.
//!
//! [`Bus`] is a thin wrapper around [`tokio::sync::broadcast`] that provides
//! non-blocking publishing from many sources (reactor, dispatch workers, sink workers).
//!
//! ## Architecture
//! ```text
//! Publishers (many):                   Subscriber (one):
//!   Reactor::notify ──┐
//!   run_once (xN)   ──┼──────► Bus ───────► sink_listener ────► SinkSet
//!   SinkSet workers ──┘  (broadcast chan)   (in Reactor)
//! ```
//!
//! ## Rules
//! - **Non-blocking publish**: `publish()` never blocks.
//! - **Bounded capacity**: a single ring buffer stores recent reports for all receivers.
//! - **Lag handling**: slow receivers get `RecvError::Lagged(n)` and skip `n` oldest items.
//! - **No persistence**: reports are lost if there are no active receivers at send time.

use tokio::sync::broadcast;

use super::report::Report;

/// Broadcast channel for runtime reports.
///
/// ### Properties
/// - **Non-blocking**: `publish()` returns immediately.
/// - **Fire-and-forget**: no delivery or durability guarantees.
/// - **Cloneable**: cheap to clone (internally holds an `Arc`-backed sender).
#[derive(Clone, Debug)]
pub struct Bus {
    tx: broadcast::Sender<Report>,
}

impl Bus {
    /// Creates a new bus with the given channel capacity (clamped to at least 1).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        let (tx, _rx) = broadcast::channel::<Report>(capacity);
        Self { tx }
    }

    /// Publishes a report to all active receivers.
    ///
    /// If there are no receivers, the report is dropped.
    pub fn publish(&self, report: Report) {
        let _ = self.tx.send(report);
    }

    /// Creates a new receiver that will observe subsequent reports.
    pub fn subscribe(&self) -> broadcast::Receiver<Report> {
        self.tx.subscribe()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reports::ReportKind;

    #[tokio::test]
    async fn test_publish_reaches_each_receiver() {
        let bus = Bus::new(8);
        let mut a = bus.subscribe();
        let mut b = bus.subscribe();

        bus.publish(Report::new(ReportKind::ShutdownRequested));

        assert_eq!(a.recv().await.unwrap().kind, ReportKind::ShutdownRequested);
        assert_eq!(b.recv().await.unwrap().kind, ReportKind::ShutdownRequested);
    }

    #[test]
    fn test_publish_without_receivers_is_silent() {
        let bus = Bus::new(0);
        bus.publish(Report::new(ReportKind::GraceExceeded));
    }
}
