//! # Run a single handler invocation.
//!
//! Executes one `(handler, event)` job with optional timeout and panic
//! isolation, and publishes its outcome to the [`Bus`].
//!
//! ## Report flow
//! ```text
//! Success:      handle() → Ok(())            → HandlerCompleted
//! Cancellation: handle() → Err(Canceled)     → HandlerCompleted (graceful exit)
//! Failure:      handle() → Err(Fail)         → HandlerFailed
//! Panic:        handle() panics              → HandlerPanicked
//! Timeout:      deadline hit → cancel child  → HandlerTimedOut + HandlerFailed
//! ```
//!
//! ## Rules
//! - Publishes **exactly one** terminal report per invocation.
//! - Never propagates a failure or a panic to the caller.
//! - Derives a **child token** per invocation; cancelling it never touches the parent.

use std::sync::Arc;
use std::time::Duration;

use futures::FutureExt;
use tokio::time;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Event;
use crate::handlers::HandlerRef;
use crate::panic::panic_message;
use crate::reports::{Bus, Report, ReportKind};
use crate::topics::Topic;

/// Unit of work: one handler applied to one event.
pub struct Job<T: Send + Sync + 'static> {
    pub topic: Topic,
    pub handler: HandlerRef<T>,
    pub event: Event<T>,
}

/// Terminal outcome of one invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    Completed,
    Failed,
    Panicked,
}

/// Runs `job` once and publishes its terminal report.
pub async fn run_once<T: Send + Sync + 'static>(
    job: Job<T>,
    parent: &CancellationToken,
    timeout: Option<Duration>,
    bus: &Bus,
) -> Outcome {
    let Job {
        topic,
        handler,
        event,
    } = job;
    let seq = event.seq;
    let name: Arc<str> = Arc::from(handler.name());
    let child = parent.child_token();

    let fut = std::panic::AssertUnwindSafe(handler.handle(event, child.clone())).catch_unwind();

    let res = if let Some(dur) = timeout.filter(|d| *d > Duration::ZERO) {
        match time::timeout(dur, fut).await {
            Ok(r) => r,
            Err(_elapsed) => {
                child.cancel();
                bus.publish(
                    Report::new(ReportKind::HandlerTimedOut)
                        .with_topic(&topic)
                        .with_handler(Arc::clone(&name))
                        .with_event_seq(seq)
                        .with_timeout(dur),
                );
                Ok(Err(HandlerError::Timeout { timeout: dur }))
            }
        }
    } else {
        fut.await
    };

    let base = |kind| {
        Report::new(kind)
            .with_topic(&topic)
            .with_handler(Arc::clone(&name))
            .with_event_seq(seq)
    };

    match res {
        Ok(Ok(())) | Ok(Err(HandlerError::Canceled)) => {
            bus.publish(base(ReportKind::HandlerCompleted));
            Outcome::Completed
        }
        Ok(Err(e)) => {
            bus.publish(base(ReportKind::HandlerFailed).with_reason(e.to_string()));
            Outcome::Failed
        }
        Err(payload) => {
            bus.publish(base(ReportKind::HandlerPanicked).with_reason(panic_message(&*payload)));
            Outcome::Panicked
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerFn;

    fn job(handler: HandlerRef<u8>) -> Job<u8> {
        Job {
            topic: Topic::from("jokes"),
            handler,
            event: Event::wrap(7),
        }
    }

    #[tokio::test]
    async fn test_success_reports_completed() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let h = HandlerFn::arc("ok", |_ev: Event<u8>, _ctx: CancellationToken| async move {
            Ok::<(), HandlerError>(())
        });

        let out = run_once(job(h), &CancellationToken::new(), None, &bus).await;
        assert_eq!(out, Outcome::Completed);

        let r = rx.recv().await.unwrap();
        assert_eq!(r.kind, ReportKind::HandlerCompleted);
        assert_eq!(r.handler.as_deref(), Some("ok"));
        assert_eq!(r.topic.as_ref().map(Topic::as_str), Some("jokes"));
    }

    #[tokio::test]
    async fn test_error_reports_failed_with_reason() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let h = HandlerFn::arc("bad", |_ev: Event<u8>, _ctx: CancellationToken| async move {
            Err::<(), HandlerError>(HandlerError::fail("boom"))
        });

        let out = run_once(job(h), &CancellationToken::new(), None, &bus).await;
        assert_eq!(out, Outcome::Failed);

        let r = rx.recv().await.unwrap();
        assert_eq!(r.kind, ReportKind::HandlerFailed);
        assert_eq!(r.reason.as_deref(), Some("handler failed: boom"));
    }

    #[tokio::test]
    async fn test_panic_is_caught() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let h = HandlerFn::arc("panics", |_ev: Event<u8>, _ctx: CancellationToken| async move {
            panic!("kaboom");
            Ok::<(), HandlerError>(())
        });

        let out = run_once(job(h), &CancellationToken::new(), None, &bus).await;
        assert_eq!(out, Outcome::Panicked);

        let r = rx.recv().await.unwrap();
        assert_eq!(r.kind, ReportKind::HandlerPanicked);
        assert_eq!(r.reason.as_deref(), Some("kaboom"));
    }

    #[tokio::test]
    async fn test_timeout_cancels_child_and_fails() {
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let parent = CancellationToken::new();
        let h = HandlerFn::arc("slow", |_ev: Event<u8>, ctx: CancellationToken| async move {
            ctx.cancelled().await;
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<(), HandlerError>(())
        });

        let out = run_once(job(h), &parent, Some(Duration::from_millis(20)), &bus).await;
        assert_eq!(out, Outcome::Failed);
        assert!(!parent.is_cancelled());

        assert_eq!(rx.recv().await.unwrap().kind, ReportKind::HandlerTimedOut);
        assert_eq!(rx.recv().await.unwrap().kind, ReportKind::HandlerFailed);
    }

    #[tokio::test]
    async fn test_canceled_is_graceful() {
        let bus = Bus::new(8);
        let parent = CancellationToken::new();
        parent.cancel();
        let h = HandlerFn::arc("coop", |_ev: Event<u8>, ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(HandlerError::Canceled);
            }
            Ok(())
        });

        assert_eq!(run_once(job(h), &parent, None, &bus).await, Outcome::Completed);
    }
}
