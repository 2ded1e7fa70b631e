//! # Gate-counting handler wrapper.
//!
//! [`Counted`] decrements a [`CompletionGate`] once per finished invocation of
//! the wrapped handler. The decrement lives in a drop guard, so it runs when
//! the handler returns `Ok`, returns `Err`, panics, or is abandoned on timeout.
//!
//! ```text
//! handle(ev) ──► guard armed ──► inner.handle(ev)
//!                                 ├─ Ok / Err  ──► guard dropped ──► gate.count_down()
//!                                 ├─ panic     ──► unwinding drop ──► gate.count_down()
//!                                 └─ timeout   ──► future dropped ──► gate.count_down()
//! ```
//!
//! Handlers that call [`CompletionGate::count_down`] themselves get no such
//! guarantee: a failure before the call leaves the gate short.

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::error::HandlerError;
use crate::events::Event;
use crate::gate::CompletionGate;
use crate::handlers::Handler;

/// Handler wrapper that counts every finished invocation down on a gate.
pub struct Counted<H> {
    inner: H,
    gate: Arc<CompletionGate>,
}

impl<H> Counted<H> {
    /// Wraps `inner`, counting down `gate` after each invocation.
    pub fn new(inner: H, gate: Arc<CompletionGate>) -> Self {
        Self { inner, gate }
    }

    /// Returns the gate this wrapper counts down.
    pub fn gate(&self) -> &Arc<CompletionGate> {
        &self.gate
    }
}

struct CountDownGuard<'a>(&'a CompletionGate);

impl Drop for CountDownGuard<'_> {
    fn drop(&mut self) {
        self.0.count_down();
    }
}

#[async_trait]
impl<T, H> Handler<T> for Counted<H>
where
    T: Send + Sync + 'static,
    H: Handler<T>,
{
    fn name(&self) -> &str {
        self.inner.name()
    }

    async fn handle(&self, event: Event<T>, ctx: CancellationToken) -> Result<(), HandlerError> {
        let _guard = CountDownGuard(&self.gate);
        self.inner.handle(event, ctx).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handlers::HandlerFn;
    use futures::FutureExt;
    use std::time::Duration;

    #[tokio::test]
    async fn test_counts_down_on_success_and_failure() {
        let gate = Arc::new(CompletionGate::new(2));
        let h = HandlerFn::counted("flaky", gate.clone(), |ev: Event<u32>, _ctx: CancellationToken| async move {
            if *ev.data() % 2 == 0 {
                Ok(())
            } else {
                Err(HandlerError::fail("odd"))
            }
        });

        assert!(h.handle(Event::wrap(2), CancellationToken::new()).await.is_ok());
        assert!(h.handle(Event::wrap(3), CancellationToken::new()).await.is_err());
        assert_eq!(gate.remaining(), 0);
        assert!(gate.wait(Some(Duration::ZERO)).await);
    }

    #[tokio::test]
    async fn test_counts_down_on_panic() {
        let gate = Arc::new(CompletionGate::new(1));
        let h = HandlerFn::counted("panics", gate.clone(), |_ev: Event<()>, _ctx: CancellationToken| async move {
            panic!("mid-processing");
            Ok::<(), HandlerError>(())
        });

        let res = std::panic::AssertUnwindSafe(h.handle(Event::wrap(()), CancellationToken::new()))
            .catch_unwind()
            .await;
        assert!(res.is_err());
        assert!(gate.is_released());
    }

    #[tokio::test]
    async fn test_counts_down_when_future_dropped() {
        let gate = Arc::new(CompletionGate::new(1));
        let h = HandlerFn::counted("slow", gate.clone(), |_ev: Event<()>, _ctx: CancellationToken| async move {
            tokio::time::sleep(Duration::from_secs(3600)).await;
            Ok::<(), HandlerError>(())
        });

        let res = tokio::time::timeout(
            Duration::from_millis(10),
            h.handle(Event::wrap(()), CancellationToken::new()),
        )
        .await;
        assert!(res.is_err());
        assert!(gate.is_released());
    }
}
