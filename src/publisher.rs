//! # Publisher: bounded, cancellable event producer.
//!
//! A [`Publisher`] builds events and notifies them on one fixed topic.
//! The loop is bounded by a count and checks a stop token before every
//! event, so the driving code always decides when production ends.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use eventvisor::{Config, Publisher, Reactor};
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let reactor = Reactor::<String>::new(Config::default());
//! let publisher = Publisher::new(reactor.clone(), "jokes");
//!
//! let sent = publisher.publish(3, &CancellationToken::new(), |i| format!("joke #{i}"));
//! assert_eq!(sent, 3);
//! # }
//! ```

use std::sync::Arc;

use tokio_util::sync::CancellationToken;

use crate::events::Event;
use crate::runtime::Reactor;
use crate::topics::Topic;

/// Produces events on a fixed topic.
pub struct Publisher<T: Send + Sync + 'static> {
    reactor: Arc<Reactor<T>>,
    topic: Topic,
}

impl<T: Send + Sync + 'static> Publisher<T> {
    /// Creates a publisher bound to `reactor` and `topic`.
    pub fn new(reactor: Arc<Reactor<T>>, topic: impl Into<Topic>) -> Self {
        Self {
            reactor,
            topic: topic.into(),
        }
    }

    /// Returns the topic events are notified on.
    pub fn topic(&self) -> &Topic {
        &self.topic
    }

    /// Notifies up to `count` events built by `make(index)`.
    ///
    /// Stops early once `stop` is cancelled. Returns how many were notified.
    pub fn publish<F>(&self, count: usize, stop: &CancellationToken, mut make: F) -> usize
    where
        F: FnMut(usize) -> T,
    {
        let mut sent = 0;
        while sent < count && !stop.is_cancelled() {
            self.reactor
                .notify(self.topic.clone(), Event::wrap(make(sent)));
            sent += 1;
        }
        sent
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::error::HandlerError;
    use crate::gate::CompletionGate;
    use crate::handlers::HandlerFn;
    use crate::topics::Selector;
    use std::sync::Mutex;
    use std::time::Duration;

    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn test_publishes_exactly_count() {
        let reactor = Reactor::<usize>::new(Config::default());
        let gate = Arc::new(CompletionGate::new(5));
        let seen = Arc::new(Mutex::new(Vec::new()));
        let s = seen.clone();
        reactor.on(
            Selector::exact("numbers"),
            HandlerFn::counted("collect", gate.clone(), move |ev: Event<usize>, _ctx: CancellationToken| {
                let s = s.clone();
                async move {
                    s.lock().unwrap().push(*ev.data());
                    Ok::<(), HandlerError>(())
                }
            }),
        );

        let publisher = Publisher::new(reactor.clone(), "numbers");
        assert_eq!(publisher.publish(5, &CancellationToken::new(), |i| i * 10), 5);
        assert!(gate.wait(Some(Duration::from_secs(5))).await);
        reactor.shutdown().await.unwrap();

        let mut seen = seen.lock().unwrap().clone();
        seen.sort_unstable();
        assert_eq!(seen, vec![0, 10, 20, 30, 40]);
    }

    #[tokio::test]
    async fn test_stop_token_ends_loop() {
        let reactor = Reactor::<usize>::new(Config::default());
        let publisher = Publisher::new(reactor.clone(), "numbers");
        let stop = CancellationToken::new();

        let sent = publisher.publish(usize::MAX, &stop, |i| {
            if i == 2 {
                stop.cancel();
            }
            i
        });
        assert_eq!(sent, 3);

        stop.cancel();
        assert_eq!(publisher.publish(10, &stop, |i| i), 0);
        assert_eq!(publisher.topic().as_str(), "numbers");
    }
}
