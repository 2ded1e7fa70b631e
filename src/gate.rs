//! # Counting completion gate.
//!
//! [`CompletionGate`] is a latch: it starts at an expected count, handlers
//! count it down as they finish, and waiters are released once it reaches zero.
//!
//! ## Rules
//! - The count never goes below zero; `count_down` past zero is a no-op.
//! - Once released the gate stays released; late waiters return immediately.
//! - `count_down` is a single atomic decrement-and-check, safe from any number
//!   of worker tasks at once.
//! - [`wait`](CompletionGate::wait) suspends a task;
//!   [`wait_blocking`](CompletionGate::wait_blocking) parks a plain OS thread.
//!
//! ## Example
//! ```rust
//! use std::time::Duration;
//! use eventvisor::CompletionGate;
//!
//! # #[tokio::main(flavor = "current_thread")]
//! # async fn main() {
//! let gate = CompletionGate::new(2);
//! gate.count_down();
//! assert!(!gate.wait(Some(Duration::from_millis(5))).await);
//! gate.count_down();
//! assert!(gate.wait(None).await);
//! # }
//! ```

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Condvar, Mutex, PoisonError};
use std::time::Duration;

use tokio_util::sync::CancellationToken;

/// Counting synchronization primitive for "wait until N events processed".
#[derive(Debug)]
pub struct CompletionGate {
    expected: usize,
    remaining: AtomicUsize,
    released: CancellationToken,
    parked: Mutex<()>,
    wake: Condvar,
}

impl CompletionGate {
    /// Creates a gate expecting `expected` count-downs. A gate of `0` starts released.
    pub fn new(expected: usize) -> Self {
        let released = CancellationToken::new();
        if expected == 0 {
            released.cancel();
        }
        Self {
            expected,
            remaining: AtomicUsize::new(expected),
            released,
            parked: Mutex::new(()),
            wake: Condvar::new(),
        }
    }

    /// Decrements the remaining count by one.
    ///
    /// Floors silently at zero. Returns `true` if this call released the gate.
    pub fn count_down(&self) -> bool {
        match self
            .remaining
            .fetch_update(Ordering::AcqRel, Ordering::Acquire, |n| n.checked_sub(1))
        {
            Ok(1) => {
                self.released.cancel();
                let _parked = self.parked.lock().unwrap_or_else(PoisonError::into_inner);
                self.wake.notify_all();
                true
            }
            Ok(_) | Err(_) => false,
        }
    }

    /// Suspends the calling task until the count reaches zero.
    ///
    /// - `None` waits indefinitely.
    /// - `Some(d)` gives up after `d`.
    ///
    /// Returns `true` if zero was reached before the timeout elapsed.
    pub async fn wait(&self, timeout: Option<Duration>) -> bool {
        if self.is_released() {
            return true;
        }
        match timeout {
            None => {
                self.released.cancelled().await;
                true
            }
            Some(d) => tokio::time::timeout(d, self.released.cancelled())
                .await
                .is_ok(),
        }
    }

    /// Parks the calling thread until the count reaches zero.
    ///
    /// Same contract as [`wait`](Self::wait), for coordinators that run
    /// outside a tokio runtime. Calling it from a runtime worker blocks that
    /// worker; use `wait` there.
    pub fn wait_blocking(&self, timeout: Option<Duration>) -> bool {
        let parked = self.parked.lock().unwrap_or_else(PoisonError::into_inner);
        match timeout {
            None => {
                let _parked = self
                    .wake
                    .wait_while(parked, |_| !self.is_released())
                    .unwrap_or_else(PoisonError::into_inner);
                true
            }
            Some(d) => {
                let (_parked, _) = self
                    .wake
                    .wait_timeout_while(parked, d, |_| !self.is_released())
                    .unwrap_or_else(PoisonError::into_inner);
                self.is_released()
            }
        }
    }

    /// Returns the number of count-downs still outstanding.
    #[inline]
    pub fn remaining(&self) -> usize {
        self.remaining.load(Ordering::Acquire)
    }

    /// Returns the count the gate was created with.
    #[inline]
    pub fn expected(&self) -> usize {
        self.expected
    }

    /// Returns `true` once the count has reached zero.
    #[inline]
    pub fn is_released(&self) -> bool {
        self.released.is_cancelled()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test]
    async fn test_release_after_exact_count() {
        let gate = CompletionGate::new(3);
        assert!(!gate.count_down());
        assert!(!gate.count_down());
        assert!(!gate.is_released());
        assert!(gate.count_down());
        assert!(gate.is_released());
        assert!(gate.wait(Some(Duration::ZERO)).await);
    }

    #[tokio::test]
    async fn test_zero_gate_starts_released() {
        let gate = CompletionGate::new(0);
        assert!(gate.is_released());
        assert!(gate.wait(None).await);
    }

    #[tokio::test]
    async fn test_extra_count_down_floors_at_zero() {
        let gate = CompletionGate::new(2);
        for _ in 0..5 {
            gate.count_down();
        }
        assert_eq!(gate.remaining(), 0);
        assert_eq!(gate.expected(), 2);
        assert!(gate.wait(Some(Duration::from_millis(1))).await);
    }

    #[tokio::test]
    async fn test_wait_times_out_when_short() {
        let gate = CompletionGate::new(2);
        gate.count_down();
        assert!(!gate.wait(Some(Duration::from_millis(20))).await);
        assert_eq!(gate.remaining(), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_concurrent_count_down_loses_nothing() {
        let gate = Arc::new(CompletionGate::new(1000));
        let mut set = tokio::task::JoinSet::new();
        for _ in 0..8 {
            let g = gate.clone();
            set.spawn(async move {
                let mut released = 0;
                for _ in 0..125 {
                    if g.count_down() {
                        released += 1;
                    }
                }
                released
            });
        }

        let mut releases = 0;
        while let Some(n) = set.join_next().await {
            releases += n.unwrap();
        }
        assert_eq!(releases, 1, "exactly one count_down releases the gate");
        assert_eq!(gate.remaining(), 0);
        assert!(gate.wait(Some(Duration::from_secs(1))).await);
    }

    #[test]
    fn test_blocking_wait_from_plain_threads() {
        let gate = Arc::new(CompletionGate::new(3));
        let waiter = {
            let g = gate.clone();
            std::thread::spawn(move || g.wait_blocking(Some(Duration::from_secs(5))))
        };
        let workers: Vec<_> = (0..3)
            .map(|_| {
                let g = gate.clone();
                std::thread::spawn(move || {
                    g.count_down();
                })
            })
            .collect();
        for w in workers {
            w.join().unwrap();
        }

        assert!(waiter.join().unwrap());
        assert!(gate.wait_blocking(None));
    }

    #[test]
    fn test_blocking_wait_times_out_when_short() {
        let gate = CompletionGate::new(2);
        gate.count_down();
        assert!(!gate.wait_blocking(Some(Duration::from_millis(20))));
        assert_eq!(gate.remaining(), 1);
        assert!(CompletionGate::new(0).wait_blocking(Some(Duration::ZERO)));
    }

    #[tokio::test]
    async fn test_waiter_wakes_on_release() {
        let gate = Arc::new(CompletionGate::new(1));
        let waiter = {
            let g = gate.clone();
            tokio::spawn(async move { g.wait(Some(Duration::from_secs(5))).await })
        };
        tokio::task::yield_now().await;
        gate.count_down();
        assert!(waiter.await.unwrap());
    }
}
