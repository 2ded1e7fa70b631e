//! # Events routed by the reactor.
//!
//! An [`Event`] wraps a payload together with its creation time. Payloads are
//! held behind an `Arc`, so fanning one event out to several handlers never
//! copies or mutates the data.
//!
//! ## Ordering
//! Each event carries a process-wide sequence number (`seq`) that increases
//! monotonically in creation order. Handlers run in parallel, so `seq` is the
//! only way to recover production order downstream.
//!
//! ## Example
//! ```rust
//! use eventvisor::Event;
//!
//! let a = Event::wrap("first joke");
//! let b = Event::wrap("second joke");
//! assert!(a.seq < b.seq);
//! assert_eq!(*a.data(), "first joke");
//! ```

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Immutable event carrying a payload of type `T`.
pub struct Event<T> {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock creation timestamp.
    pub at: SystemTime,
    data: Arc<T>,
}

impl<T> Event<T> {
    /// Wraps `data` into a new event stamped with the current time.
    pub fn wrap(data: T) -> Self {
        Self::from_arc(Arc::new(data))
    }

    /// Wraps an already shared payload.
    pub fn from_arc(data: Arc<T>) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            data,
        }
    }

    /// Returns the payload.
    #[inline]
    pub fn data(&self) -> &T {
        &self.data
    }

    /// Returns a shared handle to the payload.
    #[inline]
    pub fn data_arc(&self) -> Arc<T> {
        Arc::clone(&self.data)
    }
}

// Manual impl: cloning shares the payload, so `T: Clone` is not required.
impl<T> Clone for Event<T> {
    fn clone(&self) -> Self {
        Self {
            seq: self.seq,
            at: self.at,
            data: Arc::clone(&self.data),
        }
    }
}

impl<T: fmt::Debug> fmt::Debug for Event<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Event")
            .field("seq", &self.seq)
            .field("at", &self.at)
            .field("data", &self.data)
            .finish()
    }
}
