//! Error types used by the eventvisor runtime, handlers, and configuration.
//!
//! This module defines three enums:
//!
//! - [`HandlerError`] — errors raised by a single handler invocation.
//! - [`RuntimeError`] — errors raised by the reactor itself (shutdown).
//! - [`ConfigError`] — errors raised while reading [`Config`](crate::Config).
//!
//! All of them provide `as_label` for logs/metrics.

use std::time::Duration;
use thiserror::Error;

/// # Errors produced by the eventvisor runtime.
///
/// These represent failures of the dispatch machinery itself,
/// such as a shutdown sequence exceeding its grace period.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum RuntimeError {
    /// Shutdown grace period was exceeded; some invocations were still queued or running.
    #[error("shutdown timeout {grace:?} exceeded; {in_flight} handler invocations still in flight")]
    GraceExceeded {
        /// The configured grace duration.
        grace: Duration,
        /// Number of invocations that had not finished when the grace period elapsed.
        in_flight: usize,
    },
}

impl RuntimeError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::RuntimeError;
    /// use std::time::Duration;
    ///
    /// let err = RuntimeError::GraceExceeded { grace: Duration::from_secs(5), in_flight: 2 };
    /// assert_eq!(err.as_label(), "runtime_grace_exceeded");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            RuntimeError::GraceExceeded { .. } => "runtime_grace_exceeded",
        }
    }
}

/// # Errors produced by a handler invocation.
///
/// Returned from [`Handler::handle`](crate::Handler::handle). None of them ever
/// reach the caller of [`Reactor::notify`](crate::Reactor::notify); they are
/// reported to the sinks instead.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum HandlerError {
    /// Handler failed while processing the event.
    #[error("handler failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Invocation exceeded the configured handler timeout.
    #[error("timed out after {timeout:?}")]
    Timeout {
        /// The timeout duration that was exceeded.
        timeout: Duration,
    },

    /// Handler observed cancellation and exited early.
    #[error("context cancelled")]
    Canceled,
}

impl HandlerError {
    /// Convenience constructor for [`HandlerError::Fail`].
    pub fn fail(error: impl Into<String>) -> Self {
        HandlerError::Fail {
            error: error.into(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use eventvisor::HandlerError;
    ///
    /// assert_eq!(HandlerError::fail("boom").as_label(), "handler_failed");
    /// assert_eq!(HandlerError::Canceled.as_label(), "handler_canceled");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            HandlerError::Fail { .. } => "handler_failed",
            HandlerError::Timeout { .. } => "handler_timeout",
            HandlerError::Canceled => "handler_canceled",
        }
    }
}

/// # Errors produced while loading configuration.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// A configuration key held a value that could not be parsed.
    #[error("invalid value {value:?} for {key}: {reason}")]
    Invalid {
        /// Environment key that was read.
        key: &'static str,
        /// Raw value found.
        value: String,
        /// Parser message.
        reason: String,
    },
}

impl ConfigError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ConfigError::Invalid { .. } => "config_invalid",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handler_error_display() {
        let err = HandlerError::fail("disk full");
        assert_eq!(err.to_string(), "handler failed: disk full");

        let err = HandlerError::Timeout {
            timeout: Duration::from_millis(250),
        };
        assert_eq!(err.to_string(), "timed out after 250ms");
    }

    #[test]
    fn test_config_error_label() {
        let err = ConfigError::Invalid {
            key: "EVENTVISOR_WORKER_COUNT",
            value: "many".into(),
            reason: "invalid digit found in string".into(),
        };
        assert_eq!(err.as_label(), "config_invalid");
        assert!(err.to_string().contains("EVENTVISOR_WORKER_COUNT"));
    }
}
