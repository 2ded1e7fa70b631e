//! # Global runtime configuration.
//!
//! Provides [`Config`] centralized settings for a [`Reactor`](crate::Reactor).
//! Values are fixed at construction; nothing here is mutable at runtime.
//!
//! ## Sentinel values
//! - `worker_count = 0` → one worker per available CPU
//! - `handler_timeout = 0s` → no timeout
//!
//! ## Environment
//! [`Config::from_env`] overlays the defaults with:
//!
//! | Key                              | Field             |
//! |----------------------------------|-------------------|
//! | `EVENTVISOR_WORKER_COUNT`        | `worker_count`    |
//! | `EVENTVISOR_EXPECTED_EVENTS`     | `expected_events` |
//! | `EVENTVISOR_BUS_CAPACITY`        | `bus_capacity`    |
//! | `EVENTVISOR_GRACE_MS`            | `grace`           |
//! | `EVENTVISOR_HANDLER_TIMEOUT_MS`  | `handler_timeout` |

use std::str::FromStr;
use std::time::Duration;

use crate::error::ConfigError;

const WORKER_COUNT: &str = "EVENTVISOR_WORKER_COUNT";
const EXPECTED_EVENTS: &str = "EVENTVISOR_EXPECTED_EVENTS";
const BUS_CAPACITY: &str = "EVENTVISOR_BUS_CAPACITY";
const GRACE_MS: &str = "EVENTVISOR_GRACE_MS";
const HANDLER_TIMEOUT_MS: &str = "EVENTVISOR_HANDLER_TIMEOUT_MS";

/// Global configuration for the reactor runtime.
///
/// ## Field semantics
/// - `worker_count`: Max in-flight handler invocations (`0` = available CPUs)
/// - `expected_events`: Application-level count used to size a [`CompletionGate`](crate::CompletionGate)
/// - `bus_capacity`: Report bus ring buffer size (min 1; clamped by Bus)
/// - `grace`: Maximum wait for in-flight work on shutdown
/// - `handler_timeout`: Per-invocation timeout (`0s` = no timeout)
#[derive(Clone, Debug)]
pub struct Config {
    /// Maximum number of handler invocations running at once.
    ///
    /// - `0` = one per available CPU
    /// - `n > 0` = at most `n` invocations run simultaneously
    pub worker_count: usize,

    /// Number of events the driving code expects to be fully processed.
    pub expected_events: usize,

    /// Capacity of the report bus broadcast channel ring buffer.
    pub bus_capacity: usize,

    /// Maximum time [`Reactor::shutdown`](crate::Reactor::shutdown) waits for queued
    /// and running invocations before giving up.
    pub grace: Duration,

    /// Per-invocation handler timeout.
    ///
    /// - `Duration::ZERO` = no timeout
    /// - `> 0` = the invocation is cancelled and reported as failed on expiry
    pub handler_timeout: Duration,
}

impl Config {
    /// Returns the effective worker count (never zero).
    #[inline]
    pub fn workers(&self) -> usize {
        match self.worker_count {
            0 => std::thread::available_parallelism()
                .map(usize::from)
                .unwrap_or(1),
            n => n,
        }
    }

    /// Returns the handler timeout as an `Option`.
    ///
    /// - `None` → no timeout
    /// - `Some(d)` → timeout applied per invocation
    #[inline]
    pub fn timeout(&self) -> Option<Duration> {
        if self.handler_timeout == Duration::ZERO {
            None
        } else {
            Some(self.handler_timeout)
        }
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Builds a config from process environment variables on top of [`Config::default`].
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds a config from an arbitrary key lookup on top of [`Config::default`].
    ///
    /// Missing keys keep their default; present keys must parse.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = parse::<usize>(&lookup, WORKER_COUNT)? {
            cfg.worker_count = v;
        }
        if let Some(v) = parse::<usize>(&lookup, EXPECTED_EVENTS)? {
            cfg.expected_events = v;
        }
        if let Some(v) = parse::<usize>(&lookup, BUS_CAPACITY)? {
            cfg.bus_capacity = v;
        }
        if let Some(ms) = parse::<u64>(&lookup, GRACE_MS)? {
            cfg.grace = Duration::from_millis(ms);
        }
        if let Some(ms) = parse::<u64>(&lookup, HANDLER_TIMEOUT_MS)? {
            cfg.handler_timeout = Duration::from_millis(ms);
        }
        Ok(cfg)
    }
}

fn parse<T>(lookup: &impl Fn(&str) -> Option<String>, key: &'static str) -> Result<Option<T>, ConfigError>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    let Some(raw) = lookup(key) else {
        return Ok(None);
    };
    raw.trim()
        .parse::<T>()
        .map(Some)
        .map_err(|e| ConfigError::Invalid {
            key,
            value: raw.clone(),
            reason: e.to_string(),
        })
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `worker_count = 0` (one per CPU)
    /// - `expected_events = 10`
    /// - `bus_capacity = 1024`
    /// - `grace = 60s`
    /// - `handler_timeout = 0s` (no timeout)
    fn default() -> Self {
        Self {
            worker_count: 0,
            expected_events: 10,
            bus_capacity: 1024,
            grace: Duration::from_secs(60),
            handler_timeout: Duration::ZERO,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_sentinels() {
        let cfg = Config::default();
        assert!(cfg.workers() >= 1);
        assert!(cfg.timeout().is_none());

        let cfg = Config {
            worker_count: 3,
            handler_timeout: Duration::from_millis(10),
            bus_capacity: 0,
            ..Config::default()
        };
        assert_eq!(cfg.workers(), 3);
        assert_eq!(cfg.timeout(), Some(Duration::from_millis(10)));
        assert_eq!(cfg.bus_capacity_clamped(), 1);
    }

    #[test]
    fn test_from_lookup_overlays_defaults() {
        let cfg = Config::from_lookup(lookup(&[
            (WORKER_COUNT, "4"),
            (EXPECTED_EVENTS, " 25 "),
            (GRACE_MS, "1500"),
        ]))
        .unwrap();

        assert_eq!(cfg.worker_count, 4);
        assert_eq!(cfg.expected_events, 25);
        assert_eq!(cfg.grace, Duration::from_millis(1500));
        assert_eq!(cfg.bus_capacity, 1024);
        assert_eq!(cfg.handler_timeout, Duration::ZERO);
    }

    #[test]
    fn test_from_lookup_rejects_garbage() {
        let err = Config::from_lookup(lookup(&[(BUS_CAPACITY, "lots")])).unwrap_err();
        match err {
            ConfigError::Invalid { key, value, .. } => {
                assert_eq!(key, BUS_CAPACITY);
                assert_eq!(value, "lots");
            }
        }
    }
}
