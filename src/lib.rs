//! # eventvisor
//!
//! **Eventvisor** is a small in-process publish/subscribe dispatch core for Rust.
//!
//! Producers notify named topics with an [`Event`]; a [`Reactor`] matches the
//! topic against registered [`Selector`]s and runs every matching [`Handler`]
//! asynchronously on a bounded worker pool. A [`CompletionGate`] lets the
//! driving code wait until a fixed number of events has been fully handled.
//!
//! ## Architecture
//! ```text
//!   Publisher ── notify(topic, event) ──┐
//!   (any thread)                        ▼
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Reactor                                                          │
//! │  - Registry   (selector, handler) bindings in registration order  │
//! │  - Dispatcher unbounded queue + worker_count permits              │
//! │  - Bus        broadcast runtime reports                           │
//! └──────┬───────────────────────────────────────────────┬────────────┘
//!        │ one job per matching handler                  │ reports
//!        ▼                                               ▼
//!   ┌──────────┐ ┌──────────┐ ┌──────────┐        ┌────────────────┐
//!   │ worker 1 │ │ worker 2 │ │ worker N │        │ sink_listener  │
//!   └────┬─────┘ └────┬─────┘ └────┬─────┘        └───────┬────────┘
//!        ▼            ▼            ▼                      ▼
//!   handler.handle(event, ctx)  (panics caught)        SinkSet
//!        │                                        ┌───────┼───────┐
//!        ▼                                        ▼       ▼       ▼
//!   CompletionGate::count_down()               LogSink  sink2   sinkN
//!        │
//!        ▼
//!   CompletionGate::wait() returns true
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                       |
//! |-------------------|--------------------------------------------------------------|------------------------------------------|
//! | **Routing**       | Exact and match-any selectors over topics.                   | [`Selector`], [`Topic`]                  |
//! | **Dispatch**      | Non-blocking notify, bounded parallel handler execution.     | [`Reactor`], [`ReactorBuilder`]          |
//! | **Handlers**      | Async, cancelable handlers from closures or types.           | [`Handler`], [`HandlerFn`], [`Counted`]  |
//! | **Completion**    | Latch released after N processed events.                     | [`CompletionGate`]                       |
//! | **Failure sink**  | Per-invocation outcome reports fanned out to sinks.          | [`Sink`], [`Report`], [`ReportKind`]     |
//! | **Production**    | Bounded, cancellable producer loop.                          | [`Publisher`]                            |
//! | **Configuration** | Worker count, expected events, grace, timeouts; env overlay. | [`Config`]                               |
//!
//! ## Optional features
//! - `logging` (default): exports [`LogSink`], which writes reports as `tracing` events.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use eventvisor::{CompletionGate, Config, Event, HandlerError, HandlerFn, Publisher, Reactor, Selector};
//!
//! #[tokio::main(flavor = "multi_thread", worker_threads = 2)]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config { worker_count: 4, ..Config::default() };
//!     let gate = Arc::new(CompletionGate::new(cfg.expected_events));
//!     let reactor = Reactor::<String>::builder(cfg.clone()).build();
//!
//!     reactor.on(
//!         Selector::exact("jokes"),
//!         HandlerFn::counted("receiver", gate.clone(), |ev: Event<String>, _ctx: CancellationToken| async move {
//!             println!("{}", ev.data());
//!             Ok::<(), HandlerError>(())
//!         }),
//!     );
//!
//!     let publisher = Publisher::new(reactor.clone(), "jokes");
//!     publisher.publish(cfg.expected_events, &CancellationToken::new(), |i| format!("joke #{i}"));
//!
//!     assert!(gate.wait(Some(Duration::from_secs(5))).await);
//!     reactor.shutdown().await?;
//!     Ok(())
//! }
//! ```
mod config;
mod error;
mod events;
mod gate;
mod handlers;
mod panic;
mod publisher;
mod reports;
mod runtime;
mod sinks;
mod topics;

// ---- Public re-exports ----

pub use config::Config;
pub use runtime::{Reactor, ReactorBuilder};
pub use error::{ConfigError, HandlerError, RuntimeError};
pub use events::Event;
pub use gate::CompletionGate;
pub use handlers::{Counted, Handler, HandlerFn, HandlerRef};
pub use publisher::Publisher;
pub use reports::{Bus, Report, ReportKind};
pub use sinks::{Sink, SinkSet};
pub use topics::{Selector, Topic};

// Optional: a `tracing`-backed report sink.
// Enabled by default via the `logging` feature.
#[cfg(feature = "logging")]
pub use sinks::LogSink;
