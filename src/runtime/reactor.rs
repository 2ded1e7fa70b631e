//! # Reactor: selector registration, notification, and graceful shutdown.
//!
//! The [`Reactor`] owns a [`Registry`] of selector bindings, a bounded
//! [`Dispatcher`], the report [`Bus`], and the [`SinkSet`] that receives
//! reports. Every reactor is independent; nothing is global.
//!
//! ## High-level architecture
//! ```text
//! on(selector, handler) ──► Registry.register
//!
//! notify(topic, event)
//!   └─► Registry.matching(topic)
//!         ├─ []          ──► Bus.publish(EventDropped no_subscriber)
//!         └─ [h1, h2..]  ──► Dispatcher.submit((h1, event)), submit((h2, event)) ...
//!                                  └─► run_once ──► Bus ──► sink_listener ──► SinkSet
//!
//! Shutdown path:
//!   Bus.publish(ShutdownRequested)
//!   Dispatcher.close()  → queued jobs still run
//!   Dispatcher.join(cfg.grace):
//!      ├─ Ok       → Bus.publish(AllStoppedWithin)
//!      └─ Timeout  → Bus.publish(GraceExceeded), runtime_token.cancel()
//!   sink listener drains the bus and stops sink workers
//! ```
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use std::time::Duration;
//! use tokio_util::sync::CancellationToken;
//! use eventvisor::{CompletionGate, Config, Event, HandlerError, HandlerFn, Reactor, Selector};
//!
//! #[tokio::main(flavor = "multi_thread", worker_threads = 2)]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let reactor = Reactor::<String>::builder(Config::default()).build();
//!     let gate = Arc::new(CompletionGate::new(3));
//!
//!     reactor.on(
//!         Selector::exact("jokes"),
//!         HandlerFn::counted("receiver", gate.clone(), |ev: Event<String>, _ctx: CancellationToken| async move {
//!             println!("{}", ev.data());
//!             Ok::<(), HandlerError>(())
//!         }),
//!     );
//!
//!     for i in 0..3 {
//!         reactor.notify("jokes", Event::wrap(format!("joke #{i}")));
//!     }
//!
//!     assert!(gate.wait(Some(Duration::from_secs(5))).await);
//!     reactor.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::{Mutex, PoisonError};

use tokio::sync::broadcast::error::{RecvError, TryRecvError};
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use super::dispatcher::Dispatcher;
use super::registry::Registry;
use super::runner::Job;
use crate::{
    config::Config,
    error::RuntimeError,
    events::Event,
    handlers::HandlerRef,
    reports::{Bus, Report, ReportKind},
    sinks::SinkSet,
    topics::{Selector, Topic},
};

/// Routes notified events to matching handlers on a bounded worker pool.
pub struct Reactor<T: Send + Sync + 'static> {
    cfg: Config,
    bus: Bus,
    registry: Registry<T>,
    dispatcher: Dispatcher<T>,
    runtime_token: CancellationToken,
    listener_token: CancellationToken,
    listener: Mutex<Option<JoinHandle<()>>>,
}

impl<T: Send + Sync + 'static> Reactor<T> {
    /// Wires the reactor together and starts its background tasks.
    ///
    /// The sink listener subscribes to the bus before returning, so no
    /// report published afterwards is missed.
    pub(crate) fn new_internal(cfg: Config, bus: Bus, sinks: SinkSet) -> Self {
        let runtime_token = CancellationToken::new();
        let listener_token = CancellationToken::new();

        let dispatcher = Dispatcher::new(
            cfg.workers(),
            cfg.timeout(),
            runtime_token.clone(),
            bus.clone(),
        );
        let listener = sink_listener(&bus, sinks, listener_token.clone());

        Self {
            cfg,
            bus,
            registry: Registry::new(),
            dispatcher,
            runtime_token,
            listener_token,
            listener: Mutex::new(Some(listener)),
        }
    }

    /// Registers `handler` for every topic `selector` matches.
    ///
    /// Never fails and never waits on handler execution.
    pub fn on(&self, selector: Selector, handler: HandlerRef<T>) {
        self.registry.register(selector, handler);
    }

    /// Schedules one asynchronous invocation per matching handler and returns.
    ///
    /// - No matching handler: the event is dropped (reported as `EventDropped`).
    /// - Handler failures never surface here; they go to the sinks.
    /// - After [`shutdown`](Self::shutdown) began, events are dropped and reported.
    pub fn notify(&self, topic: impl Into<Topic>, event: Event<T>) {
        let topic = topic.into();
        let handlers = self.registry.matching(&topic);

        if handlers.is_empty() {
            self.bus.publish(
                Report::new(ReportKind::EventDropped)
                    .with_topic(topic)
                    .with_event_seq(event.seq)
                    .with_reason("no_subscriber"),
            );
            return;
        }

        for handler in handlers {
            let job = Job {
                topic: topic.clone(),
                handler,
                event: event.clone(),
            };
            if let Err(job) = self.dispatcher.submit(job) {
                self.bus.publish(
                    Report::new(ReportKind::EventDropped)
                        .with_topic(job.topic)
                        .with_handler(job.handler.name())
                        .with_event_seq(job.event.seq)
                        .with_reason("dispatcher_closed"),
                );
            }
        }
    }

    /// Returns the number of registrations.
    pub fn handler_count(&self) -> usize {
        self.registry.len()
    }

    /// Returns the number of invocations queued or running.
    pub fn in_flight(&self) -> usize {
        self.dispatcher.pending()
    }

    /// Returns the effective worker count.
    pub fn workers(&self) -> usize {
        self.dispatcher.workers()
    }

    /// Returns the configuration the reactor was built with.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Returns the report bus, e.g. to observe reports directly.
    pub fn bus(&self) -> &Bus {
        &self.bus
    }

    /// Returns a clone of the runtime token handlers' contexts derive from.
    pub fn cancellation_token(&self) -> CancellationToken {
        self.runtime_token.clone()
    }

    /// Asks every running and future invocation to stop cooperatively.
    pub fn cancel(&self) {
        self.runtime_token.cancel();
    }

    /// Stops intake, waits up to [`Config::grace`] for queued and running
    /// invocations, then stops the sinks.
    ///
    /// Calling it more than once is harmless.
    pub async fn shutdown(&self) -> Result<(), RuntimeError> {
        self.bus.publish(Report::new(ReportKind::ShutdownRequested));
        self.dispatcher.close();

        let grace = self.cfg.grace;
        let res = if self.dispatcher.join(grace).await {
            self.bus.publish(Report::new(ReportKind::AllStoppedWithin));
            Ok(())
        } else {
            let in_flight = self.dispatcher.pending();
            self.bus.publish(
                Report::new(ReportKind::GraceExceeded)
                    .with_reason(format!("in_flight={in_flight}")),
            );
            self.runtime_token.cancel();
            Err(RuntimeError::GraceExceeded { grace, in_flight })
        };

        self.stop_sinks().await;
        res
    }

    /// Lets the sink listener drain the bus, then waits for sink workers.
    async fn stop_sinks(&self) {
        self.listener_token.cancel();
        let handle = self
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            let _ = handle.await;
        }
    }
}

/// Dropping a reactor without [`Reactor::shutdown`] still stops the sink
/// listener, which drains the bus and lets sink workers finish.
impl<T: Send + Sync + 'static> Drop for Reactor<T> {
    fn drop(&mut self) {
        self.listener_token.cancel();
    }
}

/// Subscribes to the bus and forwards reports to the sink set until stopped.
///
/// Stops when `stop` is cancelled (after draining what is already buffered)
/// or when every bus sender is gone.
fn sink_listener(bus: &Bus, sinks: SinkSet, stop: CancellationToken) -> JoinHandle<()> {
    let mut rx = bus.subscribe();

    tokio::spawn(async move {
        loop {
            tokio::select! {
                biased;
                msg = rx.recv() => match msg {
                    Ok(report) => sinks.emit(report),
                    Err(RecvError::Closed) => break,
                    Err(RecvError::Lagged(_)) => {
                        sinks.emit(Report::sink_overflow("sink_listener", "lagged"));
                    }
                },
                _ = stop.cancelled() => {
                    loop {
                        match rx.try_recv() {
                            Ok(report) => sinks.emit(report),
                            Err(TryRecvError::Lagged(_)) => {
                                sinks.emit(Report::sink_overflow("sink_listener", "lagged"));
                            }
                            Err(TryRecvError::Empty | TryRecvError::Closed) => break,
                        }
                    }
                    break;
                }
            }
        }
        sinks.shutdown().await;
    })
}
