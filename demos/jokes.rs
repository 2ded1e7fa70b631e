//! # Example: jokes
//!
//! One receiver on the exact topic `jokes`, one audit handler on every topic,
//! and a publisher bounded by `expected_events`.
//!
//! Demonstrates how to:
//! - Load [`Config`] from the environment.
//! - Register handlers with exact and match-any [`Selector`]s.
//! - Wait on a [`CompletionGate`] and shut the reactor down cleanly.
//! - Stop the publisher early with Ctrl-C.
//!
//! ## Flow
//! ```text
//! Publisher::publish(n) ──► Reactor::notify("jokes", ev)  (n times)
//!     ├─► receiver (Counted) ──► gate.count_down()
//!     └─► audit
//! main ──► gate.wait(timeout) ──► Reactor::shutdown()
//! ```
//!
//! ## Run
//! ```bash
//! RUST_LOG=eventvisor=debug EVENTVISOR_EXPECTED_EVENTS=20 cargo run --example jokes
//! ```

use std::sync::Arc;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use eventvisor::{
    CompletionGate, Config, Event, HandlerError, HandlerFn, LogSink, Publisher, Reactor, Selector,
};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Payload carried by every joke event.
#[derive(Debug)]
struct Joke {
    text: String,
    created_ms: u128,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // 1. Logging: reports arrive through LogSink as tracing events
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // 2. Configuration from EVENTVISOR_* variables
    let cfg = Config::from_env()?;
    let expected = cfg.expected_events;

    // 3. Reactor with a logging sink
    let reactor = Reactor::<Joke>::builder(cfg)
        .with_sink(Arc::new(LogSink::new()))
        .build();
    let gate = Arc::new(CompletionGate::new(expected));

    // 4. Handlers
    reactor.on(
        Selector::exact("jokes"),
        HandlerFn::counted("receiver", gate.clone(), |ev: Event<Joke>, ctx: CancellationToken| async move {
            if ctx.is_cancelled() {
                return Err(HandlerError::Canceled);
            }
            tracing::info!(seq = ev.seq, created_ms = ev.data().created_ms, "{}", ev.data().text);
            Ok(())
        }),
    );
    reactor.on(
        Selector::any(),
        HandlerFn::arc("audit", |ev: Event<Joke>, _ctx: CancellationToken| async move {
            tracing::debug!(seq = ev.seq, "audited");
            Ok::<(), HandlerError>(())
        }),
    );

    // 5. Ctrl-C stops production
    let stop = CancellationToken::new();
    {
        let stop = stop.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                stop.cancel();
            }
        });
    }

    // 6. Publish on a blocking thread; notify never waits on handlers
    let publisher = Publisher::new(reactor.clone(), "jokes");
    let producer_stop = stop.clone();
    let sent = tokio::task::spawn_blocking(move || {
        publisher.publish(expected, &producer_stop, |i| Joke {
            text: format!("joke #{i}: I told a UDP joke, not sure you got it"),
            created_ms: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_millis())
                .unwrap_or_default(),
        })
    })
    .await?;

    // 7. Wait for every sent joke to be handled
    let gate_for_sent = if sent < expected {
        tracing::warn!(sent, expected, "publisher stopped early");
        false
    } else {
        gate.wait(Some(Duration::from_secs(10))).await
    };
    tracing::info!(sent, released = gate_for_sent, remaining = gate.remaining(), "done");

    reactor.shutdown().await?;
    Ok(())
}
