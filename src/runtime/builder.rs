use std::marker::PhantomData;
use std::sync::Arc;

use super::reactor::Reactor;
use crate::{
    config::Config,
    reports::Bus,
    sinks::{Sink, SinkSet},
};

/// Builder for constructing a [`Reactor`] with optional sinks.
pub struct ReactorBuilder<T> {
    cfg: Config,
    sinks: Vec<Arc<dyn Sink>>,
    _payload: PhantomData<fn() -> T>,
}

impl<T: Send + Sync + 'static> ReactorBuilder<T> {
    /// Creates a new builder with the given configuration.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            sinks: Vec::new(),
            _payload: PhantomData,
        }
    }

    /// Sets report sinks.
    ///
    /// Sinks receive every runtime report (outcomes, failures, drops, shutdown)
    /// through dedicated workers with bounded queues.
    pub fn with_sinks(mut self, sinks: Vec<Arc<dyn Sink>>) -> Self {
        self.sinks = sinks;
        self
    }

    /// Adds a single sink.
    pub fn with_sink(mut self, sink: Arc<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    /// Builds the reactor and starts its dispatcher and sink workers.
    ///
    /// Must be called from within a tokio runtime.
    pub fn build(self) -> Arc<Reactor<T>> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let sinks = SinkSet::new(self.sinks, bus.clone());
        Arc::new(Reactor::new_internal(self.cfg, bus, sinks))
    }
}

impl<T: Send + Sync + 'static> Reactor<T> {
    /// Starts building a reactor.
    pub fn builder(cfg: Config) -> ReactorBuilder<T> {
        ReactorBuilder::new(cfg)
    }

    /// Builds a reactor with no sinks.
    pub fn new(cfg: Config) -> Arc<Self> {
        ReactorBuilder::new(cfg).build()
    }
}
