use std::borrow::Cow;
use std::sync::Arc;

use tokio::sync::broadcast::error::RecvError;
use tokio_util::sync::CancellationToken;

use crate::{
    config::Config,
    context::Context,
    events::Bus,
    policies::ReactivationPolicy,
    producers::ProducerRef,
    subscribers::{Subscribe, SubscriberSet},
};

use super::bridge::Bridge;

/// Builder for constructing a [`Bridge`] with optional features.
pub struct BridgeBuilder<T> {
    producer: ProducerRef<T>,
    cfg: Config,
    subscribers: Vec<Arc<dyn Subscribe>>,
}

impl<T: Send + Sync + 'static> BridgeBuilder<T> {
    /// Creates a new builder around a shared producer with the default configuration.
    pub fn new(producer: ProducerRef<T>) -> Self {
        Self {
            producer,
            cfg: Config::default(),
            subscribers: Vec::new(),
        }
    }

    /// Replaces the whole configuration.
    pub fn config(mut self, cfg: Config) -> Self {
        self.cfg = cfg;
        self
    }

    /// Sets the bridge name used in events.
    pub fn name(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.cfg.name = name.into();
        self
    }

    /// Sets where the producer runs.
    pub fn producer_context(mut self, ctx: Context) -> Self {
        self.cfg.producer = ctx;
        self
    }

    /// Sets where outcomes are delivered to the attached sink.
    pub fn delivery_context(mut self, ctx: Context) -> Self {
        self.cfg.delivery = ctx;
        self
    }

    /// Sets the behavior on re-activation after a terminal outcome.
    pub fn reactivation(mut self, policy: ReactivationPolicy) -> Self {
        self.cfg.reactivation = policy;
        self
    }

    /// Sets event subscribers for observability.
    ///
    /// Subscribers receive lifecycle events through dedicated workers with
    /// bounded queues. A non-empty list requires a Tokio runtime at
    /// [`build`](Self::build) time.
    pub fn with_subscribers(mut self, subscribers: Vec<Arc<dyn Subscribe>>) -> Self {
        self.subscribers = subscribers;
        self
    }

    /// Builds the bridge.
    ///
    /// Initializes the event bus and, when subscribers were given, the
    /// listener task that forwards bus events to them. The listener stops
    /// when the bridge is dropped.
    ///
    /// # Panics
    /// Panics if subscribers were given and no Tokio runtime is entered.
    pub fn build(self) -> Bridge<T> {
        let bus = Bus::new(self.cfg.bus_capacity_clamped());
        let listener = if self.subscribers.is_empty() {
            None
        } else {
            let token = CancellationToken::new();
            let set = SubscriberSet::new(self.subscribers, bus.clone());
            subscriber_listener(&bus, set, token.clone());
            Some(token)
        };
        Bridge::from_parts(self.producer, self.cfg, bus, listener)
    }
}

/// Forwards bus events to the subscriber set until `stop` fires, then drains
/// what is already queued and shuts the set down.
fn subscriber_listener(bus: &Bus, set: SubscriberSet, stop: CancellationToken) {
    let mut rx = bus.subscribe();
    tokio::spawn(async move {
        loop {
            tokio::select! {
                _ = stop.cancelled() => break,
                msg = rx.recv() => match msg {
                    Ok(ev) => set.emit(&ev),
                    Err(RecvError::Lagged(_)) => continue,
                    Err(RecvError::Closed) => break,
                },
            }
        }
        while let Ok(ev) = rx.try_recv() {
            set.emit(&ev);
        }
        set.shutdown().await;
    });
}
