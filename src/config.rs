//! # Bridge configuration.
//!
//! Provides [`Config`], the centralized settings of a [`Bridge`](crate::Bridge).
//!
//! Config is used in two ways:
//! 1. **Bridge creation**: `Bridge::builder(producer).config(cfg).build()`
//! 2. **Scope defaults**: every bridge launched by a [`Scope`](crate::Scope) starts
//!    from the scope's config.
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1
//! - `delivery_capacity = 0` → clamped to 1

use std::borrow::Cow;

use crate::context::Context;
use crate::policies::ReactivationPolicy;

/// Configuration of one bridge instance.
///
/// Defines:
/// - **Execution contexts**: where the producer runs and where outcomes are delivered
/// - **Re-activation**: whether a finished producer is subscribed again
/// - **Event system**: bus capacity for lifecycle events
///
/// ## Field semantics
/// - `name`: Label attached to every event published by the bridge
/// - `producer`: Context handed to the producer when it is subscribed
/// - `delivery`: Context on which the attached sink receives snapshots
/// - `reactivation`: See [`ReactivationPolicy`]
/// - `bus_capacity`: Event bus ring buffer size (min 1)
/// - `delivery_capacity`: Pending wake-ups for a runtime delivery worker (min 1)
#[derive(Clone, Debug)]
pub struct Config {
    /// Human-readable bridge name (for logs/metrics).
    pub name: Cow<'static, str>,

    /// Where producer work runs.
    ///
    /// `Context::Inline` runs the producer on the thread that activates the bridge,
    /// which makes the whole pipeline synchronous.
    pub producer: Context,

    /// Where outcomes are delivered to the attached sink.
    ///
    /// - `Context::Inline` → delivered on the thread that published the outcome
    /// - `Context::Runtime` → delivered by one serial worker task (never concurrently)
    pub delivery: Context,

    /// Behavior on re-activation after a terminal outcome.
    pub reactivation: ReactivationPolicy,

    /// Capacity of the lifecycle event bus ring buffer.
    pub bus_capacity: usize,

    /// Capacity of the wake-up queue feeding a runtime delivery worker.
    ///
    /// The worker always reads the latest snapshot, so a full queue only means a
    /// wake-up is already pending.
    pub delivery_capacity: usize,
}

impl Config {
    /// Returns a config that runs producers and delivers outcomes on `ctx`.
    pub fn on(ctx: Context) -> Self {
        Self {
            producer: ctx.clone(),
            delivery: ctx,
            ..Self::default()
        }
    }

    /// Sets the bridge name.
    pub fn named(mut self, name: impl Into<Cow<'static, str>>) -> Self {
        self.name = name.into();
        self
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns a delivery queue capacity clamped to a minimum of 1.
    #[inline]
    pub fn delivery_capacity_clamped(&self) -> usize {
        self.delivery_capacity.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `name = "bridge"`
    /// - `producer = Context::Inline`, `delivery = Context::Inline`
    /// - `reactivation = ReactivationPolicy::Resubscribe`
    /// - `bus_capacity = 256`
    /// - `delivery_capacity = 1`
    fn default() -> Self {
        Self {
            name: Cow::Borrowed("bridge"),
            producer: Context::Inline,
            delivery: Context::Inline,
            reactivation: ReactivationPolicy::default(),
            bus_capacity: 256,
            delivery_capacity: 1,
        }
    }
}
