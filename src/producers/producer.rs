//! # Producer abstraction.
//!
//! A [`Producer`] is a description of deferred work. Nothing runs until the
//! bridge subscribes it, and each subscription receives a fresh
//! [`Emitter`](crate::Emitter) scoped to one token.
//!
//! The common handle type is [`ProducerRef`], an `Arc<dyn Producer<T>>`.

use std::sync::Arc;

use crate::context::Context;
use crate::core::Emitter;

use super::kind::ProducerKind;

/// # Deferred, cancellable source of outcomes.
///
/// ## Contract
/// - `subscribe` starts the work and returns; it may emit synchronously (before
///   returning) or later from any thread.
/// - Work that can be stopped reports a handle via
///   [`Emitter::on_subscribe`](crate::Emitter::on_subscribe), ideally before
///   doing anything else.
/// - At most one terminal callback is honored; later callbacks are dropped.
///
/// # Example
/// ```
/// use livebridge::{Context, Emitter, Producer, ProducerKind};
///
/// struct Answer;
///
/// impl Producer<u32> for Answer {
///     fn kind(&self) -> ProducerKind { ProducerKind::Single }
///
///     fn subscribe(&self, emitter: Emitter<u32>, _ctx: &Context) {
///         emitter.success(42);
///     }
/// }
/// ```
pub trait Producer<T>: Send + Sync + 'static {
    /// Returns the result shape of this producer.
    fn kind(&self) -> ProducerKind;

    /// Starts one subscription, reporting through `emitter`.
    ///
    /// `ctx` is where the work is expected to run.
    fn subscribe(&self, emitter: Emitter<T>, ctx: &Context);
}

/// Shared handle to a producer.
pub type ProducerRef<T> = Arc<dyn Producer<T>>;
