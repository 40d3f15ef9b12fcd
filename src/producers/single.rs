//! # Function-backed single-value producer.
//!
//! [`SingleFn`] wraps a closure (blocking) or a future factory that yields
//! exactly one value or fails. Each subscription runs the job once on the
//! producer context.

use std::future::Future;

use futures::future;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::core::Emitter;
use crate::error::ProducerError;

use super::kind::ProducerKind;
use super::producer::Producer;
use super::work::Work;

/// Producer of exactly one value.
///
/// # Example
/// ```
/// use livebridge::{Bridge, Outcome, ProducerError, SingleFn};
///
/// let insert = SingleFn::from_fn(|| {
///     // e.g. dao.insert(&user) returning the new row id
///     Ok::<u64, ProducerError>(17)
/// });
///
/// let bridge = Bridge::builder(insert).build();
/// bridge.activate();
/// assert_eq!(bridge.latest().unwrap().outcome(), &Outcome::Value(17));
/// ```
pub struct SingleFn<T> {
    work: Work<T>,
}

impl<T: Send + 'static> SingleFn<T> {
    /// Wraps a blocking closure. It runs via `spawn_blocking` on the producer context.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<T, ProducerError> + Send + Sync + 'static,
    {
        Self {
            work: Work::blocking(f),
        }
    }

    /// Wraps a future factory. Each subscription awaits a fresh future.
    pub fn from_future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<T, ProducerError>> + Send + 'static,
    {
        Self {
            work: Work::future(f),
        }
    }

    /// Yields `value` on every subscription.
    pub fn just(value: T) -> Self
    where
        T: Clone + Sync,
    {
        Self::from_future(move || future::ready(Ok(value.clone())))
    }

    /// Fails with `error` on every subscription.
    pub fn error(error: impl Into<ProducerError>) -> Self {
        let error = error.into();
        Self::from_future(move || future::ready(Err(error.clone())))
    }
}

impl<T: Send + Sync + 'static> Producer<T> for SingleFn<T> {
    fn kind(&self) -> ProducerKind {
        ProducerKind::Single
    }

    fn subscribe(&self, emitter: Emitter<T>, ctx: &Context) {
        let cancel = CancellationToken::new();
        emitter.on_subscribe(cancel.clone());
        self.work.start(ctx, cancel, move |res| match res {
            Ok(value) => emitter.success(value),
            Err(e) => emitter.error(e),
        });
    }
}
