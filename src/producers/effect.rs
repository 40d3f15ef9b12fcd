//! # Function-backed effect producer.
//!
//! Effects are writes whose only interesting result is "done" or "failed":
//! inserts, deletes, cache invalidations.

use std::future::Future;

use futures::future;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::core::Emitter;
use crate::error::ProducerError;
use crate::outcome::Never;

use super::kind::ProducerKind;
use super::producer::Producer;
use super::work::Work;

/// Producer that completes or fails without a value.
///
/// # Example
/// ```
/// use livebridge::{Bridge, EffectFn, ProducerError};
///
/// let delete_all = EffectFn::from_fn(|| Ok::<(), ProducerError>(()));
/// let bridge = Bridge::builder(delete_all).build();
/// bridge.activate();
/// assert!(bridge.latest().unwrap().is_completed());
/// ```
pub struct EffectFn {
    work: Work<()>,
}

impl EffectFn {
    /// Wraps a blocking closure. It runs via `spawn_blocking` on the producer context.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<(), ProducerError> + Send + Sync + 'static,
    {
        Self {
            work: Work::blocking(f),
        }
    }

    /// Wraps a future factory.
    pub fn from_future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<(), ProducerError>> + Send + 'static,
    {
        Self {
            work: Work::future(f),
        }
    }

    /// Completes immediately on every subscription.
    pub fn complete() -> Self {
        Self::from_future(|| future::ready(Ok(())))
    }

    /// Fails with `error` on every subscription.
    pub fn error(error: impl Into<ProducerError>) -> Self {
        let error = error.into();
        Self::from_future(move || future::ready(Err(error.clone())))
    }
}

impl Producer<Never> for EffectFn {
    fn kind(&self) -> ProducerKind {
        ProducerKind::Effect
    }

    fn subscribe(&self, emitter: Emitter<Never>, ctx: &Context) {
        let cancel = CancellationToken::new();
        emitter.on_subscribe(cancel.clone());
        self.work.start(ctx, cancel, move |res| match res {
            Ok(()) => emitter.complete(),
            Err(e) => emitter.error(e),
        });
    }
}
