//! # Stream-backed producer.
//!
//! [`StreamFn`] builds a fresh [`Stream`] per subscription and forwards its
//! items until the stream ends, fails, or the subscription is cancelled.
//!
//! ```text
//! subscribe ─► factory() ─► loop {
//!                             select! {
//!                               cancelled      ─► stop (no callback)
//!                               Some(Ok(v))    ─► emitter.next(v)
//!                               Some(Err(e))   ─► emitter.error(e), stop
//!                               None           ─► emitter.complete(), stop
//!                               panic          ─► emitter.error(Panicked), stop
//!                             }
//!                           }
//! ```
//!
//! With [`Context::Inline`] the whole stream is drained before `subscribe`
//! returns, so it suits finite, reactor-free streams (e.g. [`StreamFn::from_iter`]).
//! Timers and I/O need [`Context::Runtime`].

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use futures::stream::{self, BoxStream};
use futures::{FutureExt, Stream, StreamExt};
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::core::Emitter;
use crate::error::ProducerError;

use super::kind::ProducerKind;
use super::producer::Producer;

type StreamFactory<T> = Arc<dyn Fn() -> BoxStream<'static, Result<T, ProducerError>> + Send + Sync>;

/// Producer of zero or more values followed by completion or failure.
///
/// # Example
/// ```
/// use livebridge::{Bridge, Outcome, StreamFn};
///
/// let bridge = Bridge::builder(StreamFn::from_iter(vec![1_u8, 2, 3])).build();
/// bridge.activate();
///
/// let snap = bridge.latest().unwrap();
/// assert!(snap.is_completed());
/// assert_eq!(snap.version(), 4);
/// ```
pub struct StreamFn<T> {
    factory: StreamFactory<T>,
}

impl<T: Send + 'static> StreamFn<T> {
    /// Wraps a stream factory. Each subscription polls a fresh stream.
    pub fn from_stream<F, S>(f: F) -> Self
    where
        F: Fn() -> S + Send + Sync + 'static,
        S: Stream<Item = Result<T, ProducerError>> + Send + 'static,
    {
        Self {
            factory: Arc::new(move || f().boxed()),
        }
    }

    /// Emits a copy of `items` on every subscription, then completes.
    pub fn from_iter<I>(items: I) -> Self
    where
        I: IntoIterator<Item = T> + Clone + Send + Sync + 'static,
        I::IntoIter: Send + 'static,
    {
        Self::from_stream(move || stream::iter(items.clone()).map(Ok))
    }

    /// Completes without items on every subscription.
    pub fn empty() -> Self {
        Self::from_stream(|| stream::empty())
    }

    /// Fails with `error` before any item, on every subscription.
    pub fn error(error: impl Into<ProducerError>) -> Self {
        let error = error.into();
        Self::from_stream(move || stream::once(futures::future::ready(Err(error.clone()))))
    }
}

impl<T: Send + Sync + 'static> Producer<T> for StreamFn<T> {
    fn kind(&self) -> ProducerKind {
        ProducerKind::Stream
    }

    fn subscribe(&self, emitter: Emitter<T>, ctx: &Context) {
        let cancel = CancellationToken::new();
        emitter.on_subscribe(cancel.clone());
        let factory = Arc::clone(&self.factory);

        ctx.spawn(async move {
            let mut items = match catch_unwind(AssertUnwindSafe(|| factory())) {
                Ok(items) => items,
                Err(p) => return emitter.error(ProducerError::from_panic(p)),
            };

            loop {
                let item = tokio::select! {
                    biased;
                    _ = cancel.cancelled() => return,
                    item = AssertUnwindSafe(items.next()).catch_unwind() => item,
                };
                match item {
                    Ok(Some(Ok(value))) => emitter.next(value),
                    Ok(Some(Err(e))) => return emitter.error(e),
                    Ok(None) => return emitter.complete(),
                    Err(p) => return emitter.error(ProducerError::from_panic(p)),
                }
            }
        });
    }
}
