//! Type-erased one-shot work shared by the function-backed producers.
//!
//! A job is either a blocking closure or a future factory. Either way it runs
//! on the producer context, races the subscription's cancellation token, and
//! turns a panic into [`ProducerError::Panicked`].

use std::future::Future;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;

use futures::FutureExt;
use futures::future::BoxFuture;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::error::ProducerError;

type BlockingJob<R> = Arc<dyn Fn() -> Result<R, ProducerError> + Send + Sync>;
type AsyncJob<R> = Arc<dyn Fn() -> BoxFuture<'static, Result<R, ProducerError>> + Send + Sync>;

pub(crate) enum Work<R> {
    Blocking(BlockingJob<R>),
    Async(AsyncJob<R>),
}

impl<R: Send + 'static> Work<R> {
    pub(crate) fn blocking<F>(f: F) -> Self
    where
        F: Fn() -> Result<R, ProducerError> + Send + Sync + 'static,
    {
        Work::Blocking(Arc::new(f))
    }

    pub(crate) fn future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<R, ProducerError>> + Send + 'static,
    {
        Work::Async(Arc::new(move || f().boxed()))
    }

    /// Runs the job once on `ctx`.
    ///
    /// `done` is skipped when `cancel` fires first.
    pub(crate) fn start<D>(&self, ctx: &Context, cancel: CancellationToken, done: D)
    where
        D: FnOnce(Result<R, ProducerError>) + Send + 'static,
    {
        match self {
            Work::Blocking(job) => {
                let job = Arc::clone(job);
                ctx.spawn_blocking(move || {
                    if cancel.is_cancelled() {
                        return;
                    }
                    let res = catch_unwind(AssertUnwindSafe(|| job()))
                        .unwrap_or_else(|p| Err(ProducerError::from_panic(p)));
                    if !cancel.is_cancelled() {
                        done(res);
                    }
                });
            }
            Work::Async(job) => {
                let job = Arc::clone(job);
                ctx.spawn(async move {
                    let guarded = AssertUnwindSafe(async move { job().await }).catch_unwind();
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {}
                        res = guarded => done(res.unwrap_or_else(|p| Err(ProducerError::from_panic(p)))),
                    }
                });
            }
        }
    }
}

impl<R> Clone for Work<R> {
    fn clone(&self) -> Self {
        match self {
            Work::Blocking(job) => Work::Blocking(Arc::clone(job)),
            Work::Async(job) => Work::Async(Arc::clone(job)),
        }
    }
}
