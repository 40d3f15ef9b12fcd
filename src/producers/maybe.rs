//! # Function-backed optional-value producer.

use std::future::Future;

use futures::future;
use tokio_util::sync::CancellationToken;

use crate::context::Context;
use crate::core::Emitter;
use crate::error::ProducerError;

use super::kind::ProducerKind;
use super::producer::Producer;
use super::work::Work;

/// Producer of at most one value.
///
/// `Ok(Some(v))` publishes `Outcome::Value(v)`, `Ok(None)` publishes
/// `Outcome::Completed`.
///
/// # Example
/// ```
/// use livebridge::{Bridge, MaybeFn, Outcome, ProducerError};
///
/// let lookup = MaybeFn::from_fn(|| Ok::<Option<String>, ProducerError>(None));
/// let bridge = Bridge::builder(lookup).build();
/// bridge.activate();
/// assert!(bridge.latest().unwrap().is_completed());
/// ```
pub struct MaybeFn<T> {
    work: Work<Option<T>>,
}

impl<T: Send + 'static> MaybeFn<T> {
    /// Wraps a blocking lookup. It runs via `spawn_blocking` on the producer context.
    pub fn from_fn<F>(f: F) -> Self
    where
        F: Fn() -> Result<Option<T>, ProducerError> + Send + Sync + 'static,
    {
        Self {
            work: Work::blocking(f),
        }
    }

    /// Wraps a future factory.
    pub fn from_future<F, Fut>(f: F) -> Self
    where
        F: Fn() -> Fut + Send + Sync + 'static,
        Fut: Future<Output = Result<Option<T>, ProducerError>> + Send + 'static,
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
        Self::from_future(move || future::ready(Ok(Some(value.clone()))))
    }

    /// Completes without a value on every subscription.
    pub fn empty() -> Self {
        Self::from_future(|| future::ready(Ok(None)))
    }

    /// Fails with `error` on every subscription.
    pub fn error(error: impl Into<ProducerError>) -> Self {
        let error = error.into();
        Self::from_future(move || future::ready(Err(error.clone())))
    }
}

impl<T: Send + Sync + 'static> Producer<T> for MaybeFn<T> {
    fn kind(&self) -> ProducerKind {
        ProducerKind::Maybe
    }

    fn subscribe(&self, emitter: Emitter<T>, ctx: &Context) {
        let cancel = CancellationToken::new();
        emitter.on_subscribe(cancel.clone());
        self.work.start(ctx, cancel, move |res| match res {
            Ok(Some(value)) => emitter.success(value),
            Ok(None) => emitter.complete(),
            Err(e) => emitter.error(e),
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Bridge;
    use crate::outcome::Outcome;

    #[test]
    fn test_present_and_absent_values() {
        let found = Bridge::builder(MaybeFn::just("ada".to_string())).build();
        found.activate();
        assert_eq!(
            found.latest().unwrap().outcome(),
            &Outcome::Value("ada".to_string())
        );

        let missing = Bridge::builder(MaybeFn::<String>::empty()).build();
        missing.activate();
        assert!(missing.latest().unwrap().is_completed());
    }

    #[tokio::test]
    async fn test_blocking_lookup_on_runtime() {
        use crate::config::Config;
        use crate::test_util::Recorder;
        use std::time::Duration;

        let bridge = Bridge::new(
            MaybeFn::from_fn(|| Ok(Some(3_u16))),
            Config::on(Context::current()),
        );
        let recorder = Recorder::attach_to(&bridge);
        bridge.activate();

        assert!(
            recorder
                .wait_for(Duration::from_secs(1), |o| o == &Outcome::Value(3))
                .await
        );
    }
}
