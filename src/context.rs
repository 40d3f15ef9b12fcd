//! # Explicit execution contexts.
//!
//! A [`Context`] names *where* work runs. Bridges never consult process-wide
//! scheduler defaults: the producer context and the delivery context are both
//! passed in through [`Config`](crate::Config), so tests can substitute
//! [`Context::Inline`] and get fully deterministic, synchronous behavior.
//!
//! ```text
//! Context::Inline          spawn(fut)          → block_on(fut) on the caller
//!                          spawn_blocking(f)   → f() on the caller
//!
//! Context::Runtime(handle) spawn(fut)          → handle.spawn(fut)
//!                          spawn_blocking(f)   → handle.spawn_blocking(f)
//! ```

use std::fmt;
use std::future::Future;

use tokio::runtime::Handle;

use crate::error::ContextError;

/// Execution context for producer work or outcome delivery.
#[derive(Clone, Default)]
pub enum Context {
    /// Run on the calling thread. Futures are driven to completion with
    /// `futures::executor::block_on`, so they must not depend on a Tokio reactor.
    #[default]
    Inline,
    /// Run on a Tokio runtime.
    Runtime(Handle),
}

impl Context {
    /// Captures the runtime entered on the calling thread.
    ///
    /// # Panics
    /// Panics when called outside of a Tokio runtime; use [`Context::try_current`]
    /// for a fallible variant.
    pub fn current() -> Self {
        Context::Runtime(Handle::current())
    }

    /// Captures the runtime entered on the calling thread, if any.
    pub fn try_current() -> Result<Self, ContextError> {
        Handle::try_current()
            .map(Context::Runtime)
            .map_err(|_| ContextError::NoRuntime)
    }

    /// Returns `true` for [`Context::Inline`].
    #[inline]
    pub fn is_inline(&self) -> bool {
        matches!(self, Context::Inline)
    }

    /// Runs an async job on this context (fire-and-forget).
    pub fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        match self {
            Context::Inline => futures::executor::block_on(fut),
            Context::Runtime(handle) => {
                handle.spawn(fut);
            }
        }
    }

    /// Runs a blocking job on this context (fire-and-forget).
    pub fn spawn_blocking<F>(&self, f: F)
    where
        F: FnOnce() + Send + 'static,
    {
        match self {
            Context::Inline => f(),
            Context::Runtime(handle) => {
                handle.spawn_blocking(f);
            }
        }
    }
}

impl fmt::Debug for Context {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Context::Inline => f.write_str("Inline"),
            Context::Runtime(_) => f.write_str("Runtime(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    #[test]
    fn test_inline_runs_before_returning() {
        let ran = Arc::new(AtomicBool::new(false));

        let r = ran.clone();
        Context::Inline.spawn_blocking(move || r.store(true, Ordering::SeqCst));
        assert!(ran.swap(false, Ordering::SeqCst));

        let r = ran.clone();
        Context::Inline.spawn(async move { r.store(true, Ordering::SeqCst) });
        assert!(ran.load(Ordering::SeqCst));
    }

    #[test]
    fn test_try_current_outside_runtime() {
        assert_eq!(Context::try_current().err(), Some(ContextError::NoRuntime));
    }

    #[tokio::test]
    async fn test_runtime_context_spawns() {
        let ctx = Context::try_current().expect("inside runtime");
        assert!(!ctx.is_inline());

        let (tx, rx) = tokio::sync::oneshot::channel();
        ctx.spawn_blocking(move || {
            let _ = tx.send(7_u8);
        });
        assert_eq!(rx.await.unwrap(), 7);
    }
}
