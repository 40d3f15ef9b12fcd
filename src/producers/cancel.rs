//! # Cancellation handles handed over by producers.
//!
//! A producer that starts work reports *how to stop it* through
//! [`Emitter::on_subscribe`](crate::Emitter::on_subscribe). The handle is stored
//! in the subscription token and invoked at most once per token by the bridge,
//! but the same handle may also be cancelled by the producer itself, so
//! implementations must be idempotent.

use tokio::task::AbortHandle;
use tokio_util::sync::CancellationToken;

/// Something that can stop in-flight producer work.
///
/// Calling [`cancel`](Cancel::cancel) more than once must be harmless.
pub trait Cancel: Send + Sync + 'static {
    /// Requests the underlying work to stop.
    fn cancel(&self);
}

impl Cancel for CancellationToken {
    fn cancel(&self) {
        CancellationToken::cancel(self);
    }
}

impl Cancel for AbortHandle {
    fn cancel(&self) {
        self.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cancellation_token_is_idempotent() {
        let token = CancellationToken::new();
        let handle: Box<dyn Cancel> = Box::new(token.clone());
        handle.cancel();
        handle.cancel();
        assert!(token.is_cancelled());
    }

    #[tokio::test]
    async fn test_abort_handle_stops_task() {
        let task = tokio::spawn(std::future::pending::<()>());
        Cancel::cancel(&task.abort_handle());
        let err = task.await.expect_err("task aborted");
        assert!(err.is_cancelled());
    }
}
