//! Error types used by the bridge and its producers.
//!
//! This module defines two error enums:
//!
//! - [`ProducerError`]: failures surfaced by a wrapped producer. These never cross
//!   the bridge boundary as panics or `Err` returns; they are always republished as
//!   [`Outcome::Failed`](crate::Outcome::Failed).
//! - [`ContextError`]: raised when an execution context cannot be captured.
//!
//! Both types provide `as_label` for logging/metrics.

use std::any::Any;
use std::fmt::Display;

use thiserror::Error;

/// # Errors produced by a producer subscription.
///
/// The bridge captures these and routes them as data; the consumer decides
/// what a failure means (show a message, ignore, ...).
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProducerError {
    /// The producer reported a failure (e.g. a storage constraint violation).
    #[error("producer failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// The producer's work panicked; the panic was caught at the producer boundary.
    #[error("producer panicked: {info}")]
    Panicked {
        /// Panic payload rendered as text.
        info: String,
    },
}

impl ProducerError {
    /// Builds a [`ProducerError::Fail`] from anything printable.
    ///
    /// # Example
    /// ```
    /// use livebridge::ProducerError;
    ///
    /// let err = ProducerError::fail("UNIQUE constraint failed: users.id");
    /// assert_eq!(err.as_label(), "producer_failed");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        ProducerError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProducerError::Fail { .. } => "producer_failed",
            ProducerError::Panicked { .. } => "producer_panicked",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            ProducerError::Fail { error } => format!("error: {error}"),
            ProducerError::Panicked { info } => format!("panic: {info}"),
        }
    }

    /// Converts a caught panic payload into [`ProducerError::Panicked`].
    pub(crate) fn from_panic(payload: Box<dyn Any + Send>) -> Self {
        ProducerError::Panicked {
            info: panic_message(payload.as_ref()),
        }
    }
}

/// Renders a caught panic payload as text.
pub(crate) fn panic_message(payload: &(dyn Any + Send)) -> String {
    if let Some(msg) = payload.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = payload.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

impl From<String> for ProducerError {
    fn from(error: String) -> Self {
        ProducerError::Fail { error }
    }
}

impl From<&str> for ProducerError {
    fn from(error: &str) -> Self {
        ProducerError::fail(error)
    }
}

/// # Errors raised while capturing an execution context.
#[non_exhaustive]
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContextError {
    /// No Tokio runtime is entered on the calling thread.
    #[error("no tokio runtime entered on this thread")]
    NoRuntime,
}

impl ContextError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ContextError::NoRuntime => "context_no_runtime",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_labels_are_stable() {
        assert_eq!(ProducerError::fail("x").as_label(), "producer_failed");
        assert_eq!(
            ProducerError::Panicked { info: "x".into() }.as_label(),
            "producer_panicked"
        );
        assert_eq!(ContextError::NoRuntime.as_label(), "context_no_runtime");
    }

    #[test]
    fn test_from_panic_payloads() {
        let static_str = ProducerError::from_panic(Box::new("boom"));
        assert_eq!(static_str, ProducerError::Panicked { info: "boom".into() });

        let owned = ProducerError::from_panic(Box::new(String::from("kaboom")));
        assert_eq!(owned, ProducerError::Panicked { info: "kaboom".into() });

        let other = ProducerError::from_panic(Box::new(42_u8));
        assert_eq!(other.as_message(), "panic: unknown panic");
    }

    #[test]
    fn test_conversions_build_fail() {
        let a: ProducerError = "duplicate key".into();
        let b: ProducerError = String::from("duplicate key").into();
        assert_eq!(a, b);
        assert_eq!(a.to_string(), "producer failed: duplicate key");
    }
}
