//! # Outcome of a producer subscription.
//!
//! [`Outcome`] is the only thing a consumer ever sees from a bridge: a value, a
//! completion signal, or a captured [`ProducerError`].
//!
//! ```text
//! effect   : Completed | Failed
//! single   : Value     | Failed
//! maybe    : Value     | Completed | Failed
//! stream   : Value* then (Completed | Failed)
//! ```

use std::convert::Infallible;

use crate::error::ProducerError;

/// Payload type of effect-only producers: they never publish a value.
pub type Never = Infallible;

/// Tagged result of a subscription.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// Terminal, no payload. For optional-result producers it means "no value present".
    Completed,
    /// A produced item. Terminal for single/optional producers, repeatable for streams.
    Value(T),
    /// Terminal failure captured from the producer.
    Failed(ProducerError),
}

impl<T> Outcome<T> {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            Outcome::Completed => "completed",
            Outcome::Value(_) => "value",
            Outcome::Failed(_) => "failed",
        }
    }

    /// Returns the value, if any.
    pub fn value(&self) -> Option<&T> {
        match self {
            Outcome::Value(v) => Some(v),
            _ => None,
        }
    }

    /// Returns the captured error, if any.
    pub fn error(&self) -> Option<&ProducerError> {
        match self {
            Outcome::Failed(e) => Some(e),
            _ => None,
        }
    }

    #[inline]
    pub fn is_completed(&self) -> bool {
        matches!(self, Outcome::Completed)
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        matches!(self, Outcome::Failed(_))
    }

    /// Maps the value payload, leaving `Completed`/`Failed` untouched.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Outcome<U> {
        match self {
            Outcome::Completed => Outcome::Completed,
            Outcome::Value(v) => Outcome::Value(f(v)),
            Outcome::Failed(e) => Outcome::Failed(e),
        }
    }

    /// Builds an outcome from an optional result, `Ok(None)` becoming `Completed`.
    pub fn from_optional(res: Result<Option<T>, ProducerError>) -> Self {
        match res {
            Ok(Some(v)) => Outcome::Value(v),
            Ok(None) => Outcome::Completed,
            Err(e) => Outcome::Failed(e),
        }
    }

    /// Converts into a `Result`, `Completed` becoming `Ok(None)`.
    pub fn into_result(self) -> Result<Option<T>, ProducerError> {
        match self {
            Outcome::Completed => Ok(None),
            Outcome::Value(v) => Ok(Some(v)),
            Outcome::Failed(e) => Err(e),
        }
    }
}

impl<T> From<Result<T, ProducerError>> for Outcome<T> {
    fn from(res: Result<T, ProducerError>) -> Self {
        match res {
            Ok(v) => Outcome::Value(v),
            Err(e) => Outcome::Failed(e),
        }
    }
}
