//! # Producer kinds and the signal → outcome mapping.
//!
//! Every producer declares one [`ProducerKind`]. The kind decides which of the
//! four emitter callbacks are meaningful and how each one becomes an
//! [`Outcome`]:
//!
//! ```text
//!            next(v)        success(v)       complete()      error(e)
//! Effect     -              -                Completed ■     Failed ■
//! Single     -              Value ■          -               Failed ■
//! Maybe      -              Value ■          Completed ■     Failed ■
//! Stream     Value          -                Completed ■     Failed ■
//!
//! ■ terminal: ends the subscription
//! - unmapped: dropped and reported as SignalDropped
//! ```

use crate::error::ProducerError;
use crate::outcome::Outcome;

/// Shape of a producer's result.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProducerKind {
    /// Completes or fails; never yields a value.
    Effect,
    /// Exactly one value or a failure.
    Single,
    /// At most one value, then completes; or fails.
    Maybe,
    /// Zero or more values, then completes or fails.
    Stream,
}

impl ProducerKind {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ProducerKind::Effect => "effect",
            ProducerKind::Single => "single",
            ProducerKind::Maybe => "maybe",
            ProducerKind::Stream => "stream",
        }
    }

    /// Translates an emitter callback into an outcome.
    ///
    /// Returns the callback name when this kind has no mapping for it.
    pub(crate) fn map<T>(self, signal: Signal<T>) -> Result<Mapped<T>, &'static str> {
        use ProducerKind::*;

        let mapped = match (self, signal) {
            (_, Signal::Error(e)) => Mapped::terminal(Outcome::Failed(e)),
            (Effect | Maybe | Stream, Signal::Complete) => Mapped::terminal(Outcome::Completed),
            (Single | Maybe, Signal::Success(v)) => Mapped::terminal(Outcome::Value(v)),
            (Stream, Signal::Next(v)) => Mapped {
                outcome: Outcome::Value(v),
                terminal: false,
            },
            (_, other) => return Err(other.name()),
        };
        Ok(mapped)
    }
}

/// One emitter callback, before mapping.
#[derive(Debug)]
pub(crate) enum Signal<T> {
    Next(T),
    Success(T),
    Complete,
    Error(ProducerError),
}

impl<T> Signal<T> {
    pub(crate) fn name(&self) -> &'static str {
        match self {
            Signal::Next(_) => "next",
            Signal::Success(_) => "success",
            Signal::Complete => "complete",
            Signal::Error(_) => "error",
        }
    }
}

/// A mapped signal.
#[derive(Debug)]
pub(crate) struct Mapped<T> {
    pub(crate) outcome: Outcome<T>,
    /// Ends the subscription when `true`.
    pub(crate) terminal: bool,
}

impl<T> Mapped<T> {
    fn terminal(outcome: Outcome<T>) -> Self {
        Self {
            outcome,
            terminal: true,
        }
    }
}
