//! # Observers of published outcomes.
//!
//! An [`Observer`] receives every outcome a [`LiveOutcome`](crate::LiveOutcome)
//! delivers. Closures taking `&Outcome<T>` are observers; [`Handlers`] splits
//! an outcome into per-case callbacks:
//!
//! ```text
//! Outcome::Value(v)   ─► on_value(&v)
//! Outcome::Failed(e)  ─► on_error(&e)
//! Outcome::Completed  ─► on_complete()
//! ```
//!
//! A missing handler ignores its case.

use std::fmt;

use crate::error::ProducerError;
use crate::outcome::Outcome;

/// Receiver of delivered outcomes.
pub trait Observer<T>: Send + Sync + 'static {
    fn on_changed(&self, outcome: &Outcome<T>);
}

impl<T, F> Observer<T> for F
where
    F: Fn(&Outcome<T>) + Send + Sync + 'static,
{
    fn on_changed(&self, outcome: &Outcome<T>) {
        self(outcome)
    }
}

type ValueFn<T> = Box<dyn Fn(&T) + Send + Sync>;
type ErrorFn = Box<dyn Fn(&ProducerError) + Send + Sync>;
type CompleteFn = Box<dyn Fn() + Send + Sync>;

/// Per-case outcome callbacks.
///
/// # Example
/// ```
/// use livebridge::{Handlers, Outcome, Observer};
///
/// let handlers = Handlers::single(|id: &u64| println!("inserted row {id}"))
///     .on_error(|e| eprintln!("insert failed: {e}"));
///
/// handlers.on_changed(&Outcome::Value(17));
/// ```
pub struct Handlers<T> {
    value: Option<ValueFn<T>>,
    error: Option<ErrorFn>,
    complete: Option<CompleteFn>,
}

impl<T> Handlers<T> {
    /// Creates handlers that ignore every case.
    pub fn new() -> Self {
        Self {
            value: None,
            error: None,
            complete: None,
        }
    }

    /// Handlers for a single-value producer.
    pub fn single(on_success: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self::new().on_value(on_success)
    }

    /// Handlers for an optional-value producer: `Completed` means "not found".
    pub fn maybe(
        on_success: impl Fn(&T) + Send + Sync + 'static,
        on_empty: impl Fn() + Send + Sync + 'static,
    ) -> Self {
        Self::new().on_value(on_success).on_complete(on_empty)
    }

    /// Handlers for an effect producer.
    pub fn completable(on_complete: impl Fn() + Send + Sync + 'static) -> Self {
        Self::new().on_complete(on_complete)
    }

    /// Handlers for a stream producer.
    pub fn stream(on_next: impl Fn(&T) + Send + Sync + 'static) -> Self {
        Self::new().on_value(on_next)
    }

    /// Sets the handler for values.
    pub fn on_value(mut self, f: impl Fn(&T) + Send + Sync + 'static) -> Self {
        self.value = Some(Box::new(f));
        self
    }

    /// Sets the handler for failures.
    pub fn on_error(mut self, f: impl Fn(&ProducerError) + Send + Sync + 'static) -> Self {
        self.error = Some(Box::new(f));
        self
    }

    /// Sets the handler for completion (and for an empty optional result).
    pub fn on_complete(mut self, f: impl Fn() + Send + Sync + 'static) -> Self {
        self.complete = Some(Box::new(f));
        self
    }
}

impl<T> Default for Handlers<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for Handlers<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Handlers")
            .field("value", &self.value.is_some())
            .field("error", &self.error.is_some())
            .field("complete", &self.complete.is_some())
            .finish()
    }
}

impl<T: 'static> Observer<T> for Handlers<T> {
    fn on_changed(&self, outcome: &Outcome<T>) {
        match outcome {
            Outcome::Value(v) => {
                if let Some(f) = &self.value {
                    f(v)
                }
            }
            Outcome::Failed(e) => {
                if let Some(f) = &self.error {
                    f(e)
                }
            }
            Outcome::Completed => {
                if let Some(f) = &self.complete {
                    f()
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    #[test]
    fn test_handlers_route_each_case() {
        let log = Arc::new(Mutex::new(Vec::<String>::new()));
        let (a, b, c) = (log.clone(), log.clone(), log.clone());
        let handlers = Handlers::maybe(
            move |v: &u8| a.lock().unwrap().push(format!("value {v}")),
            move || b.lock().unwrap().push("empty".into()),
        )
        .on_error(move |e| c.lock().unwrap().push(e.as_label().into()));

        handlers.on_changed(&Outcome::Value(1));
        handlers.on_changed(&Outcome::Completed);
        handlers.on_changed(&Outcome::Failed("x".into()));

        assert_eq!(
            log.lock().unwrap().as_slice(),
            &["value 1", "empty", "producer_failed"]
        );
    }

    #[test]
    fn test_missing_handlers_ignore_their_case() {
        let handlers = Handlers::<u8>::completable(|| {});
        handlers.on_changed(&Outcome::Value(1));
        handlers.on_changed(&Outcome::Failed("x".into()));
    }

    #[test]
    fn test_closure_is_an_observer() {
        let seen = Arc::new(Mutex::new(None));
        let s = seen.clone();
        let observer = move |o: &Outcome<u8>| *s.lock().unwrap() = Some(o.as_label());
        observer.on_changed(&Outcome::Completed);
        assert_eq!(*seen.lock().unwrap(), Some("completed"));
    }
}
