//! # Per-subscription callback object.
//!
//! An [`Emitter`] is what a producer talks to. It is bound to exactly one
//! subscription token: once that token is cancelled or has delivered its
//! terminal outcome, every further callback is absorbed (and reported as
//! `SignalDropped` on the event bus).
//!
//! Emitters hold the bridge weakly, so a producer that outlives its bridge
//! keeps nothing alive and its late callbacks go nowhere.

use std::fmt;
use std::sync::{Arc, Weak};

use crate::error::ProducerError;
use crate::events::{Event, EventKind};
use crate::producers::{Cancel, ProducerKind, Signal};

use super::bridge::Shared;
use super::token::Token;

/// Callbacks for one subscription of a producer.
///
/// Cheap to clone; every clone reports to the same subscription. All methods
/// may be called from any thread, including before `Producer::subscribe`
/// returns.
pub struct Emitter<T> {
    token: Arc<Token>,
    kind: ProducerKind,
    shared: Weak<Shared<T>>,
}

impl<T> Clone for Emitter<T> {
    fn clone(&self) -> Self {
        Self {
            token: Arc::clone(&self.token),
            kind: self.kind,
            shared: Weak::clone(&self.shared),
        }
    }
}

impl<T> fmt::Debug for Emitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Emitter")
            .field("token", &self.token.id())
            .field("kind", &self.kind)
            .field("live", &self.token.is_live())
            .finish()
    }
}

impl<T: Send + Sync + 'static> Emitter<T> {
    pub(crate) fn new(token: Arc<Token>, kind: ProducerKind, shared: Weak<Shared<T>>) -> Self {
        Self {
            token,
            kind,
            shared,
        }
    }

    /// Returns the id of the subscription this emitter reports to.
    #[inline]
    pub fn id(&self) -> u64 {
        self.token.id()
    }

    /// Returns the kind that decides how callbacks map to outcomes.
    #[inline]
    pub fn kind(&self) -> ProducerKind {
        self.kind
    }

    /// Returns `true` while callbacks can still publish.
    #[inline]
    pub fn is_live(&self) -> bool {
        self.token.is_live() && self.shared.strong_count() > 0
    }

    /// Returns `true` once the subscription was cancelled or its bridge dropped.
    ///
    /// Long-running producers should poll this (or their own handle) and stop.
    #[inline]
    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.shared.strong_count() == 0
    }

    /// Hands over the handle that stops this subscription's work.
    ///
    /// Only the first handle is kept. A handle that arrives after cancellation
    /// is cancelled immediately.
    pub fn on_subscribe(&self, handle: impl Cancel) {
        let attach = self.token.attach(Box::new(handle));
        if let Some(shared) = self.shared.upgrade() {
            shared.emit(|| {
                Event::new(EventKind::HandleAttached)
                    .with_token(self.token.id())
                    .with_reason(attach.as_label())
            });
        }
    }

    /// Reports one stream item.
    pub fn next(&self, value: T) {
        self.signal(Signal::Next(value));
    }

    /// Reports the single (or optional) value; terminal.
    pub fn success(&self, value: T) {
        self.signal(Signal::Success(value));
    }

    /// Reports completion; terminal.
    pub fn complete(&self) {
        self.signal(Signal::Complete);
    }

    /// Reports a failure; terminal.
    pub fn error(&self, error: impl Into<ProducerError>) {
        self.signal(Signal::Error(error.into()));
    }

    fn signal(&self, signal: Signal<T>) {
        let Some(shared) = self.shared.upgrade() else {
            return;
        };

        let mapped = match self.kind.map(signal) {
            Ok(mapped) => mapped,
            Err(name) => {
                shared.emit(|| self.dropped(format!("unmapped:{name}")));
                return;
            }
        };

        if mapped.terminal {
            if !self.token.terminate() {
                shared.emit(|| self.dropped("not_live"));
                return;
            }
            // Armed before delivery: a sink may re-activate from inside `deliver`.
            shared.mark_fired();
            shared.publish(mapped.outcome, Some(self.token.id()));
            shared.release(&self.token);
        } else {
            if !self.token.is_live() {
                shared.emit(|| self.dropped("not_live"));
                return;
            }
            shared.publish(mapped.outcome, Some(self.token.id()));
        }
    }

    fn dropped(&self, reason: impl Into<Arc<str>>) -> Event {
        Event::new(EventKind::SignalDropped)
            .with_token(self.token.id())
            .with_reason(reason)
    }
}
