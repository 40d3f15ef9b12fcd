//! # Lifecycle events emitted by bridges.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Activation events**: the host drove the bridge active or inactive
//! - **Subscription events**: a token was created, attached, cancelled or released
//! - **Delivery events**: an outcome reached the latest-value slot (or was dropped)
//!
//! The [`Event`] struct carries additional metadata such as the bridge name,
//! token id, outcome label and slot version.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use livebridge::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::Published)
//!     .with_bridge("user-by-id")
//!     .with_token(3)
//!     .with_outcome("value")
//!     .with_version(1);
//!
//! assert_eq!(ev.kind, EventKind::Published);
//! assert_eq!(ev.bridge.as_deref(), Some("user-by-id"));
//! assert_eq!(ev.token, Some(3));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of bridge events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Activation events ===
    /// Bridge transitioned inactive → active.
    ///
    /// Sets:
    /// - `bridge`: bridge name
    Activated,

    /// Bridge transitioned active → inactive.
    ///
    /// Sets:
    /// - `bridge`: bridge name
    Deactivated,

    // === Subscription events ===
    /// A new token won the slot and the producer is being subscribed.
    ///
    /// Sets:
    /// - `bridge`, `token`
    Subscribed,

    /// The producer handed its cancellation handle to the token.
    ///
    /// Sets:
    /// - `bridge`, `token`
    /// - `reason`: `"attached"`, `"late"` (token already cancelled or terminated)
    ///   or `"duplicate"` (a handle was already stored; the new one was cancelled)
    HandleAttached,

    /// Deactivation cancelled the tracked token.
    ///
    /// Sets:
    /// - `bridge`, `token`
    Cancelled,

    /// The token was cleared from the bridge after a terminal outcome.
    ///
    /// Sets:
    /// - `bridge`, `token`
    Released,

    /// Activation did not subscribe because the bridge already fired
    /// (`ReactivationPolicy::FireOnce`).
    ///
    /// Sets:
    /// - `bridge`
    Suppressed,

    // === Delivery events ===
    /// An outcome was stored in the latest-value slot.
    ///
    /// Sets:
    /// - `bridge`, `token` (absent for host-side publishes)
    /// - `outcome`: outcome label
    /// - `version`: slot version
    Published,

    /// A producer signal was absorbed without publishing.
    ///
    /// Sets:
    /// - `bridge`, `token`
    /// - `reason`: why (`"not_live"`, `"unmapped:<signal>"`)
    SignalDropped,

    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `subscriber`: subscriber name
    /// - `reason`: reason string (e.g., "full", "closed")
    SubscriberOverflow,
}

/// Bridge event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Name of the bridge.
    pub bridge: Option<Arc<str>>,
    /// Name of the subscriber, for subscriber events.
    pub subscriber: Option<&'static str>,
    /// Token id, for subscription-scoped events.
    pub token: Option<u64>,
    /// Outcome label (`"value"`, `"completed"`, `"failed"`).
    pub outcome: Option<&'static str>,
    /// Latest-value slot version after a publish.
    pub version: Option<u64>,
    /// Human-readable reason (errors, overflow details, etc.).
    pub reason: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            bridge: None,
            subscriber: None,
            token: None,
            outcome: None,
            version: None,
            reason: None,
        }
    }

    /// Attaches a bridge name.
    #[inline]
    pub fn with_bridge(mut self, bridge: impl Into<Arc<str>>) -> Self {
        self.bridge = Some(bridge.into());
        self
    }

    /// Attaches a subscriber name.
    #[inline]
    pub fn with_subscriber(mut self, name: &'static str) -> Self {
        self.subscriber = Some(name);
        self
    }

    /// Attaches a token id.
    #[inline]
    pub fn with_token(mut self, id: u64) -> Self {
        self.token = Some(id);
        self
    }

    /// Attaches an outcome label.
    #[inline]
    pub fn with_outcome(mut self, label: &'static str) -> Self {
        self.outcome = Some(label);
        self
    }

    /// Attaches a slot version.
    #[inline]
    pub fn with_version(mut self, version: u64) -> Self {
        self.version = Some(version);
        self
    }

    /// Attaches a human-readable reason.
    #[inline]
    pub fn with_reason(mut self, reason: impl Into<Arc<str>>) -> Self {
        self.reason = Some(reason.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_subscriber(subscriber)
            .with_reason(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_subscriber(subscriber)
            .with_reason(info)
    }

    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }

    /// True for events a subscriber set reports about its own subscribers.
    #[inline]
    pub fn is_subscriber_event(&self) -> bool {
        matches!(
            self.kind,
            EventKind::SubscriberOverflow | EventKind::SubscriberPanicked
        )
    }
}
