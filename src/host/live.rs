//! # Observable host of a bridge.
//!
//! [`LiveOutcome`] plays the role of a lifecycle-aware observable value. It
//! owns a [`Bridge`], counts observers, and drives the bridge:
//!
//! ```text
//!             started && observers > 0 ?
//!                  │yes              │no
//!                  ▼                 ▼
//!          bridge.activate()   bridge.deactivate()
//! ```
//!
//! ## Delivery rules
//! - Snapshots are delivered only while active.
//! - Each observer sees every version at most once and never an older version
//!   after a newer one.
//! - Sticky (default): an observer added while active, or a host that becomes
//!   active again, gets the latest snapshot replayed.
//! - Once: each version goes to one observer only; a consumed snapshot is not
//!   replayed.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwap;

use crate::core::{Bridge, Deliver, Snapshot};

use super::lifecycle::Lifecycle;
use super::observer::Observer;

/// How snapshots are handed to observers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Delivery {
    /// Every observer sees the latest snapshot, including on (re)activation.
    #[default]
    Sticky,
    /// Every snapshot is consumed by at most one observer.
    Once,
}

/// Handle returned by [`LiveOutcome::observe`], used to remove the observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Registration<T> {
    id: ObserverId,
    observer: Box<dyn Observer<T>>,
    last_version: AtomicU64,
}

/// Lifecycle-aware holder of a bridge's latest outcome.
///
/// # Example
/// ```
/// use livebridge::{Bridge, LiveOutcome, Outcome, SingleFn};
/// use std::sync::{Arc, Mutex};
///
/// let host = LiveOutcome::new(Bridge::builder(SingleFn::just(5_u8)).build());
/// let seen = Arc::new(Mutex::new(Vec::new()));
/// let s = seen.clone();
/// host.observe(move |o: &Outcome<u8>| s.lock().unwrap().push(o.clone()));
///
/// // Not started yet: the producer has not run.
/// assert!(seen.lock().unwrap().is_empty());
///
/// host.start();
/// assert_eq!(seen.lock().unwrap().as_slice(), &[Outcome::Value(5)]);
/// ```
pub struct LiveOutcome<T> {
    bridge: Bridge<T>,
    observers: ArcSwap<Vec<Arc<Registration<T>>>>,
    started: AtomicBool,
    delivery: Delivery,
    consumed: AtomicU64,
    next_id: AtomicU64,
}

impl<T: Send + Sync + 'static> LiveOutcome<T> {
    /// Wraps `bridge` with sticky delivery.
    pub fn new(bridge: Bridge<T>) -> Arc<Self> {
        Self::with_delivery(bridge, Delivery::Sticky)
    }

    /// Wraps `bridge`; the host becomes the bridge's sink.
    pub fn with_delivery(bridge: Bridge<T>, delivery: Delivery) -> Arc<Self> {
        let host = Arc::new(Self {
            bridge,
            observers: ArcSwap::from_pointee(Vec::new()),
            started: AtomicBool::new(false),
            delivery,
            consumed: AtomicU64::new(0),
            next_id: AtomicU64::new(0),
        });
        let sink: Weak<Self> = Arc::downgrade(&host);
        host.bridge.attach(sink);
        host
    }

    /// Adds an observer. The bridge activates if the host is started.
    pub fn observe(&self, observer: impl Observer<T>) -> ObserverId {
        let id = ObserverId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let registration = Arc::new(Registration {
            id,
            observer: Box::new(observer),
            last_version: AtomicU64::new(0),
        });

        self.observers.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&registration));
            next
        });
        self.sync();

        if self.delivery == Delivery::Sticky && self.is_active() {
            if let Some(snapshot) = self.bridge.latest() {
                self.dispatch(&registration, &snapshot);
            }
        }
        id
    }

    /// Removes an observer; the bridge deactivates when none remain.
    ///
    /// Returns `false` if `id` was not registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let prev = self.observers.rcu(|current| {
            current
                .iter()
                .filter(|r| r.id != id)
                .cloned()
                .collect::<Vec<_>>()
        });
        let removed = prev.iter().any(|r| r.id == id);
        self.sync();
        removed
    }

    /// Starts the host (e.g. the owning screen became visible).
    pub fn start(&self) {
        if self.started.swap(true, Ordering::SeqCst) {
            return;
        }
        self.sync();
        if self.delivery == Delivery::Sticky {
            self.replay();
        }
    }

    /// Stops the host; the bridge deactivates and deliveries pause.
    pub fn stop(&self) {
        if self.started.swap(false, Ordering::SeqCst) {
            self.sync();
        }
    }

    /// Returns `true` while started with at least one observer.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.bridge.is_active()
    }

    /// Returns `true` between `start` and `stop`.
    pub fn is_started(&self) -> bool {
        self.started.load(Ordering::SeqCst)
    }

    /// Number of registered observers.
    pub fn observer_count(&self) -> usize {
        self.observers.load().len()
    }

    /// Returns the latest snapshot of the underlying bridge.
    pub fn latest(&self) -> Option<Arc<Snapshot<T>>> {
        self.bridge.latest()
    }

    /// The bridge driven by this host.
    pub fn bridge(&self) -> &Bridge<T> {
        &self.bridge
    }

    fn sync(&self) {
        if self.is_started() && !self.observers.load().is_empty() {
            self.bridge.activate();
        } else {
            self.bridge.deactivate();
        }
    }

    fn replay(&self) {
        if !self.is_active() {
            return;
        }
        if let Some(snapshot) = self.bridge.latest() {
            for registration in self.observers.load().iter() {
                self.dispatch(registration, &snapshot);
            }
        }
    }

    fn dispatch(&self, registration: &Registration<T>, snapshot: &Snapshot<T>) {
        let version = snapshot.version();
        if registration.last_version.fetch_max(version, Ordering::SeqCst) >= version {
            return;
        }
        if self.delivery == Delivery::Once
            && self.consumed.fetch_max(version, Ordering::SeqCst) >= version
        {
            return;
        }
        registration.observer.on_changed(snapshot.outcome());
    }
}

impl<T: Send + Sync + 'static> Deliver<T> for LiveOutcome<T> {
    fn deliver(&self, snapshot: Arc<Snapshot<T>>) {
        if !self.is_active() {
            return;
        }
        for registration in self.observers.load().iter() {
            self.dispatch(registration, &snapshot);
        }
    }
}

impl<T: Send + Sync + 'static> Lifecycle for LiveOutcome<T> {
    fn on_active(&self) {
        self.start();
    }

    fn on_inactive(&self) {
        self.stop();
    }
}
