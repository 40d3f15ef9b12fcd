//! # Active/inactive transitions.
//!
//! [`Lifecycle`] is the seam between an observable host and whatever it keeps
//! alive. A host calls [`on_active`](Lifecycle::on_active) when it gains its
//! first observer while started, and [`on_inactive`](Lifecycle::on_inactive)
//! when it loses the last one or is stopped.

use crate::core::Bridge;

/// Receiver of host lifecycle transitions.
///
/// Both calls may repeat; implementations must treat repeated calls as no-ops.
pub trait Lifecycle: Send + Sync + 'static {
    /// The owner became active (started, visible).
    fn on_active(&self);
    /// The owner became inactive; outstanding work is cancelled.
    fn on_inactive(&self);
}

impl<T: Send + Sync + 'static> Lifecycle for Bridge<T> {
    fn on_active(&self) {
        self.activate();
    }

    fn on_inactive(&self) {
        self.deactivate();
    }
}
