//! # Re-activation policy for bridges.
//!
//! [`ReactivationPolicy`] decides what happens when a bridge becomes active again
//! after its producer already delivered a terminal outcome.
//!
//! ```text
//! activate ─► subscribe ─► terminal outcome ─► deactivate ─► activate ─► ?
//!
//! ReactivationPolicy::Resubscribe → subscribe again (the work is repeated)
//! ReactivationPolicy::FireOnce    → nothing; the latest outcome stays as is
//! ```
//!
//! Only a *terminal* outcome arms `FireOnce`. A subscription that was cancelled by
//! deactivation before it finished is always started again on the next activation.
//!
//! ## Choosing the right policy
//! **Queries** (read a row, load a list): `Resubscribe` (default) keeps the
//! observed value fresh every time the consumer comes back to the foreground.
//!
//! **Commands** (insert, update, delete): `FireOnce` guarantees the side effect
//! runs at most once per bridge even if the consumer is paused and resumed.

/// Policy controlling whether a bridge resubscribes after a terminal outcome.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ReactivationPolicy {
    /// Resubscribe on every inactive → active transition (default).
    #[default]
    Resubscribe,
    /// Never subscribe again once a terminal outcome has been published.
    FireOnce,
}

impl ReactivationPolicy {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    pub fn as_label(&self) -> &'static str {
        match self {
            ReactivationPolicy::Resubscribe => "resubscribe",
            ReactivationPolicy::FireOnce => "fire_once",
        }
    }
}
