//! Core bridge machinery.
//!
//! - [`Bridge`] owns the subscription slot, the latest-value slot and the dispatcher.
//! - [`Emitter`] is the per-subscription callback object handed to producers.
//! - `Token` is the identity (and cancellation handle) of one subscription.

mod bridge;
mod builder;
mod dispatch;
mod emitter;
mod slot;
mod token;

pub use bridge::Bridge;
pub use builder::BridgeBuilder;
pub use dispatch::Deliver;
pub use emitter::Emitter;
pub use slot::Snapshot;
