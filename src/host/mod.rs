//! # Hosts: lifecycle-aware consumers of bridges.
//!
//! - [`Lifecycle`] the active/inactive seam a host drives
//! - [`LiveOutcome`] an observable value backed by a bridge
//! - [`Observer`] / [`Handlers`] receivers of delivered outcomes

mod lifecycle;
mod live;
mod observer;

pub use lifecycle::Lifecycle;
pub use live::{Delivery, LiveOutcome, ObserverId};
pub use observer::{Handlers, Observer};
