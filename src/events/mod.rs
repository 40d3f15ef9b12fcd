//! Bridge events: types and broadcast bus.
//!
//! This module groups the event **data model** and the **bus** used to
//! publish/subscribe to lifecycle events emitted by bridges, emitters and
//! subscriber workers.
//!
//! ## Contents
//! - [`EventKind`], [`Event`] event classification and payload metadata
//! - [`Bus`] thin wrapper over `tokio::sync::broadcast`
//!
//! ## Quick reference
//! - **Publishers**: `Bridge` (activation, subscription, publish), `Emitter`
//!   (dropped signals), `SubscriberSet` workers (overflow/panic).
//! - **Consumers**: the bridge's subscriber listener (fans out to `SubscriberSet`)
//!   and any receiver obtained from `Bridge::events()`.

mod bus;
mod event;

pub use bus::Bus;
pub use event::{Event, EventKind};
