//! # Event subscribers for bridges.
//!
//! This module provides the [`Subscribe`] trait and the [`SubscriberSet`] fan-out
//! used to observe lifecycle events broadcast through the [`Bus`](crate::events::Bus).
//!
//! ## Architecture
//! ```text
//! Event flow:
//!   Bridge / Emitter ── publish(Event) ──► Bus ──► subscriber_listener
//!                                                       │
//!                                                       ▼
//!                                                 SubscriberSet::emit(&Event)
//!                                                       │
//!                                             ┌─────────┼─────────┐
//!                                             ▼         ▼         ▼
//!                                         LogWriter  Metrics   Custom ...
//! ```
//!
//! ## Implementing custom subscribers
//! ```no_run
//! use livebridge::{Event, EventKind, Subscribe};
//! use async_trait::async_trait;
//!
//! struct CancelCounter;
//!
//! #[async_trait]
//! impl Subscribe for CancelCounter {
//!     async fn on_event(&self, event: &Event) {
//!         if let EventKind::Cancelled = event.kind {
//!             // increment cancellation counter
//!         }
//!     }
//! }
//! ```

#[cfg(feature = "logging")]
mod log;
mod set;
mod subscribe;

#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use set::SubscriberSet;
pub use subscribe::Subscribe;
