//! # livebridge
//!
//! **Livebridge** binds deferred, cancellable producers (storage reads, writes,
//! change streams) to lifecycle-aware observable hosts.
//!
//! A producer runs only while its host is *active* (started and observed). It
//! is cancelled when the host goes inactive, and its results are republished
//! as [`Outcome`] values in a latest-value slot that late observers can read.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌────────────┐
//!   │  EffectFn  │  │  SingleFn  │  │  MaybeFn   │  │  StreamFn  │
//!   └─────┬──────┘  └─────┬──────┘  └─────┬──────┘  └─────┬──────┘
//!         └───────────────┴───────┬───────┴───────────────┘
//!                                 ▼  Producer<T>::subscribe(emitter, ctx)
//! ┌───────────────────────────────────────────────────────────────────┐
//! │  Bridge<T>                                                        │
//! │  - token slot   (at most one live subscription, CAS only)         │
//! │  - LatestSlot   (versioned snapshot, never torn)                  │
//! │  - Dispatcher   (inline or one serial worker on a runtime)        │
//! │  - Bus          (lifecycle events)                                │
//! └──────┬──────────────────────────────┬─────────────────────────────┘
//!        │ Deliver<T>                   │ Event
//!        ▼                              ▼
//! ┌─────────────────────┐        ┌────────────────────────┐
//! │  LiveOutcome<T>     │        │  subscriber_listener   │
//! │  start/stop         │        └───────────┬────────────┘
//! │  observe/remove     │                    ▼
//! └──────────┬──────────┘              SubscriberSet
//!            ▼                      ┌────────┼────────┐
//!     Observer / Handlers           ▼        ▼        ▼
//!                               LogWriter  metrics  custom
//! ```
//!
//! ### Lifecycle
//! ```text
//! host.start() + first observer ──► bridge.activate()
//!    ├─► FireOnce && fired ─► Suppressed (no subscription)
//!    └─► new token ─► producer.subscribe(emitter, ctx)
//!             │
//!             ├─ emitter.on_subscribe(handle)   handle kept by the token
//!             ├─ emitter.next(v)                Value (stream only)
//!             └─ emitter.success/complete/error terminal: publish once, release token
//!
//! host.stop() or last observer removed ──► bridge.deactivate()
//!    └─► token.cancel() ─► handle.cancel(); later callbacks are absorbed
//! ```
//!
//! ## Features
//! | Area              | Description                                                   | Key types / traits                                  |
//! |-------------------|---------------------------------------------------------------|-----------------------------------------------------|
//! | **Producers**     | Deferred work as effect, single, optional or stream results.  | [`Producer`], [`EffectFn`], [`SingleFn`], [`MaybeFn`], [`StreamFn`] |
//! | **Bridge**        | At-most-one subscription, cancellation, latest-value slot.    | [`Bridge`], [`Emitter`], [`Snapshot`]               |
//! | **Hosts**         | Lifecycle-aware observable values and per-case callbacks.     | [`LiveOutcome`], [`Observer`], [`Handlers`]         |
//! | **Scopes**        | Fire-and-forget actions cancelled together.                   | [`Scope`]                                           |
//! | **Contexts**      | Explicit producer and delivery contexts.                      | [`Context`], [`Config`]                             |
//! | **Subscriber API**| Hook into lifecycle events (logging, metrics, custom).        | [`Subscribe`], [`Event`]                            |
//! | **Errors**        | Failures routed as data.                                      | [`ProducerError`], [`Outcome`]                      |
//!
//! ## Optional features
//! - `logging`: exports a simple built-in [`LogWriter`] _(demo/reference only)_.
//!
//! ## Example
//! ```rust
//! use std::sync::Arc;
//! use livebridge::{Bridge, Config, Context, Handlers, LiveOutcome, MaybeFn, ProducerError};
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let cfg = Config::on(Context::try_current()?).named("user-by-id");
//!
//!     // Build subscribers (optional)
//!     #[cfg(feature = "logging")]
//!     let subs: Vec<Arc<dyn livebridge::Subscribe>> = {
//!         use livebridge::LogWriter;
//!         vec![Arc::new(LogWriter::default())]
//!     };
//!     #[cfg(not(feature = "logging"))]
//!     let subs: Vec<Arc<dyn livebridge::Subscribe>> = Vec::new();
//!
//!     let lookup = MaybeFn::from_future(|| async {
//!         Ok::<_, ProducerError>(Some(String::from("ada")))
//!     });
//!     let bridge = Bridge::builder(lookup)
//!         .config(cfg)
//!         .with_subscribers(subs)
//!         .build();
//!
//!     let (tx, rx) = tokio::sync::oneshot::channel();
//!     let tx = std::sync::Mutex::new(Some(tx));
//!     let host = LiveOutcome::new(bridge);
//!     host.observe(
//!         Handlers::maybe(
//!             move |name: &String| {
//!                 if let Some(tx) = tx.lock().unwrap().take() {
//!                     let _ = tx.send(name.clone());
//!                 }
//!             },
//!             || println!("no such user"),
//!         )
//!         .on_error(|e| eprintln!("lookup failed: {e}")),
//!     );
//!     host.start();
//!
//!     assert_eq!(rx.await?, "ada");
//!     Ok(())
//! }
//! ```
mod config;
mod context;
mod core;
mod error;
mod events;
mod host;
mod outcome;
mod policies;
mod producers;
mod scope;
mod subscribers;

#[cfg(test)]
mod test_util;

// ---- Public re-exports ----

pub use crate::core::{Bridge, BridgeBuilder, Deliver, Emitter, Snapshot};
pub use config::Config;
pub use context::Context;
pub use error::{ContextError, ProducerError};
pub use events::{Bus, Event, EventKind};
pub use host::{Delivery, Handlers, Lifecycle, LiveOutcome, Observer, ObserverId};
pub use outcome::{Never, Outcome};
pub use policies::ReactivationPolicy;
pub use producers::{
    Cancel, EffectFn, MaybeFn, Producer, ProducerKind, ProducerRef, SingleFn, StreamFn,
};
pub use scope::Scope;
pub use subscribers::{Subscribe, SubscriberSet};

// Optional: expose a simple built-in logger subscriber (demo/reference).
// Enable with: `--features logging`
#[cfg(feature = "logging")]
pub use subscribers::LogWriter;
