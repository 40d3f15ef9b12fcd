//! # Producers: deferred sources of outcomes.
//!
//! A [`Producer`] describes work that starts only when a bridge subscribes it.
//! Its [`ProducerKind`] decides how emitter callbacks become outcomes.
//!
//! ## Function-backed producers
//! | type          | kind   | yields                                   |
//! |---------------|--------|------------------------------------------|
//! | [`EffectFn`]  | Effect | `Completed` or `Failed`                  |
//! | [`SingleFn`]  | Single | `Value` or `Failed`                      |
//! | [`MaybeFn`]   | Maybe  | `Value`, `Completed` or `Failed`         |
//! | [`StreamFn`]  | Stream | `Value`* then `Completed` or `Failed`    |
//!
//! All of them hand a [`CancellationToken`](tokio_util::sync::CancellationToken)
//! to the emitter before starting, and report panics as
//! [`ProducerError::Panicked`](crate::ProducerError::Panicked).

mod cancel;
mod effect;
mod kind;
mod maybe;
mod producer;
mod single;
mod stream;
mod work;

pub use cancel::Cancel;
pub use effect::EffectFn;
pub(crate) use kind::Signal;
pub use kind::ProducerKind;
pub use maybe::MaybeFn;
pub use producer::{Producer, ProducerRef};
pub use single::SingleFn;
pub use stream::StreamFn;
