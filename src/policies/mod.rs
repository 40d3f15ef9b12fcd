//! Bridge policies.
//!
//! This module groups the knobs that control **if** a bridge subscribes its
//! producer again after a terminal outcome.
//!
//! ## Contents
//! - [`ReactivationPolicy`] resubscribe on every activation, or fire at most once
//!
//! ## Quick wiring
//! ```text
//! Config { reactivation: ReactivationPolicy, .. }
//!      └─► core::bridge::Bridge::activate() consults it before subscribing
//! ```
//!
//! ## Defaults
//! - `ReactivationPolicy::Resubscribe`.

mod reactivation;

pub use reactivation::ReactivationPolicy;
