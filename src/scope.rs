//! # Scope: owner of fire-and-forget bridges.
//!
//! A [`Scope`] launches one-shot actions (inserts, deletes, lookups triggered
//! by a user gesture) and keeps their hosts alive until the scope is cleared
//! or dropped. Clearing deactivates every member, which cancels whatever is
//! still running.
//!
//! ```text
//! scope.launch(producer, observer)
//!    └─► Bridge (scope config) ─► LiveOutcome ─► observe ─► start
//!                                      │
//!                        members ◄─────┘
//!
//! scope.clear() / drop(scope)
//!    └─► member.on_inactive() for every member ─► bridge.deactivate() ─► cancel
//! ```

use std::sync::Arc;

use arc_swap::ArcSwap;

use crate::config::Config;
use crate::core::Bridge;
use crate::host::{Lifecycle, LiveOutcome, Observer};
use crate::producers::Producer;

/// Collection of launched hosts that share one lifetime.
///
/// # Example
/// ```
/// use livebridge::{EffectFn, Handlers, ProducerError, Scope};
///
/// let scope = Scope::default();
/// scope.launch(
///     EffectFn::from_fn(|| Ok::<(), ProducerError>(())),
///     Handlers::completable(|| println!("saved")),
/// );
/// assert_eq!(scope.len(), 1);
///
/// scope.clear();
/// assert!(scope.is_empty());
/// ```
pub struct Scope {
    cfg: Config,
    members: ArcSwap<Vec<Arc<dyn Lifecycle>>>,
}

impl Scope {
    /// Creates an empty scope; launched bridges use `cfg`.
    pub fn new(cfg: Config) -> Self {
        Self {
            cfg,
            members: ArcSwap::from_pointee(Vec::new()),
        }
    }

    /// Returns the config handed to launched bridges.
    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Subscribes `producer` right away and routes its outcomes to `observer`.
    ///
    /// The returned host stays owned by the scope; keeping the `Arc` is optional.
    pub fn launch<T, P, O>(&self, producer: P, observer: O) -> Arc<LiveOutcome<T>>
    where
        T: Send + Sync + 'static,
        P: Producer<T>,
        O: Observer<T>,
    {
        let bridge = Bridge::builder(producer).config(self.cfg.clone()).build();
        let host = LiveOutcome::new(bridge);
        host.observe(observer);
        host.start();

        let member: Arc<dyn Lifecycle> = host.clone();
        self.members.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&member));
            next
        });
        host
    }

    /// Adds an externally created member, e.g. a bridge driven by hand.
    pub fn adopt(&self, member: Arc<dyn Lifecycle>) {
        self.members.rcu(|current| {
            let mut next = Vec::clone(current);
            next.push(Arc::clone(&member));
            next
        });
    }

    /// Number of members.
    pub fn len(&self) -> usize {
        self.members.load().len()
    }

    /// True if the scope has no members.
    pub fn is_empty(&self) -> bool {
        self.members.load().is_empty()
    }

    /// Deactivates and forgets every member.
    pub fn clear(&self) {
        let members = self.members.swap(Arc::new(Vec::new()));
        for member in members.iter() {
            member.on_inactive();
        }
    }
}

impl Default for Scope {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

impl Drop for Scope {
    fn drop(&mut self) {
        self.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::host::Handlers;
    use crate::outcome::Outcome;
    use crate::producers::{ProducerKind, SingleFn};
    use crate::test_util::ScriptedProducer;
    use std::sync::Mutex;

    #[test]
    fn test_launch_runs_immediately() {
        let scope = Scope::default();
        let got = Arc::new(Mutex::new(None));
        let g = Arc::clone(&got);

        scope.launch(
            SingleFn::just(3_u8),
            Handlers::single(move |v: &u8| *g.lock().unwrap() = Some(*v)),
        );
        assert_eq!(*got.lock().unwrap(), Some(3));
    }

    #[test]
    fn test_clear_cancels_pending_work() {
        let scope = Scope::default();
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single).with_handles();

        let host = scope.launch(script.clone(), |_: &Outcome<u8>| {});
        assert!(host.is_active());

        scope.clear();
        assert!(!host.is_active());
        assert_eq!(script.cancel_count(0), 1);
        assert!(scope.is_empty());
    }

    #[test]
    fn test_drop_cancels_pending_work() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Stream).with_handles();
        {
            let scope = Scope::new(Config::on(Context::Inline));
            scope.launch(script.clone(), |_: &Outcome<u8>| {});
            let bridge = Arc::new(Bridge::builder(ScriptedProducer::<u8>::new(ProducerKind::Maybe)).build());
            bridge.activate();
            scope.adopt(bridge);
            assert_eq!(scope.len(), 2);
        }
        assert!(script.emitter(0).is_cancelled());
        assert_eq!(script.cancel_count(0), 1);
    }
}
