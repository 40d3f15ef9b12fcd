//! # Delivery of snapshots to the attached sink.
//!
//! The bridge publishes into the latest-value slot and then *wakes* the
//! dispatcher. The dispatcher reads the slot and hands the snapshot to the
//! sink on the delivery context:
//!
//! ```text
//! Inline                         Runtime(handle)
//! ──────                         ───────────────
//! wake() ─► sink.deliver(latest) wake() ─► try_send(()) ─► [queue] ─► worker
//!           (caller's thread)              (full: a wake-up is      │
//!                                           already pending)        ▼
//!                                                         sink.deliver(latest)
//! ```
//!
//! The runtime worker is a single task, so deliveries never overlap. Because it
//! always reads the latest snapshot, bursts coalesce: intermediate stream values
//! may be skipped but the final one is always delivered.

use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use tokio::sync::mpsc;

use crate::context::Context;

use super::slot::{LatestSlot, Snapshot};

/// Receiver of published snapshots.
///
/// A bridge holds its sink weakly (see [`Bridge::attach`](crate::Bridge::attach)),
/// so dropping the sink detaches it.
pub trait Deliver<T>: Send + Sync + 'static {
    /// Called with the newest snapshot on the delivery context.
    fn deliver(&self, snapshot: Arc<Snapshot<T>>);
}

struct SinkRef<T>(Weak<dyn Deliver<T>>);

pub(crate) struct SinkSlot<T> {
    cell: ArcSwapOption<SinkRef<T>>,
}

impl<T> SinkSlot<T> {
    fn new() -> Self {
        Self {
            cell: ArcSwapOption::empty(),
        }
    }

    fn get(&self) -> Option<Arc<dyn Deliver<T>>> {
        self.cell.load_full().and_then(|r| r.0.upgrade())
    }
}

enum Mode {
    Inline,
    Worker(mpsc::Sender<()>),
}

pub(crate) struct Dispatcher<T> {
    latest: Arc<LatestSlot<T>>,
    sink: Arc<SinkSlot<T>>,
    mode: Mode,
}

impl<T: Send + Sync + 'static> Dispatcher<T> {
    /// Creates a dispatcher; a runtime context gets its worker spawned here.
    ///
    /// The worker exits once the dispatcher is dropped.
    pub(crate) fn new(ctx: &Context, capacity: usize, latest: Arc<LatestSlot<T>>) -> Self {
        let sink = Arc::new(SinkSlot::new());
        let mode = match ctx {
            Context::Inline => Mode::Inline,
            Context::Runtime(handle) => {
                let (tx, mut rx) = mpsc::channel::<()>(capacity.max(1));
                let latest = Arc::clone(&latest);
                let sink = Arc::clone(&sink);
                handle.spawn(async move {
                    let mut delivered = 0;
                    while rx.recv().await.is_some() {
                        delivered = deliver_latest(&latest, &sink, delivered);
                    }
                });
                Mode::Worker(tx)
            }
        };
        Self { latest, sink, mode }
    }

    /// Replaces the sink; the previous one (if any) stops receiving.
    pub(crate) fn attach(&self, sink: Weak<dyn Deliver<T>>) {
        self.sink.cell.store(Some(Arc::new(SinkRef(sink))));
    }

    /// Schedules delivery of the current latest snapshot.
    pub(crate) fn wake(&self) {
        match &self.mode {
            Mode::Inline => {
                deliver_latest(&self.latest, &self.sink, 0);
            }
            Mode::Worker(tx) => {
                let _ = tx.try_send(());
            }
        }
    }
}

/// Delivers the latest snapshot if it is newer than `after`.
///
/// Returns the highest version handed to the sink so far.
fn deliver_latest<T: 'static>(latest: &LatestSlot<T>, sink: &SinkSlot<T>, after: u64) -> u64 {
    let Some(sink) = sink.get() else { return after };
    let Some(snapshot) = latest.load() else {
        return after;
    };
    let version = snapshot.version();
    if version <= after {
        return after;
    }
    sink.deliver(snapshot);
    version
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::outcome::Outcome;
    use crate::test_util::Recorder;
    use std::time::Duration;

    #[test]
    fn test_inline_delivers_on_wake() {
        let latest = Arc::new(LatestSlot::new());
        let dispatcher = Dispatcher::new(&Context::Inline, 1, Arc::clone(&latest));

        let recorder = Recorder::<u8>::new();
        let sink: Weak<dyn Deliver<u8>> = Arc::downgrade(&recorder) as Weak<dyn Deliver<u8>>;
        dispatcher.attach(sink);

        dispatcher.wake();
        assert!(recorder.outcomes().is_empty());

        latest.publish(Outcome::Value(4));
        dispatcher.wake();
        assert_eq!(recorder.outcomes(), vec![Outcome::Value(4)]);
    }

    #[test]
    fn test_dropped_sink_is_skipped() {
        let latest = Arc::new(LatestSlot::new());
        let dispatcher = Dispatcher::new(&Context::Inline, 1, Arc::clone(&latest));

        let recorder = Recorder::<u8>::new();
        dispatcher.attach(Arc::downgrade(&recorder) as Weak<dyn Deliver<u8>>);
        drop(recorder);

        latest.publish(Outcome::Value(1));
        dispatcher.wake();
    }

    #[tokio::test]
    async fn test_worker_delivers_the_final_snapshot() {
        let latest = Arc::new(LatestSlot::new());
        let dispatcher = Dispatcher::new(&Context::current(), 1, Arc::clone(&latest));

        let recorder = Recorder::<u32>::new();
        dispatcher.attach(Arc::downgrade(&recorder) as Weak<dyn Deliver<u32>>);

        for i in 1..=50 {
            latest.publish(Outcome::Value(i));
            dispatcher.wake();
        }

        let last = recorder
            .wait_for(Duration::from_secs(1), |o| o == &Outcome::Value(50))
            .await;
        assert!(last, "final snapshot must be delivered");

        let versions = recorder.versions();
        assert!(versions.windows(2).all(|w| w[0] < w[1]));
    }
}
