//! Helpers shared by unit tests.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex, Weak};
use std::time::Duration;

use tokio::sync::broadcast;

use crate::context::Context;
use crate::core::{Bridge, Deliver, Emitter, Snapshot};
use crate::events::Event;
use crate::outcome::Outcome;
use crate::producers::{Cancel, Producer, ProducerKind};

/// Shared cancellation counter.
#[derive(Clone, Default)]
pub(crate) struct Count(Arc<AtomicUsize>);

impl Count {
    pub(crate) fn get(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

/// Cancel handle that only counts how often it was cancelled.
pub(crate) struct CountingCancel(Count);

impl CountingCancel {
    pub(crate) fn new() -> (Self, Count) {
        let count = Count::default();
        (Self(count.clone()), count)
    }
}

impl Cancel for CountingCancel {
    fn cancel(&self) {
        self.0.0.fetch_add(1, Ordering::SeqCst);
    }
}

struct Script<T> {
    kind: ProducerKind,
    with_handles: bool,
    emitters: Mutex<Vec<Emitter<T>>>,
    handles: Mutex<Vec<Count>>,
}

/// Producer that records every subscription and lets the test drive callbacks.
pub(crate) struct ScriptedProducer<T>(Arc<Script<T>>);

impl<T> Clone for ScriptedProducer<T> {
    fn clone(&self) -> Self {
        Self(Arc::clone(&self.0))
    }
}

impl<T: Send + Sync + 'static> ScriptedProducer<T> {
    pub(crate) fn new(kind: ProducerKind) -> Self {
        Self(Arc::new(Script {
            kind,
            with_handles: false,
            emitters: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
        }))
    }

    /// Attaches a [`CountingCancel`] on every subscription.
    pub(crate) fn with_handles(self) -> Self {
        Self(Arc::new(Script {
            kind: self.0.kind,
            with_handles: true,
            emitters: Mutex::new(Vec::new()),
            handles: Mutex::new(Vec::new()),
        }))
    }

    pub(crate) fn subscriptions(&self) -> usize {
        self.0.emitters.lock().unwrap().len()
    }

    pub(crate) fn emitter(&self, i: usize) -> Emitter<T> {
        self.0.emitters.lock().unwrap()[i].clone()
    }

    pub(crate) fn cancel_count(&self, i: usize) -> usize {
        self.0.handles.lock().unwrap()[i].get()
    }
}

impl<T: Send + Sync + 'static> Producer<T> for ScriptedProducer<T> {
    fn kind(&self) -> ProducerKind {
        self.0.kind
    }

    fn subscribe(&self, emitter: Emitter<T>, _ctx: &Context) {
        if self.0.with_handles {
            let (handle, count) = CountingCancel::new();
            self.0.handles.lock().unwrap().push(count);
            emitter.on_subscribe(handle);
        }
        self.0.emitters.lock().unwrap().push(emitter);
    }
}

/// Sink that records every delivered snapshot.
pub(crate) struct Recorder<T> {
    seen: Mutex<Vec<(u64, Outcome<T>)>>,
}

impl<T: Clone + Send + Sync + 'static> Recorder<T> {
    pub(crate) fn new() -> Arc<Self> {
        Arc::new(Self {
            seen: Mutex::new(Vec::new()),
        })
    }

    pub(crate) fn attach_to(bridge: &Bridge<T>) -> Arc<Self> {
        let recorder = Self::new();
        let weak: Weak<Self> = Arc::downgrade(&recorder);
        bridge.attach(weak);
        recorder
    }

    pub(crate) fn outcomes(&self) -> Vec<Outcome<T>> {
        self.seen.lock().unwrap().iter().map(|(_, o)| o.clone()).collect()
    }

    pub(crate) fn versions(&self) -> Vec<u64> {
        self.seen.lock().unwrap().iter().map(|(v, _)| *v).collect()
    }

    /// Polls until some recorded outcome matches `pred` or `timeout` elapses.
    pub(crate) async fn wait_for(
        &self,
        timeout: Duration,
        pred: impl Fn(&Outcome<T>) -> bool,
    ) -> bool {
        let deadline = tokio::time::Instant::now() + timeout;
        loop {
            if self.seen.lock().unwrap().iter().any(|(_, o)| pred(o)) {
                return true;
            }
            if tokio::time::Instant::now() >= deadline {
                return false;
            }
            tokio::time::sleep(Duration::from_millis(2)).await;
        }
    }
}

impl<T: Clone + Send + Sync + 'static> Deliver<T> for Recorder<T> {
    fn deliver(&self, snapshot: Arc<Snapshot<T>>) {
        self.seen
            .lock()
            .unwrap()
            .push((snapshot.version(), snapshot.outcome().clone()));
    }
}

/// Collects every event already sitting in `rx`.
pub(crate) fn drain(rx: &mut broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    while let Ok(ev) = rx.try_recv() {
        out.push(ev);
    }
    out
}
