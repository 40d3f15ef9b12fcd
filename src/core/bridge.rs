//! # Bridge: lifecycle-scoped subscription of one producer.
//!
//! A [`Bridge`] turns a deferred [`Producer`](crate::Producer) into a stream
//! of [`Outcome`]s held in a latest-value slot. A host drives it with
//! [`activate`](Bridge::activate) and [`deactivate`](Bridge::deactivate):
//!
//! ```text
//!  activate()                                   deactivate()
//!     │                                              │
//!     ├─ active.swap(true)  (no-op if already)       ├─ active.swap(false)
//!     ├─ FireOnce && fired? ─► Suppressed            └─ slot.swap(None) ─► token.cancel()
//!     ├─ slot CAS None → token   (lost: no-op)                               └─► handle.cancel()
//!     └─ producer.subscribe(emitter, ctx)
//!              │
//!              ▼  (any thread, any time)
//!        Emitter::{next,success,complete,error}
//!              │   kind.map(signal)
//!              ├─ terminal: token.terminate() ─► fired ─► publish ─► release token
//!              └─ item:     token.is_live()   ─► publish
//!                                                   │
//!                                     LatestSlot ◄──┘──► Dispatcher ─► Deliver (host)
//! ```
//!
//! ## Rules
//! - At most one token is tracked at a time; the slot is only ever changed by
//!   compare-and-swap (subscribe, release) or swap (deactivate).
//! - A terminal outcome is delivered at most once per token; signals after it
//!   (or after cancellation) are absorbed.
//! - Nothing here takes a lock, so producers may call back synchronously from
//!   inside `subscribe`, and sinks may call `activate`/`deactivate` from inside
//!   `deliver`.
//! - Dropping the bridge cancels the outstanding token.

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Weak};

use arc_swap::ArcSwapOption;
use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::config::Config;
use crate::events::{Bus, Event, EventKind};
use crate::outcome::Outcome;
use crate::policies::ReactivationPolicy;
use crate::producers::{Producer, ProducerKind, ProducerRef};

use super::builder::BridgeBuilder;
use super::dispatch::{Deliver, Dispatcher};
use super::emitter::Emitter;
use super::slot::{LatestSlot, Snapshot};
use super::token::Token;

/// State shared between a bridge and the emitters of its subscriptions.
pub(crate) struct Shared<T> {
    name: Arc<str>,
    producer: ProducerRef<T>,
    cfg: Config,
    bus: Bus,
    slot: ArcSwapOption<Token>,
    active: AtomicBool,
    fired: AtomicBool,
    next_token: AtomicU64,
    latest: Arc<LatestSlot<T>>,
    dispatcher: Dispatcher<T>,
}

impl<T: Send + Sync + 'static> Shared<T> {
    /// Publishes an event stamped with the bridge name, built only if someone listens.
    pub(crate) fn emit(&self, build: impl FnOnce() -> Event) {
        if self.bus.has_receivers() {
            self.bus.publish(build().with_bridge(Arc::clone(&self.name)));
        }
    }

    /// Stores `outcome` in the latest-value slot and wakes delivery.
    pub(crate) fn publish(&self, outcome: Outcome<T>, token: Option<u64>) {
        let label = outcome.as_label();
        let version = self.latest.publish(outcome);
        self.emit(|| {
            let ev = Event::new(EventKind::Published)
                .with_outcome(label)
                .with_version(version);
            match token {
                Some(id) => ev.with_token(id),
                None => ev,
            }
        });
        self.dispatcher.wake();
    }

    pub(crate) fn mark_fired(&self) {
        self.fired.store(true, Ordering::SeqCst);
    }

    /// Clears the tracked token if it is still `token`.
    ///
    /// Returns `false` when another token (or none) is tracked.
    pub(crate) fn release(&self, token: &Arc<Token>) -> bool {
        let current = Some(Arc::clone(token));
        let prev = self.slot.compare_and_swap(&current, None::<Arc<Token>>);
        let released = matches!(&*prev, Some(p) if Arc::ptr_eq(p, token));
        if released {
            self.emit(|| Event::new(EventKind::Released).with_token(token.id()));
        }
        released
    }

    fn cancel_token(&self, token: &Token) {
        if token.cancel() {
            self.emit(|| Event::new(EventKind::Cancelled).with_token(token.id()));
        }
    }

    fn subscribe_if_idle(self: &Arc<Self>) {
        if self.cfg.reactivation == ReactivationPolicy::FireOnce
            && self.fired.load(Ordering::SeqCst)
        {
            self.emit(|| Event::new(EventKind::Suppressed));
            return;
        }

        let id = self.next_token.fetch_add(1, Ordering::Relaxed) + 1;
        let token = Arc::new(Token::new(id));
        let prev = self
            .slot
            .compare_and_swap(&None::<Arc<Token>>, Some(Arc::clone(&token)));
        if prev.is_some() {
            return;
        }
        drop(prev);

        self.emit(|| Event::new(EventKind::Subscribed).with_token(id));
        let emitter = Emitter::new(
            Arc::clone(&token),
            self.producer.kind(),
            Arc::downgrade(self),
        );
        self.producer.subscribe(emitter, &self.cfg.producer);

        // A deactivate that ran before our CAS found nothing to cancel.
        if !self.active.load(Ordering::SeqCst) && self.release(&token) {
            self.cancel_token(&token);
        }
    }
}

/// Lifecycle-scoped bridge from a producer to a latest-value slot.
///
/// Created through [`Bridge::builder`] or [`Bridge::new`]. Usually owned by a
/// host such as [`LiveOutcome`](crate::LiveOutcome), which calls
/// [`activate`](Bridge::activate)/[`deactivate`](Bridge::deactivate) as
/// observers come and go.
///
/// # Example
/// ```
/// use livebridge::{Bridge, Outcome, SingleFn};
///
/// let bridge = Bridge::builder(SingleFn::just(7_u32)).name("answer").build();
/// assert!(bridge.latest().is_none());
///
/// bridge.activate();
/// let snap = bridge.latest().unwrap();
/// assert_eq!(snap.outcome(), &Outcome::Value(7));
/// assert!(!bridge.has_subscription());
/// ```
pub struct Bridge<T> {
    shared: Arc<Shared<T>>,
    listener: Option<CancellationToken>,
}

impl<T: Send + Sync + 'static> Bridge<T> {
    /// Starts building a bridge around `producer`.
    pub fn builder(producer: impl Producer<T>) -> BridgeBuilder<T> {
        BridgeBuilder::new(Arc::new(producer))
    }

    /// Creates a bridge with `cfg` and no event subscribers.
    pub fn new(producer: impl Producer<T>, cfg: Config) -> Self {
        Self::builder(producer).config(cfg).build()
    }

    pub(crate) fn from_parts(
        producer: ProducerRef<T>,
        cfg: Config,
        bus: Bus,
        listener: Option<CancellationToken>,
    ) -> Self {
        let latest = Arc::new(LatestSlot::new());
        let dispatcher = Dispatcher::new(
            &cfg.delivery,
            cfg.delivery_capacity_clamped(),
            Arc::clone(&latest),
        );
        let shared = Arc::new(Shared {
            name: Arc::from(cfg.name.as_ref()),
            producer,
            cfg,
            bus,
            slot: ArcSwapOption::empty(),
            active: AtomicBool::new(false),
            fired: AtomicBool::new(false),
            next_token: AtomicU64::new(0),
            latest,
            dispatcher,
        });
        Self { shared, listener }
    }

    /// Returns the bridge name.
    pub fn name(&self) -> &str {
        &self.shared.name
    }

    /// Returns the kind of the wrapped producer.
    pub fn kind(&self) -> ProducerKind {
        self.shared.producer.kind()
    }

    /// Returns the configuration this bridge was built with.
    pub fn config(&self) -> &Config {
        &self.shared.cfg
    }

    /// Marks the bridge active and subscribes the producer if no subscription
    /// is tracked.
    ///
    /// Calling it while already active does nothing. Under
    /// [`ReactivationPolicy::FireOnce`] a bridge that already delivered a
    /// terminal outcome stays idle.
    pub fn activate(&self) {
        if self.shared.active.swap(true, Ordering::SeqCst) {
            return;
        }
        self.shared.emit(|| Event::new(EventKind::Activated));
        self.shared.subscribe_if_idle();
    }

    /// Marks the bridge inactive and cancels the tracked subscription, if any.
    ///
    /// Calling it while already inactive does nothing.
    pub fn deactivate(&self) {
        if !self.shared.active.swap(false, Ordering::SeqCst) {
            return;
        }
        self.shared.emit(|| Event::new(EventKind::Deactivated));
        if let Some(token) = self.shared.slot.swap(None) {
            self.shared.cancel_token(&token);
        }
    }

    /// Returns `true` between `activate` and `deactivate`.
    #[inline]
    pub fn is_active(&self) -> bool {
        self.shared.active.load(Ordering::SeqCst)
    }

    /// Returns `true` while a subscription is tracked (started, not yet
    /// terminated or cancelled).
    pub fn has_subscription(&self) -> bool {
        self.shared.slot.load().is_some()
    }

    /// Returns `true` once any subscription delivered a terminal outcome.
    pub fn has_fired(&self) -> bool {
        self.shared.fired.load(Ordering::SeqCst)
    }

    /// Stores an outcome directly, bypassing the producer.
    ///
    /// Used by hosts that need to seed or override the slot; it does not touch
    /// the tracked subscription.
    pub fn publish(&self, outcome: Outcome<T>) {
        self.shared.publish(outcome, None);
    }

    /// Returns the most recent snapshot, if any outcome was published.
    pub fn latest(&self) -> Option<Arc<Snapshot<T>>> {
        self.shared.latest.load()
    }

    /// Sets the sink that receives every published snapshot.
    ///
    /// The sink is held weakly; a previous sink is replaced.
    pub fn attach(&self, sink: Weak<dyn Deliver<T>>) {
        self.shared.dispatcher.attach(sink);
    }

    /// Subscribes to this bridge's lifecycle events.
    ///
    /// Only events published after this call are observed.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.bus.subscribe()
    }
}

impl<T> Drop for Bridge<T> {
    fn drop(&mut self) {
        if let Some(token) = self.shared.slot.swap(None) {
            token.cancel();
        }
        if let Some(listener) = &self.listener {
            listener.cancel();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Context;
    use crate::error::ProducerError;
    use crate::producers::{Cancel, SingleFn};
    use crate::test_util::{CountingCancel, Recorder, ScriptedProducer, drain};
    use std::time::Duration;

    fn bridge<T: Send + Sync + 'static>(producer: impl Producer<T>) -> Bridge<T> {
        Bridge::new(producer, Config::default().named("test"))
    }

    #[test]
    fn test_activate_subscribes_once() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let bridge = bridge(script.clone());

        bridge.activate();
        bridge.activate();
        assert_eq!(script.subscriptions(), 1);
        assert!(bridge.has_subscription());
    }

    #[test]
    fn test_terminal_releases_token_and_publishes_once() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let bridge = bridge(script.clone());
        let recorder = Recorder::attach_to(&bridge);

        bridge.activate();
        let emitter = script.emitter(0);
        emitter.success(1);
        emitter.success(2);
        emitter.error(ProducerError::fail("late"));

        assert_eq!(recorder.outcomes(), vec![Outcome::Value(1)]);
        assert!(!bridge.has_subscription());
        assert!(bridge.has_fired());
        assert!(!emitter.is_live());
    }

    #[test]
    fn test_deactivate_cancels_handle_and_suppresses_outcomes() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single).with_handles();
        let bridge = bridge(script.clone());
        let recorder = Recorder::attach_to(&bridge);

        bridge.activate();
        bridge.deactivate();
        bridge.deactivate();

        assert_eq!(script.cancel_count(0), 1);
        assert!(!bridge.has_subscription());

        let emitter = script.emitter(0);
        assert!(emitter.is_cancelled());
        emitter.success(9);
        assert!(recorder.outcomes().is_empty());
        assert!(bridge.latest().is_none());
    }

    #[test]
    fn test_handle_after_deactivate_is_cancelled() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let bridge = bridge(script.clone());

        bridge.activate();
        bridge.deactivate();

        let (handle, count) = CountingCancel::new();
        script.emitter(0).on_subscribe(handle);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn test_resubscribe_after_terminal() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let bridge = bridge(script.clone());

        bridge.activate();
        script.emitter(0).success(1);
        bridge.deactivate();
        bridge.activate();

        assert_eq!(script.subscriptions(), 2);
        script.emitter(1).success(2);
        assert_eq!(bridge.latest().unwrap().outcome(), &Outcome::Value(2));
        assert_eq!(bridge.latest().unwrap().version(), 2);
    }

    #[test]
    fn test_fire_once_suppresses_resubscribe_after_terminal() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let cfg = Config {
            reactivation: ReactivationPolicy::FireOnce,
            ..Config::default()
        };
        let bridge = Bridge::new(script.clone(), cfg);

        bridge.activate();
        script.emitter(0).success(1);
        bridge.deactivate();
        bridge.activate();

        assert_eq!(script.subscriptions(), 1);
        assert!(bridge.is_active());
        assert_eq!(bridge.latest().unwrap().outcome(), &Outcome::Value(1));
    }

    #[test]
    fn test_fire_once_resubscribes_after_cancelled_run() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let cfg = Config {
            reactivation: ReactivationPolicy::FireOnce,
            ..Config::default()
        };
        let bridge = Bridge::new(script.clone(), cfg);

        bridge.activate();
        bridge.deactivate();
        bridge.activate();

        assert_eq!(script.subscriptions(), 2);
    }

    #[test]
    fn test_stream_values_keep_subscription() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Stream);
        let bridge = bridge(script.clone());
        let recorder = Recorder::attach_to(&bridge);

        bridge.activate();
        let emitter = script.emitter(0);
        emitter.next(1);
        emitter.next(2);
        assert!(bridge.has_subscription());
        emitter.complete();
        emitter.next(3);

        assert_eq!(
            recorder.outcomes(),
            vec![Outcome::Value(1), Outcome::Value(2), Outcome::Completed]
        );
        assert_eq!(recorder.versions(), vec![1, 2, 3]);
        assert!(!bridge.has_subscription());
    }

    #[test]
    fn test_stale_emitter_cannot_release_new_token() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let bridge = bridge(script.clone());

        bridge.activate();
        let stale = script.emitter(0);
        bridge.deactivate();
        bridge.activate();

        stale.success(1);
        assert!(bridge.has_subscription());
        assert!(bridge.latest().is_none());

        script.emitter(1).success(2);
        assert!(!bridge.has_subscription());
    }

    #[test]
    fn test_synchronous_producer_completes_inside_activate() {
        let bridge = bridge(SingleFn::just(5_u8));
        let recorder = Recorder::attach_to(&bridge);

        bridge.activate();
        assert_eq!(recorder.outcomes(), vec![Outcome::Value(5)]);
        assert!(!bridge.has_subscription());
        assert!(bridge.is_active());
    }

    #[test]
    fn test_unmapped_signal_is_dropped() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single);
        let bridge = bridge(script.clone());
        let mut events = bridge.events();

        bridge.activate();
        script.emitter(0).next(1);
        script.emitter(0).complete();

        assert!(bridge.latest().is_none());
        assert!(bridge.has_subscription());

        let dropped: Vec<_> = drain(&mut events)
            .into_iter()
            .filter(|e| e.kind == EventKind::SignalDropped)
            .filter_map(|e| e.reason.map(|r| r.to_string()))
            .collect();
        assert_eq!(dropped, vec!["unmapped:next", "unmapped:complete"]);
    }

    #[test]
    fn test_events_trace_the_lifecycle() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Single).with_handles();
        let bridge = bridge(script.clone());
        let mut events = bridge.events();

        bridge.activate();
        bridge.deactivate();

        let kinds: Vec<_> = drain(&mut events).into_iter().map(|e| e.kind).collect();
        assert_eq!(
            kinds,
            vec![
                EventKind::Activated,
                EventKind::Subscribed,
                EventKind::HandleAttached,
                EventKind::Deactivated,
                EventKind::Cancelled,
            ]
        );
    }

    #[test]
    fn test_drop_cancels_outstanding_subscription() {
        let script = ScriptedProducer::<u8>::new(ProducerKind::Stream).with_handles();
        let bridge = bridge(script.clone());

        bridge.activate();
        let emitter = script.emitter(0);
        drop(bridge);

        assert_eq!(script.cancel_count(0), 1);
        assert!(emitter.is_cancelled());
        emitter.next(1);
    }

    #[test]
    fn test_host_publish_bumps_version() {
        let bridge = bridge(ScriptedProducer::<u8>::new(ProducerKind::Single));
        bridge.publish(Outcome::Value(1));
        bridge.publish(Outcome::Completed);
        assert_eq!(bridge.latest().unwrap().version(), 2);
        assert!(!bridge.is_active());
    }

    #[test]
    fn test_racing_activate_deactivate_leaves_nothing_live() {
        for _ in 0..100 {
            let script = ScriptedProducer::<u8>::new(ProducerKind::Stream).with_handles();
            let bridge = Arc::new(bridge(script.clone()));

            let workers: Vec<_> = (0..4)
                .map(|i| {
                    let bridge = Arc::clone(&bridge);
                    std::thread::spawn(move || {
                        for _ in 0..20 {
                            if i % 2 == 0 {
                                bridge.activate();
                            } else {
                                bridge.deactivate();
                            }
                        }
                    })
                })
                .collect();
            for w in workers {
                w.join().unwrap();
            }
            bridge.deactivate();

            assert!(!bridge.has_subscription());
            for i in 0..script.subscriptions() {
                assert!(script.emitter(i).is_cancelled(), "subscription {i} leaked");
                assert!(script.cancel_count(i) >= 1);
            }
        }
    }

    #[test]
    fn test_racing_terminal_and_deactivate_have_one_winner() {
        for _ in 0..200 {
            let script = ScriptedProducer::<u8>::new(ProducerKind::Single).with_handles();
            let bridge = Arc::new(bridge(script.clone()));
            let recorder = Recorder::attach_to(&bridge);
            bridge.activate();

            let start = Arc::new(std::sync::Barrier::new(2));
            let emitter = script.emitter(0);
            let (b1, b2) = (Arc::clone(&start), Arc::clone(&start));
            let producer = std::thread::spawn(move || {
                b1.wait();
                emitter.success(7);
            });
            let host = {
                let bridge = Arc::clone(&bridge);
                std::thread::spawn(move || {
                    b2.wait();
                    bridge.deactivate();
                })
            };
            producer.join().unwrap();
            host.join().unwrap();

            let published = recorder.outcomes();
            let cancelled = script.emitter(0).is_cancelled();
            assert!(published.len() <= 1);
            assert_ne!(published.is_empty(), cancelled, "exactly one side wins");
            assert_eq!(script.cancel_count(0), usize::from(cancelled));
            assert_eq!(bridge.has_fired(), !cancelled);
            assert!(!bridge.has_subscription());
        }
    }

    #[tokio::test]
    async fn test_runtime_context_delivers_on_worker() {
        let bridge = Bridge::new(
            SingleFn::from_future(|| async {
                tokio::time::sleep(Duration::from_millis(5)).await;
                Ok(11_u32)
            }),
            Config::on(Context::current()),
        );
        let recorder = Recorder::attach_to(&bridge);

        bridge.activate();
        assert!(
            recorder
                .wait_for(Duration::from_secs(1), |o| o == &Outcome::Value(11))
                .await
        );
        assert!(bridge.has_fired());
    }

    #[tokio::test]
    async fn test_runtime_deactivate_stops_pending_work() {
        let bridge = Bridge::new(
            SingleFn::<u32>::from_future(|| std::future::pending()),
            Config::on(Context::current()),
        );
        let mut events = bridge.events();

        bridge.activate();
        tokio::time::sleep(Duration::from_millis(10)).await;
        bridge.deactivate();

        let kinds: Vec<_> = drain(&mut events).into_iter().map(|e| e.kind).collect();
        assert!(kinds.contains(&EventKind::Cancelled));
        assert!(bridge.latest().is_none());
    }

    #[test]
    fn test_cancel_handle_is_object_safe() {
        let (handle, count) = CountingCancel::new();
        let boxed: Box<dyn Cancel> = Box::new(handle);
        boxed.cancel();
        assert_eq!(count.get(), 1);
    }
}
