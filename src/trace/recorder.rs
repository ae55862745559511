//! # Toggleable recorder of channel raises.
//!
//! [`TraceRecorder`] observes raises of every channel built with it and
//! forwards a [`TraceEntry`] per raise to registered observers.
//!
//! ## Architecture
//! ```text
//! Channel::raise(args)
//!     │
//!     ├─► capture(info, &args) ── disabled? ──► None (one atomic load, no allocation)
//!     │         └─ enabled ──► TraceEntry { seq, at, instant, args snapshot }
//!     ├─► subscriber fan-out
//!     └─► deliver(entry)
//!           ├──► observer 1.on_trace()
//!           │      └─► panic → caught, logged, counted
//!           └──► observer N.on_trace()
//! ```
//!
//! ## Rules
//! - **Zero-cost when disabled**: no snapshot, no timestamp, no allocation.
//! - **Strictly an observer**: entries are delivered after subscribers ran;
//!   the recorder cannot reorder, cancel or transform a raise.
//! - **Panic isolation**: a failing observer never reaches gameplay code.
//!
//! **Warning**: `AssertUnwindSafe` is used, which can leave an observer's own
//! state inconsistent if it panics while holding a lock.

use std::any::Any;
use std::panic::{self, AssertUnwindSafe};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use parking_lot::RwLock;

use crate::channels::{ChannelInfo, Payload};
use crate::config::Config;
use crate::trace::{TraceEntry, TraceObserver};

/// Handle returned by [`TraceRecorder::add_observer`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

#[derive(Clone)]
struct ObserverSlot {
    id: ObserverId,
    observer: Arc<dyn TraceObserver>,
}

/// Process-wide (per hub) trace facility.
///
/// Shared as `Arc<TraceRecorder>` by every channel that reports to it.
pub struct TraceRecorder {
    enabled: AtomicBool,
    arg_limit: Option<usize>,
    observers: RwLock<Arc<Vec<ObserverSlot>>>,
    next_observer: AtomicU64,
    recorded: AtomicU64,
    panicked: AtomicU64,
}

impl TraceRecorder {
    /// Creates a disabled recorder with default settings.
    pub fn new() -> Self {
        Self::from_config(&Config::default())
    }

    /// Creates a recorder enabled per `cfg.tracing`, truncating per `cfg.trace_arg_limit`.
    pub fn from_config(cfg: &Config) -> Self {
        Self {
            enabled: AtomicBool::new(cfg.tracing),
            arg_limit: cfg.arg_limit(),
            observers: RwLock::new(Arc::new(Vec::new())),
            next_observer: AtomicU64::new(1),
            recorded: AtomicU64::new(0),
            panicked: AtomicU64::new(0),
        }
    }

    /// Turns recording on or off. Takes effect on the next raise.
    pub fn set_enabled(&self, enabled: bool) {
        self.enabled.store(enabled, AtomicOrdering::Relaxed);
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled.load(AtomicOrdering::Relaxed)
    }

    /// Registers an observer; returns a handle for [`remove_observer`](Self::remove_observer).
    pub fn add_observer(&self, observer: Arc<dyn TraceObserver>) -> ObserverId {
        let id = ObserverId(self.next_observer.fetch_add(1, AtomicOrdering::Relaxed));
        let mut observers = self.observers.write();
        Arc::make_mut(&mut *observers).push(ObserverSlot { id, observer });
        id
    }

    /// Registers a closure observer.
    pub fn observe<F>(&self, f: F) -> ObserverId
    where
        F: Fn(&TraceEntry) + Send + Sync + 'static,
    {
        self.add_observer(Arc::new(f))
    }

    /// Removes an observer. Returns `false` if it was not registered.
    pub fn remove_observer(&self, id: ObserverId) -> bool {
        let mut observers = self.observers.write();
        match observers.iter().position(|slot| slot.id == id) {
            Some(pos) => {
                Arc::make_mut(&mut *observers).remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn observer_count(&self) -> usize {
        self.observers.read().len()
    }

    /// Records a raise of `channel` with `args` and notifies observers.
    ///
    /// Does nothing while the recorder is disabled.
    pub fn record<A: Payload>(&self, channel: &Arc<ChannelInfo>, args: &A) {
        if let Some(entry) = self.capture(channel, args) {
            self.deliver(entry);
        }
    }

    /// Number of entries delivered since creation.
    pub fn recorded(&self) -> u64 {
        self.recorded.load(AtomicOrdering::Relaxed)
    }

    /// Number of observer panics caught since creation.
    pub fn panicked_observers(&self) -> u64 {
        self.panicked.load(AtomicOrdering::Relaxed)
    }

    /// Takes the timestamp and argument snapshot, or `None` when disabled.
    pub(crate) fn capture<A: Payload>(
        &self,
        channel: &Arc<ChannelInfo>,
        args: &A,
    ) -> Option<TraceEntry> {
        if !self.is_enabled() {
            return None;
        }
        Some(TraceEntry::new(
            Arc::clone(channel),
            args.snapshot(self.arg_limit),
        ))
    }

    /// Hands a captured entry to every observer, isolating panics.
    pub(crate) fn deliver(&self, entry: TraceEntry) {
        self.recorded.fetch_add(1, AtomicOrdering::Relaxed);

        let observers = Arc::clone(&*self.observers.read());
        for slot in observers.iter() {
            let observer = &slot.observer;
            let outcome = panic::catch_unwind(AssertUnwindSafe(|| observer.on_trace(&entry)));
            if let Err(panic_err) = outcome {
                self.panicked.fetch_add(1, AtomicOrdering::Relaxed);
                tracing::warn!(
                    observer = observer.name(),
                    channel = %entry.channel,
                    seq = entry.seq,
                    panic = %panic_message(&*panic_err),
                    "trace observer panicked"
                );
            }
        }
    }
}

impl Default for TraceRecorder {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for TraceRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TraceRecorder")
            .field("enabled", &self.is_enabled())
            .field("observers", &self.observer_count())
            .field("recorded", &self.recorded())
            .finish()
    }
}

fn panic_message(any: &(dyn Any + Send)) -> String {
    if let Some(msg) = any.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = any.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{Channel, Channel0, Channel1};
    use parking_lot::Mutex;
    use std::fmt;

    /// Payload whose `Debug` rendering is counted, to observe snapshot work.
    struct Probe(Arc<AtomicU64>);

    impl fmt::Debug for Probe {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            self.0.fetch_add(1, AtomicOrdering::Relaxed);
            f.write_str("probe")
        }
    }

    fn traced<A: Payload>(rec: &Arc<TraceRecorder>, name: &str) -> Channel<A> {
        Channel::builder(name).recorder(Arc::clone(rec)).build()
    }

    fn collect(rec: &TraceRecorder) -> Arc<Mutex<Vec<TraceEntry>>> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&entries);
        rec.observe(move |e: &TraceEntry| sink.lock().push(e.clone()));
        entries
    }

    #[test]
    fn test_disabled_recorder_takes_no_snapshot() {
        let rec = Arc::new(TraceRecorder::new());
        let entries = collect(&rec);
        let renders = Arc::new(AtomicU64::new(0));

        let ch: Channel1<Probe> = traced(&rec, "probe");
        ch.subscribe(|_: &(Probe,)| {});
        ch.raise((Probe(Arc::clone(&renders)),));

        assert_eq!(renders.load(AtomicOrdering::Relaxed), 0);
        assert!(entries.lock().is_empty());
        assert_eq!(rec.recorded(), 0);
    }

    #[test]
    fn test_enabled_recorder_emits_one_entry_per_raise() {
        let rec = Arc::new(TraceRecorder::new());
        rec.set_enabled(true);
        let entries = collect(&rec);

        let ch: Channel<(&'static str, i32)> = traced(&rec, "player-hurt");
        ch.raise(("spikes", 7));
        ch.raise(("orc", 3));

        let entries = entries.lock();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel_id(), ch.id());
        assert_eq!(entries[0].channel_name(), "player-hurt");
        assert_eq!(entries[0].args, vec!["\"spikes\"", "7"]);
        assert_eq!(entries[1].args, vec!["\"orc\"", "3"]);
        assert!(entries[0].seq < entries[1].seq);
        assert_eq!(rec.recorded(), 2);
    }

    #[test]
    fn test_snapshot_is_taken_once_per_raise() {
        let rec = Arc::new(TraceRecorder::new());
        rec.set_enabled(true);
        let renders = Arc::new(AtomicU64::new(0));

        let ch: Channel1<Probe> = traced(&rec, "probe");
        ch.raise((Probe(Arc::clone(&renders)),));
        assert_eq!(renders.load(AtomicOrdering::Relaxed), 1);
    }

    #[test]
    fn test_toggle_at_runtime() {
        let rec = Arc::new(TraceRecorder::new());
        let entries = collect(&rec);
        let ch: Channel0 = traced(&rec, "tick");

        ch.raise(());
        rec.set_enabled(true);
        ch.raise(());
        rec.set_enabled(false);
        ch.raise(());

        assert_eq!(entries.lock().len(), 1);
        assert!(entries.lock()[0].args.is_empty());
    }

    #[test]
    fn test_entry_is_delivered_after_subscribers() {
        let rec = Arc::new(TraceRecorder::new());
        rec.set_enabled(true);
        let order = Arc::new(Mutex::new(Vec::new()));

        let sink = Arc::clone(&order);
        rec.observe(move |_: &TraceEntry| sink.lock().push("trace"));

        let ch: Channel0 = traced(&rec, "door-opened");
        let sink = Arc::clone(&order);
        ch.subscribe(move |_: &()| sink.lock().push("subscriber"));
        ch.raise(());

        assert_eq!(*order.lock(), vec!["subscriber", "trace"]);
    }

    #[test]
    fn test_observer_panic_is_isolated() {
        let rec = Arc::new(TraceRecorder::new());
        rec.set_enabled(true);
        rec.observe(|_: &TraceEntry| panic!("broken console"));
        let entries = collect(&rec);

        let ch: Channel1<u8> = traced(&rec, "coins");
        let hits = Arc::new(AtomicU64::new(0));
        let h = Arc::clone(&hits);
        ch.subscribe(move |_: &(u8,)| {
            h.fetch_add(1, AtomicOrdering::Relaxed);
        });

        ch.raise((1,));
        ch.raise((2,));

        assert_eq!(hits.load(AtomicOrdering::Relaxed), 2);
        assert_eq!(entries.lock().len(), 2);
        assert_eq!(rec.panicked_observers(), 2);
    }

    #[test]
    fn test_remove_observer() {
        let rec = TraceRecorder::new();
        let id = rec.observe(|_: &TraceEntry| {});
        assert_eq!(rec.observer_count(), 1);
        assert!(rec.remove_observer(id));
        assert!(!rec.remove_observer(id));
        assert_eq!(rec.observer_count(), 0);
    }

    #[test]
    fn test_record_directly_respects_toggle() {
        let rec = TraceRecorder::new();
        let entries = collect(&rec);
        let ch: Channel1<i32> = Channel::new("manual");

        rec.record(ch.info(), &(5,));
        rec.set_enabled(true);
        rec.record(ch.info(), &(6,));

        let entries = entries.lock();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].args, vec!["6"]);
    }

    #[test]
    fn test_arg_limit_from_config() {
        let cfg = Config {
            tracing: true,
            trace_arg_limit: 3,
            ..Config::default()
        };
        let rec = Arc::new(TraceRecorder::from_config(&cfg));
        let entries = collect(&rec);

        let ch: Channel1<u32> = traced(&rec, "big");
        ch.raise((123_456,));
        assert_eq!(entries.lock()[0].args, vec!["123…"]);
    }
}
