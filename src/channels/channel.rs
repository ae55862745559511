//! # Typed publish/subscribe channel.
//!
//! [`Channel`] fans a payload out to every subscriber synchronously, on the
//! raiser's thread, in subscription order.
//!
//! ## Architecture
//! ```text
//! raise(args)
//!     │
//!     ├─► recorder enabled? ──► capture TraceEntry (timestamp + arg snapshot)
//!     │
//!     ├─► snapshot = Arc::clone(subscribers)
//!     │     ├─► handler 1(&args)
//!     │     ├─► handler 2(&args)
//!     │     └─► handler N(&args)
//!     │
//!     └─► recorder.deliver(entry) ──► trace observers
//! ```
//!
//! ## Rules
//! - **Snapshot-then-iterate**: the subscriber list is copy-on-write; a raise
//!   iterates the list as it was when the raise began. Subscribing or
//!   unsubscribing from inside a handler takes effect on the next raise.
//! - **No de-duplication**: subscribing the same handler twice calls it twice.
//! - **Tolerant unsubscribe**: removing an absent subscription returns `false`.
//! - **Fail-fast**: a panicking handler unwinds to the raiser; later
//!   handlers of that raise do not run and no trace entry is delivered.
//!
//! ## Example
//! ```rust
//! use std::sync::{Arc, Mutex};
//! use tickwire::Channel1;
//!
//! let hp_changed: Channel1<i32> = Channel1::new("hp-changed");
//! let seen = Arc::new(Mutex::new(Vec::new()));
//!
//! let sink = Arc::clone(&seen);
//! let id = hp_changed.subscribe(move |(hp,): &(i32,)| sink.lock().unwrap().push(*hp));
//!
//! hp_changed.raise((90,));
//! hp_changed.unsubscribe(id);
//! hp_changed.raise((80,));
//!
//! assert_eq!(*seen.lock().unwrap(), vec![90]);
//! ```

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

use parking_lot::RwLock;

use super::info::{ChannelId, ChannelInfo};
use super::payload::Payload;
use crate::trace::TraceRecorder;

/// Global counter for subscription handles.
static SUBSCRIPTION_SEQ: AtomicU64 = AtomicU64::new(1);

/// Shared subscriber callback.
pub type Handler<A> = Arc<dyn Fn(&A) + Send + Sync>;

/// Channel without payload.
pub type Channel0 = Channel<()>;
/// Channel carrying one value.
pub type Channel1<T> = Channel<(T,)>;
/// Channel carrying two values.
pub type Channel2<T0, T1> = Channel<(T0, T1)>;

/// Handle returned by [`Channel::subscribe`], used to unsubscribe.
///
/// Unique across all channels of the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        Self(SUBSCRIPTION_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }
}

struct Slot<A> {
    id: SubscriptionId,
    handler: Handler<A>,
}

impl<A> Clone for Slot<A> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            handler: Arc::clone(&self.handler),
        }
    }
}

struct Inner<A> {
    info: Arc<ChannelInfo>,
    subscribers: RwLock<Arc<Vec<Slot<A>>>>,
    recorder: Option<Arc<TraceRecorder>>,
}

/// Typed, shared publish point.
///
/// Cloning a channel yields another handle to the same identity and
/// subscriber list; producers and consumers each keep their own clone.
pub struct Channel<A: Payload> {
    inner: Arc<Inner<A>>,
}

impl<A: Payload> Clone for Channel<A> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<A: Payload> Channel<A> {
    /// Creates an untraced channel with the given name.
    pub fn new(name: impl Into<Arc<str>>) -> Self {
        ChannelBuilder::new(name).build()
    }

    /// Starts building a channel with a description and/or trace recorder.
    pub fn builder(name: impl Into<Arc<str>>) -> ChannelBuilder<A> {
        ChannelBuilder::new(name)
    }

    /// Appends a subscriber; returns a handle for [`unsubscribe`](Self::unsubscribe).
    pub fn subscribe<F>(&self, f: F) -> SubscriptionId
    where
        F: Fn(&A) + Send + Sync + 'static,
    {
        self.subscribe_handler(Arc::new(f))
    }

    /// Appends an already shared handler.
    ///
    /// Keep a clone of the handler to remove it later with
    /// [`unsubscribe_handler`](Self::unsubscribe_handler).
    pub fn subscribe_handler(&self, handler: Handler<A>) -> SubscriptionId {
        let id = SubscriptionId::next();
        let mut subs = self.inner.subscribers.write();
        Arc::make_mut(&mut *subs).push(Slot { id, handler });
        id
    }

    /// Removes the subscription `id`.
    ///
    /// Returns `false` (and does nothing) if it is not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.remove_first(|slot| slot.id == id)
    }

    /// Removes the first subscription of `handler` (pointer identity).
    ///
    /// If the same handler was subscribed several times, only one is removed.
    /// Returns `false` if it is not subscribed.
    pub fn unsubscribe_handler(&self, handler: &Handler<A>) -> bool {
        self.remove_first(|slot| Arc::ptr_eq(&slot.handler, handler))
    }

    /// Removes every subscriber.
    pub fn clear(&self) {
        *self.inner.subscribers.write() = Arc::new(Vec::new());
    }

    /// Invokes every current subscriber in subscription order.
    ///
    /// If the channel has a recorder and tracing is enabled, one trace entry
    /// is captured before the fan-out and delivered after it.
    pub fn raise(&self, args: A) {
        let pending = self
            .inner
            .recorder
            .as_ref()
            .and_then(|rec| rec.capture(&self.inner.info, &args));

        let snapshot = Arc::clone(&*self.inner.subscribers.read());
        for slot in snapshot.iter() {
            (slot.handler)(&args);
        }

        if let (Some(rec), Some(entry)) = (self.inner.recorder.as_ref(), pending) {
            rec.deliver(entry);
        }
    }

    /// Returns the number of current subscriptions.
    pub fn subscriber_count(&self) -> usize {
        self.inner.subscribers.read().len()
    }

    /// Returns `true` if nobody is subscribed.
    pub fn is_empty(&self) -> bool {
        self.subscriber_count() == 0
    }

    /// Returns the shared identity record.
    pub fn info(&self) -> &Arc<ChannelInfo> {
        &self.inner.info
    }

    pub fn id(&self) -> ChannelId {
        self.inner.info.id
    }

    pub fn name(&self) -> &str {
        &self.inner.info.name
    }

    pub fn description(&self) -> Option<&str> {
        self.inner.info.description.as_deref()
    }

    /// Returns `true` if both handles refer to the same declared channel.
    pub fn same_channel(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    fn remove_first(&self, matches: impl Fn(&Slot<A>) -> bool) -> bool {
        let mut subs = self.inner.subscribers.write();
        match subs.iter().position(matches) {
            Some(pos) => {
                Arc::make_mut(&mut *subs).remove(pos);
                true
            }
            None => false,
        }
    }
}

impl<A: Payload> fmt::Debug for Channel<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Channel")
            .field("id", &self.inner.info.id)
            .field("name", &self.inner.info.name)
            .field("arity", &A::ARITY)
            .field("subscribers", &self.subscriber_count())
            .field("traced", &self.inner.recorder.is_some())
            .finish()
    }
}

/// Builder for [`Channel`].
pub struct ChannelBuilder<A: Payload> {
    name: Arc<str>,
    description: Option<Arc<str>>,
    recorder: Option<Arc<TraceRecorder>>,
    _payload: std::marker::PhantomData<fn(A)>,
}

impl<A: Payload> ChannelBuilder<A> {
    fn new(name: impl Into<Arc<str>>) -> Self {
        Self {
            name: name.into(),
            description: None,
            recorder: None,
            _payload: std::marker::PhantomData,
        }
    }

    /// Attaches a documentary description.
    pub fn description(mut self, description: impl Into<Arc<str>>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Reports raises to `recorder` whenever it is enabled.
    pub fn recorder(mut self, recorder: Arc<TraceRecorder>) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn build(self) -> Channel<A> {
        let info = ChannelInfo::new(self.name, self.description, A::ARITY);
        Channel {
            inner: Arc::new(Inner {
                info: Arc::new(info),
                subscribers: RwLock::new(Arc::new(Vec::new())),
                recorder: self.recorder,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn log() -> Arc<Mutex<Vec<String>>> {
        Arc::new(Mutex::new(Vec::new()))
    }

    #[test]
    fn test_zero_arity_fans_out_in_subscription_order() {
        let ch = Channel0::new("level-loaded");
        let seen = log();

        let a = Arc::clone(&seen);
        ch.subscribe(move |_: &()| a.lock().push("observerA".into()));
        let b = Arc::clone(&seen);
        ch.subscribe(move |_: &()| b.lock().push("observerB".into()));

        ch.raise(());
        assert_eq!(*seen.lock(), vec!["observerA", "observerB"]);
    }

    #[test]
    fn test_each_subscriber_runs_once_per_raise() {
        let ch: Channel1<u32> = Channel::new("score");
        let seen = log();
        for name in ["s1", "s2", "s3"] {
            let sink = Arc::clone(&seen);
            ch.subscribe(move |(v,): &(u32,)| sink.lock().push(format!("{name}:{v}")));
        }

        ch.raise((1,));
        ch.raise((2,));
        assert_eq!(
            *seen.lock(),
            vec!["s1:1", "s2:1", "s3:1", "s1:2", "s2:2", "s3:2"]
        );
    }

    #[test]
    fn test_two_slot_payload() {
        let ch: Channel2<&'static str, f32> = Channel::new("damage");
        let seen = log();
        let sink = Arc::clone(&seen);
        ch.subscribe(move |(who, amount): &(&'static str, f32)| {
            sink.lock().push(format!("{who}-{amount}"))
        });
        ch.raise(("orc", 2.5));
        assert_eq!(*seen.lock(), vec!["orc-2.5"]);
    }

    #[test]
    fn test_duplicate_handler_is_invoked_twice() {
        let ch = Channel0::new("dup");
        let hits = Arc::new(AtomicU64::new(0));
        let h = Arc::clone(&hits);
        let handler: Handler<()> = Arc::new(move |_: &()| {
            h.fetch_add(1, AtomicOrdering::Relaxed);
        });

        ch.subscribe_handler(Arc::clone(&handler));
        ch.subscribe_handler(Arc::clone(&handler));
        ch.raise(());
        assert_eq!(hits.load(AtomicOrdering::Relaxed), 2);

        assert!(ch.unsubscribe_handler(&handler));
        assert_eq!(ch.subscriber_count(), 1);
        ch.raise(());
        assert_eq!(hits.load(AtomicOrdering::Relaxed), 3);
    }

    #[test]
    fn test_unsubscribe_absent_is_noop() {
        let ch = Channel0::new("quiet");
        let other = Channel0::new("other");
        let foreign = other.subscribe(|_: &()| {});

        assert!(!ch.unsubscribe(foreign));
        let id = ch.subscribe(|_: &()| {});
        assert!(ch.unsubscribe(id));
        assert!(!ch.unsubscribe(id));

        let never: Handler<()> = Arc::new(|_: &()| {});
        assert!(!ch.unsubscribe_handler(&never));
        assert!(ch.is_empty());
    }

    #[test]
    fn test_subscribe_during_raise_applies_next_time() {
        let ch = Channel0::new("spawner");
        let seen = log();

        let handle = ch.clone();
        let sink = Arc::clone(&seen);
        ch.subscribe(move |_: &()| {
            sink.lock().push("spawner".into());
            let late = Arc::clone(&sink);
            handle.subscribe(move |_: &()| late.lock().push("late".into()));
        });

        ch.raise(());
        assert_eq!(*seen.lock(), vec!["spawner"]);

        ch.raise(());
        assert_eq!(*seen.lock(), vec!["spawner", "spawner", "late"]);
    }

    #[test]
    fn test_unsubscribe_during_raise_applies_next_time() {
        let ch = Channel0::new("once");
        let seen = log();
        let slot: Arc<Mutex<Option<SubscriptionId>>> = Arc::new(Mutex::new(None));

        let handle = ch.clone();
        let own_id = Arc::clone(&slot);
        let sink = Arc::clone(&seen);
        let first = ch.subscribe(move |_: &()| {
            sink.lock().push("first".into());
            if let Some(id) = own_id.lock().take() {
                handle.unsubscribe(id);
            }
        });
        *slot.lock() = Some(first);

        let sink = Arc::clone(&seen);
        ch.subscribe(move |_: &()| sink.lock().push("second".into()));

        ch.raise(());
        ch.raise(());
        assert_eq!(*seen.lock(), vec!["first", "second", "second"]);
    }

    #[test]
    fn test_subscriber_panic_propagates_and_stops_fanout() {
        let ch = Channel0::new("fragile");
        let seen = log();
        ch.subscribe(|_: &()| panic!("gameplay bug"));
        let sink = Arc::clone(&seen);
        ch.subscribe(move |_: &()| sink.lock().push("after".into()));

        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| ch.raise(())));
        assert!(result.is_err());
        assert!(seen.lock().is_empty());
    }

    #[test]
    fn test_clones_share_identity() {
        let ch = Channel::<(i32,)>::builder("int-changed")
            .description("raised whenever the counter changes")
            .build();
        let twin = ch.clone();
        twin.subscribe(|_: &(i32,)| {});

        assert!(ch.same_channel(&twin));
        assert_eq!(ch.id(), twin.id());
        assert_eq!(ch.subscriber_count(), 1);
        assert_eq!(ch.description(), Some("raised whenever the counter changes"));
        assert_eq!(ch.info().arity, 1);
        assert!(!ch.same_channel(&Channel::new("int-changed")));
    }

    #[test]
    fn test_clear_removes_all() {
        let ch = Channel0::new("reset");
        ch.subscribe(|_: &()| {});
        ch.subscribe(|_: &()| {});
        ch.clear();
        assert!(ch.is_empty());
    }
}
