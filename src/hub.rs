//! # Hub: the session-wide configuration object.
//!
//! A [`Hub`] is created once at startup and passed by reference to the modules
//! that declare channels or build state machines. It owns the [`Config`] and
//! the shared [`TraceRecorder`], so a single `set_tracing_enabled` call covers
//! every channel it created.
//!
//! ## Example
//! ```rust
//! use tickwire::{Channel1, Config, Hub, TraceEntry};
//!
//! let hub = Hub::new(Config::default());
//! let int_changed: Channel1<i32> = hub.channel_with_description("int-changed", "counter updated");
//!
//! hub.recorder().observe(|e: &TraceEntry| assert_eq!(e.args, vec!["3"]));
//! hub.set_tracing_enabled(true);
//! int_changed.raise((3,));
//!
//! assert_eq!(hub.recorder().recorded(), 1);
//! assert_eq!(hub.channels()[0].name.as_ref(), "int-changed");
//! ```

use std::borrow::Cow;
use std::sync::{Arc, Weak};

use parking_lot::RwLock;

use crate::channels::{Channel, ChannelInfo, Payload};
use crate::config::Config;
use crate::fsm::StateMachine;
use crate::trace::TraceRecorder;

/// Factory for traced channels and configured state machines.
pub struct Hub {
    cfg: Config,
    recorder: Arc<TraceRecorder>,
    declared: RwLock<Vec<Weak<ChannelInfo>>>,
}

impl Hub {
    /// Creates a hub; the recorder starts enabled if `cfg.tracing` is set.
    pub fn new(cfg: Config) -> Self {
        let recorder = Arc::new(TraceRecorder::from_config(&cfg));
        tracing::debug!(tracing = cfg.tracing, "hub created");
        Self {
            cfg,
            recorder,
            declared: RwLock::new(Vec::new()),
        }
    }

    /// Declares a traced channel.
    pub fn channel<A: Payload>(&self, name: impl Into<Arc<str>>) -> Channel<A> {
        self.declare(Channel::builder(name))
    }

    /// Declares a traced channel with a documentary description.
    pub fn channel_with_description<A: Payload>(
        &self,
        name: impl Into<Arc<str>>,
        description: impl Into<Arc<str>>,
    ) -> Channel<A> {
        self.declare(Channel::builder(name).description(description))
    }

    /// Builds a state machine using this hub's config; its transitions channel is traced.
    pub fn machine<O: 'static>(
        &self,
        label: impl Into<Cow<'static, str>>,
        owner: O,
    ) -> StateMachine<O> {
        let machine = StateMachine::build(
            label.into(),
            owner,
            &self.cfg,
            Some(Arc::clone(&self.recorder)),
        );
        self.remember(machine.transitions().info());
        machine
    }

    /// Turns tracing on or off for every channel of this hub.
    pub fn set_tracing_enabled(&self, enabled: bool) {
        self.recorder.set_enabled(enabled);
        tracing::debug!(enabled, "channel tracing toggled");
    }

    pub fn is_tracing_enabled(&self) -> bool {
        self.recorder.is_enabled()
    }

    pub fn recorder(&self) -> &Arc<TraceRecorder> {
        &self.recorder
    }

    pub fn config(&self) -> &Config {
        &self.cfg
    }

    /// Every live channel declared through this hub, in declaration order.
    ///
    /// Channels whose last handle was dropped (including the transitions
    /// channel of a dropped machine) are not listed.
    pub fn channels(&self) -> Vec<Arc<ChannelInfo>> {
        self.declared.read().iter().filter_map(Weak::upgrade).collect()
    }

    fn declare<A: Payload>(&self, builder: crate::channels::ChannelBuilder<A>) -> Channel<A> {
        let channel = builder.recorder(Arc::clone(&self.recorder)).build();
        self.remember(channel.info());
        channel
    }

    fn remember(&self, info: &Arc<ChannelInfo>) {
        let mut declared = self.declared.write();
        declared.retain(|weak| weak.strong_count() > 0);
        declared.push(Arc::downgrade(info));
    }
}

impl Default for Hub {
    fn default() -> Self {
        Self::new(Config::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::{Channel0, Channel1};
    use crate::fsm::{State, StateContext, StateId};
    use crate::trace::TraceEntry;
    use parking_lot::Mutex;

    fn collect(hub: &Hub) -> Arc<Mutex<Vec<TraceEntry>>> {
        let entries = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&entries);
        hub.recorder()
            .observe(move |e: &TraceEntry| sink.lock().push(e.clone()));
        entries
    }

    #[test]
    fn test_config_controls_initial_tracing() {
        assert!(!Hub::default().is_tracing_enabled());
        let hub = Hub::new(Config {
            tracing: true,
            ..Config::default()
        });
        assert!(hub.is_tracing_enabled());
    }

    #[test]
    fn test_toggle_covers_all_channels() {
        let hub = Hub::default();
        let entries = collect(&hub);
        let hurt: Channel1<u32> = hub.channel("player-hurt");
        let paused: Channel0 = hub.channel("paused");

        hurt.raise((1,));
        hub.set_tracing_enabled(true);
        hurt.raise((2,));
        paused.raise(());

        let entries = entries.lock();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel_id(), hurt.id());
        assert_eq!(entries[1].channel_id(), paused.id());
    }

    #[test]
    fn test_declared_channels_are_listed() {
        let hub = Hub::default();
        let _a: Channel0 = hub.channel("a");
        let _b: Channel1<f32> = hub.channel_with_description("b", "analog stick x");

        let names: Vec<String> = hub.channels().iter().map(|i| i.name.to_string()).collect();
        assert_eq!(names, vec!["a", "b"]);
        assert_eq!(hub.channels()[1].description.as_deref(), Some("analog stick x"));
        assert_eq!(hub.channels()[1].arity, 1);
    }

    struct Menu;
    struct Options;
    impl State<()> for Menu {}
    impl State<()> for Options {}

    #[test]
    fn test_machine_transitions_are_traced() {
        let hub = Hub::new(Config {
            tracing: true,
            ..Config::default()
        });
        let entries = collect(&hub);

        let mut ui = hub.machine("ui", ());
        ui.enter_state(Menu).unwrap();
        ui.enter_state(Options).unwrap();

        let entries = entries.lock();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].channel_name(), "ui.transitions");
        assert_eq!(entries[0].args, vec!["None", "Menu"]);
        assert_eq!(entries[1].args, vec!["Some(Menu)", "Options"]);
        assert!(hub.channels().iter().any(|i| i.name.as_ref() == "ui.transitions"));
    }

    #[test]
    fn test_dropped_machines_are_not_listed() {
        let hub = Hub::default();
        let _hud: Channel0 = hub.channel("hud");
        for _ in 0..1_000 {
            let mut enemy = hub.machine("enemy", ());
            enemy.enter_state(Menu).unwrap();
        }
        let kept = hub.machine("boss", ());

        let names: Vec<String> = hub.channels().iter().map(|i| i.name.to_string()).collect();
        assert_eq!(names, vec!["hud", "boss.transitions"]);
        assert!(hub.declared.read().len() <= 3);
        drop(kept);
        assert_eq!(hub.channels().len(), 1);
    }

    #[test]
    fn test_machine_uses_hub_config() {
        struct Again;
        impl State<()> for Again {
            fn enter(&mut self, cx: &mut StateContext<'_, ()>, _previous: Option<StateId>) {
                cx.restart();
            }
        }

        let hub = Hub::new(Config {
            max_chained_transitions: 2,
            ..Config::default()
        });
        let mut m = hub.machine("loop", ());
        assert_eq!(
            m.enter_state(Again),
            Err(crate::StateError::TransitionLoop { limit: 2 })
        );
    }
}
