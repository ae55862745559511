//! # State machine: one owner, one current state.
//!
//! [`StateMachine<O>`] owns its owner value and the current [`State<O>`], and
//! performs every transition with the same ordering.
//!
//! ## Lifecycle
//! ```text
//! Uninitialized ──enter_state(A)──► Active(A) ──enter_state(B)──► Active(B) ──► ...
//!
//! transition(next):
//!   ├─► current.exit()                (skipped on the first transition)
//!   ├─► current = next
//!   ├─► next.enter(previous)          (previous = exited state id, or None)
//!   └─► transitions.raise((previous, next))
//!
//! tick():
//!   └─► current.update()              (no-op before the first transition)
//!
//! after any entry point: apply queued hook requests, FIFO, up to the chain limit
//! ```
//!
//! ## Rules
//! - **Exit before enter**: the outgoing state's `exit` always completes before
//!   the incoming state's `enter` starts.
//! - **No same-state shortcut**: `restart()` (or entering another instance of
//!   the current type) still runs `exit` then `enter`.
//! - **Queued re-entrancy**: transitions requested from inside hooks are applied
//!   after the running transition or update has finished, in request order.
//! - **Bounded chains**: more than `max_chained_transitions` applied in one call
//!   fails with [`StateError::TransitionLoop`]; pending requests are dropped.
//! - **Faults propagate**: a panicking hook unwinds to the caller. Requests
//!   queued before the panic are discarded by the next entry point, and a
//!   state whose `exit` panicked is still current.
//!
//! ## Example
//! ```rust
//! use tickwire::{State, StateContext, StateId, StateMachine};
//!
//! #[derive(Default)]
//! struct Door { log: Vec<&'static str> }
//!
//! struct Closed;
//! struct Open;
//!
//! impl State<Door> for Closed {
//!     fn exit(&mut self, cx: &mut StateContext<'_, Door>) {
//!         cx.owner_mut().log.push("closed:exit");
//!     }
//! }
//!
//! impl State<Door> for Open {
//!     fn enter(&mut self, cx: &mut StateContext<'_, Door>, previous: Option<StateId>) {
//!         assert!(previous.unwrap().is::<Closed>());
//!         cx.owner_mut().log.push("open:enter");
//!     }
//! }
//!
//! let mut door = StateMachine::new("door", Door::default());
//! door.enter_state(Closed).unwrap();
//! door.enter_state(Open).unwrap();
//! assert_eq!(door.owner().log, vec!["closed:exit", "open:enter"]);
//! ```

use std::borrow::Cow;
use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use crate::channels::{Channel, Channel2};
use crate::config::Config;
use crate::error::StateError;
use crate::fsm::state::{Request, State, StateContext, StateId};
use crate::trace::TraceRecorder;

type Factory<O> = Box<dyn Fn() -> Box<dyn State<O>>>;

/// Hierarchy-free finite state machine bound to a single owner.
pub struct StateMachine<O> {
    label: Cow<'static, str>,
    owner: O,
    current: Option<Box<dyn State<O>>>,
    previous: Option<StateId>,
    queue: VecDeque<Request<O>>,
    factories: HashMap<String, Factory<O>>,
    transitions: Channel2<Option<StateId>, StateId>,
    chain_limit: usize,
    transitions_made: u64,
}

impl<O: 'static> StateMachine<O> {
    /// Creates an uninitialized machine with default settings.
    ///
    /// `label` names the machine in logs and its transitions channel.
    pub fn new(label: impl Into<Cow<'static, str>>, owner: O) -> Self {
        Self::with_config(label, owner, &Config::default())
    }

    /// Creates an uninitialized machine using `cfg.max_chained_transitions`.
    pub fn with_config(label: impl Into<Cow<'static, str>>, owner: O, cfg: &Config) -> Self {
        Self::build(label.into(), owner, cfg, None)
    }

    pub(crate) fn build(
        label: Cow<'static, str>,
        owner: O,
        cfg: &Config,
        recorder: Option<Arc<TraceRecorder>>,
    ) -> Self {
        let mut transitions = Channel::builder(format!("{label}.transitions"))
            .description("raised after every completed transition with (previous, entered)");
        if let Some(rec) = recorder {
            transitions = transitions.recorder(rec);
        }
        Self {
            label,
            owner,
            current: None,
            previous: None,
            queue: VecDeque::new(),
            factories: HashMap::new(),
            transitions: transitions.build(),
            chain_limit: cfg.chain_limit_clamped(),
            transitions_made: 0,
        }
    }

    /// Registers a factory so the state can be entered by name.
    ///
    /// Registering an existing name replaces the previous factory.
    pub fn register<S, F>(&mut self, name: impl Into<String>, factory: F) -> &mut Self
    where
        S: State<O>,
        F: Fn() -> S + 'static,
    {
        self.factories.insert(
            name.into(),
            Box::new(move || Box::new(factory()) as Box<dyn State<O>>),
        );
        self
    }

    /// Names accepted by [`enter_named`](Self::enter_named), sorted.
    pub fn registered(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.factories.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Exits the current state (if any) and enters `next`.
    pub fn enter_state<S: State<O>>(&mut self, next: S) -> Result<(), StateError> {
        self.enter_boxed(Box::new(next))
    }

    pub fn enter_boxed(&mut self, next: Box<dyn State<O>>) -> Result<(), StateError> {
        self.queue.clear();
        self.queue.push_back(Request::Enter(next));
        self.drain()
    }

    /// Enters a fresh instance of the state registered as `name`.
    ///
    /// Fails with [`StateError::UnknownState`] (leaving the current state
    /// untouched) if nothing is registered under that name.
    pub fn enter_named(&mut self, name: &str) -> Result<(), StateError> {
        if !self.factories.contains_key(name) {
            return Err(StateError::UnknownState { name: name.into() });
        }
        self.queue.clear();
        self.queue.push_back(Request::Named(name.to_string()));
        self.drain()
    }

    /// Exits and re-enters the current state instance.
    ///
    /// The state's `enter` receives its own id as `previous`.
    pub fn restart(&mut self) -> Result<(), StateError> {
        if self.current.is_none() {
            return Err(StateError::NotStarted);
        }
        self.queue.clear();
        self.queue.push_back(Request::Restart);
        self.drain()
    }

    /// Runs the current state's `update` hook; does nothing before the first transition.
    pub fn tick(&mut self) -> Result<(), StateError> {
        self.queue.clear();
        let Some(current) = self.current.as_mut() else {
            return Ok(());
        };
        let mut cx = StateContext::new(&mut self.owner, &mut self.queue);
        current.update(&mut cx);
        self.drain()
    }

    pub fn owner(&self) -> &O {
        &self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut self.owner
    }

    /// Consumes the machine and returns the owner. The current state is dropped without `exit`.
    pub fn into_owner(self) -> O {
        self.owner
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_started(&self) -> bool {
        self.current.is_some()
    }

    pub fn current_id(&self) -> Option<StateId> {
        self.current.as_ref().map(|s| s.id())
    }

    /// Id of the state exited by the last transition (the current one after a restart).
    pub fn previous_id(&self) -> Option<StateId> {
        self.previous
    }

    /// Returns `true` if the current state is of type `S`.
    pub fn is_in<S: State<O>>(&self) -> bool {
        self.current_id().is_some_and(|id| id.is::<S>())
    }

    pub fn transitions_made(&self) -> u64 {
        self.transitions_made
    }

    /// Channel raised with `(previous, entered)` after every transition.
    pub fn transitions(&self) -> &Channel2<Option<StateId>, StateId> {
        &self.transitions
    }

    /// Applies queued requests in FIFO order.
    fn drain(&mut self) -> Result<(), StateError> {
        let mut applied = 0;
        while let Some(request) = self.queue.pop_front() {
            if applied == self.chain_limit {
                self.queue.clear();
                tracing::warn!(
                    machine = %self.label,
                    limit = self.chain_limit,
                    current = ?self.current_id(),
                    "transition chain limit exceeded"
                );
                return Err(StateError::TransitionLoop {
                    limit: self.chain_limit,
                });
            }
            if let Err(err) = self.apply(request) {
                self.queue.clear();
                return Err(err);
            }
            applied += 1;
        }
        Ok(())
    }

    fn apply(&mut self, request: Request<O>) -> Result<(), StateError> {
        match request {
            Request::Enter(next) => {
                self.transition(next);
                Ok(())
            }
            Request::Named(name) => {
                let next = match self.factories.get(&name) {
                    Some(factory) => factory(),
                    None => return Err(StateError::UnknownState { name }),
                };
                self.transition(next);
                Ok(())
            }
            Request::Restart => self.restart_current(),
        }
    }

    fn transition(&mut self, next: Box<dyn State<O>>) {
        // The outgoing state stays current until its exit hook has returned.
        let previous = self.current.as_mut().map(|old| {
            let mut cx = StateContext::new(&mut self.owner, &mut self.queue);
            old.exit(&mut cx);
            old.id()
        });

        let current = self.current.insert(next);
        let mut cx = StateContext::new(&mut self.owner, &mut self.queue);
        current.enter(&mut cx, previous);
        let entered = current.id();

        self.finish(previous, entered);
    }

    fn restart_current(&mut self) -> Result<(), StateError> {
        let Some(current) = self.current.as_mut() else {
            return Err(StateError::NotStarted);
        };
        let id = current.id();
        let mut cx = StateContext::new(&mut self.owner, &mut self.queue);
        current.exit(&mut cx);
        current.enter(&mut cx, Some(id));

        self.finish(Some(id), id);
        Ok(())
    }

    fn finish(&mut self, previous: Option<StateId>, entered: StateId) {
        self.previous = previous;
        self.transitions_made += 1;
        tracing::debug!(
            machine = %self.label,
            from = ?previous,
            to = %entered,
            "state transition"
        );
        self.transitions.raise((previous, entered));
    }
}

impl<O: std::fmt::Debug + 'static> std::fmt::Debug for StateMachine<O> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StateMachine")
            .field("label", &self.label)
            .field("owner", &self.owner)
            .field("current", &self.current_id())
            .field("previous", &self.previous)
            .finish()
    }
}
