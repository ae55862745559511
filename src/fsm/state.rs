//! # State trait and hook context.
//!
//! A [`State<O>`] is one unit of behavior for an owner of type `O`. The owner
//! type is a trait parameter, so a state written for `Hero` only fits a
//! `StateMachine<Hero>`; mismatches are compile errors.
//!
//! Hooks never get a reference to the machine. They work through a
//! [`StateContext`], which lends the owner and accepts transition requests.
//! Requests are queued and applied once the running hook has returned.

use std::any::TypeId;
use std::collections::VecDeque;
use std::fmt;
use std::hash::{Hash, Hasher};

/// Identity of a concrete state type.
///
/// Used to tell hooks which state was left, and to report transitions.
#[derive(Clone, Copy)]
pub struct StateId {
    type_id: TypeId,
    name: &'static str,
}

impl StateId {
    /// Returns the id of state type `S`.
    pub fn of<S: ?Sized + 'static>() -> Self {
        Self {
            type_id: TypeId::of::<S>(),
            name: std::any::type_name::<S>(),
        }
    }

    /// Returns `true` if this id is the id of `S`.
    #[inline]
    pub fn is<S: ?Sized + 'static>(&self) -> bool {
        self.type_id == TypeId::of::<S>()
    }

    /// Full type name, including the module path.
    pub fn type_name(&self) -> &'static str {
        self.name
    }

    /// Type name without its module path (`game::hero::Idle` → `Idle`).
    pub fn short_name(&self) -> &'static str {
        let base = self.name.split('<').next().unwrap_or(self.name);
        match base.rfind("::") {
            Some(pos) => &self.name[pos + 2..],
            None => self.name,
        }
    }
}

impl PartialEq for StateId {
    fn eq(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }
}

impl Eq for StateId {}

impl Hash for StateId {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.type_id.hash(state);
    }
}

impl fmt::Debug for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

impl fmt::Display for StateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.short_name())
    }
}

/// Behavior of an owner `O` while this state is current.
///
/// All hooks default to doing nothing.
///
/// ## Example
/// ```rust
/// use tickwire::{State, StateContext, StateId};
///
/// #[derive(Default)]
/// struct Npc { seconds_idle: f32 }
///
/// struct Idle { elapsed: u32 }
///
/// impl State<Npc> for Idle {
///     fn enter(&mut self, cx: &mut StateContext<'_, Npc>, _previous: Option<StateId>) {
///         self.elapsed = 0;
///         cx.owner_mut().seconds_idle = 0.0;
///     }
///
///     fn update(&mut self, cx: &mut StateContext<'_, Npc>) {
///         self.elapsed += 1;
///         cx.owner_mut().seconds_idle += 1.0 / 60.0;
///     }
/// }
/// ```
pub trait State<O>: 'static {
    /// Called right after this state became current.
    ///
    /// `previous` is the state that was just exited, or `None` on the
    /// machine's first transition. On a restart it is this state's own id.
    fn enter(&mut self, cx: &mut StateContext<'_, O>, previous: Option<StateId>) {
        let _ = (cx, previous);
    }

    /// Called once per host tick while this state is current.
    fn update(&mut self, cx: &mut StateContext<'_, O>) {
        let _ = cx;
    }

    /// Called right before this state stops being current.
    fn exit(&mut self, cx: &mut StateContext<'_, O>) {
        let _ = cx;
    }

    /// Identity reported to hooks, logs and the transitions channel.
    fn id(&self) -> StateId {
        StateId::of::<Self>()
    }
}

/// A transition queued by a hook or by the machine's public API.
pub(crate) enum Request<O> {
    Enter(Box<dyn State<O>>),
    Named(String),
    Restart,
}

/// Access lent to state hooks: the owner, plus transition requests.
pub struct StateContext<'a, O> {
    owner: &'a mut O,
    queue: &'a mut VecDeque<Request<O>>,
}

impl<'a, O> StateContext<'a, O> {
    pub(crate) fn new(owner: &'a mut O, queue: &'a mut VecDeque<Request<O>>) -> Self {
        Self { owner, queue }
    }

    pub fn owner(&self) -> &O {
        &*self.owner
    }

    pub fn owner_mut(&mut self) -> &mut O {
        &mut *self.owner
    }

    /// Requests a transition to `next` once the running hook returns.
    pub fn enter_state<S: State<O>>(&mut self, next: S) {
        self.enter_boxed(Box::new(next));
    }

    pub fn enter_boxed(&mut self, next: Box<dyn State<O>>) {
        self.queue.push_back(Request::Enter(next));
    }

    /// Requests a transition to a state registered under `name`.
    ///
    /// An unknown name fails the outer `enter_state`/`tick` call with
    /// [`StateError::UnknownState`](crate::StateError::UnknownState).
    pub fn enter_named(&mut self, name: impl Into<String>) {
        self.queue.push_back(Request::Named(name.into()));
    }

    /// Requests that the current state be exited and entered again.
    pub fn restart(&mut self) {
        self.queue.push_back(Request::Restart);
    }

    /// Number of transition requests waiting to be applied.
    pub fn pending(&self) -> usize {
        self.queue.len()
    }
}
