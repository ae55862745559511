//! # tickwire
//!
//! **tickwire** is the in-process decoupling layer of a tick-driven game:
//! typed publish/subscribe channels with optional raise tracing, and a generic
//! state machine for characters, entities and menus.
//!
//! Everything runs synchronously on the caller's thread. Nothing here spawns,
//! blocks or awaits; the host loop calls [`StateMachine::tick`] once per frame.
//!
//! ## Architecture
//! ### Overview
//! ```text
//!                  ┌──────────────────────────────────────────┐
//!                  │  Hub (created once per session)          │
//!                  │  - Config                                │
//!                  │  - TraceRecorder (shared, toggleable)    │
//!                  └──────┬─────────────────────┬─────────────┘
//!                         │ channel::<A>()      │ machine(owner)
//!                         ▼                     ▼
//!   producers ──raise──► Channel<A> ◄────────── StateMachine<O>
//!                         │                     │  owns O + current State<O>
//!                         │ fan-out (snapshot)  │  raises its `transitions` channel
//!                         ▼                     ▼
//!               subscriber 1..N        enter / update / exit hooks
//!                         │
//!                         └──► TraceRecorder ──► TraceObserver(s) (e.g. LogWriter)
//! ```
//!
//! ### Transition ordering
//! ```text
//! enter_state(next)
//!   ├─► current.exit(cx)
//!   ├─► current = next
//!   ├─► next.enter(cx, previous)
//!   ├─► transitions.raise((previous, next))
//!   └─► apply transitions queued by hooks (FIFO, bounded)
//! ```
//!
//! ## Features
//! | Area              | Description                                                  | Key types / traits                        |
//! |-------------------|--------------------------------------------------------------|-------------------------------------------|
//! | **Channels**      | Typed 0/1/2-slot notifications, snapshot fan-out.            | [`Channel`], [`Payload`]                  |
//! | **Tracing**       | Per-raise diagnostics, zero-cost when disabled.              | [`TraceRecorder`], [`TraceObserver`]      |
//! | **State machine** | Owner-bound states with exit-before-enter transitions.       | [`StateMachine`], [`State`]               |
//! | **Errors**        | Typed invalid-transition errors.                             | [`StateError`]                            |
//! | **Configuration** | Centralize tracing and transition settings.                  | [`Config`], [`Hub`]                       |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] trace observer.
//!
//! ## Example
//! ```rust
//! use tickwire::{Channel1, Config, Hub, State, StateContext, StateId};
//!
//! #[derive(Default)]
//! struct Player { hp: i32, hurt: Option<Channel1<i32>> }
//!
//! struct Idle;
//! struct Hurt { damage: i32 }
//!
//! impl State<Player> for Idle {}
//!
//! impl State<Player> for Hurt {
//!     fn enter(&mut self, cx: &mut StateContext<'_, Player>, _previous: Option<StateId>) {
//!         let player = cx.owner_mut();
//!         player.hp -= self.damage;
//!         if let Some(ch) = &player.hurt {
//!             ch.raise((player.hp,));
//!         }
//!         cx.enter_state(Idle);
//!     }
//! }
//!
//! let hub = Hub::new(Config::default());
//! let player_hurt: Channel1<i32> = hub.channel("player-hurt");
//! player_hurt.subscribe(|(hp,): &(i32,)| assert_eq!(*hp, 90));
//!
//! let mut player = hub.machine("player", Player { hp: 100, hurt: Some(player_hurt.clone()) });
//! player.enter_state(Idle).unwrap();
//! player.enter_state(Hurt { damage: 10 }).unwrap();
//!
//! assert!(player.is_in::<Idle>());
//! assert_eq!(player.owner().hp, 90);
//! ```
mod channels;
mod config;
mod error;
mod fsm;
mod hub;
mod trace;

// ---- Public re-exports ----

pub use channels::{
    Channel, Channel0, Channel1, Channel2, ChannelBuilder, ChannelId, ChannelInfo, Handler,
    Payload, SubscriptionId,
};
pub use config::Config;
pub use error::StateError;
pub use fsm::{State, StateContext, StateId, StateMachine};
pub use hub::Hub;
pub use trace::{ObserverId, TraceEntry, TraceObserver, TraceRecorder};

// Built-in logging observer.
// Disable with: `--no-default-features`
#[cfg(feature = "logging")]
pub use trace::LogWriter;
