//! Generic finite state machine.
//!
//! ## Contents
//! - [`State`] behavior trait with `enter` / `update` / `exit` hooks
//! - [`StateContext`] what hooks may touch: the owner and transition requests
//! - [`StateId`] identity of a concrete state type
//! - [`StateMachine`] owner + current state + ordered transitions
//!
//! One owner lives inside exactly one machine, and a machine has at most one
//! current state, so "two machines driving the same owner" cannot be expressed.

mod machine;
mod state;

pub use machine::StateMachine;
pub use state::{State, StateContext, StateId};
