//! Error types used by the state machine.
//!
//! Channel and trace operations never return errors: unsubscribing an absent
//! handler is a no-op, and subscriber faults are panics that unwind to the
//! raiser. The only typed failures are invalid state transitions, described
//! by [`StateError`].
//!
//! Like every error in this crate it provides `as_label` / `as_message`
//! helpers for logs and metrics.

use thiserror::Error;

/// # Errors produced by [`StateMachine`](crate::StateMachine) transitions.
///
/// Every variant means the requested transition did not happen and the
/// machine kept its previous current state.
#[non_exhaustive]
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// No state is registered under the requested name (invalid transition target).
    #[error("invalid transition: no state registered as {name:?}")]
    UnknownState {
        /// The name passed to `enter_named`.
        name: String,
    },

    /// The operation needs a current state but the machine was never entered.
    #[error("invalid transition: machine has no current state yet")]
    NotStarted,

    /// Hooks kept requesting transitions past the configured chain limit.
    #[error("transition chain exceeded {limit} queued transitions; possible state loop")]
    TransitionLoop {
        /// The configured `max_chained_transitions`.
        limit: usize,
    },
}

impl StateError {
    /// Returns a short stable label (snake_case) for use in logs/metrics.
    ///
    /// # Example
    /// ```
    /// use tickwire::StateError;
    ///
    /// let err = StateError::UnknownState { name: "hurt".into() };
    /// assert_eq!(err.as_label(), "state_unknown");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            StateError::UnknownState { .. } => "state_unknown",
            StateError::NotStarted => "state_not_started",
            StateError::TransitionLoop { .. } => "state_transition_loop",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            StateError::UnknownState { name } => format!("unknown state: {name}"),
            StateError::NotStarted => "no current state".to_string(),
            StateError::TransitionLoop { limit } => {
                format!("more than {limit} chained transitions")
            }
        }
    }

    /// Indicates whether the error comes from a missing or absent target state.
    ///
    /// Returns `true` for [`StateError::UnknownState`] and [`StateError::NotStarted`].
    pub fn is_invalid_transition(&self) -> bool {
        matches!(
            self,
            StateError::UnknownState { .. } | StateError::NotStarted
        )
    }
}
