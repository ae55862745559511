//! # Runtime configuration.
//!
//! Provides [`Config`], the settings shared by a [`Hub`](crate::Hub) and the
//! state machines it configures.
//!
//! ## Sentinel values
//! - `trace_arg_limit = 0` → argument snapshots are never truncated
//! - `max_chained_transitions = 0` → treated as 1 (clamped)

use serde::{Deserialize, Serialize};

/// Settings for tracing and state machine transition handling.
///
/// ## Field semantics
/// - `tracing`: whether the hub's recorder starts enabled
/// - `trace_arg_limit`: max characters kept per argument snapshot (`0` = unlimited)
/// - `max_chained_transitions`: how many transitions hooks may queue in a row
///
/// Deserializes from any serde format; missing fields take their defaults.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Start with tracing enabled.
    ///
    /// Can be toggled at runtime with [`Hub::set_tracing_enabled`](crate::Hub::set_tracing_enabled).
    pub tracing: bool,

    /// Maximum length (in chars) of each rendered argument in a trace entry.
    ///
    /// Longer renderings are cut and suffixed with `…`.
    pub trace_arg_limit: usize,

    /// Maximum number of transitions applied from one `enter_state`/`tick` call.
    ///
    /// Requests made by hooks are queued; a state that keeps re-requesting
    /// transitions aborts with `StateError::TransitionLoop` once this is exceeded.
    pub max_chained_transitions: usize,
}

impl Config {
    /// Returns the argument truncation limit as an `Option`.
    ///
    /// - `None` → no truncation
    /// - `Some(n)` → keep at most `n` chars
    #[inline]
    pub fn arg_limit(&self) -> Option<usize> {
        if self.trace_arg_limit == 0 {
            None
        } else {
            Some(self.trace_arg_limit)
        }
    }

    /// Returns the transition chain limit clamped to a minimum of 1.
    #[inline]
    pub fn chain_limit_clamped(&self) -> usize {
        self.max_chained_transitions.max(1)
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `tracing = false` (raises cost a single flag check)
    /// - `trace_arg_limit = 256`
    /// - `max_chained_transitions = 16`
    fn default() -> Self {
        Self {
            tracing: false,
            trace_arg_limit: 256,
            max_chained_transitions: 16,
        }
    }
}
