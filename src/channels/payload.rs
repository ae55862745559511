//! # Payload arities carried by a channel.
//!
//! A channel's payload is a tuple: `()` for notifications without data,
//! `(T,)` for one value, `(T0, T1)` for two. The arity is part of the
//! channel's type, so it cannot change after the channel is created.
//!
//! Payload values must be `Debug` so the trace recorder can snapshot them.
//! Objects that should be shared rather than copied travel as `Arc<T>`.

use std::fmt::Debug;

/// Payload tuple accepted by [`Channel`](crate::Channel).
///
/// Implemented for `()`, `(T,)` and `(T0, T1)`.
pub trait Payload: 'static {
    /// Number of payload slots (0, 1 or 2).
    const ARITY: usize;

    /// Renders every slot to an owned string for a trace entry.
    ///
    /// Only called when tracing is enabled. `limit` caps each rendering in chars.
    fn snapshot(&self, limit: Option<usize>) -> Vec<String>;
}

impl Payload for () {
    const ARITY: usize = 0;

    fn snapshot(&self, _limit: Option<usize>) -> Vec<String> {
        Vec::new()
    }
}

impl<T> Payload for (T,)
where
    T: Debug + 'static,
{
    const ARITY: usize = 1;

    fn snapshot(&self, limit: Option<usize>) -> Vec<String> {
        vec![render(&self.0, limit)]
    }
}

impl<T0, T1> Payload for (T0, T1)
where
    T0: Debug + 'static,
    T1: Debug + 'static,
{
    const ARITY: usize = 2;

    fn snapshot(&self, limit: Option<usize>) -> Vec<String> {
        vec![render(&self.0, limit), render(&self.1, limit)]
    }
}

/// Debug-formats `value`, cutting it to `limit` chars plus an ellipsis.
fn render<T: Debug>(value: &T, limit: Option<usize>) -> String {
    let full = format!("{value:?}");
    match limit {
        Some(max) if full.chars().count() > max => {
            let mut cut: String = full.chars().take(max).collect();
            cut.push('…');
            cut
        }
        _ => full,
    }
}
