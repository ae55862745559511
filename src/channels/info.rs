//! Channel identity and documentary metadata.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;

/// Global counter for channel identities.
static CHANNEL_SEQ: AtomicU64 = AtomicU64::new(1);

/// Process-unique identity of a declared channel.
///
/// Clones of a [`Channel`](crate::Channel) share the same id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ChannelId(u64);

impl ChannelId {
    pub(crate) fn next() -> Self {
        Self(CHANNEL_SEQ.fetch_add(1, AtomicOrdering::Relaxed))
    }

    /// Returns the raw numeric id.
    #[inline]
    pub fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ChannelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Immutable description of a channel, shared by the channel and its trace entries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChannelInfo {
    /// Identity.
    pub id: ChannelId,
    /// Short name used in logs (e.g. `"player-hurt"`).
    pub name: Arc<str>,
    /// Optional human-readable description. Purely documentary.
    pub description: Option<Arc<str>>,
    /// Number of payload slots (0, 1 or 2).
    pub arity: usize,
}

impl ChannelInfo {
    pub(crate) fn new(name: Arc<str>, description: Option<Arc<str>>, arity: usize) -> Self {
        Self {
            id: ChannelId::next(),
            name,
            description,
            arity,
        }
    }
}

impl fmt::Display for ChannelInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}", self.name, self.id)
    }
}
