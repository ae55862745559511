//! # Trace entry: one recorded channel raise.
//!
//! Entries are transient: they are built at raise entry, handed to every
//! trace observer, then dropped. Nothing is retained by the recorder.
//!
//! ## Ordering guarantees
//! Each entry has a globally unique sequence number (`seq`) that increases
//! monotonically, so observers can restore raise order across channels.

use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::sync::Arc;
use std::time::{Duration, Instant, SystemTime};

use crate::channels::{ChannelId, ChannelInfo};

/// Global sequence counter for trace ordering.
static TRACE_SEQ: AtomicU64 = AtomicU64::new(0);

/// Diagnostic record of a single [`Channel::raise`](crate::Channel::raise).
///
/// - `seq`: monotonic global sequence
/// - `at`: wall-clock timestamp (for logs)
/// - `instant`: monotonic timestamp taken at raise entry, before fan-out
/// - `args`: owned `Debug` renderings of the payload slots
#[derive(Debug, Clone)]
pub struct TraceEntry {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Monotonic timestamp.
    pub instant: Instant,
    /// The raised channel.
    pub channel: Arc<ChannelInfo>,
    /// Snapshot of the payload, one string per slot.
    pub args: Vec<String>,
}

impl TraceEntry {
    pub(crate) fn new(channel: Arc<ChannelInfo>, args: Vec<String>) -> Self {
        Self {
            seq: TRACE_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            instant: Instant::now(),
            channel,
            args,
        }
    }

    #[inline]
    pub fn channel_id(&self) -> ChannelId {
        self.channel.id
    }

    #[inline]
    pub fn channel_name(&self) -> &str {
        &self.channel.name
    }

    /// Time elapsed since the raise began.
    pub fn elapsed(&self) -> Duration {
        self.instant.elapsed()
    }
}
