//! # Trace observer trait.
//!
//! Provides [`TraceObserver`], the extension point for plugging diagnostics
//! (console logging, frame profilers, test probes) into a
//! [`TraceRecorder`](crate::TraceRecorder).
//!
//! ## Rules
//! - Observers run synchronously after the raise's subscriber fan-out.
//! - Observers see entries; they cannot cancel or alter the payload.
//! - A panicking observer is isolated: the panic is caught and logged, and the
//!   remaining observers still run.
//!
//! ## Example
//! ```rust
//! use tickwire::{TraceEntry, TraceObserver};
//!
//! struct FrameCounter;
//!
//! impl TraceObserver for FrameCounter {
//!     fn on_trace(&self, entry: &TraceEntry) {
//!         if entry.channel_name() == "frame" {
//!             // bump a counter, etc.
//!         }
//!     }
//!
//!     fn name(&self) -> &'static str { "frame-counter" }
//! }
//! ```

use crate::trace::TraceEntry;

/// Receiver of trace entries.
///
/// Any `Fn(&TraceEntry) + Send + Sync` closure is an observer too.
pub trait TraceObserver: Send + Sync + 'static {
    /// Handles one recorded raise.
    fn on_trace(&self, entry: &TraceEntry);

    /// Returns the observer name used in panic reports.
    ///
    /// The default uses `type_name::<Self>()`, which can be verbose - override it when possible.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

impl<F> TraceObserver for F
where
    F: Fn(&TraceEntry) + Send + Sync + 'static,
{
    fn on_trace(&self, entry: &TraceEntry) {
        self(entry)
    }
}
