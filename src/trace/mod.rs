//! Channel tracing: recorder, entries and observers.
//!
//! ## Contents
//! - [`TraceRecorder`] toggleable facility shared by traced channels
//! - [`TraceEntry`] one recorded raise (identity, timestamps, argument snapshot)
//! - [`TraceObserver`] extension point receiving entries
//! - [`LogWriter`] built-in observer that logs through `tracing` (feature `logging`)
//!
//! Observers register on the recorder the same way gameplay code subscribes
//! to a channel; the recorder is the single fan-in point for all raises.

mod entry;
#[cfg(feature = "logging")]
mod log;
mod observer;
mod recorder;

pub use entry::TraceEntry;
#[cfg(feature = "logging")]
pub use log::LogWriter;
pub use observer::TraceObserver;
pub use recorder::{ObserverId, TraceRecorder};
