//! # LogWriter — trace entries to `tracing`
//!
//! A minimal observer that emits every [`TraceEntry`] as a `debug` event under
//! the `tickwire::trace` target. Install any `tracing` subscriber to see it.
//!
//! ## Example output (fmt subscriber)
//! ```text
//! DEBUG tickwire::trace: raise seq=0 channel=player-hurt#3 args=["12"]
//! DEBUG tickwire::trace: raise seq=1 channel=hero.transitions#1 args=["Some(Idle)", "Hurt"]
//! ```

use crate::trace::{TraceEntry, TraceObserver};

/// Logging trace observer.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

impl TraceObserver for LogWriter {
    fn on_trace(&self, e: &TraceEntry) {
        tracing::debug!(
            target: "tickwire::trace",
            seq = e.seq,
            channel = %e.channel,
            args = ?e.args,
            "raise"
        );
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::channels::Channel;
    use crate::trace::TraceRecorder;
    use std::sync::Arc;

    #[test]
    fn test_log_writer_observes_without_subscriber_installed() {
        let rec = Arc::new(TraceRecorder::new());
        rec.set_enabled(true);
        rec.add_observer(Arc::new(LogWriter::new()));

        let ch: Channel<(i32,)> = Channel::builder("logged").recorder(Arc::clone(&rec)).build();
        ch.raise((1,));

        assert_eq!(rec.recorded(), 1);
        assert_eq!(rec.panicked_observers(), 0);
        assert_eq!(LogWriter.name(), "LogWriter");
    }
}
