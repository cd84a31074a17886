// Path: crates/telemetry/src/time.rs
use crate::sinks::ExecutionMetricsSink;
use std::time::Instant;

/// Observes the commit duration when dropped.
pub struct CommitTimer<'a> {
    sink: &'a dyn ExecutionMetricsSink,
    start: Instant,
}

impl<'a> CommitTimer<'a> {
    /// Starts the timer.
    pub fn new(sink: &'a dyn ExecutionMetricsSink) -> Self {
        Self {
            sink,
            start: Instant::now(),
        }
    }
}

impl Drop for CommitTimer<'_> {
    fn drop(&mut self) {
        self.sink
            .observe_commit_duration(self.start.elapsed().as_secs_f64());
    }
}
