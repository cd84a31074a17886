// Path: crates/telemetry/src/sinks.rs
//! Defines abstract traits for metrics reporting, decoupling core logic from the backend.

use once_cell::sync::OnceCell;

// --- Static Sink Access ---

/// A no-op sink for use in tests or when telemetry is disabled.
#[derive(Debug, Clone, Copy)]
pub struct NopSink;

/// A lazily-initialized static reference to the global `MetricsSink` implementation.
pub static SINK: OnceCell<&'static dyn MetricsSink> = OnceCell::new();
static NOP_SINK: NopSink = NopSink;

/// Returns a static reference to the configured execution metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn execution_metrics() -> &'static dyn ExecutionMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_execution(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured storage metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn storage_metrics() -> &'static dyn StorageMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_storage(),
        None => &NOP_SINK,
    }
}

/// Returns a static reference to the configured error metrics sink.
/// If no sink has been initialized, it returns a no-op sink.
pub fn error_metrics() -> &'static dyn ErrorMetricsSink {
    match SINK.get() {
        Some(sink) => sink.as_error(),
        None => &NOP_SINK,
    }
}

// --- Trait Definitions ---

/// A sink for metrics related to transaction processing and the block lifecycle.
pub trait ExecutionMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the transaction counter, labeled by phase (`check`/`deliver`) and outcome.
    fn inc_tx(&self, phase: &'static str, outcome: &'static str);
    /// Observes the time spent inside the decorator chain for one transaction.
    fn observe_tx_duration(&self, phase: &'static str, duration_secs: f64);
    /// Increments the counter of runtime faults converted into failures.
    fn inc_panics_recovered(&self, phase: &'static str);
    /// Observes the duration of a `Commit` call.
    fn observe_commit_duration(&self, duration_secs: f64);
    /// Sets the gauge for the last committed height.
    fn set_block_height(&self, height: u64);
}
impl ExecutionMetricsSink for NopSink {
    fn inc_tx(&self, _phase: &'static str, _outcome: &'static str) {}
    fn observe_tx_duration(&self, _phase: &'static str, _duration_secs: f64) {}
    fn inc_panics_recovered(&self, _phase: &'static str) {}
    fn observe_commit_duration(&self, _duration_secs: f64) {}
    fn set_block_height(&self, _height: u64) {}
}

/// A sink for metrics related to the persistent storage layer.
pub trait StorageMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments the total number of key and value bytes written at commit.
    fn inc_bytes_written_total(&self, bytes: u64);
    /// Increments the total number of keys deleted at commit.
    fn inc_keys_deleted_total(&self, count: u64);
}
impl StorageMetricsSink for NopSink {
    fn inc_bytes_written_total(&self, _bytes: u64) {}
    fn inc_keys_deleted_total(&self, _count: u64) {}
}

/// A sink for recording structured error metrics.
pub trait ErrorMetricsSink: Send + Sync + std::fmt::Debug {
    /// Increments a counter for a specific error, categorized by its kind and variant.
    fn inc_error(&self, kind: &'static str, variant: &'static str);
}
impl ErrorMetricsSink for NopSink {
    fn inc_error(&self, _kind: &'static str, _variant: &'static str) {}
}

/// A unified sink that implements all domain-specific traits, providing a single
/// point of implementation for metrics backends like Prometheus.
pub trait MetricsSink: ExecutionMetricsSink + StorageMetricsSink + ErrorMetricsSink {
    /// Views the sink as an execution sink.
    fn as_execution(&self) -> &dyn ExecutionMetricsSink;
    /// Views the sink as a storage sink.
    fn as_storage(&self) -> &dyn StorageMetricsSink;
    /// Views the sink as an error sink.
    fn as_error(&self) -> &dyn ErrorMetricsSink;
}

// Blanket implementation to allow any type that implements all sub-traits
// to be used as a `MetricsSink`.
impl<T> MetricsSink for T
where
    T: ExecutionMetricsSink + StorageMetricsSink + ErrorMetricsSink,
{
    fn as_execution(&self) -> &dyn ExecutionMetricsSink {
        self
    }
    fn as_storage(&self) -> &dyn StorageMetricsSink {
        self
    }
    fn as_error(&self) -> &dyn ErrorMetricsSink {
        self
    }
}
