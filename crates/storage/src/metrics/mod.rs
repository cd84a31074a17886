// Path: crates/storage/src/metrics/mod.rs
use weft_telemetry::sinks::StorageMetricsSink;

pub fn metrics() -> &'static dyn StorageMetricsSink {
    weft_telemetry::storage_metrics()
}
