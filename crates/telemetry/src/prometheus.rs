// Path: crates/telemetry/src/prometheus.rs
//! A concrete implementation of the metrics sinks using the Prometheus crate.

use crate::sinks::*;
use once_cell::sync::OnceCell;
use prometheus::{
    exponential_buckets, register_histogram, register_histogram_vec, register_int_counter,
    register_int_counter_vec, register_int_gauge, Histogram, HistogramVec, IntCounter,
    IntCounterVec, IntGauge,
};

// --- Metric Statics ---
// The collectors are initialized exactly once by `install`.

static TX_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static TX_DURATION_SECONDS: OnceCell<HistogramVec> = OnceCell::new();
static PANICS_RECOVERED_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();
static COMMIT_DURATION_SECONDS: OnceCell<Histogram> = OnceCell::new();
static BLOCK_HEIGHT: OnceCell<IntGauge> = OnceCell::new();
static STORAGE_BYTES_WRITTEN_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static STORAGE_KEYS_DELETED_TOTAL: OnceCell<IntCounter> = OnceCell::new();
static ERRORS_TOTAL: OnceCell<IntCounterVec> = OnceCell::new();

/// The Prometheus-backed metrics sink.
#[derive(Debug, Clone, Copy)]
pub struct PrometheusSink;

static PROMETHEUS_SINK: PrometheusSink = PrometheusSink;

/// Runs `$body` with the collector bound to `$m`. Before `install()` the call is a no-op.
macro_rules! with_metric {
    ($metric:ident, |$m:ident| $body:expr) => {
        if let Some($m) = $metric.get() {
            $body;
        }
    };
}

impl ExecutionMetricsSink for PrometheusSink {
    fn inc_tx(&self, phase: &'static str, outcome: &'static str) {
        with_metric!(TX_TOTAL, |m| m.with_label_values(&[phase, outcome]).inc());
    }
    fn observe_tx_duration(&self, phase: &'static str, duration_secs: f64) {
        with_metric!(TX_DURATION_SECONDS, |m| m
            .with_label_values(&[phase])
            .observe(duration_secs));
    }
    fn inc_panics_recovered(&self, phase: &'static str) {
        with_metric!(PANICS_RECOVERED_TOTAL, |m| m.with_label_values(&[phase]).inc());
    }
    fn observe_commit_duration(&self, duration_secs: f64) {
        with_metric!(COMMIT_DURATION_SECONDS, |m| m.observe(duration_secs));
    }
    fn set_block_height(&self, height: u64) {
        with_metric!(BLOCK_HEIGHT, |m| m.set(i64::try_from(height).unwrap_or(i64::MAX)));
    }
}

impl StorageMetricsSink for PrometheusSink {
    fn inc_bytes_written_total(&self, bytes: u64) {
        with_metric!(STORAGE_BYTES_WRITTEN_TOTAL, |m| m.inc_by(bytes));
    }
    fn inc_keys_deleted_total(&self, count: u64) {
        with_metric!(STORAGE_KEYS_DELETED_TOTAL, |m| m.inc_by(count));
    }
}

impl ErrorMetricsSink for PrometheusSink {
    fn inc_error(&self, kind: &'static str, variant: &'static str) {
        with_metric!(ERRORS_TOTAL, |m| m.with_label_values(&[kind, variant]).inc());
    }
}

fn already_registered<T>(_: T) -> prometheus::Error {
    prometheus::Error::AlreadyReg
}

/// Registers all collectors with the default registry and installs the
/// Prometheus sink as the global sink.
///
/// Must be called at most once per process; a second call returns
/// `prometheus::Error::AlreadyReg`.
pub fn install() -> Result<&'static dyn MetricsSink, prometheus::Error> {
    TX_TOTAL
        .set(register_int_counter_vec!(
            "weft_tx_total",
            "Transactions processed, by phase and outcome.",
            &["phase", "outcome"]
        )?)
        .map_err(already_registered)?;
    TX_DURATION_SECONDS
        .set(register_histogram_vec!(
            "weft_tx_duration_seconds",
            "Time spent in the decorator chain per transaction.",
            &["phase"],
            exponential_buckets(0.0001, 2.0, 16)?
        )?)
        .map_err(already_registered)?;
    PANICS_RECOVERED_TOTAL
        .set(register_int_counter_vec!(
            "weft_panics_recovered_total",
            "Runtime faults converted into internal-error failures.",
            &["phase"]
        )?)
        .map_err(already_registered)?;
    COMMIT_DURATION_SECONDS
        .set(register_histogram!(
            "weft_commit_duration_seconds",
            "Duration of the Commit lifecycle call.",
            exponential_buckets(0.0005, 2.0, 16)?
        )?)
        .map_err(already_registered)?;
    BLOCK_HEIGHT
        .set(register_int_gauge!(
            "weft_block_height",
            "The last committed height."
        )?)
        .map_err(already_registered)?;
    STORAGE_BYTES_WRITTEN_TOTAL
        .set(register_int_counter!(
            "weft_storage_bytes_written_total",
            "Key and value bytes written to the store at commit."
        )?)
        .map_err(already_registered)?;
    STORAGE_KEYS_DELETED_TOTAL
        .set(register_int_counter!(
            "weft_storage_keys_deleted_total",
            "Keys deleted from the store at commit."
        )?)
        .map_err(already_registered)?;
    ERRORS_TOTAL
        .set(register_int_counter_vec!(
            "weft_errors_total",
            "Structured errors, by kind and stable code.",
            &["kind", "variant"]
        )?)
        .map_err(already_registered)?;

    let sink: &'static dyn MetricsSink = &PROMETHEUS_SINK;
    SINK.set(sink).map_err(already_registered)?;
    Ok(sink)
}

/// Encodes every registered metric in the Prometheus text exposition format.
pub fn gather_text() -> Result<String, prometheus::Error> {
    use prometheus::Encoder;
    let mut buf = Vec::new();
    prometheus::TextEncoder::new().encode(&prometheus::gather(), &mut buf)?;
    String::from_utf8(buf).map_err(|e| prometheus::Error::Msg(e.to_string()))
}
