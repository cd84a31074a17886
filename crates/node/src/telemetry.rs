// Path: crates/node/src/telemetry.rs

use anyhow::Result;
use weft_types::config::TelemetryConfig;

/// Installs the global tracing subscriber and, when enabled, the Prometheus sink.
///
/// Call once per process, before the application is built.
pub fn init_telemetry(config: &TelemetryConfig) -> Result<()> {
    weft_telemetry::init::init_tracing(&config.log_filter, config.json_logs)?;
    if config.metrics {
        weft_telemetry::prometheus::install()?;
        tracing::info!(target: "node", "Prometheus metrics sink installed");
    }
    Ok(())
}
