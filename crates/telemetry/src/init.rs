// Path: crates/telemetry/src/init.rs
use tracing_subscriber::{fmt, layer::SubscriberExt, EnvFilter, Registry};

/// Initializes the global `tracing` subscriber.
///
/// `RUST_LOG` wins over `default_filter` when set. `log` records from
/// dependencies are bridged into `tracing`. Fails if a global subscriber is
/// already installed.
pub fn init_tracing(default_filter: &str, json: bool) -> Result<(), anyhow::Error> {
    let filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_filter))?;
    let registry = Registry::default().with(filter);
    tracing_log::LogTracer::init()?;
    if json {
        let fmt_layer = fmt::layer()
            .json()
            .with_writer(std::io::stderr)
            .with_target(true)
            .with_current_span(true);
        tracing::subscriber::set_global_default(registry.with(fmt_layer))?;
    } else {
        let fmt_layer = fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(true);
        tracing::subscriber::set_global_default(registry.with(fmt_layer))?;
    }
    Ok(())
}
