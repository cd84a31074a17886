// Path: crates/types/src/config/mod.rs

//! Node configuration, loaded from TOML.
//!
//! Every section and field has a default, so an empty document is a valid
//! in-memory node.

use crate::error::CoreError;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Selects the durable store backing the harness.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StoreBackend {
    /// The in-memory hash-chained store. State is lost on restart.
    #[default]
    Memory,
    /// The persistent `redb` store.
    Redb,
}

/// The `[store]` section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq, Default)]
pub struct StoreConfig {
    /// The backend to open.
    #[serde(default)]
    pub backend: StoreBackend,
    /// The database file. Required for `redb`.
    #[serde(default)]
    pub path: Option<PathBuf>,
}

/// The `[savepoint]` section: which phases run inside a rollback overlay.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct SavepointConfig {
    /// Roll back failed checks.
    #[serde(default = "default_true")]
    pub check: bool,
    /// Roll back failed deliveries.
    #[serde(default = "default_true")]
    pub deliver: bool,
}

impl Default for SavepointConfig {
    fn default() -> Self {
        Self {
            check: true,
            deliver: true,
        }
    }
}

/// The `[telemetry]` section.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct TelemetryConfig {
    /// An `EnvFilter` directive string. `RUST_LOG` takes precedence when set.
    #[serde(default = "default_log_filter")]
    pub log_filter: String,
    /// Emit JSON log lines instead of human-readable ones.
    #[serde(default)]
    pub json_logs: bool,
    /// Install the Prometheus metrics sink.
    #[serde(default)]
    pub metrics: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_filter: default_log_filter(),
            json_logs: false,
            metrics: false,
        }
    }
}

/// Top-level node configuration.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct NodeConfig {
    /// The harness name reported by `Info`.
    #[serde(default = "default_app_name")]
    pub app_name: String,
    /// Durable store selection.
    #[serde(default)]
    pub store: StoreConfig,
    /// Savepoint phases.
    #[serde(default)]
    pub savepoint: SavepointConfig,
    /// Logging and metrics.
    #[serde(default)]
    pub telemetry: TelemetryConfig,
}

fn default_true() -> bool {
    true
}
fn default_log_filter() -> String {
    "info".to_string()
}
fn default_app_name() -> String {
    "weft".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            app_name: default_app_name(),
            store: StoreConfig::default(),
            savepoint: SavepointConfig::default(),
            telemetry: TelemetryConfig::default(),
        }
    }
}

impl NodeConfig {
    /// Parses and validates a configuration from a TOML string.
    pub fn from_toml_str(s: &str) -> Result<Self, CoreError> {
        let cfg: Self = toml::from_str(s).map_err(|e| CoreError::Config(e.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Reads, parses and validates a configuration file.
    pub fn load(path: &Path) -> Result<Self, CoreError> {
        let raw = std::fs::read_to_string(path)
            .map_err(|e| CoreError::Config(format!("{}: {}", path.display(), e)))?;
        Self::from_toml_str(&raw)
    }

    /// Checks cross-field constraints serde cannot express.
    pub fn validate(&self) -> Result<(), CoreError> {
        if self.app_name.trim().is_empty() {
            return Err(CoreError::Config("app_name must not be empty".into()));
        }
        if self.store.backend == StoreBackend::Redb && self.store.path.is_none() {
            return Err(CoreError::Config(
                "store.path is required for the redb backend".into(),
            ));
        }
        Ok(())
    }
}
