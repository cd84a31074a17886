// Path: crates/node/src/bin/weft-node.rs
#![forbid(unsafe_code)]

//! Command-line entry point: inspects, queries or replays blocks on a node store.

use anyhow::{Context as _, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use weft_api::lifecycle::ChainApplication;
use weft_node::replay::{self, Script};
use weft_node::{init_telemetry, open_node, NodeConfig};
use weft_types::app::RequestQuery;

#[derive(Parser, Debug)]
#[clap(name = "weft-node", version, about = "Weft transaction-processing harness")]
struct Opts {
    #[clap(long, help = "Path to the node.toml configuration file. Defaults apply when omitted.")]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Print the harness name, version and last commit.
    Info,
    /// Query the last committed state.
    Query {
        /// The query path, e.g. `/balances?prefix`.
        path: String,
        /// Hex-encoded query data.
        #[clap(long, default_value = "")]
        data: String,
    },
    /// Run a JSON block script through the harness and commit every block.
    Replay {
        script: PathBuf,
    },
}

fn main() -> Result<()> {
    let opts = Opts::parse();
    let config = match &opts.config {
        Some(path) => NodeConfig::load(path)?,
        None => NodeConfig::default(),
    };
    init_telemetry(&config.telemetry)?;
    let mut app = open_node(&config)?;

    let out = match opts.command {
        Command::Info => serde_json::to_value(app.info()?)?,
        Command::Query { path, data } => {
            let data = hex::decode(&data).context("--data must be hex")?;
            serde_json::to_value(app.query(RequestQuery { path, data })?)?
        }
        Command::Replay { script } => {
            let script = Script::load(&script)?;
            let initialized = app.chain_id().is_some();
            serde_json::to_value(replay::run(&mut app, &script, initialized)?)?
        }
    };
    println!("{}", serde_json::to_string_pretty(&out)?);
    if config.telemetry.metrics {
        eprintln!("{}", weft_telemetry::prometheus::gather_text()?);
    }
    Ok(())
}
