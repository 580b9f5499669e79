//! Strategy Margin Binary
//!
//! Evaluates a portfolio scenario and prints the report as JSON.
//!
//! # Usage
//!
//! ```bash
//! strategy-margin <scenario.yaml> [config.yaml]
//! ```
//!
//! The config path defaults to `config.yaml`; built-in defaults apply when
//! that file does not exist.
//!
//! # Environment Variables
//!
//! - `RUST_LOG`: Overrides the configured log level
//! - Any `${VAR}` referenced from the config file

use std::path::Path;

use anyhow::{Context, Result, bail};
use strategy_margin::config::{Config, load_config};
use strategy_margin::telemetry::init_telemetry;
use strategy_margin::{EvaluateScenarioUseCase, load_scenario};

const DEFAULT_CONFIG_PATH: &str = "config.yaml";

fn main() -> Result<()> {
    let mut args = std::env::args().skip(1);
    let Some(scenario_path) = args.next() else {
        bail!("usage: strategy-margin <scenario.yaml> [config.yaml]");
    };
    let config_path = args.next();

    let config = match config_path.as_deref() {
        Some(path) => load_config(Some(path)).with_context(|| format!("loading {path}"))?,
        None if Path::new(DEFAULT_CONFIG_PATH).exists() => {
            load_config(Some(DEFAULT_CONFIG_PATH)).context("loading config.yaml")?
        }
        None => Config::default(),
    };

    init_telemetry(&config.observability.logging);
    tracing::info!(
        scenario = %scenario_path,
        margin_buffer = %config.margin.margin_buffer,
        max_search_iterations = config.sizing.max_search_iterations,
        "Starting strategy margin evaluation"
    );

    let scenario = load_scenario(&scenario_path)?;
    let report = EvaluateScenarioUseCase::from_config(config).execute(&scenario)?;

    println!("{}", serde_json::to_string_pretty(&report)?);
    Ok(())
}
