//! Shared command utilities
//!
//! This module contains:
//! - `load_config` - Resolve configuration and apply global CLI flags
//! - `open_engine` - Load the transaction store and wrap it in an engine
//! - `or_empty` - Treat an empty dataset as a message, not a failure
//! - `empty_notice` - The message `or_empty` prints
//! - `print_json` - Pretty JSON output for `--json`

use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::warn;

use pocketwise_core::{AnalyticsEngine, Config, Error, TransactionStore};

use crate::cli::Cli;

/// Load configuration, then apply `--data` and `--strict`
pub fn load_config(cli: &Cli) -> Result<Config> {
    let mut config = Config::load(cli.config.as_deref()).context("Failed to load configuration")?;

    if let Some(path) = &cli.data {
        config.data.path = Some(path.clone());
    }
    if cli.strict {
        config.data.strict = true;
    }

    Ok(config)
}

/// Load the configured data source, or the bundled sample data
pub fn open_engine(config: &Config) -> Result<AnalyticsEngine> {
    let policy = config.data.policy();

    let store = match &config.data.path {
        Some(path) => TransactionStore::load(path, policy)
            .with_context(|| format!("Failed to load transactions from {}", path.display()))?,
        None => TransactionStore::embedded(policy).context("Failed to load bundled sample data")?,
    };

    let report = store.load_report();
    if report.skipped > 0 || report.flagged > 0 {
        warn!(
            skipped = report.skipped,
            flagged = report.flagged,
            "Some records were skipped or flagged, run with --verbose for details"
        );
    }

    Ok(AnalyticsEngine::new(Arc::new(store)))
}

/// Unwrap a core result, printing a notice instead of failing on empty data
pub fn or_empty<T>(result: pocketwise_core::Result<T>, json: bool) -> Result<Option<T>> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(Error::NoTransactions) => {
            println!("{}", empty_notice(json));
            Ok(None)
        }
        Err(e) => Err(e.into()),
    }
}

/// Empty-data notice, a JSON object under `--json`
pub fn empty_notice(json: bool) -> String {
    if json {
        serde_json::json!({ "message": "No transactions found" }).to_string()
    } else {
        "No transactions found.".to_string()
    }
}

pub fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("Failed to serialize output")?;
    println!("{}", json);
    Ok(())
}
