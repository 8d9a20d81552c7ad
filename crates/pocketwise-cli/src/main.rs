//! Pocketwise CLI - Spending analytics and financial advice
//!
//! Usage:
//!   pocketwise summary                  Category breakdown
//!   pocketwise timeline -a weekly       Income vs expenses over time
//!   pocketwise advice --context savings Financial advice
//!   pocketwise serve --port 8080        Start web server

mod cli;
mod commands;

#[cfg(test)]
mod tests;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let config = commands::load_config(&cli)?;

    match cli.command {
        Commands::Serve { port, host } => {
            commands::cmd_serve(&config, host.as_deref(), port).await
        }
        Commands::Summary => commands::cmd_summary(&config, cli.json),
        Commands::Timeline { aggregation } => {
            commands::cmd_timeline(&config, &aggregation, cli.json)
        }
        Commands::Transactions {
            from,
            to,
            tx_type,
            category,
            limit,
        } => {
            let filter = commands::build_filter(
                from.as_deref(),
                to.as_deref(),
                tx_type.as_deref(),
                category.as_deref(),
            )?;
            commands::cmd_transactions(&config, &filter, limit, cli.json)
        }
        Commands::Advice {
            context,
            category,
            timeout,
            offline,
        } => {
            let request = pocketwise_core::AdviceRequest { context, category };
            commands::cmd_advice(&config, &request, timeout, offline, cli.json).await
        }
        Commands::Check => commands::cmd_check(&config).await,
    }
}
