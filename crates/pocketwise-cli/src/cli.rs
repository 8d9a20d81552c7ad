//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

/// Pocketwise - Understand where your money goes
#[derive(Parser)]
#[command(name = "pocketwise")]
#[command(about = "Spending analytics and financial advice", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Config file (defaults to ~/.config/pocketwise/config.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Transaction data file (.json or .csv), overrides the config
    ///
    /// Without a data file the bundled sample dataset is used.
    #[arg(long, global = true)]
    pub data: Option<PathBuf>,

    /// Reject the data file if any record fails validation
    #[arg(long, global = true)]
    pub strict: bool,

    /// Print JSON instead of formatted output
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the web server
    Serve {
        /// Port to listen on (defaults to the configured port)
        #[arg(short, long)]
        port: Option<u16>,

        /// Host to bind to (defaults to the configured host)
        #[arg(long)]
        host: Option<String>,
    },

    /// Income and spending by category
    Summary,

    /// Income vs expenses over time
    Timeline {
        /// Bucket size: monthly or weekly
        #[arg(short, long, default_value = "monthly")]
        aggregation: String,
    },

    /// List transactions
    Transactions {
        /// Start date (YYYY-MM-DD), requires --to
        #[arg(long)]
        from: Option<String>,

        /// End date (YYYY-MM-DD), requires --from
        #[arg(long)]
        to: Option<String>,

        /// Transaction type: income or expense
        #[arg(short = 't', long = "type")]
        tx_type: Option<String>,

        /// Exact category name
        #[arg(short, long)]
        category: Option<String>,

        /// Maximum rows to print
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Get financial advice for the loaded data
    Advice {
        /// Advice focus such as general, savings or budgeting
        #[arg(long, default_value = "general")]
        context: String,

        /// Focus the advice on one category
        #[arg(short, long)]
        category: Option<String>,

        /// Give up on the model after this many seconds (defaults to the configured timeout)
        #[arg(long)]
        timeout: Option<u64>,

        /// Skip the model and use the rule-based generator
        #[arg(long)]
        offline: bool,
    },

    /// Check configuration, data and LLM connectivity
    Check,
}
