//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `advice` - Financial advice command
//! - `check` - Setup and connectivity check
//! - `common` - Shared utilities (config resolution, loading the store, output helpers)
//! - `reports` - Summary and timeline commands
//! - `serve` - Web server command
//! - `transactions` - Transaction listing with filters

pub mod advice;
pub mod check;
pub mod common;
pub mod reports;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use advice::*;
pub use check::*;
pub use common::*;
pub use reports::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum number of characters, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a dollar amount with two decimals
pub fn money(amount: f64) -> String {
    format!("${:.2}", amount)
}
