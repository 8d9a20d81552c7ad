//! CLI command tests
//!
//! This module contains all tests for the CLI commands.

use std::path::PathBuf;

use clap::Parser;
use pocketwise_core::{AdviceRequest, Config, Granularity, TransactionFilter, TransactionType};

use crate::cli::{Cli, Commands};
use crate::commands::{self, money, truncate};

const DATA: &str = "date,amount,category,description,type
2024-01-01,2800,salary,Monthly salary,income
2024-01-02,-1200,rent,January rent,expense
2024-01-03,-85,groceries,Weekly groceries,expense
2024-02-01,2800,salary,Monthly salary,income
2024-02-02,-1200,rent,February rent,expense
";

/// Write `contents` to a temp file and return a config pointing at it
fn config_with_data(name: &str, contents: &str) -> (tempfile::TempDir, Config) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    std::fs::write(&path, contents).unwrap();

    let mut config = Config::default();
    config.data.path = Some(path);
    (dir, config)
}

// ========== Argument Parsing Tests ==========

#[test]
fn test_parse_global_flags() {
    let cli = Cli::try_parse_from([
        "pocketwise",
        "summary",
        "--data",
        "tx.csv",
        "--strict",
        "--json",
        "-v",
    ])
    .unwrap();

    assert_eq!(cli.data, Some(PathBuf::from("tx.csv")));
    assert!(cli.strict);
    assert!(cli.json);
    assert!(cli.verbose);
    assert!(matches!(cli.command, Commands::Summary));
}

#[test]
fn test_parse_serve_defaults_to_config() {
    let cli = Cli::try_parse_from(["pocketwise", "serve"]).unwrap();
    match cli.command {
        Commands::Serve { port, host } => {
            assert_eq!(port, None);
            assert_eq!(host, None);
        }
        _ => panic!("expected serve"),
    }

    let cli = Cli::try_parse_from(["pocketwise", "serve", "-p", "9000", "--host", "127.0.0.1"])
        .unwrap();
    match cli.command {
        Commands::Serve { port, host } => {
            assert_eq!(port, Some(9000));
            assert_eq!(host.as_deref(), Some("127.0.0.1"));
        }
        _ => panic!("expected serve"),
    }
}

#[test]
fn test_parse_transactions_filters() {
    let cli = Cli::try_parse_from([
        "pocketwise",
        "transactions",
        "--from",
        "2024-01-01",
        "--to",
        "2024-01-31",
        "-t",
        "expense",
        "-c",
        "rent",
    ])
    .unwrap();

    match cli.command {
        Commands::Transactions {
            from,
            to,
            tx_type,
            category,
            limit,
        } => {
            assert_eq!(from.as_deref(), Some("2024-01-01"));
            assert_eq!(to.as_deref(), Some("2024-01-31"));
            assert_eq!(tx_type.as_deref(), Some("expense"));
            assert_eq!(category.as_deref(), Some("rent"));
            assert_eq!(limit, 20);
        }
        _ => panic!("expected transactions"),
    }
}

#[test]
fn test_parse_advice_defaults() {
    let cli = Cli::try_parse_from(["pocketwise", "advice"]).unwrap();
    match cli.command {
        Commands::Advice {
            context,
            category,
            timeout,
            offline,
        } => {
            assert_eq!(context, "general");
            assert_eq!(category, None);
            assert_eq!(timeout, None);
            assert!(!offline);
        }
        _ => panic!("expected advice"),
    }
}

#[test]
fn test_parse_rejects_unknown_command() {
    assert!(Cli::try_parse_from(["pocketwise", "detect"]).is_err());
}

// ========== Helper Tests ==========

#[test]
fn test_truncate() {
    assert_eq!(truncate("groceries", 20), "groceries");
    assert_eq!(truncate("a very long description here", 10), "a very ...");
    assert_eq!(truncate("café au lait", 6), "caf...");
}

#[test]
fn test_money() {
    assert_eq!(money(1234.5), "$1234.50");
    assert_eq!(money(-12.0), "$-12.00");
}

#[test]
fn test_build_filter() {
    let filter = commands::build_filter(
        Some("2024-01-01"),
        Some("2024-01-31"),
        Some("Expense"),
        Some("rent"),
    )
    .unwrap();
    assert!(filter.range.is_some());
    assert_eq!(filter.tx_type, Some(TransactionType::Expense));
    assert_eq!(filter.category.as_deref(), Some("rent"));

    assert_eq!(
        commands::build_filter(None, None, None, None).unwrap(),
        TransactionFilter::default()
    );
}

#[test]
fn test_build_filter_rejects_bad_input() {
    assert!(commands::build_filter(Some("2024-01-01"), None, None, None).is_err());
    assert!(commands::build_filter(Some("01/01/2024"), Some("2024-01-31"), None, None).is_err());
    assert!(commands::build_filter(None, None, Some("transfer"), None).is_err());
}

#[test]
fn test_parse_aggregation() {
    assert_eq!(
        commands::parse_aggregation("weekly").unwrap(),
        Granularity::Weekly
    );
    assert_eq!(
        commands::parse_aggregation("Monthly").unwrap(),
        Granularity::Monthly
    );
    assert!(commands::parse_aggregation("daily").is_err());
}

// ========== Loading Tests ==========

#[test]
fn test_open_engine_from_csv() {
    let (_dir, config) = config_with_data("tx.csv", DATA);
    let engine = commands::open_engine(&config).unwrap();
    assert_eq!(engine.store().len(), 5);

    let summary = engine.get_category_summary().unwrap();
    assert_eq!(summary.summary.total_income, 5600.0);
    assert_eq!(summary.summary.total_expenses, 2485.0);
}

#[test]
fn test_open_engine_bundled_sample() {
    let engine = commands::open_engine(&Config::default()).unwrap();
    assert!(!engine.store().is_empty());
    assert_eq!(engine.store().load_report().skipped, 0);
}

#[test]
fn test_open_engine_strict_rejects_bad_record() {
    let data = format!("{}2024-03-01,10,misc,Wrong sign,expense\n", DATA);
    let (_dir, mut config) = config_with_data("tx.csv", &data);

    let lenient = commands::open_engine(&config).unwrap();
    assert_eq!(lenient.store().load_report().flagged, 1);

    config.data.strict = true;
    assert!(commands::open_engine(&config).is_err());
}

#[test]
fn test_open_engine_missing_file() {
    let mut config = Config::default();
    config.data.path = Some(PathBuf::from("/nonexistent/transactions.json"));
    assert!(commands::open_engine(&config).is_err());
}

#[test]
fn test_or_empty() {
    let empty: pocketwise_core::Result<u32> = Err(pocketwise_core::Error::NoTransactions);
    assert_eq!(commands::or_empty(empty, false).unwrap(), None);
    assert_eq!(commands::or_empty(Ok(3), true).unwrap(), Some(3));

    let failed: pocketwise_core::Result<u32> = Err(pocketwise_core::Error::InvalidDateRange);
    assert!(commands::or_empty(failed, false).is_err());
}

#[test]
fn test_empty_notice_is_json_under_json_flag() {
    let notice: serde_json::Value =
        serde_json::from_str(&commands::empty_notice(true)).unwrap();
    assert_eq!(notice["message"], "No transactions found");

    assert_eq!(commands::empty_notice(false), "No transactions found.");
}

// ========== Command Tests ==========

#[test]
fn test_cmd_summary() {
    let (_dir, config) = config_with_data("tx.csv", DATA);
    assert!(commands::cmd_summary(&config, false).is_ok());
    assert!(commands::cmd_summary(&config, true).is_ok());
}

#[test]
fn test_cmd_summary_empty_data() {
    let (_dir, config) = config_with_data("tx.json", "[]");
    assert!(commands::cmd_summary(&config, false).is_ok());
    assert!(commands::cmd_summary(&config, true).is_ok());
}

#[test]
fn test_cmd_timeline() {
    let (_dir, config) = config_with_data("tx.csv", DATA);
    assert!(commands::cmd_timeline(&config, "monthly", false).is_ok());
    assert!(commands::cmd_timeline(&config, "weekly", true).is_ok());
    assert!(commands::cmd_timeline(&config, "hourly", false).is_err());
}

#[test]
fn test_cmd_transactions() {
    let (_dir, config) = config_with_data("tx.csv", DATA);

    let filter = commands::build_filter(None, None, Some("income"), None).unwrap();
    assert!(commands::cmd_transactions(&config, &filter, 1, false).is_ok());

    // No match is a notice, not an error
    let filter = commands::build_filter(None, None, None, Some("travel")).unwrap();
    assert!(commands::cmd_transactions(&config, &filter, 20, false).is_ok());

    let filter =
        commands::build_filter(Some("2024-02-01"), Some("2024-01-01"), None, None).unwrap();
    assert!(commands::cmd_transactions(&config, &filter, 20, false).is_err());
}

#[tokio::test]
async fn test_cmd_advice_offline() {
    let (_dir, config) = config_with_data("tx.csv", DATA);
    let request = AdviceRequest::default();

    assert!(commands::cmd_advice(&config, &request, None, true, false)
        .await
        .is_ok());
    assert!(commands::cmd_advice(&config, &request, Some(1), true, true)
        .await
        .is_ok());
}
