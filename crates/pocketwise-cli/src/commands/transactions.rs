//! Transaction command implementations

use anyhow::{Context, Result};
use pocketwise_core::{parse_date, Config, TransactionFilter, TransactionType};

use super::{money, open_engine, or_empty, print_json, truncate};

/// Build a filter from `transactions` flags
pub fn build_filter(
    from: Option<&str>,
    to: Option<&str>,
    tx_type: Option<&str>,
    category: Option<&str>,
) -> Result<TransactionFilter> {
    let range = match (from, to) {
        (Some(from), Some(to)) => {
            let start = parse_date(from)
                .with_context(|| format!("Invalid --from date: {} (use YYYY-MM-DD)", from))?;
            let end = parse_date(to)
                .with_context(|| format!("Invalid --to date: {} (use YYYY-MM-DD)", to))?;
            Some((start, end))
        }
        (None, None) => None,
        _ => anyhow::bail!("--from and --to must be used together"),
    };

    let tx_type = tx_type
        .map(str::parse::<TransactionType>)
        .transpose()
        .context("Invalid --type (use income or expense)")?;

    Ok(TransactionFilter {
        range,
        tx_type,
        category: category.map(str::to_string),
    })
}

pub fn cmd_transactions(
    config: &Config,
    filter: &TransactionFilter,
    limit: usize,
    json: bool,
) -> Result<()> {
    let engine = open_engine(config)?;
    let Some(response) = or_empty(engine.find_transactions(filter), json)? else {
        return Ok(());
    };

    if json {
        return print_json(&response);
    }

    println!();
    println!(
        "📝 Transactions ({} to {}, {} total)",
        response.period.start, response.period.end, response.count
    );
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in response.transactions.iter().take(limit) {
        let amount_str = if tx.is_expense() {
            format!("\x1b[31m{:>11}\x1b[0m", money(tx.absolute_amount())) // Red for expenses
        } else {
            format!("\x1b[32m{:>11}\x1b[0m", format!("+{}", money(tx.amount))) // Green for income
        };

        println!(
            "   {} │ {} │ {:<14} │ {}",
            tx.date,
            amount_str,
            truncate(&tx.category, 14),
            truncate(&tx.description, 36)
        );
    }

    if response.count > limit {
        println!("   ... and {} more (use --limit to show more)", response.count - limit);
    }

    Ok(())
}
