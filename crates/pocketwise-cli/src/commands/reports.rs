//! Report command implementations

use std::cmp::Ordering;
use std::collections::BTreeMap;

use anyhow::Result;
use pocketwise_core::{CategoryDetail, Config, Granularity};

use super::{money, open_engine, or_empty, print_json, truncate};

/// Parse an aggregation name for `timeline`
pub fn parse_aggregation(value: &str) -> Result<Granularity> {
    value.parse::<Granularity>().map_err(|_| {
        anyhow::anyhow!(
            "Unknown aggregation: {}. Available: monthly, weekly",
            value
        )
    })
}

/// Categories ordered by total, largest first; ties keep name order
fn by_total(categories: &BTreeMap<String, CategoryDetail>) -> Vec<(&String, &CategoryDetail)> {
    let mut rows: Vec<_> = categories.iter().collect();
    rows.sort_by(|a, b| {
        b.1.total
            .partial_cmp(&a.1.total)
            .unwrap_or(Ordering::Equal)
    });
    rows
}

fn print_categories(title: &str, categories: &BTreeMap<String, CategoryDetail>) {
    if categories.is_empty() {
        return;
    }

    println!();
    println!("   {}", title);
    for (category, detail) in by_total(categories) {
        println!(
            "   {:<18} {:>12} {:>6.1}%  ({} tx)",
            truncate(category, 18),
            money(detail.total),
            detail.percentage,
            detail.count
        );
    }
}

pub fn cmd_summary(config: &Config, json: bool) -> Result<()> {
    let engine = open_engine(config)?;
    let Some(summary) = or_empty(engine.get_category_summary(), json)? else {
        return Ok(());
    };

    if json {
        return print_json(&summary);
    }

    let figures = &summary.summary;
    let period = &summary.period;

    println!();
    println!(
        "📊 Spending Summary ({} to {}, {} month(s))",
        period.start, period.end, period.months
    );
    println!("   ─────────────────────────────────────────────────────────────");
    println!("   Income:        {:>12}", money(figures.total_income));
    println!("   Expenses:      {:>12}", money(figures.total_expenses));
    println!("   Net savings:   {:>12}", money(figures.net_savings));
    println!("   Savings rate:  {:>11.1}%", figures.savings_rate);

    print_categories("Expenses by category", &summary.expenses);
    print_categories("Income by category", &summary.income);

    Ok(())
}

pub fn cmd_timeline(config: &Config, aggregation: &str, json: bool) -> Result<()> {
    let granularity = parse_aggregation(aggregation)?;
    let engine = open_engine(config)?;
    let Some(response) = or_empty(engine.get_timeline_with(granularity), json)? else {
        return Ok(());
    };

    if json {
        return print_json(&response);
    }

    println!();
    println!("📈 Timeline ({})", granularity.as_str());
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:<10} {:>12} {:>12} {:>12}",
        "Period", "Income", "Expenses", "Net"
    );

    for point in &response.timeline {
        let net = if point.net < 0.0 {
            format!("\x1b[31m{:>12}\x1b[0m", money(point.net)) // Red when overspent
        } else {
            format!("{:>12}", money(point.net))
        };
        println!(
            "   {:<10} {:>12} {:>12} {}",
            point.period,
            money(point.income),
            money(point.expenses),
            net
        );
    }

    Ok(())
}
