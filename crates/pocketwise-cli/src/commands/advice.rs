//! Advice command implementation

use std::time::Duration;

use anyhow::Result;
use pocketwise_core::{
    AdviceRequest, AdviceSource, AdvisoryService, Config, Error, LlmBackend,
};

use super::{open_engine, or_empty, print_json};

pub async fn cmd_advice(
    config: &Config,
    request: &AdviceRequest,
    timeout_secs: Option<u64>,
    offline: bool,
    json: bool,
) -> Result<()> {
    let engine = open_engine(config)?;
    let Some(summary) = or_empty(engine.get_category_summary(), json)? else {
        return Ok(());
    };

    let advisor = if offline {
        AdvisoryService::new(None)
    } else {
        AdvisoryService::from_config(&config.llm)
    };
    let timeout = timeout_secs
        .map(Duration::from_secs)
        .unwrap_or(config.server.advice_timeout);

    if let Some(client) = advisor.client() {
        if !json {
            println!("🤖 Asking {} at {}...", client.model(), client.host());
        }
    }

    let advice = match advisor
        .get_financial_advice(&summary, request, tokio::time::sleep(timeout))
        .await
    {
        Ok(advice) => advice,
        Err(Error::Cancelled) => anyhow::bail!(
            "No advice after {}s; raise --timeout or use --offline",
            timeout.as_secs()
        ),
        Err(e) => return Err(e.into()),
    };

    if json {
        return print_json(&advice);
    }

    let source = match advice.source {
        AdviceSource::Model => "model",
        AdviceSource::Heuristic => "rule-based",
    };

    println!();
    println!("💡 Financial Advice ({})", source);
    println!("   ─────────────────────────────────────────────────────────────");
    for line in advice.advice.lines() {
        println!("   {}", line);
    }

    Ok(())
}
