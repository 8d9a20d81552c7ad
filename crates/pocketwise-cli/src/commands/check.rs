//! Setup check command implementation

use anyhow::Result;
use pocketwise_core::config::default_config_path;
use pocketwise_core::{BackendKind, Config, LlmBackend, LlmClient};

use super::open_engine;

fn backend_name(kind: BackendKind) -> &'static str {
    match kind {
        BackendKind::OpenAI => "openai-compatible",
        BackendKind::Ollama => "ollama",
        BackendKind::Mock => "mock",
        BackendKind::None => "none",
    }
}

/// Check data loading and LLM connectivity
pub async fn cmd_check(config: &Config) -> Result<()> {
    println!("🔍 Checking Pocketwise setup...\n");

    match default_config_path() {
        Some(path) if path.exists() => println!("  Config file: {}", path.display()),
        _ => println!("  Config file: none (using defaults and environment)"),
    }

    match &config.data.path {
        Some(path) => println!("  Data: {}", path.display()),
        None => println!("  Data: bundled sample dataset"),
    }

    match open_engine(config) {
        Ok(engine) => {
            let report = engine.store().load_report();
            println!(
                "  ✅ Loaded {} transaction(s) ({} skipped, {} flagged)",
                report.loaded, report.skipped, report.flagged
            );
            if let Ok((start, end)) = engine.store().get_date_range() {
                println!("     Covering {} to {}", start, end);
            }
        }
        Err(e) => println!("  ❌ {:#}", e),
    }

    println!("\n  LLM backend: {}", backend_name(config.llm.backend));

    let Some(client) = LlmClient::from_config(&config.llm) else {
        println!("  ℹ️  No LLM configured, advice uses the rule-based generator");
        println!("\nTo enable model advice:");
        println!("  - OpenAI-compatible: export OPENAI_API_KEY=...");
        println!("  - Ollama: export AI_BACKEND=ollama OLLAMA_HOST=http://localhost:11434");
        return Ok(());
    };

    print!("  Checking {} ({})... ", client.host(), client.model());
    if client.health_check().await {
        println!("✅ Connected");
    } else {
        println!("❌ Not responding");
        println!("\n⚠️  Advice requests will fall back to the rule-based generator");
    }

    Ok(())
}
