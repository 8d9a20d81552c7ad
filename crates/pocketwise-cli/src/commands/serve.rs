//! Server command implementation

use anyhow::Result;
use pocketwise_core::{AdvisoryService, Config};
use pocketwise_server::ServerConfig;

use super::open_engine;

pub async fn cmd_serve(config: &Config, host: Option<&str>, port: Option<u16>) -> Result<()> {
    let host = host.unwrap_or(config.server.host.as_str());
    let port = port.unwrap_or(config.server.port);

    println!("🚀 Starting Pocketwise web server...");
    match &config.data.path {
        Some(path) => println!("   Data: {}", path.display()),
        None => println!("   Data: bundled sample dataset"),
    }
    if config.data.strict {
        println!("   Validation: strict");
    }
    println!("   Listening: http://{}:{}", host, port);
    if config.server.allowed_origins.is_empty() {
        println!("   CORS: same-origin only");
    } else {
        println!("   CORS: {}", config.server.allowed_origins.join(", "));
    }
    println!(
        "   Advice timeout: {}s",
        config.server.advice_timeout.as_secs()
    );
    println!();
    println!("   Press Ctrl+C to stop");

    let engine = open_engine(config)?;
    let advisor = AdvisoryService::from_config(&config.llm);
    let server_config = ServerConfig::from(&config.server);

    pocketwise_server::serve_with_config(engine, advisor, host, port, server_config).await?;

    Ok(())
}
