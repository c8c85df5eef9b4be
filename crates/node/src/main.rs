//! Magnetometer Telemetry Node - Main Entry Point

use anyhow::Context;
use node::{init_logging, run, NodeConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| NodeConfig::DEFAULT_FILE.to_string());
    let config = NodeConfig::load(&path).with_context(|| format!("loading {}", path))?;

    init_logging(&config.log_level)?;
    run(config).await?;

    Ok(())
}
