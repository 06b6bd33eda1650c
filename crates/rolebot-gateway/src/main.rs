//! rolebot entry point
//!
//! Run with:
//! ```bash
//! cargo run -p rolebot-gateway --bin rolebot < events.ndjson
//! ```
//!
//! Configuration is loaded from environment variables.

use anyhow::Context;
use rolebot_common::{try_init_tracing_with_config, AppConfig, TracingConfig};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    if let Err(e) = run().await {
        error!(error = %e, "rolebot failed");
        eprintln!("Error: {e:#}");
        std::process::exit(1);
    }
}

async fn run() -> anyhow::Result<()> {
    let config = AppConfig::from_env().context("failed to load configuration")?;

    if let Err(e) = try_init_tracing_with_config(&TracingConfig::for_environment(config.app.env)) {
        eprintln!("Warning: Failed to initialize tracing: {e}");
    }

    info!(
        name = %config.app.name,
        env = ?config.app.env,
        store = %config.store.path.display(),
        strict = config.bot.strict_bindings,
        "Configuration loaded"
    );

    let handled = rolebot_gateway::run(config)
        .await
        .context("event loop failed")?;

    info!(handled, "rolebot stopped");
    Ok(())
}
