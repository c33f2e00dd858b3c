//! Racing Team Hub console server
//!
//! Entry point for the session console.

use mimalloc::MiMalloc;

/// Global allocator for improved performance (M-MIMALLOC-APPS).
#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

use std::sync::Arc;

use anyhow::Context;
use dotenvy::dotenv;
use racing_team_hub::config::AppConfig;
use racing_team_hub::{server, telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env (if present) before anything reads the environment
    let _ = dotenv();

    // Initialize tracing (M-LOG-STRUCTURED)
    telemetry::init();

    let config = AppConfig::load().context("Failed to load configuration")?;

    tracing::info!(
        name: "config.loaded",
        host = %config.server.host,
        port = config.server.port,
        demo_session = config.auth.demo_session_on_startup,
        "Configuration loaded"
    );

    server::start_server(Arc::new(config)).await
}
