// Sankey Flow - Web Server
// JSON/CSV in, Sankey flow report out

use anyhow::{Context, Result};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::EnvFilter;

use sankey_flow::api::{router, AppState};
use sankey_flow::{EngineConfig, Language};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    // Optional fixed locale for every request
    let custom = match std::env::var_os("SANKEY_LOCALE_FILE").map(PathBuf::from) {
        Some(path) => {
            let config = EngineConfig::load(Language::default(), Some(&path))?;
            info!(path = %path.display(), "using locale file");
            Some(config)
        }
        None => None,
    };

    let app = router(AppState::new(custom));

    let addr = std::env::var("SANKEY_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".to_string());
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    info!("🚀 Server running on http://{}", addr);
    info!("   API: POST /api/flow, POST /api/flow/csv, GET /api/template");

    axum::serve(listener, app)
        .await
        .context("Failed to start server")?;

    Ok(())
}
