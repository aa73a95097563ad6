//! fdd-advisor-server - HTTP server for the FDD question-routing and
//! disclosure-compliance gate.
//!
//! Endpoints:
//!   POST /api/fdd/:fdd_id/search  - semantic search over an indexed FDD
//!   POST /api/fdd-chat            - full-text analyst over supplied text
//!   GET  /health                  - health check

use anyhow::Result;
use std::path::Path;
use std::sync::Arc;
use tracing::info;

use fdd_advisor::{AnswerEngine, GateConfig};
use fdd_advisor_server::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    info!("Starting FDD Advisor server v{}", env!("CARGO_PKG_VERSION"));

    // Optional config file; thresholds fall back to built-in defaults.
    let config = match std::env::var("FDD_ADVISOR_CONFIG") {
        Ok(path) => GateConfig::from_file(Path::new(&path))
            .map_err(|e| anyhow::anyhow!("invalid config {}: {}", path, e))?,
        Err(_) => GateConfig::default(),
    };

    let engine = AnswerEngine::from_env(config)?;
    let state = AppState::new(Arc::new(engine));
    let app = build_router(state);

    let addr = std::env::var("FDD_ADVISOR_ADDR").unwrap_or_else(|_| "127.0.0.1:5780".to_string());
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("fdd-advisor-server listening on http://{}", addr);
    info!("Health check: http://{}/health", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
