use crate::routes::{AppState, build_router};
use crate::services::{AnalysisService, ResourceBundle, ResponseAssembler};
use crate::settings::Settings;
use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

pub async fn run(settings: Settings, host: &str, port: u16) -> Result<()> {
    let state = AppState {
        service: Arc::new(AnalysisService::from_settings(&settings)?),
        assembler: Arc::new(ResponseAssembler::new(ResourceBundle::from_settings(&settings))),
    };

    let addr = format!("{host}:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;

    info!(event = "server_listening", addr = %addr, "HTTP server listening");

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!(event = "server_stopped", "HTTP server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!(event = "shutdown_requested", "Received ctrl-c, shutting down");
    }
}
