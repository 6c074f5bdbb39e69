use anyhow::{Context, Result};
use tareas_api::{api_router, AppState};
use tareas_core::repository::SqliteRepository;
use tokio::net::TcpListener;

use crate::cli::ServeCommand;
use crate::config::Config;

pub async fn serve(repo: SqliteRepository, config: &Config, command: ServeCommand) -> Result<()> {
    let host = command.host.unwrap_or_else(|| config.server.host.clone());
    let port = command.port.unwrap_or(config.server.port);

    if config.auth.tokens.is_empty() {
        tracing::warn!("no auth tokens configured, every request will be rejected");
    }

    let state = AppState::new(repo, config.auth.clone());
    let address = format!("{host}:{port}");

    let listener = TcpListener::bind(&address)
        .await
        .with_context(|| format!("failed to bind {address}"))?;
    tracing::info!("Listening on http://{address}");

    axum::serve(listener, api_router(state)).await.context("server error")?;
    Ok(())
}
