//! `querydesk serve`: runs the lookup backend until Ctrl-C.

use anyhow::Context;
use tracing::{info, warn};

use backend::AppState;

use crate::config::BackendSettings;

pub async fn run(settings: &BackendSettings) -> anyhow::Result<()> {
    let running = backend::start(
        &settings.listen_addr,
        AppState::new(),
        &settings.frontend_origin,
        shutdown_signal(),
    )
    .await
    .context("failed to start backend")?;

    info!(base_url = %running.base_url(), "Serving; press Ctrl-C to stop");
    running.wait().await.context("backend stopped with an error")?;
    info!("Backend stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = %err, "Could not listen for Ctrl-C; shutting down");
    }
}
