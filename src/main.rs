use std::sync::Arc;

mod config;
mod http;
mod leaderboard;
mod sync;
mod telemetry;
mod util;
mod ws;

use crate::http::routes::{self, AppState};
use crate::sync::{ConfiguredIdentity, MemoryBackend, SyncController};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    telemetry::init();

    let backend = match config::seed_path() {
        Some(path) => {
            let seed = config::load_seed(&path)?;
            tracing::info!(path = %path.display(), entries = seed.len(), "seeded backend");
            MemoryBackend::with_entries(seed)
        }
        None => MemoryBackend::new(),
    };

    let user = config::user_name();
    if user.is_none() {
        tracing::warn!("FLAPBOARD_USER is not set, score submissions will be refused");
    }
    let identity = Arc::new(ConfiguredIdentity::new(user));

    let leaderboard = SyncController::new(backend);
    if let Err(err) = leaderboard.start().await {
        // keep serving; the view stays empty or stale
        tracing::error!(error = %err, "leaderboard not ready");
    }

    let state = AppState { leaderboard: leaderboard.clone(), identity };
    let app = routes::router(state);

    let addr = config::server_addr();
    tracing::info!(%addr, "listening");
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    leaderboard.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!(error = %err, "could not listen for ctrl-c");
        std::future::pending::<()>().await;
    }
    tracing::info!("shutting down");
}
