use axum::{extract::State, http::StatusCode, response::IntoResponse};
use tracing::{error, info};

use crate::auth::AppState;
use crate::error::ApiError;

/// Write the network to the database off the async runtime. The network lock
/// is held until the write commits, so saves and resets land in lock order.
pub async fn persist(state: &AppState) -> anyhow::Result<()> {
    let state = state.clone();
    tokio::task::spawn_blocking(move || {
        let network = state
            .network
            .lock()
            .map_err(|e| anyhow::anyhow!("network lock poisoned: {}", e))?;
        state.db.save(&network.snapshot())
    })
    .await?
}

/// POST /system/save
pub async fn save(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    persist(&state).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /system/reset: wipe the network and the stored snapshot.
pub async fn reset(State(state): State<AppState>) -> Result<impl IntoResponse, ApiError> {
    tokio::task::spawn_blocking(move || -> anyhow::Result<()> {
        let mut network = state
            .network
            .lock()
            .map_err(|e| anyhow::anyhow!("network lock poisoned: {}", e))?;
        network.reset();
        state.db.clear()
    })
    .await
    .map_err(|e| {
        error!("spawn_blocking join error: {}", e);
        anyhow::Error::from(e)
    })??;

    info!("System reset");
    Ok(StatusCode::NO_CONTENT)
}
