mod config;

use std::net::SocketAddr;

use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::{error, info, warn};

use recado_api::auth::AppStateInner;
use recado_api::system;
use recado_core::Network;
use recado_db::Database;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env if present
    let _ = dotenvy::dotenv();

    // Init logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "recado_server=debug,recado_core=debug,recado_api=debug,recado_db=info,tower_http=debug".into()),
        )
        .init();

    let config = Config::from_env()?;
    if config.uses_placeholder_secret() {
        warn!("RECADO_JWT_SECRET is unset or a placeholder; sessions are forgeable");
    }
    if config.admin_token.is_none() {
        info!("RECADO_ADMIN_TOKEN unset; /system routes are disabled");
    }

    // Restore the last snapshot
    let db = Database::open(&config.db_path)?;
    let network = Network::restore(db.load()?);

    let state = AppStateInner::new(network, db, config.jwt_secret.clone(), config.admin_token.clone());

    let app = recado_api::router(state.clone())
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http());

    let addr: SocketAddr = format!("{}:{}", config.host, config.port).parse()?;
    info!("Recado server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Shutting down, saving snapshot");
    if let Err(e) = system::persist(&state).await {
        error!("Failed to save snapshot: {:#}", e);
        return Err(e);
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
    }
}
