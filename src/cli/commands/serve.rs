//! HTTP server command handler

use tokio::signal;
use tracing::{error, info};

use crate::config::Config;
use crate::web;

pub async fn cmd_serve(config: Config) -> anyhow::Result<()> {
    info!("Watchlist v{} starting...", env!("CARGO_PKG_VERSION"));

    let port = config.server.port;
    let state = web::create_app_state(config).await?;
    let app = web::router(state);

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("Web server running at http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            if let Err(e) = signal::ctrl_c().await {
                error!("Error listening for shutdown: {}", e);
            } else {
                info!("Shutdown signal received");
            }
        })
        .await?;

    info!("Server stopped");
    Ok(())
}
