use anyhow::Result;
use deposit_api::{build_router, config::Settings, initialize_backend, telemetry};
use tokio::net::TcpListener;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<()> {
    let settings = Settings::from_env()?;
    telemetry::init_tracing(&settings.app)?;

    let app_state = initialize_backend(&settings).await?;
    let app = build_router(app_state.clone());

    let addr = settings.app.bind_addr();
    info!("Starting {} on {}", settings.app.title, addr);
    let listener = TcpListener::bind(addr).await?;
    info!("Listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped, releasing resources");
    app_state.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Failed to listen for shutdown signal: {}", e);
        // without a signal handler, keep serving until the process is killed
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
