use std::sync::Arc;

use tokio::signal;

use songparts_api::app::{self, services::AppServices};
use songparts_infra::AppConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    songparts_observability::init();

    let config = AppConfig::from_env()?;
    let services = Arc::new(AppServices::from_config(&config).await?);
    let app = app::build_app(services);

    let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;

    tracing::info!(
        addr = %listener.local_addr()?,
        collection = %config.collection,
        "listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("server shutdown complete");
    Ok(())
}

/// Wait for Ctrl+C or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => tracing::info!("received Ctrl+C, shutting down"),
        _ = terminate => tracing::info!("received SIGTERM, shutting down"),
    }
}
