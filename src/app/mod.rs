pub mod startup;

pub use startup::{start, Runtime};

/// Resolves on Ctrl+C so the server can drain in-flight uploads.
pub async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
