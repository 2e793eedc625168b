//! Shutdown signal handling for the agent binary.

use tracing::debug;

/// Resolve on the next Ctrl+C or SIGTERM. Callable more than once; each
/// call waits for a fresh signal (the second one forces a quick drain).
pub async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => debug!("received Ctrl+C"),
        _ = terminate => debug!("received SIGTERM"),
    }
}
