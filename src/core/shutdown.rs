use tokio::signal;
use tokio::sync::watch;

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed never fires, so the
/// other one still works.
pub(crate) async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("shutdown signal received");
}

/// Broadcasts `true` to every receiver once the process is asked to stop.
pub(crate) async fn broadcast_on_signal(tx: watch::Sender<bool>) {
    shutdown_signal().await;
    if tx.send(true).is_err() {
        tracing::warn!("No sweep loops left to notify about shutdown");
    }
}
