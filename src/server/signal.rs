// Signal handling module
//
// Supported signals:
// - SIGTERM: Graceful shutdown
// - SIGINT:  Graceful shutdown (Ctrl+C)
//
// Non-Unix platforms only get Ctrl+C.

use crate::logger;

/// Resolves once the process has been asked to stop
#[cfg(unix)]
pub async fn shutdown_signal() {
    use tokio::signal::unix::{signal, SignalKind};

    let mut sigterm = match signal(SignalKind::terminate()) {
        Ok(sigterm) => sigterm,
        Err(e) => {
            logger::log_warning(&format!("Failed to register SIGTERM handler: {e}"));
            ctrl_c().await;
            return;
        }
    };

    tokio::select! {
        _ = sigterm.recv() => logger::log_info("SIGTERM received, shutting down"),
        () = ctrl_c() => {}
    }
}

/// Resolves once the process has been asked to stop
#[cfg(not(unix))]
pub async fn shutdown_signal() {
    ctrl_c().await;
}

async fn ctrl_c() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => logger::log_info("SIGINT received, shutting down"),
        Err(e) => {
            // Without a handler the process can only be killed; keep serving
            logger::log_error(&format!("Failed to listen for Ctrl+C: {e}"));
            std::future::pending::<()>().await;
        }
    }
}
