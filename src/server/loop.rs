// Server loop module
// Accepts connections until shutdown is requested, then drains them

use hyper_util::server::graceful::GracefulShutdown;
use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

/// How long open connections may keep running after shutdown is requested
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

/// Serve `listener` until `shutdown` resolves.
///
/// Stops accepting immediately on shutdown and waits up to
/// [`SHUTDOWN_GRACE`] for in-flight connections before returning.
pub async fn run_server(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: impl Future<Output = ()>,
) {
    let active_connections = Arc::new(AtomicUsize::new(0));
    let graceful = GracefulShutdown::new();
    tokio::pin!(shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(
                            stream,
                            peer_addr,
                            &state,
                            &active_connections,
                            &graceful,
                        );
                    }
                    Err(e) => logger::log_error(&format!("Failed to accept connection: {e}")),
                }
            }

            () = &mut shutdown => break,
        }
    }

    drop(listener);
    logger::log_shutdown_started(active_connections.load(Ordering::SeqCst));

    let drained = tokio::time::timeout(SHUTDOWN_GRACE, graceful.shutdown())
        .await
        .is_ok();
    logger::log_shutdown_complete(drained);
}
