// Connection handling module
// Accepts a single TCP connection and serves it over HTTP/1.1

use hyper::server::conn::http1;
use hyper::service::service_fn;
use hyper_util::rt::TokioIo;
use hyper_util::server::graceful::GracefulShutdown;
use std::net::SocketAddr;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpStream;

use crate::config::AppState;
use crate::handler;
use crate::logger;

/// Accept a connection, enforcing the connection cap, and serve it in its own task.
///
/// # Arguments
///
/// * `stream` - The TCP stream to handle
/// * `peer_addr` - The peer's socket address
/// * `state` - Shared application state
/// * `conn_counter` - Active connection counter
/// * `graceful` - Shutdown watcher the connection registers with
pub fn accept_connection(
    stream: TcpStream,
    peer_addr: SocketAddr,
    state: &Arc<AppState>,
    conn_counter: &Arc<AtomicUsize>,
    graceful: &GracefulShutdown,
) {
    // Increment first, then check, so concurrent accepts cannot overshoot
    let prev_count = conn_counter.fetch_add(1, Ordering::SeqCst);

    if let Some(max_conn) = state.config.performance.max_connections {
        if prev_count >= usize::try_from(max_conn).unwrap_or(usize::MAX) {
            conn_counter.fetch_sub(1, Ordering::SeqCst);
            logger::log_warning(&format!(
                "Max connections reached: {prev_count}/{max_conn}. Connection from {peer_addr} rejected."
            ));
            drop(stream);
            return;
        }
    }

    logger::log_connection_accepted(&peer_addr);

    let perf = &state.config.performance;
    let timeout_duration = Duration::from_secs(perf.read_timeout.max(perf.write_timeout));

    let mut builder = http1::Builder::new();
    builder.keep_alive(perf.keep_alive_timeout > 0);

    let service_state = Arc::clone(state);
    let conn = builder.serve_connection(
        TokioIo::new(stream),
        service_fn(move |req| {
            handler::handle_request(req, Arc::clone(&service_state), peer_addr)
        }),
    );
    let conn = graceful.watch(conn);

    let conn_counter = Arc::clone(conn_counter);
    tokio::spawn(async move {
        match tokio::time::timeout(timeout_duration, conn).await {
            Ok(Ok(())) => {}
            Ok(Err(err)) => logger::log_connection_error(&err),
            Err(_) => logger::log_debug(&format!(
                "Connection from {peer_addr} closed after {} seconds",
                timeout_duration.as_secs()
            )),
        }

        conn_counter.fetch_sub(1, Ordering::SeqCst);
    });
}
