// Server loop module
// Accepts connections until shutdown, then waits for in-flight requests

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tokio::net::TcpListener;
use tokio::sync::Notify;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

const DRAIN_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Accept loop for the pet listing service.
///
/// Must run inside a `LocalSet`; connections are served with `spawn_local`.
#[allow(clippy::ignored_unit_patterns)]
pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    shutdown: Arc<Notify>,
) -> Result<(), Box<dyn std::error::Error>> {
    let active_connections = Arc::new(AtomicUsize::new(0));

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            _ = shutdown.notified() => break,
        }
    }

    // Stop accepting before draining
    drop(listener);

    let grace = Duration::from_secs(state.config.performance.write_timeout);
    if !drain_connections(&active_connections, grace).await {
        logger::log_warning(&format!(
            "{} connection(s) still open after {}s, exiting anyway",
            active_connections.load(Ordering::SeqCst),
            grace.as_secs()
        ));
    }
    Ok(())
}

/// Wait until the counter reaches zero or `grace` elapses.
/// Returns true when fully drained.
async fn drain_connections(active: &AtomicUsize, grace: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + grace;
    while active.load(Ordering::SeqCst) > 0 {
        if tokio::time::Instant::now() >= deadline {
            return false;
        }
        tokio::time::sleep(DRAIN_POLL_INTERVAL).await;
    }
    true
}
