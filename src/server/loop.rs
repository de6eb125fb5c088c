// Server main loop
// Accepts connections until a shutdown signal arrives, then drains
// in-flight connections for up to the configured grace period.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;

use super::connection::accept_connection;
use crate::config::AppState;
use crate::logger;

pub async fn start_server_loop(
    listener: TcpListener,
    state: Arc<AppState>,
    active_connections: Arc<AtomicUsize>,
) -> Result<(), Box<dyn std::error::Error>> {
    let shutdown = Arc::clone(&state.shutdown);

    loop {
        tokio::select! {
            accept_result = listener.accept() => {
                match accept_result {
                    Ok((stream, peer_addr)) => {
                        accept_connection(stream, peer_addr, &state, &active_connections);
                    }
                    Err(e) => {
                        state.metrics.inc_errors();
                        logger::log_error(&format!("Failed to accept connection: {e}"));
                    }
                }
            }

            () = shutdown.notified() => {
                logger::log_shutdown("Stopping accept loop");
                break;
            }
        }
    }

    // Stop accepting, then give in-flight connections a grace period.
    drop(listener);
    drain_connections(
        &active_connections,
        Duration::from_secs(state.config.performance.shutdown_grace),
    )
    .await;

    logger::log_metrics_summary(&state.metrics.summary());
    logger::log_shutdown("Server stopped");
    Ok(())
}

/// Wait until all in-flight connections finish or the grace period ends.
async fn drain_connections(active_connections: &AtomicUsize, grace: Duration) {
    let deadline = tokio::time::Instant::now() + grace;

    loop {
        let active = active_connections.load(Ordering::SeqCst);
        if active == 0 {
            logger::log_shutdown("All connections drained");
            return;
        }
        if tokio::time::Instant::now() >= deadline {
            logger::log_warning(&format!(
                "Shutdown grace period elapsed with {active} connections still active"
            ));
            return;
        }
        tokio::time::sleep(Duration::from_millis(50)).await;
    }
}
