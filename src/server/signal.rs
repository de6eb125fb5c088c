// Signal handling
//
// SIGTERM / SIGINT trigger graceful shutdown. SIGUSR1 dumps a metrics
// summary without stopping the server.

use std::sync::Arc;

use crate::config::AppState;
use crate::logger;

/// Start signal handlers (Unix)
#[cfg(unix)]
pub fn start_signal_handler(state: Arc<AppState>) {
    use tokio::signal::unix::{signal, SignalKind};

    tokio::spawn(async move {
        let mut sigterm =
            signal(SignalKind::terminate()).expect("Failed to register SIGTERM handler");
        let mut sigint =
            signal(SignalKind::interrupt()).expect("Failed to register SIGINT handler");
        let mut sigusr1 =
            signal(SignalKind::user_defined1()).expect("Failed to register SIGUSR1 handler");

        loop {
            tokio::select! {
                _ = sigterm.recv() => {
                    logger::log_shutdown("SIGTERM received, initiating graceful shutdown");
                    state.shutdown.notify_waiters();
                    break;
                }

                _ = sigint.recv() => {
                    logger::log_shutdown("SIGINT received, initiating graceful shutdown");
                    state.shutdown.notify_waiters();
                    break;
                }

                _ = sigusr1.recv() => {
                    logger::log_metrics_summary(&state.metrics.summary());
                }
            }
        }
    });
}

/// Fallback for non-Unix targets: only Ctrl+C is supported.
#[cfg(not(unix))]
pub fn start_signal_handler(state: Arc<AppState>) {
    tokio::spawn(async move {
        if let Ok(()) = tokio::signal::ctrl_c().await {
            logger::log_shutdown("Ctrl+C received, initiating graceful shutdown");
            state.shutdown.notify_waiters();
        }
    });
}
