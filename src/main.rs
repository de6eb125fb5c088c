use std::sync::atomic::AtomicUsize;
use std::sync::Arc;

mod cache;
mod config;
mod dashboard;
mod handler;
mod http;
mod limiter;
mod logger;
mod metrics;
mod server;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut cfg = config::Config::load()?;

    // An explicit port argument overrides the configured one
    if let Some(port_arg) = std::env::args().nth(1) {
        cfg.server.port = port_arg
            .parse()
            .map_err(|e| format!("Invalid port '{port_arg}': {e}"))?;
    }

    let mut runtime_builder = tokio::runtime::Builder::new_multi_thread();
    runtime_builder.enable_all();

    if let Some(workers) = cfg.server.workers {
        runtime_builder.worker_threads(workers);
        println!("[CONFIG] Using {workers} worker threads");
    } else {
        println!("[CONFIG] Using default worker threads (CPU cores)");
    }

    let runtime = runtime_builder.build()?;
    runtime.block_on(async_main(cfg))
}

async fn async_main(cfg: config::Config) -> Result<(), Box<dyn std::error::Error>> {
    let addr = cfg.get_socket_addr()?;
    let listener = server::create_listener(addr)?;

    let state = Arc::new(config::AppState::new(&cfg));
    let active_connections = Arc::new(AtomicUsize::new(0));

    logger::log_server_start(&addr, &cfg);

    server::signal::start_signal_handler(Arc::clone(&state));

    server::start_server_loop(listener, state, active_connections).await
}
