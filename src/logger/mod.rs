//! Logger module
//!
//! Plain stdout/stderr logging helpers plus the access log formatter.
//! Lifecycle and access lines go to stdout, warnings and errors to stderr.

mod format;

pub use format::AccessLogEntry;

use std::net::SocketAddr;

use hyper::{Method, Uri, Version};

use crate::config::Config;

pub fn log_server_start(addr: &SocketAddr, config: &Config) {
    println!("======================================");
    println!("Multithreaded web server started");
    println!("Listening on: http://{addr}");
    println!("Log level: {}", config.logging.level);
    if let Some(workers) = config.server.workers {
        println!("Worker threads: {workers}");
    }
    println!(
        "Response cache: {} entries, ttl {} ms",
        config.cache.max_entries, config.cache.ttl_ms
    );
    println!(
        "Rate limit: {}/s, burst {}",
        config.rate_limit.per_second, config.rate_limit.burst
    );
    println!("======================================\n");
}

pub fn log_connection_accepted(peer_addr: &SocketAddr) {
    println!("[Connection] Accepted from: {peer_addr}");
}

pub fn log_connection_error(err: &impl std::fmt::Debug) {
    eprintln!("[ERROR] Failed to serve connection: {err:?}");
}

pub fn log_request(method: &Method, uri: &Uri, version: Version) {
    println!("[Request] {method} {uri} {version:?}");
}

/// Write a formatted access log line
pub fn log_access(entry: &AccessLogEntry, format: &str) {
    println!("{}", entry.format(format));
}

pub fn log_headers_count(count: usize, show: bool) {
    if show {
        println!("[Headers] Count: {count}");
    }
}

pub fn log_error(message: &str) {
    eprintln!("[ERROR] {message}");
}

pub fn log_warning(message: &str) {
    eprintln!("[WARN] {message}");
}

pub fn log_metrics_summary(summary: &str) {
    println!("[metrics] {summary}");
}

pub fn log_shutdown(message: &str) {
    println!("[Shutdown] {message}");
}
