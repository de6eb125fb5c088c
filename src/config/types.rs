//! Configuration types
//!
//! One struct per config.toml section.

use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    pub server: ServerConfig,
    pub logging: LoggingConfig,
    pub performance: PerformanceConfig,
    pub http: HttpConfig,
    pub cache: CacheConfig,
    pub rate_limit: RateLimitConfig,
}

/// Server configuration
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

/// Logging configuration
#[derive(Debug, Deserialize, Clone)]
pub struct LoggingConfig {
    pub level: String,
    pub access_log: bool,
    /// Access log format (combined, common, or json)
    pub access_log_format: String,
    pub show_headers: bool,
}

/// Performance configuration
#[derive(Debug, Deserialize, Clone)]
pub struct PerformanceConfig {
    pub keep_alive_timeout: u64,
    pub read_timeout: u64,
    pub write_timeout: u64,
    pub max_connections: Option<u64>,
    /// Seconds to wait for in-flight connections at shutdown
    pub shutdown_grace: u64,
}

/// HTTP configuration
#[derive(Debug, Deserialize, Clone)]
pub struct HttpConfig {
    pub server_name: String,
    pub enable_cors: bool,
    pub max_body_size: u64,
}

/// Response cache configuration
#[derive(Debug, Deserialize, Clone)]
pub struct CacheConfig {
    pub max_entries: usize,
    pub ttl_ms: u64,
    /// Responses with bodies at or above this size are not cached
    pub max_cacheable_body: usize,
}

/// Rate limiter configuration
#[derive(Debug, Deserialize, Clone)]
pub struct RateLimitConfig {
    /// Sustained tokens per second per client
    pub per_second: f64,
    /// Bucket capacity per client
    pub burst: f64,
}
