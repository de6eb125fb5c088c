//! Configuration module
//!
//! Layered configuration: coded defaults, then an optional config file,
//! then `SERVER_`-prefixed environment variables. Also owns the shared
//! application state built from the loaded configuration.

mod state;
mod types;

use std::net::SocketAddr;

// Re-export public types
pub use state::AppState;
pub use types::{
    CacheConfig, Config, HttpConfig, LoggingConfig, PerformanceConfig, RateLimitConfig,
    ServerConfig,
};

impl Config {
    /// Load configuration from the default `config.toml` location.
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from the specified file path (without extension).
    /// The file is optional; defaults and environment variables apply
    /// either way.
    pub fn load_from(config_path: &str) -> Result<Self, config::ConfigError> {
        let settings = config::Config::builder()
            .add_source(config::File::with_name(config_path).required(false))
            .add_source(config::Environment::with_prefix("SERVER"))
            .set_default("server.host", "127.0.0.1")?
            .set_default("server.port", 8080)?
            .set_default("logging.level", "info")?
            .set_default("logging.access_log", true)?
            .set_default("logging.access_log_format", "combined")?
            .set_default("logging.show_headers", false)?
            .set_default("performance.keep_alive_timeout", 75)?
            .set_default("performance.read_timeout", 15)?
            .set_default("performance.write_timeout", 15)?
            .set_default("performance.shutdown_grace", 5)?
            .set_default("http.server_name", "mtws/0.1")?
            .set_default("http.enable_cors", false)?
            .set_default("http.max_body_size", 1_048_576)? // 1 MiB
            .set_default("cache.max_entries", 1024)?
            .set_default("cache.ttl_ms", 30_000)?
            .set_default("cache.max_cacheable_body", 1_000_000)?
            .set_default("rate_limit.per_second", 50.0)?
            .set_default("rate_limit.burst", 100.0)?
            .build()?;

        settings.try_deserialize()
    }

    pub fn get_socket_addr(&self) -> Result<SocketAddr, String> {
        format!("{}:{}", self.server.host, self.server.port)
            .parse()
            .map_err(|e| format!("Invalid address: {e}"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_without_file() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        assert_eq!(cfg.server.host, "127.0.0.1");
        assert_eq!(cfg.server.port, 8080);
        assert_eq!(cfg.server.workers, None);
        assert_eq!(cfg.http.max_body_size, 1_048_576);
        assert_eq!(cfg.cache.max_entries, 1024);
        assert_eq!(cfg.cache.ttl_ms, 30_000);
        assert!((cfg.rate_limit.per_second - 50.0).abs() < f64::EPSILON);
        assert_eq!(cfg.performance.max_connections, None);
        assert_eq!(cfg.performance.read_timeout, 15);
    }

    #[test]
    fn test_socket_addr() {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        let addr = cfg.get_socket_addr().unwrap();
        assert_eq!(addr.port(), 8080);
        assert!(addr.is_ipv4());
    }
}
