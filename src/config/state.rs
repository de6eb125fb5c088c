//! Application state
//!
//! The shared, immutable-after-startup state handed to every connection:
//! the configuration plus the router, response cache, rate limiter, and
//! metrics instances.

use std::sync::atomic::AtomicBool;
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;

use crate::cache::LruCache;
use crate::handler::router::Router;
use crate::handler::routes;
use crate::http::Reply;
use crate::limiter::RateLimiter;
use crate::metrics::Metrics;

use super::types::Config;

pub struct AppState {
    pub config: Config,
    pub router: Router,
    pub cache: LruCache<String, Reply>,
    pub limiter: RateLimiter,
    pub metrics: Metrics,
    pub shutdown: Arc<Notify>,

    // Cached flag for lock-free access on the hot path
    pub cached_access_log: AtomicBool,
}

impl AppState {
    #[must_use]
    pub fn new(config: &Config) -> Self {
        Self {
            config: config.clone(),
            router: routes::build_router(),
            cache: LruCache::new(
                config.cache.max_entries,
                Duration::from_millis(config.cache.ttl_ms),
            ),
            limiter: RateLimiter::new(config.rate_limit.per_second, config.rate_limit.burst),
            metrics: Metrics::new(),
            shutdown: Arc::new(Notify::new()),
            cached_access_log: AtomicBool::new(config.logging.access_log),
        }
    }
}
