//! Request pipeline
//!
//! Per-request processing: method gate, body limits, rate limiting, the
//! response cache, router dispatch, metrics, and access logging. The body
//! is collected up front so handlers see a fully parsed request.

use std::convert::Infallible;
use std::net::SocketAddr;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Instant;

use http_body_util::{BodyExt, Full};
use hyper::body::{Bytes, Incoming};
use hyper::{HeaderMap, Method, Request, Response, Version};

use crate::config::AppState;
use crate::http::{self, Reply};
use crate::logger::{self, AccessLogEntry};

use super::router::RequestContext;

/// Main entry point for request handling.
pub async fn handle_request(
    req: Request<Incoming>,
    peer_addr: SocketAddr,
    state: Arc<AppState>,
) -> Result<Response<Full<Bytes>>, Infallible> {
    let start = Instant::now();
    let method = req.method().clone();
    let version = req.version();
    let is_head = method == Method::HEAD;

    let access_log = state.cached_access_log.load(Ordering::Relaxed);
    if access_log {
        logger::log_request(&method, req.uri(), version);
    }

    // 1. Method gate
    if let Some(resp) = check_http_method(&method, state.config.http.enable_cors) {
        return Ok(resp);
    }

    // 2. Declared body size and unsupported transfer encodings
    if let Some(resp) = check_body_size(&req, state.config.http.max_body_size) {
        return Ok(resp);
    }
    if is_chunked(req.headers()) {
        logger::log_warning("Rejected chunked transfer encoding");
        return Ok(http::build_400_response(
            "Chunked transfer encoding not supported",
        ));
    }

    logger::log_headers_count(req.headers().len(), state.config.logging.show_headers);

    // 3. Collect the body before routing
    let (parts, body) = req.into_parts();
    let body = match body.collect().await {
        Ok(collected) => collected.to_bytes(),
        Err(e) => {
            state.metrics.inc_errors();
            logger::log_error(&format!("Failed to read request body: {e}"));
            return Ok(http::build_400_response("Malformed request"));
        }
    };

    // 4. Rate limiting, keyed by client IP without the ephemeral port
    let client_key = peer_addr.ip().to_string();
    if !state.limiter.allow(&client_key) {
        state.metrics.inc_rate_limited();
        logger::log_warning(&format!("Rate limit exceeded for {client_key}"));
        return Ok(http::build_429_response());
    }

    let ctx = RequestContext {
        method: method.clone(),
        path: parts.uri.path().to_string(),
        headers: parts.headers.clone(),
        body,
    };

    // 5. Cache lookup / router dispatch
    let mut reply = serve_cached(&ctx, &state);
    reply.set_header_if_absent("Server", &state.config.http.server_name);
    if state.config.http.enable_cors {
        reply.set_header_if_absent("Access-Control-Allow-Origin", "*");
    }

    // 6. Metrics and access logging
    let status = reply.status();
    state.metrics.observe_request(status);

    if access_log {
        let mut entry = AccessLogEntry::new(
            client_key,
            method.as_str().to_string(),
            parts.uri.path().to_string(),
        );
        entry.query = parts.uri.query().map(ToString::to_string);
        entry.http_version = version_label(version).to_string();
        entry.status = status;
        entry.body_bytes = reply.body_len();
        entry.referer = header_str(&parts.headers, "referer");
        entry.user_agent = header_str(&parts.headers, "user-agent");
        entry.request_time_us = u64::try_from(start.elapsed().as_micros()).unwrap_or(u64::MAX);
        logger::log_access(&entry, &state.config.logging.access_log_format);
    }

    Ok(reply.into_hyper(is_head))
}

/// Route through the response cache. GET (and HEAD via its GET route) is
/// served from cache when fresh; successful small responses are stored.
/// The stored copy carries no `X-Cache` header, so replays are labeled HIT
/// and first renders MISS.
fn serve_cached(ctx: &RequestContext, state: &AppState) -> Reply {
    let cacheable = ctx.method == Method::GET || ctx.method == Method::HEAD;
    if !cacheable {
        return state.router.handle(ctx);
    }

    let cache_key = format!("GET {}", ctx.path);
    if let Some(mut reply) = state.cache.get(&cache_key) {
        state.metrics.inc_cache_hit();
        reply.set_header_if_absent("X-Cache", "HIT");
        return reply;
    }

    let mut reply = state.router.handle(ctx);
    if reply.status() == 200 && reply.body_len() < state.config.cache.max_cacheable_body {
        state.cache.put(cache_key, reply.clone());
        state.metrics.inc_cache_store();
    }
    reply.set_header_if_absent("X-Cache", "MISS");
    reply
}

/// Gate requests to the methods the router can serve. OPTIONS is answered
/// directly; anything else outside the routable set gets 405.
fn check_http_method(method: &Method, enable_cors: bool) -> Option<Response<Full<Bytes>>> {
    match method {
        &Method::GET | &Method::HEAD | &Method::POST | &Method::PUT | &Method::DELETE => None,
        &Method::OPTIONS => Some(http::build_options_response(enable_cors)),
        _ => {
            logger::log_warning(&format!("Method not allowed: {method}"));
            Some(http::build_405_response())
        }
    }
}

/// Validate Content-Length header and return 413 if exceeded
fn check_body_size(
    req: &Request<Incoming>,
    max_body_size: u64,
) -> Option<Response<Full<Bytes>>> {
    let content_length = req.headers().get("content-length")?;
    content_length.to_str().map_or_else(
        |_| {
            logger::log_warning("Content-Length header contains non-ASCII characters");
            None
        },
        |size_str| match size_str.parse::<u64>() {
            Ok(size) if size > max_body_size => {
                logger::log_error(&format!(
                    "Request body too large: {size} bytes (max: {max_body_size})"
                ));
                Some(http::build_413_response())
            }
            Err(_) => {
                logger::log_warning(&format!(
                    "Invalid Content-Length value: '{size_str}', skipping size check"
                ));
                None
            }
            _ => None,
        },
    )
}

fn is_chunked(headers: &HeaderMap) -> bool {
    headers
        .get("transfer-encoding")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.to_ascii_lowercase().contains("chunked"))
}

fn header_str(headers: &HeaderMap, name: &str) -> Option<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(ToString::to_string)
}

fn version_label(version: Version) -> &'static str {
    if version == Version::HTTP_10 {
        "1.0"
    } else if version == Version::HTTP_2 {
        "2"
    } else {
        "1.1"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;

    fn state() -> AppState {
        let cfg = Config::load_from("no-such-config-file").unwrap();
        AppState::new(&cfg)
    }

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext {
            method,
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_get_is_cached_second_time() {
        let state = state();

        let first = serve_cached(&ctx(Method::GET, "/healthz"), &state);
        assert_eq!(first.header("X-Cache"), Some("MISS"));

        let second = serve_cached(&ctx(Method::GET, "/healthz"), &state);
        assert_eq!(second.header("X-Cache"), Some("HIT"));
        assert_eq!(second.body().as_ref(), b"ok");
    }

    #[test]
    fn test_post_bypasses_cache() {
        let state = state();

        let reply = serve_cached(&ctx(Method::POST, "/echo"), &state);
        assert_eq!(reply.header("X-Cache"), None);
        assert!(state.cache.is_empty());
    }

    #[test]
    fn test_404_not_stored() {
        let state = state();

        let reply = serve_cached(&ctx(Method::GET, "/missing"), &state);
        assert_eq!(reply.status(), 404);
        assert_eq!(reply.header("X-Cache"), Some("MISS"));
        assert!(state.cache.is_empty());
    }

    #[test]
    fn test_method_gate() {
        assert!(check_http_method(&Method::GET, false).is_none());
        assert!(check_http_method(&Method::DELETE, false).is_none());

        let resp = check_http_method(&Method::PATCH, false).unwrap();
        assert_eq!(resp.status(), 405);

        let resp = check_http_method(&Method::OPTIONS, false).unwrap();
        assert_eq!(resp.status(), 204);
    }

    #[test]
    fn test_chunked_detection() {
        let mut headers = HeaderMap::new();
        assert!(!is_chunked(&headers));
        headers.insert("transfer-encoding", "Chunked".parse().unwrap());
        assert!(is_chunked(&headers));
    }

    #[test]
    fn test_version_label() {
        assert_eq!(version_label(Version::HTTP_11), "1.1");
        assert_eq!(version_label(Version::HTTP_10), "1.0");
    }
}
