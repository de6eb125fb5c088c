//! Route registry
//!
//! Exact-match routing keyed by normalized method and path. Registration
//! happens once at startup; dispatch is a single map lookup.

use std::collections::HashMap;

use hyper::body::Bytes;
use hyper::{HeaderMap, Method};

use crate::http::{HandlerError, Reply};
use crate::logger;

/// Everything a handler may inspect: the parsed request with its body
/// already collected.
pub struct RequestContext {
    pub method: Method,
    pub path: String,
    pub headers: HeaderMap,
    pub body: Bytes,
}

type Handler = Box<dyn Fn(&RequestContext) -> Result<Reply, HandlerError> + Send + Sync>;

#[derive(Default)]
pub struct Router {
    routes: HashMap<String, Handler>,
}

impl Router {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.register(&Method::GET, path, handler);
    }

    pub fn post<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.register(&Method::POST, path, handler);
    }

    pub fn put<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.register(&Method::PUT, path, handler);
    }

    pub fn delete<H>(&mut self, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.register(&Method::DELETE, path, handler);
    }

    pub fn register<H>(&mut self, method: &Method, path: &str, handler: H)
    where
        H: Fn(&RequestContext) -> Result<Reply, HandlerError> + Send + Sync + 'static,
    {
        self.routes
            .insert(route_key(method.as_str(), path), Box::new(handler));
    }

    /// Dispatch a request. Unknown keys produce 404; handler errors map to
    /// their HTTP responses. HEAD is served by the GET route.
    pub fn handle(&self, ctx: &RequestContext) -> Reply {
        let method = if ctx.method == Method::HEAD {
            Method::GET
        } else {
            ctx.method.clone()
        };

        match self.routes.get(&route_key(method.as_str(), &ctx.path)) {
            None => Reply::not_found(),
            Some(handler) => handler(ctx).unwrap_or_else(|e| {
                logger::log_error(&format!("Handler failed for {} {}: {e}", ctx.method, ctx.path));
                e.into_reply()
            }),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.routes.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }
}

/// Build the lookup key for a method and path.
fn route_key(method: &str, path: &str) -> String {
    format!(
        "{} {}",
        method.to_ascii_uppercase(),
        normalize_path(&decode_path(path))
    )
}

/// Strip one trailing slash; the bare root stays `/`.
fn normalize_path(path: &str) -> &str {
    if path.len() > 1 {
        path.strip_suffix('/').unwrap_or(path)
    } else {
        path
    }
}

/// Percent-decode a request path. Invalid escapes and non-UTF-8 results
/// leave the path as received.
fn decode_path(path: &str) -> String {
    let bytes = path.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            if let (Some(hi), Some(lo)) = (hex_value(bytes[i + 1]), hex_value(bytes[i + 2])) {
                out.push(hi * 16 + lo);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8(out).unwrap_or_else(|_| path.to_string())
}

const fn hex_value(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx(method: Method, path: &str) -> RequestContext {
        RequestContext {
            method,
            path: path.to_string(),
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    #[test]
    fn test_exact_match() {
        let mut router = Router::new();
        router.get("/hello", |_| Ok(Reply::text("hi")));

        assert_eq!(router.handle(&ctx(Method::GET, "/hello")).status(), 200);
        assert_eq!(router.handle(&ctx(Method::GET, "/other")).status(), 404);
    }

    #[test]
    fn test_method_mismatch_is_404() {
        let mut router = Router::new();
        router.get("/hello", |_| Ok(Reply::text("hi")));

        assert_eq!(router.handle(&ctx(Method::POST, "/hello")).status(), 404);
    }

    #[test]
    fn test_trailing_slash_normalized() {
        let mut router = Router::new();
        router.get("/about", |_| Ok(Reply::text("about")));

        assert_eq!(router.handle(&ctx(Method::GET, "/about/")).status(), 200);
        assert_eq!(router.handle(&ctx(Method::GET, "/")).status(), 404);
    }

    #[test]
    fn test_percent_decoded_lookup() {
        let mut router = Router::new();
        router.get("/with space", |_| Ok(Reply::text("x")));

        assert_eq!(
            router.handle(&ctx(Method::GET, "/with%20space")).status(),
            200
        );
    }

    #[test]
    fn test_invalid_escape_left_as_is() {
        assert_eq!(decode_path("/a%zz"), "/a%zz");
        assert_eq!(decode_path("/a%2"), "/a%2");
        assert_eq!(decode_path("/a%20b"), "/a b");
    }

    #[test]
    fn test_head_uses_get_route() {
        let mut router = Router::new();
        router.get("/hello", |_| Ok(Reply::text("hi")));

        assert_eq!(router.handle(&ctx(Method::HEAD, "/hello")).status(), 200);
    }

    #[test]
    fn test_handler_error_maps_to_response() {
        let mut router = Router::new();
        router.get("/boom", |_| {
            Err(HandlerError::Internal("broken".to_string()))
        });

        let reply = router.handle(&ctx(Method::GET, "/boom"));
        assert_eq!(reply.status(), 500);
        assert_eq!(reply.body().as_ref(), b"Internal server error");
    }
}
