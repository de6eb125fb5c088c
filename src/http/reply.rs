//! Response value type
//!
//! `Reply` is a fully materialized response: status, headers, and body.
//! Handlers build one, the response cache stores clones of one, and the
//! dispatch layer converts it into a hyper response at the connection
//! boundary.

use http_body_util::Full;
use hyper::body::Bytes;
use hyper::Response;

use crate::logger;

#[derive(Debug, Clone)]
pub struct Reply {
    status: u16,
    headers: Vec<(String, String)>,
    body: Bytes,
}

impl Reply {
    #[must_use]
    pub const fn new(status: u16) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: Bytes::new(),
        }
    }

    /// 200 with a plain text body
    #[must_use]
    pub fn text(body: impl Into<String>) -> Self {
        Self::new(200)
            .with_header("Content-Type", "text/plain; charset=utf-8")
            .with_body(Bytes::from(body.into()))
    }

    /// 200 with a JSON body
    #[must_use]
    pub fn json(value: &serde_json::Value) -> Self {
        Self::new(200)
            .with_header("Content-Type", "application/json")
            .with_body(Bytes::from(value.to_string()))
    }

    /// 200 with an HTML body
    #[must_use]
    pub fn html(body: impl Into<String>) -> Self {
        Self::new(200)
            .with_header("Content-Type", "text/html; charset=utf-8")
            .with_body(Bytes::from(body.into()))
    }

    /// 200 with a raw byte body
    #[must_use]
    pub fn bytes(body: Bytes) -> Self {
        Self::new(200)
            .with_header("Content-Type", "application/octet-stream")
            .with_body(body)
    }

    #[must_use]
    pub fn not_found() -> Self {
        Self::new(404)
            .with_header("Content-Type", "text/plain")
            .with_body(Bytes::from_static(b"404 Not Found"))
    }

    #[must_use]
    pub fn with_header(mut self, name: &str, value: impl Into<String>) -> Self {
        self.headers.push((name.to_string(), value.into()));
        self
    }

    #[must_use]
    pub fn with_body(mut self, body: Bytes) -> Self {
        self.body = body;
        self
    }

    /// Add a header unless one with that name is already present.
    pub fn set_header_if_absent(&mut self, name: &str, value: &str) {
        if !self.headers.iter().any(|(n, _)| n.eq_ignore_ascii_case(name)) {
            self.headers.push((name.to_string(), value.to_string()));
        }
    }

    #[must_use]
    pub const fn status(&self) -> u16 {
        self.status
    }

    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    #[must_use]
    pub fn body_len(&self) -> usize {
        self.body.len()
    }

    /// Look up a header value by name (case-insensitive).
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, v)| v.as_str())
    }

    /// Convert into a hyper response. A HEAD request gets the full headers,
    /// including the Content-Length of the real body, but an empty body.
    #[must_use]
    pub fn into_hyper(self, is_head: bool) -> Response<Full<Bytes>> {
        let Self {
            status,
            headers,
            body,
        } = self;
        let content_length = body.len();

        let mut builder = Response::builder()
            .status(status)
            .header("Content-Length", content_length);
        for (name, value) in &headers {
            builder = builder.header(name.as_str(), value.as_str());
        }

        let body = if is_head { Bytes::new() } else { body };
        builder.body(Full::new(body)).unwrap_or_else(|e| {
            logger::log_error(&format!("Failed to build {status} response: {e}"));
            Response::new(Full::new(Bytes::new()))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_text_reply() {
        let reply = Reply::text("hello");
        assert_eq!(reply.status(), 200);
        assert_eq!(reply.body().as_ref(), b"hello");
        assert_eq!(reply.header("content-type"), Some("text/plain; charset=utf-8"));
    }

    #[test]
    fn test_json_reply() {
        let reply = Reply::json(&serde_json::json!({"ok": true}));
        assert_eq!(reply.header("Content-Type"), Some("application/json"));
        let parsed: serde_json::Value = serde_json::from_slice(reply.body()).unwrap();
        assert_eq!(parsed["ok"], serde_json::json!(true));
    }

    #[test]
    fn test_set_header_if_absent() {
        let mut reply = Reply::text("x");
        reply.set_header_if_absent("X-Cache", "MISS");
        reply.set_header_if_absent("x-cache", "HIT");
        assert_eq!(reply.header("X-Cache"), Some("MISS"));
    }

    #[test]
    fn test_into_hyper_head_strips_body() {
        let resp = Reply::text("hello").into_hyper(true);
        assert_eq!(resp.status(), 200);
        assert_eq!(resp.headers()["Content-Length"], "5");
    }

    #[test]
    fn test_not_found() {
        let reply = Reply::not_found();
        assert_eq!(reply.status(), 404);
    }
}
