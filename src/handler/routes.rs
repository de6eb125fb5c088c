//! Built-in routes
//!
//! The route table registered at startup: the dashboard landing page, a
//! health check, a clock endpoint, and an echo endpoint.

use crate::dashboard;
use crate::http::Reply;

use super::router::Router;

/// Assemble the server's route table.
#[must_use]
pub fn build_router() -> Router {
    let mut router = Router::new();

    router.get("/", |_ctx| Ok(Reply::html(dashboard::render_dashboard())));

    router.get("/healthz", |_ctx| Ok(Reply::text("ok")));

    router.get("/time", |_ctx| {
        Ok(Reply::json(&serde_json::json!({
            "epochMillis": chrono::Utc::now().timestamp_millis(),
        })))
    });

    router.post("/echo", |ctx| Ok(Reply::bytes(ctx.body.clone())));

    router
}
