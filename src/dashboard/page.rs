//! Landing page view
//!
//! Static card describing the server: title, feature summary, module list,
//! and the sample routes.

/// The example routes listed on the page, in display order.
pub const SAMPLE_ROUTES: [&str; 4] = ["/", "/healthz", "/time", "/echo"];

/// Render the landing page markup (to be wrapped by the root shell).
#[must_use]
pub fn render_landing_page() -> String {
    let routes = SAMPLE_ROUTES
        .iter()
        .map(|route| format!("<code>{route}</code>"))
        .collect::<Vec<_>>()
        .join(", ");

    format!(
        r#"<main>
<div class="container">
<div class="card">
<div class="card-header">
<h1 class="card-title">Multithreaded Web Server</h1>
<p class="card-description">Rust HTTP/1.1 server with a multithreaded runtime, LRU response cache, token-bucket rate limiting, and basic metrics.</p>
</div>
<div class="card-content">
<p>This page is rendered and served by the server itself. The server source lives under <code>src/</code>.</p>
<ul>
<li>Core modules: server, handler, cache, limiter, metrics</li>
<li>Features: LruCache, RateLimiter (token bucket), basic Metrics, and Router</li>
<li>Sample routes: {routes}</li>
</ul>
<p class="footnote">Responses to this page are cached like any other GET route; request it twice and compare the <code>X-Cache</code> header.</p>
</div>
</div>
</div>
</main>"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contains_title() {
        assert!(render_landing_page().contains("Multithreaded Web Server"));
    }

    #[test]
    fn test_lists_exactly_four_sample_routes() {
        let page = render_landing_page();
        assert_eq!(SAMPLE_ROUTES.len(), 4);
        for route in SAMPLE_ROUTES {
            assert_eq!(page.matches(&format!("<code>{route}</code>")).count(), 1);
        }

        // The routes line holds exactly the four entries and nothing more
        let line = page
            .lines()
            .find(|line| line.contains("Sample routes:"))
            .unwrap();
        assert_eq!(line.matches("<code>").count(), 4);
    }

    #[test]
    fn test_lists_feature_items() {
        let page = render_landing_page();
        assert!(page.contains("LruCache"));
        assert!(page.contains("RateLimiter (token bucket)"));
        assert!(page.contains("basic Metrics"));
        assert!(page.contains("Router"));
    }

    #[test]
    fn test_has_footnote() {
        assert!(render_landing_page().contains(r#"<p class="footnote">"#));
    }
}
