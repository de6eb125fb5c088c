//! Dashboard views
//!
//! The server's built-in landing page: a root document shell plus a static
//! landing view describing the project. Rendering is plain string assembly
//! with no inputs and no state; output is byte-identical across renders.

pub mod layout;
pub mod page;

pub use layout::{render_layout, PageMetadata};
pub use page::render_landing_page;

/// Render the complete dashboard document: the landing page wrapped in the
/// root shell with the default document metadata.
#[must_use]
pub fn render_dashboard() -> String {
    render_layout(&PageMetadata::default(), &render_landing_page())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_is_idempotent() {
        assert_eq!(render_dashboard(), render_dashboard());
    }

    #[test]
    fn test_page_is_embedded_in_shell() {
        let document = render_dashboard();
        assert!(document.contains("<title>Web Server Dashboard</title>"));
        assert!(document.contains("Multithreaded Web Server"));
    }
}
