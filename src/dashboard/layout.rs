//! Root document shell
//!
//! Wraps page content in the full HTML document: head metadata tags, the
//! two font resources, and the global stylesheet. The child markup is
//! embedded exactly once, unmodified, inside the body element.

/// Document head metadata emitted by the shell.
#[derive(Debug, Clone)]
pub struct PageMetadata {
    pub title: String,
    pub description: String,
    pub author: String,
    pub application_name: String,
}

impl Default for PageMetadata {
    fn default() -> Self {
        Self {
            title: "Web Server Dashboard".to_string(),
            description: "Landing page for the multithreaded HTTP server project.".to_string(),
            author: "Sumit Kumar".to_string(),
            application_name: "WebServerUI".to_string(),
        }
    }
}

const FONT_GEIST: &str =
    "https://fonts.googleapis.com/css2?family=Geist:wght@400;500;600&display=swap";
const FONT_GEIST_MONO: &str =
    "https://fonts.googleapis.com/css2?family=Geist+Mono:wght@400;500&display=swap";

const GLOBAL_STYLES: &str = "\
:root { --background: #fafafa; --foreground: #0a0a0a; --card: #ffffff; --border: #e5e5e5; --muted: #737373; }
* { box-sizing: border-box; }
body { margin: 0; font-family: 'Geist', ui-sans-serif, system-ui, sans-serif; -webkit-font-smoothing: antialiased; background: var(--background); color: var(--foreground); }
code { font-family: 'Geist Mono', ui-monospace, monospace; font-size: 0.85em; }
main { min-height: 100dvh; display: flex; align-items: center; justify-content: center; padding: 1.5rem; }
.container { width: 100%; max-width: 48rem; }
.card { background: var(--card); border: 1px solid var(--border); border-radius: 0.75rem; box-shadow: 0 1px 2px rgb(0 0 0 / 0.05); }
.card-header { padding: 1.5rem 1.5rem 0; }
.card-title { margin: 0; font-size: 1.25rem; font-weight: 600; }
.card-description { margin: 0.375rem 0 0; font-size: 0.875rem; color: var(--muted); }
.card-content { padding: 1.5rem; display: flex; flex-direction: column; gap: 1rem; }
.card-content p { margin: 0; font-size: 0.875rem; }
.card-content ul { margin: 0; padding-left: 1.25rem; font-size: 0.875rem; display: flex; flex-direction: column; gap: 0.25rem; }
.footnote { font-size: 0.75rem; color: var(--muted); }
";

/// Produce the complete document with `children` inside the body.
#[must_use]
pub fn render_layout(meta: &PageMetadata, children: &str) -> String {
    format!(
        r#"<!DOCTYPE html>
<html lang="en">
<head>
<meta charset="utf-8">
<meta name="viewport" content="width=device-width, initial-scale=1">
<title>{title}</title>
<meta name="description" content="{description}">
<meta name="author" content="{author}">
<meta name="application-name" content="{application_name}">
<link rel="stylesheet" href="{FONT_GEIST}">
<link rel="stylesheet" href="{FONT_GEIST_MONO}">
<style>
{GLOBAL_STYLES}</style>
</head>
<body class="font-sans antialiased">
{children}
</body>
</html>
"#,
        title = meta.title,
        description = meta.description,
        author = meta.author,
        application_name = meta.application_name,
    )
}
