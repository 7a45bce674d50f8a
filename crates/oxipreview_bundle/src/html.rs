use regex::Regex;
use std::{fmt::Write as _, sync::LazyLock};

pub const STATUS_START: &str = "<!-- oxipreview:status:start -->";
pub const STATUS_END: &str = "<!-- oxipreview:status:end -->";

static CLOSING_STYLE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(style)").unwrap());

static CLOSING_SCRIPT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)</(script)").unwrap());

/// Small utility class set so utility-styled components stay readable
/// when the project's own utility stylesheet is not found.
pub const BASELINE_STYLES: &str = r#"*, *::before, *::after { box-sizing: border-box; }
html, body { margin: 0; padding: 0; }
body { font-family: ui-sans-serif, system-ui, -apple-system, "Segoe UI", Roboto, sans-serif; line-height: 1.5; color: #111827; background: #ffffff; }
#root { padding: 16px; }
img, svg, video { display: block; max-width: 100%; }
.flex { display: flex; }
.inline-flex { display: inline-flex; }
.grid { display: grid; }
.block { display: block; }
.hidden { display: none; }
.flex-col { flex-direction: column; }
.flex-row { flex-direction: row; }
.flex-wrap { flex-wrap: wrap; }
.flex-1 { flex: 1 1 0%; }
.items-center { align-items: center; }
.items-start { align-items: flex-start; }
.items-end { align-items: flex-end; }
.justify-center { justify-content: center; }
.justify-between { justify-content: space-between; }
.justify-end { justify-content: flex-end; }
.gap-1 { gap: 4px; }
.gap-2 { gap: 8px; }
.gap-4 { gap: 16px; }
.gap-6 { gap: 24px; }
.p-1 { padding: 4px; }
.p-2 { padding: 8px; }
.p-4 { padding: 16px; }
.p-6 { padding: 24px; }
.px-2 { padding-left: 8px; padding-right: 8px; }
.px-4 { padding-left: 16px; padding-right: 16px; }
.py-1 { padding-top: 4px; padding-bottom: 4px; }
.py-2 { padding-top: 8px; padding-bottom: 8px; }
.m-0 { margin: 0; }
.mx-auto { margin-left: auto; margin-right: auto; }
.mt-2 { margin-top: 8px; }
.mt-4 { margin-top: 16px; }
.mb-2 { margin-bottom: 8px; }
.mb-4 { margin-bottom: 16px; }
.w-full { width: 100%; }
.h-full { height: 100%; }
.min-h-screen { min-height: 100vh; }
.text-xs { font-size: 12px; }
.text-sm { font-size: 14px; }
.text-base { font-size: 16px; }
.text-lg { font-size: 18px; }
.text-xl { font-size: 20px; }
.text-2xl { font-size: 24px; }
.font-medium { font-weight: 500; }
.font-semibold { font-weight: 600; }
.font-bold { font-weight: 700; }
.text-center { text-align: center; }
.text-white { color: #ffffff; }
.text-gray-500 { color: #6b7280; }
.text-gray-700 { color: #374151; }
.text-gray-900 { color: #111827; }
.text-blue-600 { color: #2563eb; }
.text-red-600 { color: #dc2626; }
.bg-white { background-color: #ffffff; }
.bg-gray-50 { background-color: #f9fafb; }
.bg-gray-100 { background-color: #f3f4f6; }
.bg-blue-500 { background-color: #3b82f6; }
.bg-blue-600 { background-color: #2563eb; }
.border { border: 1px solid #e5e7eb; }
.border-gray-200 { border-color: #e5e7eb; }
.rounded { border-radius: 4px; }
.rounded-md { border-radius: 6px; }
.rounded-lg { border-radius: 8px; }
.rounded-full { border-radius: 9999px; }
.shadow { box-shadow: 0 1px 3px rgba(0, 0, 0, 0.1), 0 1px 2px rgba(0, 0, 0, 0.06); }
.shadow-md { box-shadow: 0 4px 6px rgba(0, 0, 0, 0.1), 0 2px 4px rgba(0, 0, 0, 0.06); }
.cursor-pointer { cursor: pointer; }
.overflow-hidden { overflow: hidden; }
.relative { position: relative; }
.absolute { position: absolute; }
.oxipreview-error { margin: 16px; padding: 16px; border: 1px solid #fca5a5; border-radius: 8px; background: #fef2f2; color: #991b1b; font-family: ui-monospace, SFMono-Regular, Menlo, monospace; }
.oxipreview-error h3 { margin: 0 0 8px; font-size: 16px; }
.oxipreview-error pre { margin: 0; white-space: pre-wrap; word-break: break-word; }
#oxipreview-status { position: fixed; right: 8px; bottom: 8px; padding: 4px 8px; border-radius: 4px; background: rgba(17, 24, 39, 0.8); color: #f9fafb; font: 11px ui-monospace, SFMono-Regular, Menlo, monospace; pointer-events: none; }
"#;

/// Debug summary shown in the corner of the page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatusOverlay {
    pub component_name: String,
    pub import_form: String,
    pub bundle_bytes: usize,
    pub global_stylesheets: usize,
}

/// Inputs of the final document.
#[derive(Debug, Clone)]
pub struct HtmlParts<'a> {
    pub title: &'a str,
    pub javascript: &'a str,
    pub css: Option<&'a str>,
    pub global_styles: &'a str,
    pub status: Option<StatusOverlay>,
}

/// Builds the self-contained preview document.
///
/// Style precedence, lowest first: baseline utilities, global stylesheets,
/// bundled CSS. The script runs inline inside a try/catch that replaces the
/// root's contents with an error block.
pub fn assemble_html(parts: &HtmlParts<'_>) -> String {
    let mut html = String::new();
    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    html.push_str("<meta charset=\"utf-8\">\n");
    html.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1\">\n");
    let _ = writeln!(html, "<title>{} preview</title>", escape_html(parts.title));

    push_style(&mut html, "baseline", BASELINE_STYLES);
    if !parts.global_styles.is_empty() {
        push_style(&mut html, "global", parts.global_styles);
    }
    if let Some(css) = parts.css.filter(|css| !css.trim().is_empty()) {
        push_style(&mut html, "bundle", css);
    }
    html.push_str("</head>\n<body>\n<div id=\"root\"></div>\n");

    if let Some(status) = &parts.status {
        html.push_str(STATUS_START);
        html.push('\n');
        let _ = writeln!(
            html,
            "<div id=\"oxipreview-status\">{} &middot; {} &middot; {} &middot; {} global stylesheet{}</div>",
            escape_html(&status.component_name),
            escape_html(&status.import_form),
            format_bytes(status.bundle_bytes),
            status.global_stylesheets,
            if status.global_stylesheets == 1 { "" } else { "s" }
        );
        html.push_str(STATUS_END);
        html.push('\n');
    }

    html.push_str("<script>\ntry {\n");
    html.push_str(&CLOSING_SCRIPT_RE.replace_all(parts.javascript, r"<\/$1"));
    html.push_str(SCRIPT_FAILURE_HANDLER);
    html.push_str("</script>\n</body>\n</html>\n");
    html
}

const SCRIPT_FAILURE_HANDLER: &str = r#"
} catch (error) {
  console.error('[preview] bundle failed to execute', error);
  const root = document.getElementById('root');
  if (root) {
    const block = document.createElement('div');
    block.className = 'oxipreview-error';
    const heading = document.createElement('h3');
    heading.textContent = 'Preview script failed';
    const details = document.createElement('pre');
    details.textContent = String(error && error.stack ? error.stack : error);
    block.append(heading, details);
    root.replaceChildren(block);
  }
}
"#;

fn push_style(html: &mut String, section: &str, css: &str) {
    let _ = writeln!(html, "<style data-oxipreview=\"{}\">", section);
    html.push_str(&CLOSING_STYLE_RE.replace_all(css, r"<\/$1"));
    if !css.ends_with('\n') {
        html.push('\n');
    }
    html.push_str("</style>\n");
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}

/// Human-readable byte count, e.g. `512 B` or `12.3 KB`
pub fn format_bytes(bytes: usize) -> String {
    const KB: f64 = 1024.0;
    let value = bytes as f64;
    if value < KB {
        format!("{} B", bytes)
    } else if value < KB * KB {
        format!("{:.1} KB", value / KB)
    } else {
        format!("{:.1} MB", value / (KB * KB))
    }
}
