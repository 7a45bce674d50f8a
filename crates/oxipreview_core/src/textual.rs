//! Regex heuristics over raw component source.
//!
//! Usage flags (router, theme, contexts, hooks) are always computed here. The
//! export and props scan is the degraded path taken when the parser cannot
//! build a syntax tree; it is best-effort and never fails.

use log::trace;
use regex::Regex;
use std::{collections::HashSet, sync::LazyLock};

use crate::types::ComponentAnalysis;

static DEFAULT_EXPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\bexport\s+default\b").unwrap());

static NAMED_EXPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"\bexport\s+(?:declare\s+)?(?:const|let|var|(?:async\s+)?function\*?|(?:abstract\s+)?class)\s+([A-Za-z_$][\w$]*)",
    )
    .unwrap()
});

static PROPS_BLOCK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\b(?:interface\s+[A-Za-z_$][\w$]*Props\b[^{;]*|type\s+[A-Za-z_$][\w$]*Props\s*=\s*)\{")
        .unwrap()
});

static FIELD_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\s*(?:readonly\s+)?([A-Za-z_$][\w$]*)\s*(\?)?\s*[:(]").unwrap()
});

static IMPORT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?m)^\s*import\s+(type\s+)?(?:[^'";]*?\s+from\s+)?['"]([^'"]+)['"]"#).unwrap()
});

static ROUTER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:useNavigate|useLocation|useParams|useSearchParams|useRouter|usePathname|useHistory|useMatch|useRouteMatch)\s*\(|<(?:Link|NavLink|Route|Routes|Outlet)\b|from\s+['"](?:react-router(?:-dom)?|next/router|next/navigation|next/link|@tanstack/react-router)['"]"#,
    )
    .unwrap()
});

static THEME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r#"\b(?:useTheme|ThemeProvider|createTheme|makeStyles|useColorScheme|useColorMode)\b|from\s+['"](?:styled-components|@emotion/react|@emotion/styled|next-themes)['"]"#,
    )
    .unwrap()
});

static USE_CONTEXT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\buseContext\s*\(\s*([A-Za-z_$][\w$]*)").unwrap());

static CONTEXT_PROVIDER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b([A-Z][\w$]*Context)\.(?:Provider|Consumer)\b").unwrap());

static HOOK_CALL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\b(use[A-Z][\w$]*)\s*(?:<[^<>()]*>)?\s*\(").unwrap());

/// Fills the router, theme, context and hook fields from the raw source text.
pub fn apply_usage_flags(source: &str, analysis: &mut ComponentAnalysis) {
    analysis.uses_router = ROUTER_RE.is_match(source);
    analysis.uses_theme = THEME_RE.is_match(source);

    for cap in USE_CONTEXT_RE.captures_iter(source).chain(CONTEXT_PROVIDER_RE.captures_iter(source))
    {
        let name = &cap[1];
        if name.ends_with("Context") {
            analysis.context_names.insert(name.to_string());
        }
    }

    for cap in HOOK_CALL_RE.captures_iter(source) {
        analysis.hooks.insert(cap[1].to_string());
    }
    trace!(
        "Usage flags: router={}, theme={}, contexts={:?}, hooks={:?}",
        analysis.uses_router, analysis.uses_theme, analysis.context_names, analysis.hooks
    );
}

/// Export and props analysis without a syntax tree.
pub fn scan_exports_and_props(source: &str) -> ComponentAnalysis {
    let mut analysis = ComponentAnalysis {
        has_default_export: DEFAULT_EXPORT_RE.is_match(source),
        ..Default::default()
    };

    for cap in NAMED_EXPORT_RE.captures_iter(source) {
        let name = cap[1].to_string();
        if !analysis.named_exports.contains(&name) {
            analysis.named_exports.push(name);
        }
    }

    for cap in IMPORT_RE.captures_iter(source) {
        if cap.get(1).is_none() {
            analysis.imports.push(cap[2].to_string());
        }
    }

    if let Some(m) = PROPS_BLOCK_RE.find(source) {
        let body = braced_body(&source[m.end()..]);
        let (required, optional) = classify_fields(body);
        analysis.required_props = required;
        analysis.optional_props = optional;
    }

    trace!(
        "Textual scan: default={}, named={:?}, required={:?}, optional={:?}",
        analysis.has_default_export,
        analysis.named_exports,
        analysis.required_props,
        analysis.optional_props
    );
    analysis
}

/// Returns the text up to the brace closing an already-opened block.
///
/// An unbalanced block yields everything that follows.
fn braced_body(after_open: &str) -> &str {
    let mut depth = 0usize;
    for (idx, ch) in after_open.char_indices() {
        match ch {
            '{' => depth += 1,
            '}' if depth == 0 => return &after_open[..idx],
            '}' => depth -= 1,
            _ => {}
        }
    }
    after_open
}

/// Splits a type body into top-level members and classifies each by its `?` marker.
fn classify_fields(body: &str) -> (Vec<String>, Vec<String>) {
    let mut required = Vec::new();
    let mut optional = Vec::new();
    let mut seen = HashSet::new();

    let mut depth = 0i32;
    let mut start = 0;
    let mut segments = Vec::new();
    for (idx, ch) in body.char_indices() {
        match ch {
            '{' | '(' | '[' | '<' => depth += 1,
            '}' | ')' | ']' => depth -= 1,
            // `=>` is not a closing angle bracket
            '>' if !body[..idx].ends_with('=') => depth -= 1,
            ';' | ',' | '\n' if depth <= 0 => {
                segments.push(&body[start..idx]);
                start = idx + ch.len_utf8();
                depth = 0;
            }
            _ => {}
        }
    }
    segments.push(&body[start..]);

    for segment in segments {
        let Some(cap) = FIELD_RE.captures(segment) else { continue };
        let name = cap[1].to_string();
        if !seen.insert(name.clone()) {
            continue;
        }
        if cap.get(2).is_some() { optional.push(name) } else { required.push(name) }
    }
    (required, optional)
}
