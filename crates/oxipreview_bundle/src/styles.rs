use log::{debug, trace, warn};
use oxipreview_core::make_relative;
use regex::Regex;
use std::{
    fs,
    path::{Path, PathBuf},
    sync::LazyLock,
};

/// Project-level stylesheets, relative to the working directory, in inclusion order
const GLOBAL_STYLE_CANDIDATES: &[&str] = &[
    "src/index.css",
    "src/globals.css",
    "src/global.css",
    "src/app/globals.css",
    "app/globals.css",
    "src/styles/globals.css",
    "src/styles/global.css",
    "styles/globals.css",
    "styles/global.css",
    "src/App.css",
    "index.css",
    "globals.css",
    "global.css",
];

static CSS_IMPORT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?m)^[ \t]*@import\b[^;\n]*;[ \t]*\r?\n?").unwrap());

/// Stylesheets found outside the component's import graph.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalStyles {
    pub css: String,
    pub files: Vec<PathBuf>,
}

/// Concatenates the conventional global stylesheets of the project and the
/// ones sitting next to the component, with `@import` directives stripped.
///
/// Each file is included once; unreadable files are skipped.
pub fn discover_global_styles(working_dir: &Path, component_path: &Path) -> GlobalStyles {
    let mut candidates: Vec<PathBuf> =
        GLOBAL_STYLE_CANDIDATES.iter().map(|c| working_dir.join(c)).collect();
    if let Some(dir) = component_path.parent() {
        let stem = component_path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
        candidates.push(dir.join(format!("{stem}.css")));
        candidates.push(dir.join(format!("{stem}.styles.css")));
        candidates.push(dir.join("styles.css"));
    }

    let mut styles = GlobalStyles::default();
    let mut seen: Vec<PathBuf> = Vec::new();
    for candidate in candidates {
        if !candidate.is_file() {
            trace!("No stylesheet at {}", candidate.display());
            continue;
        }
        let key = candidate.canonicalize().unwrap_or_else(|_| candidate.clone());
        if seen.contains(&key) {
            trace!("Stylesheet already included: {}", candidate.display());
            continue;
        }
        seen.push(key);

        let content = match fs::read_to_string(&candidate) {
            Ok(content) => content,
            Err(err) => {
                warn!("Skipping unreadable stylesheet {}: {}", candidate.display(), err);
                continue;
            }
        };
        let label = make_relative(&candidate, working_dir)
            .unwrap_or_else(|| candidate.clone())
            .to_string_lossy()
            .replace('\\', "/");
        debug!("Including global stylesheet {}", label);

        if !styles.css.is_empty() {
            styles.css.push('\n');
        }
        styles.css.push_str(&format!("/* {} */\n", label.replace("*/", "* /")));
        styles.css.push_str(CSS_IMPORT_RE.replace_all(&content, "").trim_end());
        styles.css.push('\n');
        styles.files.push(candidate);
    }

    debug!("Found {} global stylesheets", styles.files.len());
    styles
}
