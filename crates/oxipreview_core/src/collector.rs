use anyhow::Result;
use ignore::WalkBuilder;
use log::{debug, trace};
use std::path::{Path, PathBuf};

use crate::constants::{COMPONENT_EXTENSIONS, NODE_MODULES, SKIPPED_FILE_MARKERS};

pub struct CollectorConfig {
    pub root: PathBuf,
    /// Keep only files whose root-relative path contains this fragment
    pub include: Option<String>,
}

/// Collects files under the root that look like previewable components.
///
/// A component file has a component extension and a capitalized stem, or is
/// an `index` file inside a capitalized directory. Ignored, test, story and
/// declaration files are skipped. The result is sorted.
pub fn collect_components(cfg: &CollectorConfig) -> Result<Vec<PathBuf>> {
    debug!("Collecting component files");
    let mut files: Vec<PathBuf> = Vec::new();
    let root = &cfg.root;
    debug!("Walking directory tree from root: {}", root.display());
    let walker = WalkBuilder::new(root)
        .hidden(false)
        .ignore(true)
        .git_ignore(true)
        .filter_entry(|entry| entry.file_name() != NODE_MODULES)
        .build();

    for res in walker {
        let dent = res?;
        let p = dent.path();
        if !p.is_file() {
            continue;
        }

        let path_str = p.to_string_lossy();
        if SKIPPED_FILE_MARKERS.iter().any(|marker| path_str.contains(marker)) {
            trace!("Skipping non-component file: {}", path_str);
            continue;
        }

        let Some(ext) = p.extension().and_then(|e| e.to_str()) else { continue };
        if !COMPONENT_EXTENSIONS.contains(&ext) || !looks_like_component(p) {
            continue;
        }

        if let Some(fragment) = &cfg.include {
            let rel = p.strip_prefix(root).unwrap_or(p).to_string_lossy().replace('\\', "/");
            if !rel.contains(fragment.as_str()) {
                trace!("Excluded by include filter '{}': {}", fragment, rel);
                continue;
            }
        }

        trace!("Found component file: {}", p.display());
        files.push(p.to_path_buf());
    }

    files.sort();
    debug!("Collected {} component files", files.len());
    Ok(files)
}

/// Display name of a component file: its stem, or its directory for `index` files.
pub fn component_display_name(path: &Path) -> String {
    let stem = path.file_stem().and_then(|s| s.to_str()).unwrap_or_default();
    if stem == "index"
        && let Some(dir) = path.parent().and_then(|d| d.file_name()).and_then(|d| d.to_str())
    {
        return dir.to_string();
    }
    stem.to_string()
}

fn looks_like_component(path: &Path) -> bool {
    component_display_name(path).starts_with(|c: char| c.is_ascii_uppercase())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    #[test]
    fn test_collects_capitalized_component_files() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/components/Card.tsx", "");
        create_test_file(root, "src/components/Modal/index.jsx", "");
        create_test_file(root, "src/components/utils.ts", "");
        create_test_file(root, "src/components/Card.test.tsx", "");
        create_test_file(root, "src/components/Card.stories.tsx", "");
        create_test_file(root, "src/components/Card.css", "");
        create_test_file(root, "node_modules/lib/Button.js", "");

        let cfg = CollectorConfig { root: root.to_path_buf(), include: None };
        let files = collect_components(&cfg).unwrap();
        let rel: Vec<String> = files
            .iter()
            .map(|f| f.strip_prefix(root).unwrap().to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(rel, vec!["src/components/Card.tsx", "src/components/Modal/index.jsx"]);
    }

    #[test]
    fn test_include_filter() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/ui/Button.tsx", "");
        create_test_file(root, "src/pages/Home.tsx", "");

        let cfg = CollectorConfig { root: root.to_path_buf(), include: Some("ui/".to_string()) };
        let files = collect_components(&cfg).unwrap();
        assert_eq!(files.len(), 1);
        assert!(files[0].ends_with("src/ui/Button.tsx"));
    }

    #[test]
    fn test_component_display_name() {
        assert_eq!(component_display_name(Path::new("/p/src/Card.tsx")), "Card");
        assert_eq!(component_display_name(Path::new("/p/src/Modal/index.tsx")), "Modal");
    }
}
