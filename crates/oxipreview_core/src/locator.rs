use log::{debug, trace, warn};
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{constants::MANIFEST_FILE, types::ProjectRoot};

/// Walks up from `start_dir` and returns the first directory holding a project manifest.
pub fn find_manifest_dir(start_dir: &Path) -> Option<PathBuf> {
    debug!("Searching for {} from {:?}", MANIFEST_FILE, start_dir);
    let mut current_dir = start_dir.to_path_buf();

    loop {
        let manifest = current_dir.join(MANIFEST_FILE);
        trace!("Checking for manifest at: {:?}", manifest);
        if manifest.is_file() {
            debug!("Found project root at: {:?}", current_dir);
            return Some(current_dir);
        }

        match current_dir.parent() {
            Some(parent) => current_dir = parent.to_path_buf(),
            None => {
                debug!("No {} in any parent of {:?}", MANIFEST_FILE, start_dir);
                return None;
            }
        }
    }
}

/// Resolves the working directory used to bundle `component_path`.
///
/// The nearest ancestor holding a manifest wins. Without one the component's
/// own directory is used, and the process directory when even that is unknown.
/// This never fails: bundling is still attempted from the fallback.
pub fn locate_working_directory(component_path: &Path) -> ProjectRoot {
    let component = absolutize(component_path);
    let component_dir = component.parent().map(Path::to_path_buf);

    if let Some(dir) = component_dir.as_deref()
        && let Some(root) = find_manifest_dir(dir)
    {
        let manifest = root.join(MANIFEST_FILE);
        return ProjectRoot { dir: root, manifest: Some(manifest) };
    }

    let fallback = component_dir
        .filter(|d| d.is_dir())
        .or_else(|| env::current_dir().ok())
        .unwrap_or_else(|| PathBuf::from("."));
    warn!(
        "No {} found above {}, falling back to {}",
        MANIFEST_FILE,
        component_path.display(),
        fallback.display()
    );
    ProjectRoot { dir: fallback, manifest: None }
}

fn absolutize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }
    if path.is_absolute() {
        return path.to_path_buf();
    }
    match env::current_dir() {
        Ok(cwd) => cwd.join(path),
        Err(_) => path.to_path_buf(),
    }
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
    fn test_locates_nearest_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        create_test_file(&root, "package.json", "{}");
        let component =
            create_test_file(&root, "src/components/Card.tsx", "export default () => null;");

        let located = locate_working_directory(&component);
        assert_eq!(located.dir, root);
        assert_eq!(located.manifest, Some(root.join("package.json")));
    }

    #[test]
    fn test_prefers_innermost_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        create_test_file(&root, "package.json", "{}");
        create_test_file(&root, "packages/ui/package.json", "{}");
        let component = create_test_file(&root, "packages/ui/src/Button.tsx", "");

        let located = locate_working_directory(&component);
        assert_eq!(located.dir, root.join("packages/ui"));
    }

    #[test]
    fn test_directory_named_like_manifest_is_ignored() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        fs::create_dir_all(root.join("app/package.json")).unwrap();
        let component = create_test_file(&root, "app/Widget.jsx", "");

        let located = locate_working_directory(&component);
        assert_ne!(located.manifest, Some(root.join("app").join("package.json")));
    }

    #[test]
    fn test_falls_back_to_component_directory() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path().canonicalize().unwrap();
        let component = create_test_file(&root, "loose/Card.tsx", "");

        // A manifest may exist somewhere above the system temp dir; only assert
        // the fallback when the walk really found nothing.
        let located = locate_working_directory(&component);
        if located.manifest.is_none() {
            assert_eq!(located.dir, root.join("loose"));
        }
    }

    #[test]
    fn test_missing_component_still_resolves() {
        let located = locate_working_directory(Path::new("definitely/not/here/Card.tsx"));
        assert!(!located.dir.as_os_str().is_empty());
    }
}
