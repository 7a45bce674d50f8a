use log::trace;
use std::path::{Path, PathBuf};

use crate::constants::NODE_MODULES;

/// Finds the installed directory of `pkg` as Node would, walking up from `start_dir`.
///
/// Handles scoped packages such as `@mui/material`. A package directory
/// counts only when it carries its own `package.json`.
pub fn find_package_dir(start_dir: &Path, pkg: &str) -> Option<PathBuf> {
    trace!("Walking up from {:?} to find node_modules for '{}'", start_dir, pkg);
    let mut current_dir = start_dir;

    loop {
        let candidate = current_dir.join(NODE_MODULES).join(pkg);
        if candidate.join("package.json").is_file() {
            trace!("Found '{}' at {:?}", pkg, candidate);
            return Some(candidate);
        }
        current_dir = current_dir.parent()?;
    }
}

/// Finds an executable installed under `node_modules/.bin` in `dir` itself.
pub fn find_local_bin(dir: &Path, name: &str) -> Option<PathBuf> {
    let bin_dir = dir.join(NODE_MODULES).join(".bin");
    let candidates: Vec<String> = if cfg!(windows) {
        vec![format!("{name}.cmd"), format!("{name}.exe"), name.to_string()]
    } else {
        vec![name.to_string()]
    };

    candidates.iter().map(|c| bin_dir.join(c)).find(|p| {
        trace!("Checking for executable at {:?}", p);
        p.is_file()
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn install_package(root: &Path, pkg: &str) -> PathBuf {
        let dir = root.join("node_modules").join(pkg);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("package.json"), format!(r#"{{"name":"{pkg}"}}"#)).unwrap();
        dir
    }

    #[test]
    fn test_finds_package_in_ancestor() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let installed = install_package(root, "react-router-dom");
        let nested = root.join("src/components");
        fs::create_dir_all(&nested).unwrap();

        assert_eq!(find_package_dir(&nested, "react-router-dom"), Some(installed));
    }

    #[test]
    fn test_finds_scoped_package() {
        let temp_dir = TempDir::new().unwrap();
        let installed = install_package(temp_dir.path(), "@mui/material");

        assert_eq!(find_package_dir(temp_dir.path(), "@mui/material"), Some(installed));
    }

    #[test]
    fn test_directory_without_manifest_is_not_a_package() {
        let temp_dir = TempDir::new().unwrap();
        fs::create_dir_all(temp_dir.path().join("node_modules/left-pad-for-tests")).unwrap();

        assert_eq!(find_package_dir(temp_dir.path(), "left-pad-for-tests"), None);
    }

    #[test]
    #[cfg(unix)]
    fn test_finds_local_bin() {
        let temp_dir = TempDir::new().unwrap();
        let bin_dir = temp_dir.path().join("node_modules/.bin");
        fs::create_dir_all(&bin_dir).unwrap();
        fs::write(bin_dir.join("esbuild"), "").unwrap();

        assert_eq!(find_local_bin(temp_dir.path(), "esbuild"), Some(bin_dir.join("esbuild")));
        assert_eq!(find_local_bin(temp_dir.path(), "tsc"), None);
    }
}
