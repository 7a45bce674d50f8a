use log::{debug, trace, warn};
use serde_json::Value;
use std::{fs, path::Path};

use crate::{
    constants::ROUTER_PACKAGES,
    types::{Framework, ProjectFlavor},
};

/// Reads a project manifest and reports which framework and styling stack it uses.
///
/// Only `dependencies` and `devDependencies` are consulted. A missing or
/// malformed manifest yields the default flavor.
pub fn detect_project_flavor(manifest: &Path) -> ProjectFlavor {
    let content = match fs::read_to_string(manifest) {
        Ok(content) => content,
        Err(e) => {
            debug!("Could not read manifest {}: {}", manifest.display(), e);
            return ProjectFlavor::default();
        }
    };

    match serde_json::from_str::<Value>(&content) {
        Ok(json) => flavor_from_manifest(&json),
        Err(e) => {
            warn!("Ignoring malformed manifest {}: {}", manifest.display(), e);
            ProjectFlavor::default()
        }
    }
}

fn flavor_from_manifest(json: &Value) -> ProjectFlavor {
    let version_of = |name: &str| -> Option<String> {
        ["dependencies", "devDependencies"].iter().find_map(|section| {
            json.get(section)
                .and_then(|deps| deps.get(name))
                .and_then(|v| v.as_str())
                .map(str::to_string)
        })
    };
    let has = |name: &str| version_of(name).is_some();

    let framework = if has("next") {
        Framework::Next
    } else if has("@remix-run/react") {
        Framework::Remix
    } else if has("gatsby") {
        Framework::Gatsby
    } else if has("vite") {
        Framework::Vite
    } else if has("react-scripts") {
        Framework::CreateReactApp
    } else {
        Framework::Unknown
    };
    trace!("Detected framework {:?}", framework);

    let router_package = ROUTER_PACKAGES.iter().find(|pkg| has(pkg)).map(|pkg| pkg.to_string());

    ProjectFlavor {
        framework,
        react_version: version_of("react"),
        uses_tailwind: has("tailwindcss"),
        router_package,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn write_manifest(dir: &Path, content: &str) -> std::path::PathBuf {
        let path = dir.join("package.json");
        fs::write(&path, content).expect("Failed to write manifest");
        path
    }

    #[test]
    fn test_detects_vite_tailwind_project() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = write_manifest(
            temp_dir.path(),
            r#"{
  "dependencies": { "react": "^18.2.0", "react-router-dom": "^6.22.0" },
  "devDependencies": { "vite": "^5.0.0", "tailwindcss": "^3.4.0" }
}"#,
        );

        let flavor = detect_project_flavor(&manifest);
        assert_eq!(flavor.framework, Framework::Vite);
        assert_eq!(flavor.react_version.as_deref(), Some("^18.2.0"));
        assert!(flavor.uses_tailwind);
        assert_eq!(flavor.router_package.as_deref(), Some("react-router-dom"));
    }

    #[test]
    fn test_next_wins_over_bundler_dependencies() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = write_manifest(
            temp_dir.path(),
            r#"{ "dependencies": { "next": "14.1.0", "vite": "5.0.0" } }"#,
        );

        assert_eq!(detect_project_flavor(&manifest).framework, Framework::Next);
    }

    #[test]
    fn test_malformed_manifest_yields_default() {
        let temp_dir = TempDir::new().unwrap();
        let manifest = write_manifest(temp_dir.path(), "{ not json");

        assert_eq!(detect_project_flavor(&manifest), ProjectFlavor::default());
    }

    #[test]
    fn test_missing_manifest_yields_default() {
        let temp_dir = TempDir::new().unwrap();
        let flavor = detect_project_flavor(&temp_dir.path().join("package.json"));
        assert_eq!(flavor.framework, Framework::Unknown);
        assert!(!flavor.uses_tailwind);
    }
}
