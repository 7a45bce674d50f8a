use anyhow::Result;
use log::{debug, info, trace, warn};
use oxipreview_bundle::{ExportSelection, choose_import};
use oxipreview_core::{
    CollectorConfig, MANIFEST_FILE, analyze_file, collect_components, component_display_name,
    detect_project_flavor,
};
use rayon::prelude::*;
use std::thread;

use crate::{
    config::Config,
    types::{DiscoveredComponent, DiscoveryResult},
};

/// Collects the component files under the root and analyzes them in parallel.
///
/// Files that cannot be read are skipped with a warning.
pub fn run_discovery(mut cfg: Config) -> Result<DiscoveryResult> {
    info!("Starting component discovery");
    cfg.initialize()?;
    let root = cfg.root()?.clone();

    let manifest = root.join(MANIFEST_FILE);
    let flavor = manifest.is_file().then(|| detect_project_flavor(&manifest));
    debug!("Project flavor: {:?}", flavor);

    let collector_cfg = CollectorConfig { root: root.clone(), include: cfg.include.clone() };
    let files = collect_components(&collector_cfg)?;
    if files.is_empty() {
        warn!("No component files found under {}", root.display());
    }
    info!("Analyzing {} component files in parallel", files.len());

    let selection = ExportSelection::default();
    let components: Vec<DiscoveredComponent> = files
        .par_iter()
        .filter_map(|file| {
            debug!("Thread {:?} analyzing: {}", thread::current().id(), file.display());
            let analysis = match analyze_file(file) {
                Ok(analysis) => analysis,
                Err(e) => {
                    warn!("Skipping {}: {:#}", file.display(), e);
                    return None;
                }
            };
            let path =
                file.strip_prefix(&root).unwrap_or(file).to_string_lossy().replace('\\', "/");
            let import_form = choose_import(&analysis, &selection).to_string();
            trace!("{} imports as {}", path, import_form);
            Some(DiscoveredComponent {
                path,
                name: component_display_name(file),
                import_form,
                analysis,
            })
        })
        .collect();

    info!("Discovery complete. Found {} components", components.len());
    Ok(DiscoveryResult { root, flavor, files_analyzed: files.len(), components })
}

#[cfg(test)]
mod tests {
    use super::*;
    use oxipreview_core::Framework;
    use std::{
        fs,
        path::{Path, PathBuf},
    };
    use tempfile::TempDir;

    fn create_test_file(dir: &Path, path: &str, content: &str) -> PathBuf {
        let file_path = dir.join(path);
        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directory");
        }
        fs::write(&file_path, content).expect("Failed to write test file");
        file_path
    }

    fn config(root: &Path, include: Option<&str>) -> Config {
        Config {
            root: Some(root.to_path_buf()),
            include: include.map(str::to_string),
            json: false,
        }
    }

    #[test]
    fn test_discovers_and_analyzes_components() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(
            root,
            "package.json",
            r#"{"dependencies":{"react":"^18.2.0","vite":"^5.0.0"}}"#,
        );
        create_test_file(
            root,
            "src/components/Card.tsx",
            "interface CardProps { title: string; subtitle?: string }\n\
             export default function Card({ title }: CardProps) { return <h1>{title}</h1>; }\n",
        );
        create_test_file(
            root,
            "src/components/Nav/index.tsx",
            "import { useNavigate } from 'react-router-dom';\n\
             export const Nav = () => { const go = useNavigate(); return <nav />; };\n",
        );
        create_test_file(root, "src/components/helpers.ts", "export const x = 1;\n");

        let result = run_discovery(config(root, None)).unwrap();

        assert_eq!(result.files_analyzed, 2);
        assert_eq!(result.flavor.as_ref().map(|f| f.framework), Some(Framework::Vite));
        let names: Vec<&str> = result.components.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["Card", "Nav"]);

        let card = &result.components[0];
        assert_eq!(card.path, "src/components/Card.tsx");
        assert_eq!(card.import_form, "default export");
        assert_eq!(card.analysis.required_props, vec!["title"]);
        assert_eq!(card.analysis.optional_props, vec!["subtitle"]);

        let nav = &result.components[1];
        assert_eq!(nav.import_form, "named export 'Nav'");
        assert!(nav.analysis.uses_router);
    }

    #[test]
    fn test_include_filter_and_no_manifest() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_test_file(root, "src/ui/Button.tsx", "export const Button = () => null;\n");
        create_test_file(root, "src/pages/Home.tsx", "export default () => null;\n");

        let result = run_discovery(config(root, Some("ui/"))).unwrap();
        assert!(result.flavor.is_none());
        assert_eq!(result.components.len(), 1);
        assert_eq!(result.components[0].path, "src/ui/Button.tsx");
    }
}
