use oxipreview_core::{ComponentAnalysis, ProjectFlavor};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveredComponent {
    /// Path relative to the discovery root, with forward slashes
    pub path: String,
    pub name: String,
    /// How a preview would import the component
    pub import_form: String,
    pub analysis: ComponentAnalysis,
}

#[derive(Debug, Clone, Serialize)]
pub struct DiscoveryResult {
    pub root: PathBuf,
    /// Present when the root holds a package.json
    pub flavor: Option<ProjectFlavor>,
    pub components: Vec<DiscoveredComponent>,
    pub files_analyzed: usize,
}
