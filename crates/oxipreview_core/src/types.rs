use serde::Serialize;
use std::{collections::BTreeSet, path::PathBuf};

/// Result of the static analysis of one component source file.
///
/// `required_props` and `optional_props` never share a name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ComponentAnalysis {
    pub has_default_export: bool,
    /// Runtime exports in declaration order
    pub named_exports: Vec<String>,
    pub uses_router: bool,
    pub uses_theme: bool,
    pub context_names: BTreeSet<String>,
    pub required_props: Vec<String>,
    pub optional_props: Vec<String>,
    /// Hook calls such as `useState`, deduplicated
    pub hooks: BTreeSet<String>,
    /// Module specifiers of runtime imports, in source order
    pub imports: Vec<String>,
    /// False when the syntax tree could not be built and the textual scan was used
    pub parsed: bool,
}

impl ComponentAnalysis {
    /// True when the component imports the given package or one of its subpaths
    pub fn imports_package(&self, package: &str) -> bool {
        self.imports.iter().any(|spec| {
            spec == package || spec.strip_prefix(package).is_some_and(|rest| rest.starts_with('/'))
        })
    }
}

/// Directory used as the module-resolution root for one bundling request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectRoot {
    pub dir: PathBuf,
    /// The manifest that established `dir`, if one was found
    pub manifest: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum Framework {
    Next,
    Vite,
    CreateReactApp,
    Remix,
    Gatsby,
    #[default]
    Unknown,
}

/// What kind of project the manifest describes, as far as previews care.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProjectFlavor {
    pub framework: Framework,
    pub react_version: Option<String>,
    pub uses_tailwind: bool,
    pub router_package: Option<String>,
}
