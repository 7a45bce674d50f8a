use oxipreview_core::{ComponentAnalysis, component_display_name};
use serde_json::{Map, Value};
use std::{fmt, path::PathBuf};

use crate::providers::ProviderSpec;

/// One request to turn a component file into a standalone preview page.
#[derive(Debug, Clone)]
pub struct BundleRequest {
    pub component_path: PathBuf,
    /// Receives `index.html`; created when missing
    pub output_directory: PathBuf,
    pub component_name: String,
    /// Used verbatim instead of inferred example props when present
    pub props_example: Option<Map<String, Value>>,
    /// Outermost first
    pub wrap_providers: Vec<ProviderSpec>,
    /// Named export to render, overriding the default choice
    pub export_hint: Option<String>,
}

impl BundleRequest {
    pub fn new(component_path: impl Into<PathBuf>, output_directory: impl Into<PathBuf>) -> Self {
        let component_path = component_path.into();
        let component_name = component_display_name(&component_path);
        Self {
            component_path,
            output_directory: output_directory.into(),
            component_name,
            props_example: None,
            wrap_providers: Vec::new(),
            export_hint: None,
        }
    }

    pub fn artifact_path(&self) -> PathBuf {
        self.output_directory.join("index.html")
    }
}

/// How the generated entry imports the component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportForm {
    Default,
    Named(String),
    /// Whole module namespace, resolved to `default ?? namespace` at runtime
    Namespace,
}

impl fmt::Display for ImportForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImportForm::Default => write!(f, "default export"),
            ImportForm::Named(name) => write!(f, "named export '{}'", name),
            ImportForm::Namespace => write!(f, "module namespace"),
        }
    }
}

/// Everything produced by a successful bundling request.
#[derive(Debug, Clone)]
pub struct BundleArtifact {
    pub javascript: String,
    pub css: Option<String>,
    pub global_styles: String,
    /// Stylesheets that make up `global_styles`, in inclusion order
    pub global_style_files: Vec<PathBuf>,
    pub html: String,
    pub output_path: PathBuf,
    pub working_dir: PathBuf,
    pub import_form: ImportForm,
    pub analysis: ComponentAnalysis,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_defaults_name_from_path() {
        let request = BundleRequest::new("/p/components/Card.tsx", "/p/out");
        assert_eq!(request.component_name, "Card");
        assert_eq!(request.artifact_path(), PathBuf::from("/p/out/index.html"));
        assert!(request.wrap_providers.is_empty());
    }

    #[test]
    fn test_import_form_display() {
        assert_eq!(ImportForm::Named("Card".to_string()).to_string(), "named export 'Card'");
        assert_eq!(ImportForm::Namespace.to_string(), "module namespace");
    }
}
