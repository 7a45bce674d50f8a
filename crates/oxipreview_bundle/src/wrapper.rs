use clap::ValueEnum;
use log::{debug, trace, warn};
use oxipreview_core::{ComponentAnalysis, import_specifier};
use serde_json::Value;
use std::{fmt::Write as _, path::Path};

use crate::{
    props::example_props_source,
    providers::ProviderSpec,
    types::{BundleRequest, ImportForm},
};

/// Ordering used to pick the primary named export.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ExportOrder {
    #[default]
    Declaration,
    Alphabetical,
}

#[derive(Debug, Clone, Default)]
pub struct ExportSelection {
    /// Named export to prefer over every other choice
    pub hint: Option<String>,
    pub order: ExportOrder,
}

/// Generated entry module and the import form it uses.
#[derive(Debug, Clone)]
pub struct WrapperSource {
    pub source: String,
    pub import_form: ImportForm,
}

/// Picks how the entry module imports the component.
pub fn choose_import(analysis: &ComponentAnalysis, selection: &ExportSelection) -> ImportForm {
    if let Some(hint) = &selection.hint {
        if analysis.named_exports.contains(hint) {
            debug!("Using hinted export '{}'", hint);
            return ImportForm::Named(hint.clone());
        }
        warn!("Export '{}' not found in component (exports: {:?})", hint, analysis.named_exports);
    }

    if analysis.has_default_export {
        return ImportForm::Default;
    }

    let mut candidates: Vec<&String> = analysis.named_exports.iter().collect();
    if selection.order == ExportOrder::Alphabetical {
        candidates.sort();
    }
    let primary = candidates
        .iter()
        .find(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
        .or_else(|| candidates.first());

    match primary {
        Some(name) => {
            trace!("Primary named export among {:?}: {}", candidates, name);
            ImportForm::Named(name.to_string())
        }
        None => ImportForm::Namespace,
    }
}

/// Synthesizes the entry module that mounts the component.
///
/// The module is meant to live in `entry_dir`; the component import is made
/// relative to it. Both paths should be canonical, otherwise no relative
/// specifier exists and the import degrades to the raw path.
pub fn synthesize_wrapper(
    request: &BundleRequest,
    component_path: &Path,
    analysis: &ComponentAnalysis,
    order: ExportOrder,
    providers: &[ProviderSpec],
    entry_dir: &Path,
) -> WrapperSource {
    let selection = ExportSelection { hint: request.export_hint.clone(), order };
    let import_form = choose_import(analysis, &selection);
    let specifier = js_string(&import_specifier(entry_dir, component_path));
    debug!("Entry imports {} from {}", import_form, specifier);

    let mut out = String::new();
    out.push_str("import React from 'react';\n");
    out.push_str("import { createRoot } from 'react-dom/client';\n");
    match &import_form {
        ImportForm::Default => {
            let _ = writeln!(out, "import Component from {};", specifier);
        }
        ImportForm::Named(name) => {
            let _ = writeln!(out, "import {{ {} as Component }} from {};", name, specifier);
        }
        ImportForm::Namespace => {
            let _ = writeln!(out, "import * as ComponentModule from {};", specifier);
        }
    }
    for (index, provider) in providers.iter().enumerate() {
        let _ = writeln!(
            out,
            "import {{ {} as Provider{} }} from {};",
            provider.name,
            index,
            js_string(&provider.module)
        );
    }
    out.push('\n');

    if import_form == ImportForm::Namespace {
        out.push_str("const Component = ComponentModule.default ?? ComponentModule;\n");
    }
    let _ = writeln!(out, "const COMPONENT_NAME = {};", js_string(&request.component_name));
    let _ = writeln!(out, "const REQUIRED_PROPS = {};", js_list(&analysis.required_props));
    let _ = writeln!(out, "const OPTIONAL_PROPS = {};", js_list(&analysis.optional_props));
    let _ = writeln!(
        out,
        "const exampleProps = {};\n",
        example_props_source(request.props_example.as_ref(), &analysis.required_props)
    );

    out.push_str(&provider_function(providers.len()));
    out.push_str(RUNTIME);
    WrapperSource { source: out, import_form }
}

/// `withProviders` nesting `Provider0` (outermost) through `Provider{count-1}`
fn provider_function(count: usize) -> String {
    if count == 0 {
        return "function withProviders(children) {\n  return children;\n}\n".to_string();
    }
    let mut nested = "children".to_string();
    for index in (0..count).rev() {
        nested = format!("React.createElement(Provider{}, null, {})", index, nested);
    }
    format!("function withProviders(children) {{\n  return {};\n}}\n", nested)
}

fn js_string(text: &str) -> String {
    Value::String(text.to_string()).to_string()
}

fn js_list(items: &[String]) -> String {
    Value::from(items.to_vec()).to_string()
}

/// Mount logic shared by every entry module.
const RUNTIME: &str = r#"
function isRenderable(value) {
  return (
    typeof value === 'function' ||
    (typeof value === 'object' && value !== null && '$$typeof' in value)
  );
}

function diagnosticLines(error) {
  const message = error && error.message ? error.message : String(error);
  return [
    'Error: ' + message,
    'Component type: ' + typeof Component,
    'Required props: ' + (REQUIRED_PROPS.join(', ') || 'none'),
    'Optional props: ' + (OPTIONAL_PROPS.join(', ') || 'none'),
  ];
}

function showDiagnostic(container, error) {
  const block = document.createElement('div');
  block.className = 'oxipreview-error';
  const heading = document.createElement('h3');
  heading.textContent = 'Failed to render ' + COMPONENT_NAME;
  const details = document.createElement('pre');
  details.textContent = diagnosticLines(error).join('\n');
  block.append(heading, details);
  container.replaceChildren(block);
}

class PreviewErrorBoundary extends React.Component {
  constructor(props) {
    super(props);
    this.state = { error: null };
  }

  static getDerivedStateFromError(error) {
    return { error };
  }

  componentDidCatch(error) {
    console.error('[preview] ' + COMPONENT_NAME + ' failed to render', error);
  }

  render() {
    if (!this.state.error) {
      return this.props.children;
    }
    return React.createElement(
      'div',
      { className: 'oxipreview-error' },
      React.createElement('h3', null, 'Failed to render ' + COMPONENT_NAME),
      React.createElement('pre', null, diagnosticLines(this.state.error).join('\n'))
    );
  }
}

const container = document.getElementById('root');
if (!container) {
  console.error('[preview] No element with id "root"; ' + COMPONENT_NAME + ' was not rendered');
} else {
  try {
    if (!isRenderable(Component)) {
      throw new Error(COMPONENT_NAME + ' does not export a renderable component');
    }
    createRoot(container).render(
      React.createElement(
        PreviewErrorBoundary,
        null,
        withProviders(React.createElement(Component, exampleProps))
      )
    );
  } catch (error) {
    console.error('[preview] ' + COMPONENT_NAME + ' failed to render', error);
    showDiagnostic(container, error);
  }
}
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn analysis(default: bool, named: &[&str]) -> ComponentAnalysis {
        ComponentAnalysis {
            has_default_export: default,
            named_exports: named.iter().map(|s| s.to_string()).collect(),
            parsed: true,
            ..Default::default()
        }
    }

    const CARD_PATH: &str = "/p/src/components/Card.tsx";

    fn request() -> BundleRequest {
        BundleRequest::new(CARD_PATH, "/p/.preview/Card")
    }

    #[test]
    fn test_default_export_wins_without_hint() {
        let form = choose_import(&analysis(true, &["Card", "helper"]), &ExportSelection::default());
        assert_eq!(form, ImportForm::Default);
    }

    #[test]
    fn test_hint_overrides_default_export() {
        let selection = ExportSelection { hint: Some("CardBody".to_string()), ..Default::default() };
        let form = choose_import(&analysis(true, &["Card", "CardBody"]), &selection);
        assert_eq!(form, ImportForm::Named("CardBody".to_string()));
    }

    #[test]
    fn test_unknown_hint_is_ignored() {
        let selection = ExportSelection { hint: Some("Missing".to_string()), ..Default::default() };
        let form = choose_import(&analysis(false, &["Card"]), &selection);
        assert_eq!(form, ImportForm::Named("Card".to_string()));
    }

    #[test]
    fn test_named_export_ordering() {
        let found = analysis(false, &["useCard", "Zeta", "Alpha"]);
        let declaration = choose_import(&found, &ExportSelection::default());
        assert_eq!(declaration, ImportForm::Named("Zeta".to_string()));

        let selection = ExportSelection { hint: None, order: ExportOrder::Alphabetical };
        assert_eq!(choose_import(&found, &selection), ImportForm::Named("Alpha".to_string()));
    }

    #[test]
    fn test_uncapitalized_exports_fall_back_to_first() {
        let found = analysis(false, &["renderCard", "buildCard"]);
        assert_eq!(
            choose_import(&found, &ExportSelection::default()),
            ImportForm::Named("renderCard".to_string())
        );
        let selection = ExportSelection { hint: None, order: ExportOrder::Alphabetical };
        assert_eq!(choose_import(&found, &selection), ImportForm::Named("buildCard".to_string()));
    }

    #[test]
    fn test_default_import_wrapper() {
        let mut found = analysis(true, &[]);
        found.required_props = vec!["title".to_string()];
        found.optional_props = vec!["onClick".to_string()];

        let wrapper = synthesize_wrapper(
            &request(),
            Path::new(CARD_PATH),
            &found,
            ExportOrder::Declaration,
            &[],
            &PathBuf::from("/p/.preview/Card"),
        );
        assert_eq!(wrapper.import_form, ImportForm::Default);
        assert!(
            wrapper
                .source
                .contains("import Component from \"../../src/components/Card.tsx\";")
        );
        assert!(wrapper.source.contains("const COMPONENT_NAME = \"Card\";"));
        assert!(wrapper.source.contains("const REQUIRED_PROPS = [\"title\"];"));
        assert!(wrapper.source.contains("const OPTIONAL_PROPS = [\"onClick\"];"));
        assert!(wrapper.source.contains("\"title\": \"Example title\""));
        assert!(!wrapper.source.contains("\"onClick\":"));
        assert!(wrapper.source.contains("return children;"));
        assert!(wrapper.source.contains("document.getElementById('root')"));
    }

    #[test]
    fn test_namespace_wrapper_has_runtime_guard() {
        let wrapper = synthesize_wrapper(
            &request(),
            Path::new(CARD_PATH),
            &analysis(false, &[]),
            ExportOrder::Declaration,
            &[],
            &PathBuf::from("/p/src/components"),
        );
        assert_eq!(wrapper.import_form, ImportForm::Namespace);
        assert!(wrapper.source.contains("import * as ComponentModule from \"./Card.tsx\";"));
        assert!(
            wrapper.source.contains("const Component = ComponentModule.default ?? ComponentModule;")
        );
        assert!(wrapper.source.contains("if (!isRenderable(Component))"));
        assert!(wrapper.source.contains("const exampleProps = {};"));
    }

    #[test]
    fn test_providers_nest_first_outermost() {
        let providers = vec![
            ProviderSpec::new("ThemeProvider", "styled-components"),
            ProviderSpec::new("MemoryRouter", "react-router-dom"),
        ];
        let wrapper = synthesize_wrapper(
            &request(),
            Path::new(CARD_PATH),
            &analysis(false, &["Card"]),
            ExportOrder::Declaration,
            &providers,
            &PathBuf::from("/p/src/components"),
        );
        assert!(wrapper.source.contains("import { Card as Component } from \"./Card.tsx\";"));
        assert!(
            wrapper
                .source
                .contains("import { ThemeProvider as Provider0 } from \"styled-components\";")
        );
        assert!(
            wrapper
                .source
                .contains("import { MemoryRouter as Provider1 } from \"react-router-dom\";")
        );
        assert!(wrapper.source.contains(
            "return React.createElement(Provider0, null, React.createElement(Provider1, null, children));"
        ));
    }

    #[test]
    fn test_component_name_is_escaped() {
        let mut req = request();
        req.component_name = "Card\"; alert(1); \"".to_string();
        let wrapper = synthesize_wrapper(
            &req,
            Path::new(CARD_PATH),
            &analysis(true, &[]),
            ExportOrder::Declaration,
            &[],
            &PathBuf::from("/p/src/components"),
        );
        assert!(wrapper.source.contains(r#"const COMPONENT_NAME = "Card\"; alert(1); \"";"#));
    }

    #[test]
    fn test_import_uses_given_component_path() {
        let req = BundleRequest::new("src/components/Card.tsx", "/p/.preview/Card");
        let wrapper = synthesize_wrapper(
            &req,
            Path::new(CARD_PATH),
            &analysis(true, &[]),
            ExportOrder::Declaration,
            &[],
            &PathBuf::from("/p/.preview/Card"),
        );
        assert!(
            wrapper.source.contains("import Component from \"../../src/components/Card.tsx\";")
        );
        assert!(!wrapper.source.contains("from \"src/components/Card.tsx\""));
    }
}
