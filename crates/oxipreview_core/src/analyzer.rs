use anyhow::{Context, Result};
use log::{debug, trace, warn};
use oxc_allocator::{Allocator, Vec as ArenaVec};
use oxc_ast::ast::*;
use oxc_parser::{Parser as OxcParser, ParserReturn};
use oxc_span::SourceType;
use std::{collections::HashSet, fs, path::Path};

use crate::{textual, types::ComponentAnalysis};

/// Analyzes component source text, assuming TSX syntax.
pub fn analyze_component(source: &str) -> ComponentAnalysis {
    analyze_source(source, SourceType::tsx())
}

/// Reads and analyzes a component file, picking the syntax from its extension.
pub fn analyze_file(path: &Path) -> Result<ComponentAnalysis> {
    trace!("Analyzing component file: {}", path.display());
    let src =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;
    Ok(analyze_source(&src, source_type_for(path)))
}

/// Analyzes source text with an explicit source type.
///
/// Never fails: when no syntax tree can be built the textual scan takes over,
/// and unrecognized shapes simply produce empty fields.
pub fn analyze_source(source: &str, source_type: SourceType) -> ComponentAnalysis {
    let allocator = Allocator::default();
    let ParserReturn { program, errors, panicked, .. } =
        OxcParser::new(&allocator, source, source_type).parse();

    let mut analysis = if panicked || (program.body.is_empty() && !errors.is_empty()) {
        warn!(
            "Component source could not be parsed ({} errors), using textual scan",
            errors.len()
        );
        textual::scan_exports_and_props(source)
    } else {
        if !errors.is_empty() {
            debug!("Parsed component with {} recoverable errors", errors.len());
        }
        let mut scan = ProgramScan::default();
        scan.visit_program(&program);
        scan.into_analysis()
    };

    textual::apply_usage_flags(source, &mut analysis);
    debug!(
        "Analysis: default={}, named={:?}, required={:?}, optional={:?}",
        analysis.has_default_export,
        analysis.named_exports,
        analysis.required_props,
        analysis.optional_props
    );
    analysis
}

pub fn source_type_for(path: &Path) -> SourceType {
    let ext = path.extension().and_then(|e| e.to_str());

    SourceType::default()
        .with_module(true)
        .with_jsx(!matches!(ext, Some("ts") | Some("mts") | Some("cts")))
        .with_typescript(matches!(ext, Some("ts") | Some("tsx") | Some("mts") | Some("cts")))
}

type Members<'p, 'a> = &'p ArenaVec<'a, TSSignature<'a>>;

#[derive(Default)]
struct ProgramScan<'p, 'a> {
    has_default_export: bool,
    named_exports: Vec<String>,
    imports: Vec<String>,
    /// Parameters of the default export when it is an inline function
    default_params: Option<&'p FormalParameters<'a>>,
    /// Local binding re-exported as default (`export default Card`)
    default_binding: Option<String>,
    /// Function-like top-level bindings
    functions: Vec<(&'p str, &'p FormalParameters<'a>)>,
    /// Interfaces and object type aliases, in declaration order
    shapes: Vec<(&'p str, Members<'p, 'a>)>,
}

impl<'p, 'a> ProgramScan<'p, 'a> {
    fn visit_program(&mut self, program: &'p Program<'a>) {
        for stmt in &program.body {
            match stmt {
                Statement::ImportDeclaration(decl) => {
                    if decl.import_kind.is_type() {
                        continue;
                    }
                    trace!("Found import: '{}'", decl.source.value);
                    self.imports.push(decl.source.value.to_string());
                }
                Statement::ExportDefaultDeclaration(decl) => {
                    self.has_default_export = true;
                    self.visit_default_export(&decl.declaration);
                }
                Statement::ExportNamedDeclaration(decl) => {
                    let type_only = decl.export_kind.is_type();
                    if let Some(declaration) = &decl.declaration {
                        // Interfaces and aliases still matter for props
                        self.visit_declaration(declaration, !type_only);
                    }
                    for spec in &decl.specifiers {
                        if type_only || spec.export_kind.is_type() {
                            continue;
                        }
                        let exported = spec.exported.name();
                        if exported == "default" {
                            self.has_default_export = true;
                            self.default_binding = Some(spec.local.name().to_string());
                        } else if matches!(spec.exported, ModuleExportName::StringLiteral(_)) {
                            // `export { x as "foo-bar" }` cannot be bound by name
                            trace!("Skipping string export name '{}'", exported);
                        } else {
                            self.push_export(exported.to_string());
                        }
                    }
                }
                other => {
                    if let Some(declaration) = other.as_declaration() {
                        self.visit_declaration(declaration, false);
                    }
                }
            }
        }
    }

    fn visit_default_export(&mut self, kind: &'p ExportDefaultDeclarationKind<'a>) {
        match kind {
            ExportDefaultDeclarationKind::FunctionDeclaration(func) => {
                self.default_params = Some(&*func.params);
                if let Some(id) = &func.id {
                    self.functions.push((id.name.as_str(), &*func.params));
                }
            }
            ExportDefaultDeclarationKind::ArrowFunctionExpression(arrow) => {
                self.default_params = Some(&*arrow.params);
            }
            ExportDefaultDeclarationKind::FunctionExpression(func) => {
                self.default_params = Some(&*func.params);
            }
            ExportDefaultDeclarationKind::Identifier(ident) => {
                self.default_binding = Some(ident.name.to_string());
            }
            // memo(Card), forwardRef((props, ref) => ...)
            ExportDefaultDeclarationKind::CallExpression(call) => {
                match call.arguments.first().and_then(|a| a.as_expression()) {
                    Some(Expression::Identifier(ident)) => {
                        self.default_binding = Some(ident.name.to_string());
                    }
                    Some(expr) => self.default_params = component_params(expr),
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn visit_declaration(&mut self, declaration: &'p Declaration<'a>, exported: bool) {
        match declaration {
            Declaration::FunctionDeclaration(func) => {
                if let Some(id) = &func.id {
                    if exported {
                        self.push_export(id.name.to_string());
                    }
                    self.functions.push((id.name.as_str(), &*func.params));
                }
            }
            Declaration::ClassDeclaration(class) => {
                if let Some(id) = &class.id
                    && exported
                {
                    self.push_export(id.name.to_string());
                }
            }
            Declaration::VariableDeclaration(vd) => {
                for decl in &vd.declarations {
                    let BindingPatternKind::BindingIdentifier(id) = &decl.id.kind else {
                        continue;
                    };
                    if exported {
                        self.push_export(id.name.to_string());
                    }
                    if let Some(params) = decl.init.as_ref().and_then(component_params) {
                        self.functions.push((id.name.as_str(), params));
                    }
                }
            }
            Declaration::TSInterfaceDeclaration(iface) => {
                self.shapes.push((iface.id.name.as_str(), &iface.body.body));
            }
            Declaration::TSTypeAliasDeclaration(alias) => {
                if let TSType::TSTypeLiteral(literal) = &alias.type_annotation {
                    self.shapes.push((alias.id.name.as_str(), &literal.members));
                }
            }
            _ => {}
        }
    }

    fn push_export(&mut self, name: String) {
        trace!("Found export: '{}'", name);
        if !self.named_exports.contains(&name) {
            self.named_exports.push(name);
        }
    }

    fn function_named(&self, name: &str) -> Option<&'p FormalParameters<'a>> {
        self.functions.iter().find(|(n, _)| *n == name).map(|(_, params)| *params)
    }

    fn shape_named(&self, name: &str) -> Option<Members<'p, 'a>> {
        self.shapes.iter().find(|(n, _)| *n == name).map(|(_, members)| *members)
    }

    /// Parameters of the component most likely to be rendered.
    fn primary_params(&self) -> Option<&'p FormalParameters<'a>> {
        if let Some(params) = self.default_params {
            return Some(params);
        }
        if let Some(binding) = &self.default_binding {
            return self.function_named(binding);
        }
        self.named_exports
            .iter()
            .filter(|name| name.starts_with(|c: char| c.is_ascii_uppercase()))
            .find_map(|name| self.function_named(name))
    }

    /// Members of the props type: the primary component's own annotation first,
    /// then the first `...Props` interface or type alias.
    fn props_members(&self) -> Option<Members<'p, 'a>> {
        let annotated = self
            .primary_params()
            .and_then(|params| params.items.first())
            .and_then(|param| param.pattern.type_annotation.as_ref())
            .and_then(|annotation| match &annotation.type_annotation {
                TSType::TSTypeLiteral(literal) => Some(&literal.members),
                TSType::TSTypeReference(reference) => match &reference.type_name {
                    TSTypeName::IdentifierReference(ident) => self.shape_named(ident.name.as_str()),
                    _ => None,
                },
                _ => None,
            });

        annotated.or_else(|| {
            self.shapes.iter().find(|(name, _)| name.ends_with("Props")).map(|(_, m)| *m)
        })
    }

    fn into_analysis(self) -> ComponentAnalysis {
        let mut required_props = Vec::new();
        let mut optional_props = Vec::new();

        if let Some(members) = self.props_members() {
            let mut seen = HashSet::new();
            for member in members.iter() {
                let (key, optional) = match member {
                    TSSignature::TSPropertySignature(prop) => (&prop.key, prop.optional),
                    TSSignature::TSMethodSignature(method) => (&method.key, method.optional),
                    _ => continue,
                };
                let Some(name) = property_key_name(key) else { continue };
                if !seen.insert(name.clone()) {
                    continue;
                }
                trace!("Prop '{}' optional={}", name, optional);
                if optional { optional_props.push(name) } else { required_props.push(name) }
            }
        }

        ComponentAnalysis {
            has_default_export: self.has_default_export,
            named_exports: self.named_exports,
            required_props,
            optional_props,
            imports: self.imports,
            parsed: true,
            ..Default::default()
        }
    }
}

fn component_params<'p, 'a>(expr: &'p Expression<'a>) -> Option<&'p FormalParameters<'a>> {
    match expr {
        Expression::ArrowFunctionExpression(arrow) => Some(&*arrow.params),
        Expression::FunctionExpression(func) => Some(&*func.params),
        Expression::ParenthesizedExpression(pe) => component_params(&pe.expression),
        // React.memo(...), forwardRef(...), styled wrappers around a function
        Expression::CallExpression(call) => {
            call.arguments.first().and_then(|a| a.as_expression()).and_then(component_params)
        }
        _ => None,
    }
}

fn property_key_name(key: &PropertyKey) -> Option<String> {
    match key {
        PropertyKey::StaticIdentifier(ident) => Some(ident.name.to_string()),
        PropertyKey::StringLiteral(lit) => Some(lit.value.to_string()),
        _ => None,
    }
}
