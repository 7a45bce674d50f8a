use colored::Colorize;
use log::debug;
use oxipreview_core::{ComponentAnalysis, Framework};
use std::io::{self, Write};

use crate::types::{DiscoveredComponent, DiscoveryResult};

fn framework_label(framework: Framework) -> &'static str {
    match framework {
        Framework::Next => "Next.js",
        Framework::Vite => "Vite",
        Framework::CreateReactApp => "Create React App",
        Framework::Remix => "Remix",
        Framework::Gatsby => "Gatsby",
        Framework::Unknown => "unknown framework",
    }
}

fn list_or_none(items: &[String]) -> String {
    if items.is_empty() { "none".dimmed().to_string() } else { items.join(", ") }
}

/// Router, theme and context usage as one line, None when nothing is used
fn usage_line(analysis: &ComponentAnalysis) -> Option<String> {
    let mut parts = Vec::new();
    if analysis.uses_router {
        parts.push("router".to_string());
    }
    if analysis.uses_theme {
        parts.push("theme".to_string());
    }
    if !analysis.context_names.is_empty() {
        let names: Vec<&str> = analysis.context_names.iter().map(String::as_str).collect();
        parts.push(format!("contexts: {}", names.join(", ")));
    }
    if parts.is_empty() { None } else { Some(parts.join(", ")) }
}

/// Detail lines shared by the discovery tree and the single-file report
fn analysis_lines(import_form: &str, analysis: &ComponentAnalysis) -> Vec<(String, String)> {
    let mut lines = vec![
        ("export".to_string(), import_form.to_string()),
        ("required".to_string(), list_or_none(&analysis.required_props)),
        ("optional".to_string(), list_or_none(&analysis.optional_props)),
    ];
    if let Some(usage) = usage_line(analysis) {
        lines.push(("uses".to_string(), usage));
    }
    if !analysis.hooks.is_empty() {
        let hooks: Vec<&str> = analysis.hooks.iter().map(String::as_str).collect();
        lines.push(("hooks".to_string(), hooks.join(", ")));
    }
    if !analysis.parsed {
        lines.push(("note".to_string(), "not parsed, fields were guessed".yellow().to_string()));
    }
    lines
}

fn write_tree_lines<W: Write>(writer: &mut W, lines: &[(String, String)]) -> io::Result<()> {
    for (idx, (label, value)) in lines.iter().enumerate() {
        let prefix = if idx == lines.len() - 1 { "└──" } else { "├──" };
        writeln!(writer, "{} {:<9} {}", prefix.dimmed(), label, value)?;
    }
    Ok(())
}

pub fn print_no_components_message<W: Write>(
    writer: &mut W,
    result: &DiscoveryResult,
) -> io::Result<()> {
    debug!("No components found");
    writeln!(
        writer,
        "{} No components found under {}",
        "⚠".yellow().bold(),
        result.root.display()
    )?;
    writer.flush()?;
    Ok(())
}

pub fn print_discovery_tree<W: Write>(writer: &mut W, result: &DiscoveryResult) -> io::Result<()> {
    debug!("Printing discovery tree for {} components", result.components.len());
    let flavor = match &result.flavor {
        Some(flavor) => match &flavor.react_version {
            Some(version) => format!("{}, react {}", framework_label(flavor.framework), version),
            None => framework_label(flavor.framework).to_string(),
        },
        None => "no package.json".to_string(),
    };
    writeln!(
        writer,
        "{} {} components in {} ({})\n",
        "●".bright_blue(),
        result.components.len().to_string().cyan(),
        result.root.display(),
        flavor
    )?;

    for component in &result.components {
        print_component(writer, component)?;
        writeln!(writer)?;
    }
    writer.flush()?;
    Ok(())
}

fn print_component<W: Write>(writer: &mut W, component: &DiscoveredComponent) -> io::Result<()> {
    writeln!(writer, "{}  {}", component.path.blue(), component.name.bright_white().bold())?;
    write_tree_lines(writer, &analysis_lines(&component.import_form, &component.analysis))
}

/// Prints the analysis of a single file.
pub fn print_analysis<W: Write>(
    writer: &mut W,
    path: &str,
    import_form: &str,
    analysis: &ComponentAnalysis,
) -> io::Result<()> {
    writeln!(writer, "{}", path.blue())?;
    write_tree_lines(writer, &analysis_lines(import_form, analysis))?;
    writer.flush()?;
    Ok(())
}

pub fn print_json<W: Write, T: serde::Serialize>(writer: &mut W, value: &T) -> io::Result<()> {
    serde_json::to_writer_pretty(&mut *writer, value)?;
    writeln!(writer)?;
    writer.flush()?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::{collections::BTreeSet, path::PathBuf};

    fn sample() -> DiscoveryResult {
        DiscoveryResult {
            root: PathBuf::from("/p"),
            flavor: None,
            components: vec![DiscoveredComponent {
                path: "src/Card.tsx".to_string(),
                name: "Card".to_string(),
                import_form: "default export".to_string(),
                analysis: ComponentAnalysis {
                    required_props: vec!["title".to_string()],
                    uses_router: true,
                    context_names: BTreeSet::from(["AuthContext".to_string()]),
                    parsed: true,
                    ..Default::default()
                },
            }],
            files_analyzed: 1,
        }
    }

    #[test]
    fn test_tree_output() {
        colored::control::set_override(false);
        let mut out = Vec::new();
        print_discovery_tree(&mut out, &sample()).unwrap();
        let text = String::from_utf8(out).unwrap();

        assert!(text.contains("1 components in /p (no package.json)"));
        assert!(text.contains("src/Card.tsx  Card"));
        assert!(text.contains("├── export    default export"));
        assert!(text.contains("├── required  title"));
        assert!(text.contains("├── optional  none"));
        assert!(text.contains("└── uses      router, contexts: AuthContext"));
    }

    #[test]
    fn test_json_output() {
        let mut out = Vec::new();
        print_json(&mut out, &sample()).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&out).unwrap();
        assert_eq!(value["components"][0]["name"], "Card");
        assert_eq!(value["components"][0]["analysis"]["required_props"][0], "title");
        assert_eq!(value["flavor"], serde_json::Value::Null);
    }
}
