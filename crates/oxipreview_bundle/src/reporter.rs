use colored::Colorize;
use log::debug;
use oxipreview_core::make_relative;
use std::{
    env,
    io::{self, Write},
    path::Path,
    time::Duration,
};

use crate::{html::format_bytes, types::BundleArtifact};

/// Shows `path` relative to the current directory when possible
fn display_path(path: &Path) -> String {
    env::current_dir()
        .ok()
        .and_then(|cwd| make_relative(path, &cwd))
        .unwrap_or_else(|| path.to_path_buf())
        .display()
        .to_string()
}

pub fn print_bundle_summary<W: Write>(
    writer: &mut W,
    name: &str,
    artifact: &BundleArtifact,
    elapsed: Duration,
) -> io::Result<()> {
    debug!("Printing bundle summary for {}", name);
    writeln!(
        writer,
        "{} Preview of {} written to {}",
        "✓".green().bold(),
        name.bright_white().bold(),
        display_path(&artifact.output_path).blue()
    )?;
    writeln!(writer, "  {:<12} {}", "import".dimmed(), artifact.import_form)?;
    writeln!(writer, "  {:<12} {}", "project".dimmed(), display_path(&artifact.working_dir))?;
    writeln!(writer, "  {:<12} {}", "javascript".dimmed(), format_bytes(artifact.javascript.len()))?;

    let css = match &artifact.css {
        Some(css) => format_bytes(css.len()),
        None => "inlined in javascript".to_string(),
    };
    writeln!(writer, "  {:<12} {}", "css".dimmed(), css)?;

    let sheets = artifact.global_style_files.len();
    if sheets > 0 {
        writeln!(
            writer,
            "  {:<12} {} ({} stylesheet{})",
            "global css".dimmed(),
            format_bytes(artifact.global_styles.len()),
            sheets,
            if sheets == 1 { "" } else { "s" }
        )?;
    }
    if !artifact.analysis.parsed {
        writeln!(
            writer,
            "  {} component could not be parsed, exports and props were guessed",
            "⚠".yellow().bold()
        )?;
    }
    writeln!(writer, "  {:<12} {} ms", "elapsed".dimmed(), elapsed.as_millis())?;
    writer.flush()?;
    Ok(())
}
