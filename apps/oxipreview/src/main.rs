use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use log::{debug, info};
use oxipreview_bundle::{CancelFlag, ExportSelection, bundle_component, choose_import};
use oxipreview_core::analyze_file;
use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::time::Instant;

#[derive(Parser)]
#[command(name = "oxipreview")]
#[command(about = "Standalone HTML previews for React components", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Bundle a component into a standalone HTML preview
    Bundle(oxipreview_bundle::Config),
    /// Print the exports, props and library usage of a component
    Analyze(AnalyzeArgs),
    /// Find previewable components in a project
    Discover(oxipreview_discover::Config),
}

#[derive(Debug, Args)]
struct AnalyzeArgs {
    /// Component file to analyze
    path: PathBuf,

    /// Print the analysis as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::init();

    // stdio is blocked by LineWriter, use a BufWriter to reduce syscalls.
    // See https://github.com/rust-lang/rust/issues/60673
    let mut stdout = BufWriter::new(std::io::stdout());

    let cli = Cli::parse();
    debug!("Parsed CLI arguments: {:?}", cli.command);

    let start = Instant::now();

    match cli.command {
        Commands::Bundle(cfg) => {
            let request = cfg.to_request();
            let settings = cfg.settings();
            info!(
                "Bundling {} into {}",
                request.component_name,
                request.output_directory.display()
            );
            debug!("Settings: {:?}", settings);

            let artifact =
                bundle_component(&request, &settings, &CancelFlag::new()).with_context(|| {
                    format!("Failed to preview {}", request.component_path.display())
                })?;
            oxipreview_bundle::print_bundle_summary(
                &mut stdout,
                &request.component_name,
                &artifact,
                start.elapsed(),
            )?;
            Ok(())
        }
        Commands::Analyze(args) => {
            let analysis = analyze_file(&args.path)?;
            if args.json {
                oxipreview_discover::print_json(&mut stdout, &analysis)?;
            } else {
                let import_form = choose_import(&analysis, &ExportSelection::default());
                oxipreview_discover::print_analysis(
                    &mut stdout,
                    &args.path.display().to_string(),
                    &import_form.to_string(),
                    &analysis,
                )?;
            }
            Ok(())
        }
        Commands::Discover(cfg) => {
            let num_threads = rayon::current_num_threads();
            info!("Running component discovery (using {} threads)", num_threads);
            debug!("Config: root={:?}, include={:?}", cfg.root, cfg.include);

            let json = cfg.json;
            let result = oxipreview_discover::run_discovery(cfg)?;

            if json {
                oxipreview_discover::print_json(&mut stdout, &result)?;
                return Ok(());
            }

            if result.components.is_empty() {
                oxipreview_discover::print_no_components_message(&mut stdout, &result)?;
            } else {
                oxipreview_discover::print_discovery_tree(&mut stdout, &result)?;
            }
            writeln!(
                stdout,
                "{} Finished in {}ms on {} files (using {} threads).",
                "●".bright_blue(),
                start.elapsed().as_millis().to_string().cyan(),
                result.files_analyzed.to_string().cyan(),
                num_threads.to_string().cyan()
            )?;
            stdout.flush()?;
            Ok(())
        }
    }
}
