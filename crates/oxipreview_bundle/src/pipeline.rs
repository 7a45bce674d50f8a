use log::{debug, info, warn};
use oxipreview_core::{
    analyze_source, detect_project_flavor, locate_working_directory, source_type_for,
};
use std::{fs, io, path::PathBuf};

use crate::{
    cancel::CancelFlag,
    entry::TempEntry,
    error::PreviewError,
    esbuild::EsbuildBundler,
    html::{HtmlParts, StatusOverlay, assemble_html},
    providers::resolve_providers,
    styles::discover_global_styles,
    types::{BundleArtifact, BundleRequest},
    wrapper::{ExportOrder, synthesize_wrapper},
};

/// Pipeline options that are not part of a request.
#[derive(Debug, Clone)]
pub struct BundleSettings {
    pub export_order: ExportOrder,
    /// Explicit esbuild executable
    pub esbuild: Option<PathBuf>,
    /// Secondary root for `node_modules` lookups
    pub tool_dir: Option<PathBuf>,
    pub status_overlay: bool,
    /// Ready-made bundler used instead of locating esbuild
    pub bundler: Option<EsbuildBundler>,
}

impl Default for BundleSettings {
    fn default() -> Self {
        Self {
            export_order: ExportOrder::default(),
            esbuild: None,
            tool_dir: None,
            status_overlay: true,
            bundler: None,
        }
    }
}

/// Turns a component file into `index.html` inside the request's output directory.
///
/// Stages run in order: locate, analyze, synthesize, bundle, assemble, write,
/// clean up. The generated entry module is gone when this returns, whatever
/// the outcome, and the process working directory is never changed.
pub fn bundle_component(
    request: &BundleRequest,
    settings: &BundleSettings,
    cancel: &CancelFlag,
) -> Result<BundleArtifact, PreviewError> {
    let read_error = |source: io::Error| PreviewError::ReadComponent {
        path: request.component_path.clone(),
        source,
    };
    let component_path = request.component_path.canonicalize().map_err(read_error)?;
    let source = fs::read_to_string(&component_path).map_err(read_error)?;
    debug!("Bundling {} ({} bytes)", component_path.display(), source.len());

    let root = locate_working_directory(&component_path);
    if let Some(manifest) = &root.manifest {
        let flavor = detect_project_flavor(manifest);
        debug!(
            "Project flavor: {:?}, react {:?}, tailwind {}",
            flavor.framework, flavor.react_version, flavor.uses_tailwind
        );
    }

    let analysis = analyze_source(&source, source_type_for(&component_path));
    let providers = resolve_providers(&request.wrap_providers, &analysis, &root.dir);

    fs::create_dir_all(&request.output_directory).map_err(|source| {
        PreviewError::CreateOutputDir { path: request.output_directory.clone(), source }
    })?;
    let output_dir = request
        .output_directory
        .canonicalize()
        .unwrap_or_else(|_| request.output_directory.clone());

    let wrapper = synthesize_wrapper(
        request,
        &component_path,
        &analysis,
        settings.export_order,
        &providers,
        &output_dir,
    );
    let bundler = match &settings.bundler {
        Some(bundler) => bundler.clone(),
        None => EsbuildBundler::locate(
            settings.esbuild.as_deref(),
            &root.dir,
            settings.tool_dir.as_deref(),
        )?,
    };

    let entry = TempEntry::write(&output_dir, &wrapper.source)?;
    let outputs = match bundler.run(
        entry.path(),
        &root.dir,
        settings.tool_dir.as_deref(),
        &component_path,
        cancel,
    ) {
        Ok(outputs) => outputs,
        Err(err) => {
            if let Err(cleanup) = entry.remove() {
                warn!("{}", cleanup);
            }
            return Err(err);
        }
    };

    let styles = discover_global_styles(&root.dir, &component_path);
    let status = settings.status_overlay.then(|| StatusOverlay {
        component_name: request.component_name.clone(),
        import_form: wrapper.import_form.to_string(),
        bundle_bytes: outputs.javascript.len(),
        global_stylesheets: styles.files.len(),
    });
    let html = assemble_html(&HtmlParts {
        title: &request.component_name,
        javascript: &outputs.javascript,
        css: outputs.css.as_deref(),
        global_styles: &styles.css,
        status,
    });

    let output_path = output_dir.join("index.html");
    fs::write(&output_path, &html)
        .map_err(|source| PreviewError::WriteArtifact { path: output_path.clone(), source })?;
    entry.remove()?;

    info!("Wrote preview of {} to {}", request.component_name, output_path.display());
    Ok(BundleArtifact {
        javascript: outputs.javascript,
        css: outputs.css,
        global_styles: styles.css,
        global_style_files: styles.files,
        html,
        output_path,
        working_dir: root.dir,
        import_form: wrapper.import_form,
        analysis,
    })
}
