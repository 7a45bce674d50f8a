use clap::Parser;
use log::{debug, trace};
use oxipreview_core::locate_working_directory;
use serde_json::{Map, Value};
use std::{
    env,
    path::{Path, PathBuf},
};

use crate::{
    pipeline::BundleSettings, providers::ProviderSpec, types::BundleRequest, wrapper::ExportOrder,
};

/// Directory under the project root that receives previews by default
pub const DEFAULT_PREVIEW_DIR: &str = ".oxipreview";

#[derive(Debug, Clone, Parser)]
#[command(name = "bundle")]
#[command(about = "Bundle a React component into a standalone HTML preview")]
pub struct Config {
    /// Component file to preview
    pub component: PathBuf,

    /// Output directory (defaults to .oxipreview/<name> in the project root)
    #[arg(long)]
    pub out_dir: Option<PathBuf>,

    /// Display name of the component (defaults to the file name)
    #[arg(long)]
    pub name: Option<String>,

    /// Example props as a JSON object, used instead of inferred ones
    #[arg(long, value_parser = parse_props)]
    pub props: Option<Map<String, Value>>,

    /// Provider to wrap the component in, as Name=module or a known router name.
    /// Repeat to nest; the first one is outermost
    #[arg(long = "provider")]
    pub providers: Vec<ProviderSpec>,

    /// Named export to render
    #[arg(long)]
    pub export: Option<String>,

    /// How to pick among several capitalized named exports
    #[arg(long, value_enum, default_value_t = ExportOrder::Declaration)]
    pub export_order: ExportOrder,

    /// Path to the esbuild executable
    #[arg(long)]
    pub esbuild: Option<PathBuf>,

    /// Extra directory whose node_modules is searched (defaults to the executable's directory)
    #[arg(long)]
    pub tool_dir: Option<PathBuf>,

    /// Leave the status overlay out of the page
    #[arg(long)]
    pub no_status_overlay: bool,
}

impl Config {
    pub fn to_request(&self) -> BundleRequest {
        let mut request = BundleRequest::new(&self.component, PathBuf::new());
        if let Some(name) = &self.name {
            request.component_name = name.clone();
        }
        request.output_directory = match &self.out_dir {
            Some(dir) => dir.clone(),
            None => locate_working_directory(&self.component)
                .dir
                .join(DEFAULT_PREVIEW_DIR)
                .join(&request.component_name),
        };
        debug!("Preview output directory: {}", request.output_directory.display());
        request.props_example = self.props.clone();
        request.wrap_providers = self.providers.clone();
        request.export_hint = self.export.clone();
        request
    }

    pub fn settings(&self) -> BundleSettings {
        BundleSettings {
            export_order: self.export_order,
            esbuild: self.esbuild.clone(),
            tool_dir: self.tool_dir.clone().or_else(executable_dir),
            status_overlay: !self.no_status_overlay,
            bundler: None,
        }
    }
}

fn executable_dir() -> Option<PathBuf> {
    let exe = env::current_exe().ok()?;
    let dir = exe.parent().map(Path::to_path_buf);
    trace!("Executable directory: {:?}", dir);
    dir
}

fn parse_props(input: &str) -> Result<Map<String, Value>, String> {
    match serde_json::from_str::<Value>(input) {
        Ok(Value::Object(props)) => Ok(props),
        Ok(other) => Err(format!("props must be a JSON object, got {}", other)),
        Err(err) => Err(format!("invalid JSON: {}", err)),
    }
}
