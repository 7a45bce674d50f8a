use anyhow::{Context, Result, anyhow};
use clap::Parser;
use log::{debug, info, warn};
use oxipreview_core::find_manifest_dir;
use std::{env, path::PathBuf};

#[derive(Debug, Clone, Parser)]
#[command(name = "discover")]
#[command(about = "Find previewable React components in a project")]
pub struct Config {
    /// Root directory of the project (defaults to the nearest package.json above the current directory)
    #[arg(long)]
    pub root: Option<PathBuf>,

    /// Only keep components whose project-relative path contains this text
    #[arg(long)]
    pub include: Option<String>,

    /// Print the result as JSON
    #[arg(long)]
    pub json: bool,
}

impl Config {
    /// Resolves the root directory
    pub fn initialize(&mut self) -> Result<()> {
        let root = if let Some(r) = self.root.take() {
            debug!("Using provided root directory: {:?}", r);
            if !r.is_dir() {
                return Err(anyhow!("Root directory {} does not exist", r.display()));
            }
            r.canonicalize().unwrap_or(r)
        } else {
            let cwd = env::current_dir().context("Failed to read the current directory")?;
            debug!("No root provided, searching for package.json from {:?}", cwd);
            find_manifest_dir(&cwd).unwrap_or_else(|| {
                warn!("No package.json above {}, using it as the root", cwd.display());
                cwd
            })
        };
        info!("Using root directory: {}", root.display());
        self.root = Some(root);
        Ok(())
    }

    /// Get the root directory, returning an error if not initialized
    pub fn root(&self) -> Result<&PathBuf> {
        self.root
            .as_ref()
            .ok_or_else(|| anyhow!("Config not initialized - call initialize() first"))
    }
}
