use log::{debug, trace, warn};
use oxipreview_core::{NODE_MODULES, find_local_bin};
use std::{
    env,
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
    process::{Command, Stdio},
    thread,
    time::Duration,
};
use which::which;

use crate::{cancel::CancelFlag, error::PreviewError};

/// Extensions inlined into the bundle as data URLs
const DATAURL_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "svg", "webp", "ico", "bmp", "avif", "woff", "woff2", "ttf",
    "otf", "eot",
];

const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// In-memory result of one esbuild run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BundleOutputs {
    pub javascript: String,
    /// None when esbuild emitted no separate stylesheet
    pub css: Option<String>,
}

/// esbuild CLI driven as a child process.
#[derive(Debug, Clone)]
pub struct EsbuildBundler {
    program: PathBuf,
    leading_args: Vec<OsString>,
}

impl EsbuildBundler {
    /// Finds esbuild: the explicit path, then the project's and the tool
    /// directory's `node_modules/.bin`, then `PATH`.
    pub fn locate(
        explicit: Option<&Path>,
        working_dir: &Path,
        tool_dir: Option<&Path>,
    ) -> Result<Self, PreviewError> {
        if let Some(path) = explicit {
            if path.is_file() {
                debug!("Using esbuild at {}", path.display());
                return Ok(Self::with_command(path, Vec::<OsString>::new()));
            }
            return Err(PreviewError::EsbuildNotFound { searched: path.display().to_string() });
        }

        let mut searched = Vec::new();
        for dir in std::iter::once(working_dir).chain(tool_dir) {
            if let Some(bin) = find_local_bin(dir, "esbuild") {
                debug!("Using esbuild at {}", bin.display());
                return Ok(Self::with_command(bin, Vec::<OsString>::new()));
            }
            searched.push(dir.join(NODE_MODULES).join(".bin").display().to_string());
        }

        match which("esbuild") {
            Ok(bin) => {
                debug!("Using esbuild from PATH at {}", bin.display());
                Ok(Self::with_command(bin, Vec::<OsString>::new()))
            }
            Err(err) => {
                trace!("esbuild not on PATH: {}", err);
                searched.push("PATH".to_string());
                Err(PreviewError::EsbuildNotFound { searched: searched.join(", ") })
            }
        }
    }

    /// Runs `program` with `leading_args` placed before the esbuild arguments.
    pub fn with_command<I, S>(program: impl Into<PathBuf>, leading_args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<OsString>,
    {
        Self {
            program: program.into(),
            leading_args: leading_args.into_iter().map(Into::into).collect(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    /// Bundles `entry` with `working_dir` as the child's directory.
    ///
    /// Output files go to a scratch directory and are read back into memory.
    /// `cancel` is checked before spawning and polled while esbuild runs; a
    /// cancelled run kills the child.
    pub fn run(
        &self,
        entry: &Path,
        working_dir: &Path,
        tool_dir: Option<&Path>,
        component: &Path,
        cancel: &CancelFlag,
    ) -> Result<BundleOutputs, PreviewError> {
        let cancelled = || PreviewError::Cancelled { component: component.to_path_buf() };
        if cancel.is_cancelled() {
            debug!("Cancelled before esbuild started");
            return Err(cancelled());
        }

        let scratch = tempfile::Builder::new()
            .prefix("oxipreview-")
            .tempdir()
            .map_err(|source| PreviewError::BundleOutput { path: env::temp_dir(), source })?;
        let outdir = scratch.path().join("out");
        let log_path = scratch.path().join("esbuild.log");
        let log = File::create(&log_path)
            .map_err(|source| PreviewError::BundleOutput { path: log_path.clone(), source })?;

        let mut command = Command::new(&self.program);
        command
            .args(&self.leading_args)
            .args(esbuild_arguments(entry, &outdir))
            .current_dir(working_dir)
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::from(log));
        match env::join_paths(module_search_dirs(working_dir, tool_dir)) {
            Ok(node_path) => {
                command.env("NODE_PATH", node_path);
            }
            Err(err) => warn!("Could not build NODE_PATH: {}", err),
        }

        debug!("Running {:?} in {}", command, working_dir.display());
        let spawn_error =
            |source: io::Error| PreviewError::Spawn { program: self.program.clone(), source };
        let mut child = command.spawn().map_err(spawn_error)?;

        let status = loop {
            if cancel.is_cancelled() {
                debug!("Cancelling esbuild (pid {})", child.id());
                if let Err(err) = child.kill() {
                    trace!("Failed to kill esbuild: {}", err);
                }
                if let Err(err) = child.wait() {
                    trace!("Failed to reap esbuild: {}", err);
                }
                return Err(cancelled());
            }
            match child.try_wait().map_err(spawn_error)? {
                Some(status) => break status,
                None => thread::sleep(POLL_INTERVAL),
            }
        };

        if !status.success() {
            let log = fs::read_to_string(&log_path).unwrap_or_default();
            let message = match log.trim() {
                "" => format!("esbuild exited with {}", status),
                trimmed => trimmed.to_string(),
            };
            return Err(PreviewError::BundleFailed {
                component: component.to_path_buf(),
                working_dir: working_dir.to_path_buf(),
                message,
            });
        }

        collect_outputs(&outdir, component)
    }
}

fn esbuild_arguments(entry: &Path, outdir: &Path) -> Vec<OsString> {
    let mut args: Vec<OsString> = vec![entry.as_os_str().to_owned()];
    args.extend(
        [
            "--bundle",
            "--platform=browser",
            "--format=iife",
            "--jsx=automatic",
            "--target=es2020",
            "--log-level=error",
            "--color=false",
            "--entry-names=bundle",
            "--loader:.js=jsx",
            "--loader:.css=css",
            "--define:process.env.NODE_ENV=\"development\"",
            "--define:global=globalThis",
        ]
        .map(OsString::from),
    );
    args.extend(
        DATAURL_EXTENSIONS.iter().map(|ext| OsString::from(format!("--loader:.{ext}=dataurl"))),
    );

    let mut outdir_arg = OsString::from("--outdir=");
    outdir_arg.push(outdir);
    args.push(outdir_arg);
    args
}

/// `node_modules` directories searched for bare imports, project first
fn module_search_dirs(working_dir: &Path, tool_dir: Option<&Path>) -> Vec<PathBuf> {
    std::iter::once(working_dir).chain(tool_dir).map(|dir| dir.join(NODE_MODULES)).collect()
}

/// Reads esbuild's output files and sorts them into script and stylesheet.
fn collect_outputs(outdir: &Path, component: &Path) -> Result<BundleOutputs, PreviewError> {
    let empty = || PreviewError::EmptyBundle { component: component.to_path_buf() };

    let mut files: Vec<PathBuf> = match fs::read_dir(outdir) {
        Ok(entries) => entries
            .filter_map(|e| e.ok())
            .map(|e| e.path())
            .filter(|p| p.is_file())
            .collect(),
        Err(err) => {
            debug!("No esbuild output directory at {}: {}", outdir.display(), err);
            return Err(empty());
        }
    };
    files.sort();
    trace!("esbuild outputs: {:?}", files);

    let by_extension =
        |ext: &str| files.iter().find(|p| p.extension().and_then(|e| e.to_str()) == Some(ext));

    let javascript_file = match by_extension("js") {
        Some(path) => path,
        None => {
            let first = files.first().ok_or_else(empty)?;
            warn!("esbuild emitted no .js output, using {}", first.display());
            first
        }
    };
    let javascript = fs::read(javascript_file).map_err(output_error(javascript_file))?;

    let css = match by_extension("css") {
        Some(path) if path != javascript_file => {
            Some(fs::read(path).map_err(output_error(path))?)
        }
        _ => {
            debug!("No separate CSS output; styles stay inlined in the script");
            None
        }
    };

    Ok(BundleOutputs {
        javascript: String::from_utf8_lossy(&javascript).into_owned(),
        css: css.map(|bytes| String::from_utf8_lossy(&bytes).into_owned()),
    })
}

fn output_error(path: &Path) -> impl FnOnce(io::Error) -> PreviewError + use<> {
    let path = path.to_path_buf();
    move |source| PreviewError::BundleOutput { path, source }
}
