use log::{debug, trace, warn};
use std::{
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
};

use crate::error::PreviewError;

/// Prefix of the generated entry module names inside the output directory
pub const ENTRY_FILE_PREFIX: &str = ".oxipreview-entry-";
const ENTRY_FILE_SUFFIX: &str = ".jsx";

/// Generated entry module on disk, removed when the guard goes away.
#[derive(Debug)]
pub struct TempEntry {
    path: PathBuf,
    removed: bool,
}

impl TempEntry {
    /// Writes `source` under a fresh name in `dir`, so requests sharing an
    /// output directory never touch each other's entry.
    pub fn write(dir: &Path, source: &str) -> Result<Self, PreviewError> {
        let mut file = tempfile::Builder::new()
            .prefix(ENTRY_FILE_PREFIX)
            .suffix(ENTRY_FILE_SUFFIX)
            .tempfile_in(dir)
            .map_err(|source| PreviewError::WriteEntry {
                path: dir.join(ENTRY_FILE_PREFIX),
                source,
            })?;
        trace!("Writing entry module to {}", file.path().display());
        file.write_all(source.as_bytes()).map_err(|source| PreviewError::WriteEntry {
            path: file.path().to_path_buf(),
            source,
        })?;
        let (_, path) = file.keep().map_err(|err| PreviewError::WriteEntry {
            path: err.file.path().to_path_buf(),
            source: err.error,
        })?;
        Ok(Self { path, removed: false })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Removes the entry module, reporting failures instead of swallowing them.
    pub fn remove(mut self) -> Result<(), PreviewError> {
        self.removed = true;
        remove_if_present(&self.path)
            .map_err(|source| PreviewError::Cleanup { path: self.path.clone(), source })
    }
}

impl Drop for TempEntry {
    fn drop(&mut self) {
        if self.removed {
            return;
        }
        match remove_if_present(&self.path) {
            Ok(()) => debug!("Removed entry module {}", self.path.display()),
            Err(err) => warn!("Failed to remove entry module {}: {}", self.path.display(), err),
        }
    }
}

fn remove_if_present(path: &Path) -> io::Result<()> {
    match fs::remove_file(path) {
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
        other => other,
    }
}
