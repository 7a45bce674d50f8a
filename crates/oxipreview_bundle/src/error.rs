use std::{io, path::PathBuf};
use thiserror::Error;

/// Failures of a bundling request.
///
/// Render-time failures of the previewed component are not represented here:
/// they surface inside the generated page.
#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("Failed to read component {path}: {source}")]
    ReadComponent { path: PathBuf, source: io::Error },

    #[error("Failed to create output directory {path}: {source}")]
    CreateOutputDir { path: PathBuf, source: io::Error },

    #[error("Failed to write preview entry {path}: {source}")]
    WriteEntry { path: PathBuf, source: io::Error },

    #[error(
        "esbuild not found (searched {searched}).\n\
         Install it in the project with: npm install --save-dev esbuild"
    )]
    EsbuildNotFound { searched: String },

    #[error("Failed to run esbuild at {program}: {source}")]
    Spawn { program: PathBuf, source: io::Error },

    #[error("esbuild failed for {component} (working directory {working_dir}):\n{message}")]
    BundleFailed { component: PathBuf, working_dir: PathBuf, message: String },

    #[error("Failed to read esbuild output {path}: {source}")]
    BundleOutput { path: PathBuf, source: io::Error },

    #[error("esbuild produced no output for {component}")]
    EmptyBundle { component: PathBuf },

    #[error("Bundling of {component} was cancelled")]
    Cancelled { component: PathBuf },

    #[error("Failed to write preview {path}: {source}")]
    WriteArtifact { path: PathBuf, source: io::Error },

    #[error("Failed to remove preview entry {path}: {source}")]
    Cleanup { path: PathBuf, source: io::Error },
}

impl PreviewError {
    pub fn is_cancelled(&self) -> bool {
        matches!(self, PreviewError::Cancelled { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let err = PreviewError::BundleFailed {
            component: PathBuf::from("/p/components/Card.tsx"),
            working_dir: PathBuf::from("/p"),
            message: "Unexpected end of file".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "esbuild failed for /p/components/Card.tsx (working directory /p):\nUnexpected end of file"
        );

        let err = PreviewError::EsbuildNotFound { searched: "PATH".to_string() };
        assert!(err.to_string().contains("npm install --save-dev esbuild"));
    }

    #[test]
    fn cancelled_is_detectable() {
        let err = PreviewError::Cancelled { component: PathBuf::from("Card.tsx") };
        assert!(err.is_cancelled());
        let err = PreviewError::EmptyBundle { component: PathBuf::from("Card.tsx") };
        assert!(!err.is_cancelled());
    }
}
