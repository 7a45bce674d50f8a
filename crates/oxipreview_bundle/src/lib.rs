//! Component preview bundling.
//!
//! Generates an entry module for a component, bundles it with esbuild and
//! writes a self-contained `index.html` preview.

mod cancel;
mod config;
mod entry;
mod error;
mod esbuild;
mod html;
mod pipeline;
mod props;
mod providers;
mod reporter;
mod styles;
mod types;
mod wrapper;

// Re-export public API
pub use cancel::CancelFlag;
pub use config::{Config, DEFAULT_PREVIEW_DIR};
pub use entry::ENTRY_FILE_PREFIX;
pub use error::PreviewError;
pub use esbuild::{BundleOutputs, EsbuildBundler};
pub use html::{BASELINE_STYLES, HtmlParts, StatusOverlay, assemble_html, format_bytes};
pub use pipeline::{BundleSettings, bundle_component};
pub use props::example_props_source;
pub use providers::{ProviderSpec, resolve_providers};
pub use reporter::print_bundle_summary;
pub use styles::{GlobalStyles, discover_global_styles};
pub use types::{BundleArtifact, BundleRequest, ImportForm};
pub use wrapper::{ExportOrder, ExportSelection, WrapperSource, choose_import, synthesize_wrapper};
