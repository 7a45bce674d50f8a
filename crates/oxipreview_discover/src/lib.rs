//! Component discovery for React projects.
//!
//! Walks a project, analyzes every file that looks like a component and
//! reports how each one would be previewed.

mod checker;
mod config;
mod reporter;
mod types;

// Re-export public API
pub use checker::run_discovery;
pub use config::Config;
pub use reporter::{print_analysis, print_discovery_tree, print_json, print_no_components_message};
pub use types::{DiscoveredComponent, DiscoveryResult};
