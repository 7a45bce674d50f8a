//! Core utilities for oxipreview tools.
//!
//! This crate provides the bundler-independent half of component previews:
//! - Locating the project root a component resolves its dependencies from
//! - Analyzing a component's exports, props and library usage
//! - Detecting the project's framework from its manifest
//! - Finding installed packages and building import specifiers
//! - Collecting component files from a project

mod analyzer;
mod collector;
mod constants;
mod locator;
mod manifest;
mod packages;
mod paths;
mod textual;
mod types;

// Re-export public API
pub use analyzer::{analyze_component, analyze_file, analyze_source, source_type_for};
pub use collector::{CollectorConfig, collect_components, component_display_name};
pub use constants::{COMPONENT_EXTENSIONS, MANIFEST_FILE, NODE_MODULES, ROUTER_PACKAGES};
pub use locator::{find_manifest_dir, locate_working_directory};
pub use manifest::detect_project_flavor;
pub use packages::{find_local_bin, find_package_dir};
pub use paths::{import_specifier, make_relative};
pub use types::{ComponentAnalysis, Framework, ProjectFlavor, ProjectRoot};
