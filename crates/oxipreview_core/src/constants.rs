//! Constants for file names and extensions shared across the preview tools.

/// File whose presence marks a directory as a dependency-resolution root
pub const MANIFEST_FILE: &str = "package.json";

/// Directory that holds installed packages under a project root
pub const NODE_MODULES: &str = "node_modules";

/// Extensions of files that may contain a renderable component
pub const COMPONENT_EXTENSIONS: &[&str] = &[
    "tsx", // TypeScript with JSX
    "jsx", // JavaScript with JSX
    "ts",  // TypeScript
    "js",  // JavaScript
];

/// Name fragments that mark a file as test or documentation scaffolding
pub const SKIPPED_FILE_MARKERS: &[&str] = &[".test.", ".spec.", ".stories.", ".story.", ".d.ts"];

/// Packages that provide the router context used by auto-wrapping
pub const ROUTER_PACKAGES: &[&str] = &["react-router-dom", "react-router"];
