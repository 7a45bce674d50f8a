use log::{debug, info, trace};
use oxipreview_core::{ComponentAnalysis, ROUTER_PACKAGES, find_package_dir};
use std::{fmt, path::Path, str::FromStr};

/// Providers that can be named without spelling out their module
const KNOWN_PROVIDERS: &[(&str, &str)] = &[
    ("MemoryRouter", "react-router-dom"),
    ("BrowserRouter", "react-router-dom"),
    ("HashRouter", "react-router-dom"),
];

/// A component wrapped around the preview, imported as `{ name }` from `module`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProviderSpec {
    pub name: String,
    pub module: String,
}

impl ProviderSpec {
    pub fn new(name: impl Into<String>, module: impl Into<String>) -> Self {
        Self { name: name.into(), module: module.into() }
    }

    /// Parses `Name=module`, or a bare well-known provider name.
    pub fn parse(input: &str) -> Result<Self, String> {
        let input = input.trim();
        let (name, module) = match input.split_once('=') {
            Some((name, module)) => (name.trim(), module.trim().to_string()),
            None => {
                let module = KNOWN_PROVIDERS
                    .iter()
                    .find(|(known, _)| *known == input)
                    .map(|(_, module)| module.to_string())
                    .ok_or_else(|| {
                        format!("unknown provider '{}', use Name=module to say where it comes from", input)
                    })?;
                (input, module)
            }
        };

        if !is_identifier(name) {
            return Err(format!("provider name '{}' is not a valid identifier", name));
        }
        if module.is_empty() {
            return Err(format!("provider '{}' has an empty module", name));
        }
        Ok(Self::new(name, module))
    }

    pub fn is_router(&self) -> bool {
        self.name.ends_with("Router")
    }
}

impl FromStr for ProviderSpec {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for ProviderSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} from '{}'", self.name, self.module)
    }
}

/// Final provider list for a request: the requested ones, plus a memory router
/// when the component uses an installed react-router and none was requested.
pub fn resolve_providers(
    requested: &[ProviderSpec],
    analysis: &ComponentAnalysis,
    working_dir: &Path,
) -> Vec<ProviderSpec> {
    let mut providers = requested.to_vec();

    if analysis.uses_router && !requested.iter().any(ProviderSpec::is_router) {
        let installed = ROUTER_PACKAGES.iter().find(|pkg| {
            let found = analysis.imports_package(pkg) && find_package_dir(working_dir, pkg).is_some();
            trace!("Router package '{}' usable: {}", pkg, found);
            found
        });
        match installed {
            Some(pkg) => {
                info!("Component uses {}, wrapping it in a MemoryRouter", pkg);
                providers.push(ProviderSpec::new("MemoryRouter", *pkg));
            }
            None => debug!("Router usage detected but no installed react-router is imported"),
        }
    }

    if analysis.uses_theme && providers.is_empty() {
        debug!("Theme usage detected; pass a provider explicitly to wrap the component");
    }

    providers
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
