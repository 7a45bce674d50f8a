use log::trace;
use path_clean::clean;
use std::path::{Component, Path, PathBuf};

/// Create a relative path from `base` to `target`
pub fn make_relative(target: &Path, base: &Path) -> Option<PathBuf> {
    let mut target_components = target.components();
    let mut base_components = base.components();

    let mut common_prefix_len = 0;
    let mut target_parts = Vec::new();
    let mut base_parts = Vec::new();

    // Find common prefix
    loop {
        match (target_components.next(), base_components.next()) {
            (Some(t), Some(b)) if t == b => {
                common_prefix_len += 1;
            }
            (Some(t), Some(b)) => {
                target_parts.push(t);
                base_parts.push(b);
                break;
            }
            (Some(t), None) => {
                target_parts.push(t);
                break;
            }
            (None, Some(b)) => {
                base_parts.push(b);
                break;
            }
            (None, None) => {
                return Some(PathBuf::from("."));
            }
        }
    }

    target_parts.extend(target_components);
    base_parts.extend(base_components);

    // Different roots or drive prefixes cannot be bridged
    if common_prefix_len == 0 && target.components().next() != base.components().next() {
        return None;
    }

    let mut result = PathBuf::new();
    for _ in &base_parts {
        result.push("..");
    }
    for component in target_parts {
        match component {
            Component::Normal(p) => result.push(p),
            Component::CurDir => {}
            Component::ParentDir => result.push(".."),
            Component::RootDir | Component::Prefix(_) => {}
        }
    }

    if result.as_os_str().is_empty() { Some(PathBuf::from(".")) } else { Some(result) }
}

/// Builds the module specifier that imports `target` from a module living in `from_dir`.
///
/// Separators are always forward slashes and relative specifiers always start
/// with `./` or `../`, whatever the host OS. When no relative path exists
/// (different drives) the cleaned absolute path is used.
pub fn import_specifier(from_dir: &Path, target: &Path) -> String {
    let target = PathBuf::from(clean(target.to_string_lossy().to_string()));
    let from_dir = PathBuf::from(clean(from_dir.to_string_lossy().to_string()));

    let spec = match make_relative(&target, &from_dir) {
        Some(rel) => {
            let rel = to_forward_slashes(&rel);
            if rel.starts_with("../") || rel == ".." { rel } else { format!("./{rel}") }
        }
        None => to_forward_slashes(&target),
    };
    trace!("Import specifier for {:?} from {:?}: {}", target, from_dir, spec);
    spec
}

fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_make_relative_same_dir() {
        let target = Path::new("/project/src/file.ts");
        let base = Path::new("/project/src");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("file.ts")));
    }

    #[test]
    fn test_make_relative_parent_dir() {
        let target = Path::new("/project/src/file.ts");
        let base = Path::new("/project/src/components");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../file.ts")));
    }

    #[test]
    fn test_make_relative_sibling_dir() {
        let target = Path::new("/project/apps/web/index.ts");
        let base = Path::new("/project/apps/api");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../web/index.ts")));
    }

    #[test]
    fn test_make_relative_base_below_target() {
        let target = Path::new("/project");
        let base = Path::new("/project/a/b");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../..")));
    }

    #[test]
    fn test_make_relative_multiple_levels_up() {
        let target = Path::new("/project/file.ts");
        let base = Path::new("/project/apps/web/src");
        assert_eq!(make_relative(target, base), Some(PathBuf::from("../../../file.ts")));
    }

    #[test]
    fn test_import_specifier_from_sibling_output_dir() {
        let spec = import_specifier(
            Path::new("/project/.superdesign/preview/Card"),
            Path::new("/project/components/Card.tsx"),
        );
        assert_eq!(spec, "../../../components/Card.tsx");
    }

    #[test]
    fn test_import_specifier_in_same_dir_gets_dot_prefix() {
        let spec = import_specifier(Path::new("/project/ui"), Path::new("/project/ui/Card.tsx"));
        assert_eq!(spec, "./Card.tsx");
    }

    #[test]
    fn test_import_specifier_cleans_dot_segments() {
        let spec = import_specifier(
            Path::new("/project/out/./nested/.."),
            Path::new("/project/src/../src/Card.jsx"),
        );
        assert_eq!(spec, "../src/Card.jsx");
    }
}
