// src/watch/path_utils.rs

//! Turning absolute event paths into the relative paths rules are written
//! against.

use std::path::Path;

use crate::pattern::{clean, clean_path};

/// Express `path` relative to `base`, cleaned and with forward slashes.
///
/// Tries a plain `strip_prefix` first, then canonicalizes both sides
/// (symlinked temp dirs on macOS report `/private/var/...`). Returns `None`
/// if `path` is not below `base`.
pub fn relative_str(base: &Path, path: &Path) -> Option<String> {
    if let Ok(rel) = path.strip_prefix(base) {
        return Some(clean_path(rel));
    }

    if let (Ok(base_canon), Ok(path_canon)) = (base.canonicalize(), path.canonicalize()) {
        if let Ok(rel) = path_canon.strip_prefix(&base_canon) {
            return Some(clean_path(rel));
        }
    }

    None
}

/// True if `rel_path` is one of `excludes` or lies below one of them.
pub fn is_excluded(rel_path: &str, excludes: &[String]) -> bool {
    excludes.iter().any(|exclude| {
        let exclude = clean(exclude);
        rel_path == exclude
            || rel_path
                .strip_prefix(exclude.as_str())
                .is_some_and(|rest| rest.starts_with('/'))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn excludes_directory_and_everything_below() {
        let excludes = vec!["./target/".to_string(), ".git".to_string()];
        assert!(is_excluded("target", &excludes));
        assert!(is_excluded("target/debug/poul", &excludes));
        assert!(is_excluded(".git/index", &excludes));
        assert!(!is_excluded("targets/a", &excludes));
        assert!(!is_excluded("src/target", &excludes));
    }

    #[test]
    fn relativizes_against_base() {
        assert_eq!(
            relative_str(Path::new("/project"), Path::new("/project/src/./a.c")),
            Some("src/a.c".to_string())
        );
    }
}
