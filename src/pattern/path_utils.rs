// src/pattern/path_utils.rs

//! Lexical path normalisation shared by patterns and matched paths.

use std::path::{MAIN_SEPARATOR, Path};

/// Clean a slash-separated path purely lexically.
///
/// - repeated separators collapse (`a//b` -> `a/b`)
/// - `.` components vanish (`./a/./b` -> `a/b`)
/// - `..` removes the preceding component where one exists
/// - trailing slashes are dropped
///
/// The empty path cleans to `.`. Patterns and event paths must both go
/// through this before being compared.
pub fn clean(path: &str) -> String {
    let rooted = path.starts_with('/');
    let mut parts: Vec<&str> = Vec::new();

    for part in path.split('/') {
        match part {
            "" | "." => {}
            ".." => match parts.last() {
                Some(&last) if last != ".." => {
                    parts.pop();
                }
                // `/..` is `/`
                _ if rooted => {}
                _ => parts.push(".."),
            },
            other => parts.push(other),
        }
    }

    let joined = parts.join("/");
    match (rooted, joined.is_empty()) {
        (true, _) => format!("/{joined}"),
        (false, true) => ".".to_string(),
        (false, false) => joined,
    }
}

/// Clean a filesystem path, converting the platform separator to `/`.
///
/// Only the platform's own separator is converted: on Unix a `\` is an
/// ordinary file-name character.
pub fn clean_path(path: &Path) -> String {
    let text = path.to_string_lossy();
    if MAIN_SEPARATOR == '/' {
        clean(&text)
    } else {
        clean(&text.replace(MAIN_SEPARATOR, "/"))
    }
}
