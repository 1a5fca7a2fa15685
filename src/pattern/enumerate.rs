// src/pattern/enumerate.rs

//! Expanding a pattern against the filesystem.

use std::path::PathBuf;

use tracing::debug;

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pattern::{Entry, Pattern, Token, clean_path, tokenize};

impl Pattern {
    /// List every path on `fs` that matches this pattern, sorted by name.
    ///
    /// Wildcards never span `/`, so only entries exactly as deep as the
    /// pattern are candidates. The walk starts below the longest literal
    /// directory prefix; each candidate must pass the glob form and then
    /// [`Pattern::matches`], so the result is always a subset of what
    /// `matches` accepts.
    pub fn enumerate(&self, fs: &dyn FileSystem) -> Result<Vec<Entry>> {
        let (root, depth) = self.walk_root();
        if !fs.is_dir(&root) {
            debug!(pattern = %self, ?root, "walk root missing; nothing to enumerate");
            return Ok(Vec::new());
        }

        let mut entries = Vec::new();
        let mut stack = vec![(root, depth)];

        while let Some((dir, remaining)) = stack.pop() {
            for path in fs.read_dir(&dir)? {
                if remaining > 1 {
                    if fs.is_dir(&path) {
                        stack.push((path, remaining - 1));
                    }
                    continue;
                }

                let name = clean_path(&path);
                if !self.glob_matcher.is_match(&name) {
                    continue;
                }
                if let Some(entry) = self.matches(&name) {
                    entries.push(entry);
                }
            }
        }

        entries.sort_by(|a, b| a.name.cmp(&b.name));
        debug!(pattern = %self, count = entries.len(), "enumerated pattern");
        Ok(entries)
    }

    /// Directory to start walking from, and how many levels below it the
    /// matching entries live.
    fn walk_root(&self) -> (PathBuf, usize) {
        let text = self.as_str();
        let rooted = text.starts_with('/');
        let components: Vec<&str> = text
            .trim_start_matches('/')
            .split('/')
            .filter(|c| !c.is_empty())
            .collect();

        // Never consume the last component: it is what we list.
        let literal_prefix = components
            .iter()
            .take(components.len().saturating_sub(1))
            .take_while(|c| !is_dynamic(c))
            .count();

        let mut root = if rooted {
            PathBuf::from("/")
        } else if literal_prefix == 0 {
            PathBuf::from(".")
        } else {
            PathBuf::new()
        };
        for component in &components[..literal_prefix] {
            root.push(component);
        }

        (root, components.len() - literal_prefix)
    }
}

fn is_dynamic(component: &str) -> bool {
    tokenize(component)
        .iter()
        .any(|t| !matches!(t, Token::Literal(_)))
}
