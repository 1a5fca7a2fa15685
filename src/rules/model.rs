// src/rules/model.rs

//! In-memory form of a parsed rule file.

use std::collections::{BTreeMap, BTreeSet};

use crate::errors::Result;
use crate::fs::FileSystem;
use crate::pattern::{Entry, Pattern};

/// A named group of destinations, with hooks run before and after them.
///
/// ```text
/// release (clean, assets / notify) {
///     dist/app.js
///     dist/app.css
/// }
/// ```
///
/// Hooks are template *names*, resolved when the template runs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    pub name: String,
    pub prehooks: Vec<String>,
    pub posthooks: Vec<String>,
    /// Destinations to build, verbatim from the block body.
    pub destinations: Vec<String>,
}

/// One pattern rule: how sources become destinations.
///
/// ```text
/// src/$1.c (src/$1.h, include/*.h) -> out/$1.o {
///     cc -c "$POUL_SRC" -o "$POUL_DEST"
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Step {
    pub sources: Vec<Pattern>,
    pub destinations: Vec<Pattern>,
    pub dependencies: Vec<Pattern>,
    /// Shell script, one newline-terminated line per body line.
    pub body: String,
    /// Line of the block header in the rule file.
    pub line: usize,
}

impl Step {
    /// First destination pattern matching `dest`.
    pub fn builds(&self, dest: &str) -> Option<Entry> {
        self.destinations.iter().find_map(|p| p.matches(dest))
    }

    /// First source pattern matching `source`.
    pub fn compiles(&self, source: &str) -> Option<Entry> {
        self.sources.iter().find_map(|p| p.matches(source))
    }

    /// Whether `path` matches one of the step's dependency patterns.
    ///
    /// Captures bound by the dependency match are not compared with the
    /// source's, so a matching dependency belongs to every source of the step.
    pub fn depends_on(&self, path: &str) -> bool {
        self.dependencies.iter().any(|dep| dep.matches(path).is_some())
    }

    /// Every concrete source on disk, de-duplicated across source patterns.
    pub fn find_sources(&self, fs: &dyn FileSystem) -> Result<Vec<Entry>> {
        let mut seen = BTreeSet::new();
        let mut found = Vec::new();
        for pattern in &self.sources {
            for entry in pattern.enumerate(fs)? {
                if seen.insert(entry.name.clone()) {
                    found.push(entry);
                }
            }
        }
        Ok(found)
    }
}

/// A parsed rule file: steps in declaration order plus named templates.
///
/// Built once by the parser and never mutated afterwards.
#[derive(Debug, Clone, Default)]
pub struct Program {
    steps: Vec<Step>,
    templates: BTreeMap<String, Template>,
}

impl Program {
    pub fn new(steps: Vec<Step>, templates: BTreeMap<String, Template>) -> Self {
        Self { steps, templates }
    }

    /// Steps in declaration order.
    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn templates(&self) -> &BTreeMap<String, Template> {
        &self.templates
    }

    pub fn template(&self, name: &str) -> Option<&Template> {
        self.templates.get(name)
    }
}
