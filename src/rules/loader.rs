// src/rules/loader.rs

use std::path::Path;

use tracing::info;

use crate::errors::{PoulError, Result};
use crate::fs::FileSystem;
use crate::rules::model::Program;
use crate::rules::parser::parse;

/// Rule file looked up when `--file` / `POUL_FILE` is not given.
pub const DEFAULT_RULE_FILE: &str = "./Poulfile";

/// Read and parse the rule file at `path`.
///
/// A missing file is reported as a configuration error naming the path;
/// parse errors are returned unchanged.
pub fn load_program(fs: &dyn FileSystem, path: impl AsRef<Path>) -> Result<Program> {
    let path = path.as_ref();
    if !fs.is_file(path) {
        return Err(PoulError::ConfigError(format!(
            "unable to read rule file: '{}' does not exist",
            path.display()
        )));
    }

    let text = fs.read_to_string(path)?;
    let program = parse(&text)?;

    info!(
        file = %path.display(),
        steps = program.steps().len(),
        templates = program.templates().len(),
        "loaded rule file"
    );
    Ok(program)
}
