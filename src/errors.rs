// src/errors.rs

//! Crate-wide error type and result alias.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoulError {
    /// The rule file is malformed at a specific (1-based) line.
    #[error("{message} at line {line}")]
    Syntax { line: usize, message: String },

    /// Input ran out while a block was still open.
    #[error("unexpected end of input: block opened at line {opened_at} is never closed")]
    UnterminatedBlock { opened_at: usize },

    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    #[error("invalid glob for pattern '{pattern}': {source}")]
    InvalidGlob {
        pattern: String,
        #[source]
        source: globset::Error,
    },

    /// `Substitute` referenced a capture the entry does not carry.
    #[error("template '{template}' references ${index}, which was not captured")]
    MissingCapture { template: String, index: u32 },

    #[error("no matching step found for '{0}'")]
    NoMatchingStep(String),

    #[error("template not found: {0}")]
    TemplateNotFound(String),

    #[error("cyclic hook chain: {chain}")]
    CyclicHook { chain: String },

    /// The shell could not be started at all.
    #[error("failed to start '{program}': {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The child ended without an exit code (e.g. killed by a signal).
    #[error("'{program}' terminated without an exit status")]
    NoExitStatus { program: String },

    /// The filesystem watcher reported an error; the watch loop stops.
    #[error("file watch error: {0}")]
    Watch(#[from] notify::Error),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl PoulError {
    pub(crate) fn syntax(line: usize, message: impl Into<String>) -> Self {
        Self::Syntax {
            line,
            message: message.into(),
        }
    }

    /// True for the "nothing applies" outcomes, which callers such as the
    /// watch loop treat as a no-op rather than a failure.
    pub fn is_no_match(&self) -> bool {
        matches!(self, Self::NoMatchingStep(_) | Self::TemplateNotFound(_))
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, PoulError>;
