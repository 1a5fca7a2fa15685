// src/exec/mod.rs

//! Process execution layer.
//!
//! - [`backend`] defines the [`StepExecutor`] trait the orchestrator talks
//!   to, the [`StepInvocation`] it hands over and the `POUL_*` environment
//!   contract.
//! - [`shell`] holds [`ShellExecutor`], which runs bodies through `sh`.

pub mod backend;
pub mod shell;

pub use backend::{ENV_ARG_PREFIX, ENV_DEST, ENV_SRC, StepExecutor, StepInvocation};
pub use shell::ShellExecutor;
