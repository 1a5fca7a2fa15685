// src/exec/backend.rs

//! Pluggable step executor.
//!
//! The orchestrator hands every resolved step to a [`StepExecutor`] as a
//! [`StepInvocation`] and awaits its exit code. Production uses
//! [`ShellExecutor`](super::ShellExecutor); tests plug in a recording fake.

use std::future::Future;
use std::pin::Pin;

use crate::errors::Result;
use crate::pattern::Args;

/// Space-joined source paths.
pub const ENV_SRC: &str = "POUL_SRC";
/// Space-joined destination paths.
pub const ENV_DEST: &str = "POUL_DEST";
/// Prefix for captured arguments: `POUL_ARG_1`, `POUL_ARG_2`, ...
pub const ENV_ARG_PREFIX: &str = "POUL_ARG_";

/// Everything needed to run one step body once.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepInvocation {
    pub script: String,
    pub sources: Vec<String>,
    pub destinations: Vec<String>,
    pub args: Args,
}

impl StepInvocation {
    /// Variables added on top of the inherited environment.
    ///
    /// Ordered: sources, destinations, then arguments by number.
    pub fn environment(&self) -> Vec<(String, String)> {
        let mut env = Vec::with_capacity(2 + self.args.len());
        env.push((ENV_SRC.to_string(), self.sources.join(" ")));
        env.push((ENV_DEST.to_string(), self.destinations.join(" ")));
        for (index, value) in &self.args {
            env.push((format!("{ENV_ARG_PREFIX}{index}"), value.clone()));
        }
        env
    }
}

/// Runs step bodies and reports their exit code.
///
/// `Ok(code)` means the body ran and exited with `code`; a body that could
/// not be started, or ended without a code, is an `Err`.
pub trait StepExecutor: Send + Sync {
    fn execute(
        &self,
        invocation: StepInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>>;
}
