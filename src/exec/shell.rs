// src/exec/shell.rs

//! Running step bodies through a POSIX shell.

use std::future::Future;
use std::pin::Pin;
use std::process::Stdio;

use tokio::process::Command;
use tracing::{debug, info};

use crate::config::ShellSection;
use crate::errors::{PoulError, Result};
use crate::exec::backend::{StepExecutor, StepInvocation};

/// Executes each body as `<program> <flags...> -c <body>`.
///
/// The child inherits this process's environment and stdio, plus the
/// `POUL_*` variables of the invocation. There is no timeout: a hung body
/// blocks its caller until it exits.
#[derive(Debug, Clone)]
pub struct ShellExecutor {
    program: String,
    flags: Vec<String>,
}

impl Default for ShellExecutor {
    fn default() -> Self {
        Self::from_settings(&ShellSection::default())
    }
}

impl ShellExecutor {
    pub fn new(program: impl Into<String>, flags: Vec<String>) -> Self {
        Self {
            program: program.into(),
            flags,
        }
    }

    pub fn from_settings(shell: &ShellSection) -> Self {
        Self::new(shell.program.clone(), shell.flags.clone())
    }

    async fn run(&self, invocation: StepInvocation) -> Result<i32> {
        info!(
            src = %invocation.sources.join(" "),
            dest = %invocation.destinations.join(" "),
            "running step"
        );

        let mut cmd = Command::new(&self.program);
        cmd.args(&self.flags)
            .arg("-c")
            .arg(&invocation.script)
            .envs(invocation.environment())
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit());

        let status = cmd
            .status()
            .await
            .map_err(|source| PoulError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        let code = status.code().ok_or_else(|| PoulError::NoExitStatus {
            program: self.program.clone(),
        })?;

        if code == 0 {
            debug!(exit_code = code, "step finished");
        } else {
            info!(exit_code = code, "step failed");
        }
        Ok(code)
    }
}

impl StepExecutor for ShellExecutor {
    fn execute(
        &self,
        invocation: StepInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        Box::pin(self.run(invocation))
    }
}
