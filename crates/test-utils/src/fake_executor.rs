use std::future::Future;
use std::pin::Pin;
use std::sync::{Arc, Mutex};

use poul::errors::{PoulError, Result};
use poul::exec::{StepExecutor, StepInvocation};

#[derive(Debug, Clone)]
enum Scripted {
    Exit(i32),
    SpawnFailure,
}

/// A fake executor that:
/// - records every invocation it receives, in order
/// - returns exit code 0 unless a script rule says otherwise.
///
/// Rules match on a substring of the step body; the first matching rule wins.
#[derive(Debug, Clone, Default)]
pub struct RecordingExecutor {
    invocations: Arc<Mutex<Vec<StepInvocation>>>,
    rules: Vec<(String, Scripted)>,
}

impl RecordingExecutor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bodies containing `needle` exit with `code`.
    pub fn exit_with(mut self, needle: impl Into<String>, code: i32) -> Self {
        self.rules.push((needle.into(), Scripted::Exit(code)));
        self
    }

    /// Bodies containing `needle` fail to start.
    pub fn fail_spawn(mut self, needle: impl Into<String>) -> Self {
        self.rules.push((needle.into(), Scripted::SpawnFailure));
        self
    }

    /// Everything executed so far.
    pub fn invocations(&self) -> Vec<StepInvocation> {
        self.invocations.lock().unwrap().clone()
    }

    /// Bodies executed so far, trimmed.
    pub fn scripts(&self) -> Vec<String> {
        self.invocations()
            .into_iter()
            .map(|inv| inv.script.trim().to_string())
            .collect()
    }

    fn outcome_for(&self, script: &str) -> Scripted {
        self.rules
            .iter()
            .find(|(needle, _)| script.contains(needle.as_str()))
            .map(|(_, outcome)| outcome.clone())
            .unwrap_or(Scripted::Exit(0))
    }
}

impl StepExecutor for RecordingExecutor {
    fn execute(
        &self,
        invocation: StepInvocation,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + '_>> {
        Box::pin(async move {
            let outcome = self.outcome_for(&invocation.script);
            self.invocations.lock().unwrap().push(invocation);

            match outcome {
                Scripted::Exit(code) => Ok(code),
                Scripted::SpawnFailure => Err(PoulError::Spawn {
                    program: "fake".to_string(),
                    source: std::io::Error::new(std::io::ErrorKind::NotFound, "scripted failure"),
                }),
            }
        })
    }
}
