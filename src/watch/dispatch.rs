// src/watch/dispatch.rs

//! What happens to one settled path: compile it, then recompile whatever
//! declares it as a dependency.

use tracing::{info, warn};

use crate::engine::Orchestrator;
use crate::errors::Result;
use crate::exec::StepExecutor;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DispatchOutcome {
    /// At least one step ran; the first non-zero code, or 0.
    Ran(i32),
    /// No step applied to the path.
    NothingToDo,
    /// The operation failed with an error (spawn failure, bad template...).
    Failed(String),
}

impl DispatchOutcome {
    fn from_result(result: Result<i32>) -> Self {
        match result {
            Ok(code) => Self::Ran(code),
            Err(err) if err.is_no_match() => Self::NothingToDo,
            Err(err) => Self::Failed(err.to_string()),
        }
    }
}

/// Results of the two independent operations run for one path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchReport {
    pub path: String,
    pub compile: DispatchOutcome,
    pub dependents: DispatchOutcome,
}

/// Run `compile(path)` and then `compile_by_dependency(path)`.
///
/// The second runs regardless of how the first ended; neither outcome is
/// propagated as an error.
pub async fn dispatch_path<E: StepExecutor>(orch: &Orchestrator<E>, path: &str) -> DispatchReport {
    let compile = DispatchOutcome::from_result(orch.compile(path).await);
    log_outcome(path, "compile", &compile);

    let dependents = DispatchOutcome::from_result(orch.compile_by_dependency(path).await);
    log_outcome(path, "compile dependents", &dependents);

    DispatchReport {
        path: path.to_string(),
        compile,
        dependents,
    }
}

fn log_outcome(path: &str, operation: &str, outcome: &DispatchOutcome) {
    match outcome {
        DispatchOutcome::Ran(0) => info!(%path, operation, "succeeded"),
        DispatchOutcome::Ran(code) => warn!(%path, operation, code, "step exited non-zero"),
        DispatchOutcome::NothingToDo => info!(%path, operation, "no matching step"),
        DispatchOutcome::Failed(err) => warn!(%path, operation, error = %err, "failed"),
    }
}
