#![allow(dead_code)]

use std::sync::Arc;

use poul::engine::Orchestrator;
use poul::fs::mock::MockFileSystem;
use poul::rules::{Program, parse};
use poul_test_utils::RecordingExecutor;

pub use poul_test_utils::{init_tracing, with_timeout};

/// Parse rule text that is known to be valid.
pub fn program(text: &str) -> Program {
    parse(text).expect("rule text should parse")
}

/// Orchestrator over `text` with an empty in-memory filesystem.
pub fn orchestrator(text: &str, executor: RecordingExecutor) -> Orchestrator<RecordingExecutor> {
    orchestrator_on(text, executor, MockFileSystem::new())
}

/// Orchestrator over `text` enumerating sources from `fs`.
pub fn orchestrator_on(
    text: &str,
    executor: RecordingExecutor,
    fs: MockFileSystem,
) -> Orchestrator<RecordingExecutor> {
    Orchestrator::new(program(text), executor).with_filesystem(Arc::new(fs))
}
