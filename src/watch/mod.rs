// src/watch/mod.rs

//! Watch mode.
//!
//! This module is responsible for:
//! - Wiring up a cross-platform filesystem watcher (`notify`).
//! - Debouncing bursts of events per path.
//! - Dispatching each settled path to the orchestrator's `compile` and
//!   `compile_by_dependency`, where "no matching step" is not a failure.
//! - (Optionally) skipping paths whose content hash did not change.

pub mod debounce;
pub mod dispatch;
pub mod hash;
pub mod path_utils;
pub mod watcher;

pub use debounce::Debouncer;
pub use dispatch::{DispatchOutcome, DispatchReport, dispatch_path};
pub use hash::{ContentHashes, compute_file_hash};
pub use watcher::{WatchOptions, run_event_loop, watch};
