// src/engine/mod.rs

//! Build orchestration: resolving requested destinations, changed sources
//! and templates to steps, and running them in order.

pub mod orchestrator;

pub use orchestrator::Orchestrator;
