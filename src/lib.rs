// src/lib.rs

pub mod cli;
pub mod config;
pub mod engine;
pub mod errors;
pub mod exec;
pub mod fs;
pub mod logging;
pub mod pattern;
pub mod rules;
pub mod watch;

use std::sync::Arc;

use tracing::{debug, info};

use crate::cli::{CliArgs, Command};
use crate::config::{Settings, load_settings};
use crate::engine::Orchestrator;
use crate::errors::Result;
use crate::exec::ShellExecutor;
use crate::fs::{FileSystem, RealFileSystem};
use crate::pattern::Pattern;
use crate::rules::{Program, load_program, validate_program};
use crate::watch::WatchOptions;

/// High-level entry point used by `main.rs`.
///
/// Loads the settings and the rule file, then runs the subcommand.
/// Returns the exit code of the last step that ran (0 if none failed).
pub async fn run(args: CliArgs) -> Result<i32> {
    let fs: Arc<dyn FileSystem> = Arc::new(RealFileSystem);
    let settings = load_settings(fs.as_ref(), &args.settings)?;
    let program = load_program(fs.as_ref(), &args.file)?;

    match args.command {
        Command::Dump => {
            print_dump(&program);
            Ok(0)
        }
        Command::Check => {
            validate_program(&program)?;
            println!(
                "{}: {} steps, {} templates, ok",
                args.file.display(),
                program.steps().len(),
                program.templates().len()
            );
            Ok(0)
        }
        Command::Compile { sources } => {
            orchestrator(program, &settings, fs)
                .compile_multi(&sources)
                .await
        }
        Command::Build { dests } => orchestrator(program, &settings, fs).build_multi(&dests).await,
        Command::Run { template } => {
            orchestrator(program, &settings, fs)
                .run_template(&template)
                .await
        }
        Command::Watch {
            dir,
            exclude,
            use_hash,
        } => {
            let settings = settings.with_watch_overrides(&exclude, use_hash);
            let options = WatchOptions::new(dir, settings.watch())?;
            info!(?options, "starting watch mode");

            let orch = Arc::new(orchestrator(program, &settings, fs));
            watch::watch(orch, options).await?;
            Ok(0)
        }
    }
}

fn orchestrator(
    program: Program,
    settings: &Settings,
    fs: Arc<dyn FileSystem>,
) -> Orchestrator<ShellExecutor> {
    let executor = ShellExecutor::from_settings(settings.shell());
    Orchestrator::new(program, executor).with_filesystem(fs)
}

/// Print steps and templates as parsed, without running anything.
fn print_dump(program: &Program) {
    println!("steps ({}):", program.steps().len());
    for step in program.steps() {
        println!(
            "  - line {}: {} -> {}",
            step.line,
            join_patterns(&step.sources),
            join_patterns(&step.destinations)
        );
        if !step.dependencies.is_empty() {
            println!("      deps: {}", join_patterns(&step.dependencies));
        }
        for line in step.body.lines() {
            println!("      | {line}");
        }
    }
    println!();

    println!("templates ({}):", program.templates().len());
    for (name, template) in program.templates() {
        println!("  - {name}");
        if !template.prehooks.is_empty() {
            println!("      prehooks: {:?}", template.prehooks);
        }
        if !template.posthooks.is_empty() {
            println!("      posthooks: {:?}", template.posthooks);
        }
        for dest in &template.destinations {
            println!("      {dest}");
        }
    }

    debug!("dump complete (no execution)");
}

fn join_patterns(patterns: &[Pattern]) -> String {
    patterns
        .iter()
        .map(Pattern::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}
