// src/engine/orchestrator.rs

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use tracing::{debug, info};

use crate::errors::{PoulError, Result};
use crate::exec::{StepExecutor, StepInvocation};
use crate::fs::{FileSystem, RealFileSystem};
use crate::pattern::{Args, clean, substitute_all};
use crate::rules::{Program, Step, Template};

/// Resolves targets and changed files to steps and runs them.
///
/// Holds no mutable state: every operation only reads the program, so one
/// orchestrator can serve concurrent calls (the watch loop relies on this).
/// Each operation runs its steps one after another and returns the first
/// non-zero exit code or error it meets.
pub struct Orchestrator<E: StepExecutor> {
    program: Program,
    executor: E,
    fs: Arc<dyn FileSystem>,
}

impl<E: StepExecutor> std::fmt::Debug for Orchestrator<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Orchestrator")
            .field("program", &self.program)
            .finish_non_exhaustive()
    }
}

impl<E: StepExecutor> Orchestrator<E> {
    pub fn new(program: Program, executor: E) -> Self {
        Self {
            program,
            executor,
            fs: Arc::new(RealFileSystem),
        }
    }

    /// Use `fs` for source enumeration instead of the real filesystem.
    pub fn with_filesystem(mut self, fs: Arc<dyn FileSystem>) -> Self {
        self.fs = fs;
        self
    }

    pub fn filesystem(&self) -> Arc<dyn FileSystem> {
        Arc::clone(&self.fs)
    }

    /// Build `dest` with the first step (in declaration order) whose
    /// destination matches it.
    ///
    /// The step's source patterns are filled with the captured arguments.
    pub async fn build(&self, dest: &str) -> Result<i32> {
        for step in self.program.steps() {
            let Some(entry) = step.builds(dest) else {
                continue;
            };
            debug!(dest = %entry.name, line = step.line, "build: matched step");

            let sources = substitute_all(&step.sources, &entry.args)?;
            return self.run(step, sources, vec![entry.name], entry.args).await;
        }

        Err(PoulError::NoMatchingStep(dest.to_string()))
    }

    /// Build each destination in turn, stopping at the first failure.
    pub async fn build_multi<S: AsRef<str>>(&self, dests: &[S]) -> Result<i32> {
        for dest in dests {
            let code = self.build(dest.as_ref()).await?;
            if code != 0 {
                return Ok(code);
            }
        }
        Ok(0)
    }

    /// Run every step whose source matches `source`.
    ///
    /// Destinations are filled with the captured arguments. Fails with
    /// `NoMatchingStep` only if no step matched at all.
    pub async fn compile(&self, source: &str) -> Result<i32> {
        let mut matched = false;

        for step in self.program.steps() {
            let Some(entry) = step.compiles(source) else {
                continue;
            };
            matched = true;
            debug!(source = %entry.name, line = step.line, "compile: matched step");

            let code = self.run_for_source(step, entry.name, entry.args).await?;
            if code != 0 {
                return Ok(code);
            }
        }

        if matched {
            Ok(0)
        } else {
            Err(PoulError::NoMatchingStep(source.to_string()))
        }
    }

    /// Compile each source in turn, stopping at the first failure.
    pub async fn compile_multi<S: AsRef<str>>(&self, sources: &[S]) -> Result<i32> {
        for source in sources {
            let code = self.compile(source.as_ref()).await?;
            if code != 0 {
                return Ok(code);
            }
        }
        Ok(0)
    }

    /// Recompile every source on disk that declares `changed` as a
    /// dependency.
    ///
    /// For each step with a dependency pattern matching `changed`, the
    /// step's sources are enumerated and each one is compiled by that step.
    pub async fn compile_by_dependency(&self, changed: &str) -> Result<i32> {
        let changed = clean(changed);
        let mut matched = false;

        for step in self.program.steps() {
            if !step.depends_on(&changed) {
                continue;
            }

            for entry in step.find_sources(self.fs.as_ref())? {
                matched = true;
                debug!(
                    dependency = %changed,
                    source = %entry.name,
                    line = step.line,
                    "compile by dependency: matched source"
                );

                let code = self.run_for_source(step, entry.name, entry.args).await?;
                if code != 0 {
                    return Ok(code);
                }
            }
        }

        if matched {
            Ok(0)
        } else {
            Err(PoulError::NoMatchingStep(changed))
        }
    }

    /// Run a template: its prehooks, then its destinations, then its
    /// posthooks, stopping at the first failure.
    ///
    /// A hook chain that re-enters a template already running fails with
    /// `CyclicHook` instead of recursing forever.
    pub async fn run_template(&self, name: &str) -> Result<i32> {
        let mut chain = Vec::new();
        self.run_template_in(name, &mut chain).await
    }

    fn run_template_in<'a>(
        &'a self,
        name: &'a str,
        chain: &'a mut Vec<String>,
    ) -> Pin<Box<dyn Future<Output = Result<i32>> + Send + 'a>> {
        Box::pin(async move {
            if chain.iter().any(|running| running == name) {
                let mut cycle = chain.clone();
                cycle.push(name.to_string());
                return Err(PoulError::CyclicHook {
                    chain: cycle.join(" -> "),
                });
            }

            let template = self
                .program
                .template(name)
                .ok_or_else(|| PoulError::TemplateNotFound(name.to_string()))?;

            info!(template = %name, "running template");
            chain.push(name.to_string());
            let result = self.run_template_phases(template, chain).await;
            chain.pop();
            result
        })
    }

    async fn run_template_phases(&self, template: &Template, chain: &mut Vec<String>) -> Result<i32> {
        for hook in &template.prehooks {
            let code = self.run_template_in(hook, chain).await?;
            if code != 0 {
                return Ok(code);
            }
        }

        for dest in &template.destinations {
            let code = self.build(dest).await?;
            if code != 0 {
                return Ok(code);
            }
        }

        for hook in &template.posthooks {
            let code = self.run_template_in(hook, chain).await?;
            if code != 0 {
                return Ok(code);
            }
        }

        Ok(0)
    }

    async fn run_for_source(&self, step: &Step, source: String, args: Args) -> Result<i32> {
        let destinations = substitute_all(&step.destinations, &args)?;
        self.run(step, vec![source], destinations, args).await
    }

    /// Execute `step`'s body with the given sources, destinations and
    /// captured arguments exposed as `POUL_SRC`, `POUL_DEST` and
    /// `POUL_ARG_<n>`.
    pub async fn run(
        &self,
        step: &Step,
        sources: Vec<String>,
        destinations: Vec<String>,
        args: Args,
    ) -> Result<i32> {
        let invocation = StepInvocation {
            script: step.body.clone(),
            sources,
            destinations,
            args,
        };
        self.executor.execute(invocation).await
    }
}
