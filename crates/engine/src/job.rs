// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Single-job lifecycle.
//!
//! A job is defined by its working directory. It moves from "defined" to
//! "submitted/running" to "completed", and every transition that matters is
//! written to the job's snapshot so a later process (or a queue worker) can
//! pick it up. A snapshot with output is a completed job; anything else is
//! pending, failed or never ran.

use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use sw_adapters::{ProcessAdapter, QueueAdapter, SubmitRequest};
use sw_core::template::escape_for_shell;
use sw_core::{ParamMap, QueueHandle, Recipe, RecipeError, RecipeRef, RecipeRegistry};
use sw_storage::{JobSettings, JobSnapshot};
use tracing::{debug, info, warn};

use crate::error::JobError;

/// Queue configuration for jobs that run out of process.
#[derive(Clone, Debug)]
pub struct QueueSettings<Q> {
    pub adapter: Q,
    /// Cores requested per job.
    pub cores: usize,
    /// Program the queue invokes as `<runner> run --path <dir>`.
    pub runner: String,
}

/// Where a job's executable runs.
#[derive(Clone, Debug)]
pub enum RunMode<Q> {
    /// Synchronously, in this process.
    Local,
    /// Handed to a queuing system.
    Queued(QueueSettings<Q>),
}

impl<Q> RunMode<Q> {
    pub fn is_queued(&self) -> bool {
        matches!(self, RunMode::Queued(_))
    }
}

/// Collaborators a job is constructed with.
#[derive(Clone, Debug)]
pub struct JobDeps<P, Q> {
    pub process: P,
    pub registry: Arc<RecipeRegistry>,
    pub mode: RunMode<Q>,
}

impl<P, Q> JobDeps<P, Q> {
    /// Local execution with the built-in recipe kinds.
    pub fn local(process: P) -> Self {
        Self { process, registry: Arc::new(RecipeRegistry::with_builtins()), mode: RunMode::Local }
    }
}

/// One unit of parameterized work.
pub struct Job<P, Q> {
    working_directory: PathBuf,
    input: ParamMap,
    output: ParamMap,
    executable: Option<String>,
    recipe: Recipe,
    write_input_source: Option<RecipeRef>,
    collect_output_source: Option<RecipeRef>,
    deps: JobDeps<P, Q>,
}

impl<P, Q> Job<P, Q>
where
    P: ProcessAdapter,
    Q: QueueAdapter,
{
    /// Define a job in `working_directory`, creating the directory if absent.
    ///
    /// Relative paths are resolved against the current directory.
    pub fn new(
        working_directory: impl AsRef<Path>,
        input: ParamMap,
        deps: JobDeps<P, Q>,
    ) -> Result<Self, JobError> {
        let requested = working_directory.as_ref();
        let working_directory = std::path::absolute(requested)
            .map_err(|source| JobError::Io { path: requested.to_path_buf(), source })?;
        std::fs::create_dir_all(&working_directory)
            .map_err(|source| JobError::Io { path: working_directory.clone(), source })?;
        Ok(Self {
            working_directory,
            input,
            output: ParamMap::new(),
            executable: None,
            recipe: Recipe::new(),
            write_input_source: None,
            collect_output_source: None,
            deps,
        })
    }

    pub fn with_executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn with_recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = recipe;
        self
    }

    pub fn working_directory(&self) -> &Path {
        &self.working_directory
    }

    /// Base name of the working directory.
    pub fn name(&self) -> String {
        self.working_directory
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    pub fn input(&self) -> &ParamMap {
        &self.input
    }

    pub fn output(&self) -> &ParamMap {
        &self.output
    }

    pub fn recipe(&self) -> &Recipe {
        &self.recipe
    }

    pub fn has_snapshot(&self) -> bool {
        sw_storage::exists(&self.working_directory)
    }

    pub fn executable(&self) -> Result<&str, JobError> {
        self.executable.as_deref().ok_or(JobError::NotImplemented("executable"))
    }

    /// Run the bound input writer.
    pub fn write_input(&self) -> Result<(), JobError> {
        let writer = self.recipe.writer().ok_or(JobError::NotImplemented("write_input"))?;
        writer
            .write_input(&self.input, &self.working_directory)
            .map_err(|source| JobError::Recipe { procedure: "write_input", source })
    }

    /// Run the bound output collector.
    pub fn collect_output(&self) -> Result<ParamMap, JobError> {
        let collector =
            self.recipe.collector().ok_or(JobError::NotImplemented("collect_output"))?;
        collector
            .collect_output(&self.working_directory)
            .map_err(|source| JobError::Recipe { procedure: "collect_output", source })
    }

    /// Build the durable record for this job.
    ///
    /// Recipe references are captured from the bound procedures the first
    /// time and kept afterwards.
    pub fn snapshot(&mut self) -> Result<JobSnapshot, JobError> {
        if self.write_input_source.is_none() {
            self.write_input_source = self.recipe.writer().map(|w| w.reference());
        }
        if self.collect_output_source.is_none() {
            self.collect_output_source = self.recipe.collector().map(|c| c.reference());
        }
        let settings = JobSettings {
            executable: self.executable()?.to_string(),
            working_directory: self.working_directory.clone(),
            write_input_source: self.write_input_source.clone(),
            collect_output_source: self.collect_output_source.clone(),
        };
        let mut snapshot = JobSnapshot::new(self.input.clone(), settings);
        if !self.output.is_empty() {
            snapshot.output = Some(self.output.clone());
        }
        Ok(snapshot)
    }

    /// Persist the job's snapshot, merging with what is on disk.
    pub fn save(&mut self) -> Result<(), JobError> {
        let snapshot = self.snapshot()?;
        sw_storage::save(&self.working_directory, &snapshot)?;
        Ok(())
    }

    /// Restore the job from its snapshot.
    ///
    /// Input and output come from disk. The executable and each recipe
    /// procedure are restored only where this instance has none bound, so a
    /// caller's own procedures are never replaced by stored ones.
    pub fn load(&mut self) -> Result<(), JobError> {
        let snapshot = sw_storage::load(&self.working_directory)?;
        let settings = snapshot.settings;
        if settings.working_directory != self.working_directory {
            debug!(
                stored = %settings.working_directory.display(),
                current = %self.working_directory.display(),
                "job directory moved since last save"
            );
        }

        self.input = snapshot.input;
        if self.executable.is_none() {
            self.executable = Some(settings.executable);
        }
        if self.recipe.writer().is_none() {
            if let Some(reference) = settings.write_input_source {
                match self.deps.registry.writer(&reference) {
                    Ok(writer) => {
                        self.recipe.set_writer(writer);
                        self.write_input_source = Some(reference);
                    }
                    Err(e) => self.warn_unresolved("write_input", &reference, &e),
                }
            }
        }
        if self.recipe.collector().is_none() {
            if let Some(reference) = settings.collect_output_source {
                match self.deps.registry.collector(&reference) {
                    Ok(collector) => {
                        self.recipe.set_collector(collector);
                        self.collect_output_source = Some(reference);
                    }
                    Err(e) => self.warn_unresolved("collect_output", &reference, &e),
                }
            }
        }
        if let Some(output) = snapshot.output {
            self.output = output;
        }
        Ok(())
    }

    fn warn_unresolved(&self, procedure: &str, reference: &RecipeRef, error: &RecipeError) {
        warn!(
            job = %self.name(),
            procedure,
            kind = %reference.kind,
            error = %error,
            "stored recipe reference cannot be resolved; leaving it unbound"
        );
    }

    /// Execute the job unless it already has a snapshot.
    ///
    /// With `run_again` the pipeline runs even over an existing snapshot.
    /// Local jobs write input, run the executable, collect output and save;
    /// queued jobs save and are submitted, returning the queue handle.
    /// An empty collected output is not written, so output already on disk
    /// from an earlier run stays in the snapshot.
    pub async fn run(&mut self, run_again: bool) -> Result<Option<QueueHandle>, JobError> {
        if self.has_snapshot() && !run_again {
            debug!(job = %self.name(), "snapshot exists, skipping");
            return Ok(None);
        }
        match self.deps.mode.clone() {
            RunMode::Local => {
                self.run_local().await?;
                Ok(None)
            }
            RunMode::Queued(settings) => self.submit(&settings).await.map(Some),
        }
    }

    async fn run_local(&mut self) -> Result<(), JobError> {
        self.write_input()?;
        let command = self.executable()?.to_string();
        info!(job = %self.name(), %command, "running job");

        let result = self.deps.process.execute(&command, &self.working_directory).await?;
        if !result.is_success() {
            return Err(JobError::Execution {
                command,
                working_directory: self.working_directory.clone(),
                exit_code: result.exit_code,
                output: result.output,
            });
        }

        self.output = self.collect_output()?;
        self.save()?;
        info!(job = %self.name(), keys = self.output.len(), "job completed");
        Ok(())
    }

    async fn submit(&mut self, settings: &QueueSettings<Q>) -> Result<QueueHandle, JobError> {
        self.save()?;
        let request = SubmitRequest {
            command: format!(
                "{} run --path '{}'",
                settings.runner,
                escape_for_shell(&self.working_directory.display().to_string())
            ),
            working_directory: self.working_directory.clone(),
            job_name: self.name(),
            cores: settings.cores,
        };
        let handle = settings.adapter.submit(&request).await?;
        info!(job = %self.name(), %handle, "job submitted");
        Ok(handle)
    }

    /// Recover a job whose output is missing.
    ///
    /// Output collection is retried first; only when that yields nothing is
    /// the whole job run again.
    pub async fn run_broken_again(&mut self) -> Result<Option<QueueHandle>, JobError> {
        self.load()?;
        let output = match self.collect_output() {
            Ok(output) => output,
            Err(e) if e.is_not_implemented() => return Err(e),
            Err(e) => {
                debug!(job = %self.name(), error = %e, "output collection failed");
                ParamMap::new()
            }
        };
        if output.is_empty() {
            info!(job = %self.name(), "no output, running job again");
            return self.run(true).await;
        }
        self.output = output;
        self.save()?;
        Ok(None)
    }

    /// Re-parse the output of a finished job without running it again.
    ///
    /// As with [`run`](Self::run), an empty result leaves the stored output
    /// in place.
    pub fn run_collect_output(&mut self) -> Result<(), JobError> {
        self.load()?;
        self.output = self.collect_output()?;
        self.save()?;
        debug!(job = %self.name(), "output collected again");
        Ok(())
    }
}

impl<P, Q> fmt::Debug for Job<P, Q> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Job")
            .field("working_directory", &self.working_directory)
            .field("input", &self.input)
            .field("output", &self.output)
            .field("executable", &self.executable)
            .field("recipe", &self.recipe)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "job_tests.rs"]
mod tests;
