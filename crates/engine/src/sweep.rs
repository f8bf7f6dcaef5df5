// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! A population of jobs under one root directory.
//!
//! Members are never held in memory: they are rediscovered from the snapshot
//! files under the root each time they are needed, so a sweep launched in one
//! process can be collected or repaired from another.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use sw_adapters::{DirectoryIndex, ProcessAdapter, QueueAdapter, WalkDirIndex};
use sw_core::{JobNamer, ParamMap, QueueHandle, QueueState, Recipe, RecipeRegistry};
use tokio::sync::Semaphore;
use tokio::task::JoinSet;
use tracing::{error, info};

use crate::error::{JobError, SweepError};
use crate::job::{Job, JobDeps, QueueSettings, RunMode};
use crate::progress::job_bar;
use crate::reconcile::reconcile;
use crate::table::ResultTable;

/// Result of one job of a batch.
#[derive(Debug)]
pub struct JobOutcome {
    /// Position of the job's input in the batch.
    pub index: usize,
    pub name: String,
    pub working_directory: PathBuf,
    pub result: Result<Option<QueueHandle>, JobError>,
}

impl JobOutcome {
    pub fn is_success(&self) -> bool {
        self.result.is_ok()
    }
}

/// Every job's outcome, in input order.
#[derive(Debug, Default)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    pub fn is_success(&self) -> bool {
        self.outcomes.iter().all(JobOutcome::is_success)
    }

    pub fn succeeded(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_success()).count()
    }

    pub fn failures(&self) -> impl Iterator<Item = (&JobOutcome, &JobError)> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().err().map(|e| (o, e)))
    }

    /// Queue handles of submitted jobs.
    pub fn handles(&self) -> Vec<&QueueHandle> {
        self.outcomes.iter().filter_map(|o| o.result.as_ref().ok()?.as_ref()).collect()
    }
}

/// Queue state of one submitted job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobStatusEntry {
    pub handle: QueueHandle,
    pub job_name: String,
    pub state: QueueState,
}

/// Worker count must fit the semaphore bounding local tasks.
fn check_cores(cores: usize) -> Result<(), SweepError> {
    if cores == 0 {
        return Err(SweepError::Configuration("cores must be at least 1".to_string()));
    }
    if cores > Semaphore::MAX_PERMITS {
        return Err(SweepError::Configuration(format!(
            "cores must be at most {}, got {cores}",
            Semaphore::MAX_PERMITS
        )));
    }
    Ok(())
}

fn is_snapshot_file(path: &Path) -> bool {
    path.file_name().is_some_and(|name| name == sw_storage::SNAPSHOT_FILE)
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Action {
    /// `Job::run` without forcing.
    Run,
    /// `Job::run_broken_again`.
    Repair,
}

struct Pending<P, Q> {
    index: usize,
    name: String,
    working_directory: PathBuf,
    job: Result<Job<P, Q>, JobError>,
}

/// Builder for [`Sweep`].
pub struct SweepBuilder<P, Q> {
    root: PathBuf,
    process: P,
    registry: Option<Arc<RecipeRegistry>>,
    queue: Option<QueueSettings<Q>>,
    index: Option<Box<dyn DirectoryIndex>>,
    executable: Option<String>,
    recipe: Recipe,
    cores: usize,
    namer: JobNamer,
    show_progress: bool,
}

impl<P, Q> SweepBuilder<P, Q>
where
    P: ProcessAdapter,
    Q: QueueAdapter,
{
    /// Recipe registry used when jobs are restored from snapshots.
    /// Defaults to the built-in kinds.
    pub fn registry(mut self, registry: Arc<RecipeRegistry>) -> Self {
        self.registry = Some(registry);
        self
    }

    /// Submit jobs to a queue instead of running them here.
    pub fn queue(mut self, settings: QueueSettings<Q>) -> Self {
        self.queue = Some(settings);
        self
    }

    pub fn index(mut self, index: impl DirectoryIndex + 'static) -> Self {
        self.index = Some(Box::new(index));
        self
    }

    pub fn executable(mut self, executable: impl Into<String>) -> Self {
        self.executable = Some(executable.into());
        self
    }

    pub fn recipe(mut self, recipe: Recipe) -> Self {
        self.recipe = recipe;
        self
    }

    /// Local worker count, default 1.
    pub fn cores(mut self, cores: usize) -> Self {
        self.cores = cores;
        self
    }

    pub fn namer(mut self, namer: JobNamer) -> Self {
        self.namer = namer;
        self
    }

    pub fn show_progress(mut self, show: bool) -> Self {
        self.show_progress = show;
        self
    }

    /// Create the root directory and the sweep.
    pub fn build(self) -> Result<Sweep<P, Q>, SweepError> {
        check_cores(self.cores)?;
        if let Some(queue) = &self.queue {
            if queue.runner.trim().is_empty() {
                return Err(SweepError::Configuration("queue runner is empty".to_string()));
            }
        }
        let root = std::path::absolute(&self.root)
            .map_err(|source| SweepError::Io { path: self.root.clone(), source })?;
        std::fs::create_dir_all(&root)
            .map_err(|source| SweepError::Io { path: root.clone(), source })?;

        let index = self
            .index
            .unwrap_or_else(|| Box::new(WalkDirIndex::new(root.clone(), is_snapshot_file)));
        let mode = match self.queue {
            Some(settings) => RunMode::Queued(settings),
            None => RunMode::Local,
        };
        let deps = JobDeps {
            process: self.process,
            registry: self.registry.unwrap_or_else(|| Arc::new(RecipeRegistry::with_builtins())),
            mode,
        };
        Ok(Sweep {
            root,
            deps,
            executable: self.executable,
            recipe: self.recipe,
            cores: self.cores,
            namer: self.namer,
            show_progress: self.show_progress,
            index,
            submitted: Vec::new(),
            results: ResultTable::default(),
            broken: Vec::new(),
        })
    }
}

/// Jobs sharing one executable and recipe under a root directory.
pub struct Sweep<P, Q> {
    root: PathBuf,
    deps: JobDeps<P, Q>,
    executable: Option<String>,
    recipe: Recipe,
    cores: usize,
    namer: JobNamer,
    show_progress: bool,
    index: Box<dyn DirectoryIndex>,
    submitted: Vec<(QueueHandle, String)>,
    results: ResultTable,
    broken: Vec<PathBuf>,
}

impl<P, Q> Sweep<P, Q>
where
    P: ProcessAdapter,
    Q: QueueAdapter,
{
    pub fn builder(root: impl Into<PathBuf>, process: P) -> SweepBuilder<P, Q> {
        SweepBuilder {
            root: root.into(),
            process,
            registry: None,
            queue: None,
            index: None,
            executable: None,
            recipe: Recipe::new(),
            cores: 1,
            namer: JobNamer::default(),
            show_progress: false,
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn is_queued(&self) -> bool {
        self.deps.mode.is_queued()
    }

    /// `(handle, job name)` of every job submitted by this instance.
    pub fn submitted(&self) -> &[(QueueHandle, String)] {
        &self.submitted
    }

    /// Table built by the last [`collect`](Self::collect).
    pub fn results(&self) -> &ResultTable {
        &self.results
    }

    /// Directories of the jobs the last [`collect`](Self::collect) found incomplete.
    pub fn broken_jobs(&self) -> &[PathBuf] {
        &self.broken
    }

    /// A job in `working_directory` carrying the sweep's executable and recipe.
    pub fn job(
        &self,
        working_directory: impl AsRef<Path>,
        input: ParamMap,
    ) -> Result<Job<P, Q>, JobError> {
        let dir = self.root.join(working_directory);
        let job = Job::new(dir, input, self.deps.clone())?.with_recipe(self.recipe.clone());
        Ok(match &self.executable {
            Some(executable) => job.with_executable(executable.clone()),
            None => job,
        })
    }

    /// Job directories currently holding a snapshot, sorted.
    pub fn members(&mut self) -> Vec<PathBuf> {
        self.index.update();
        self.index.list().iter().filter_map(|file| file.parent().map(Path::to_path_buf)).collect()
    }

    /// Run one job per input, each in its own directory under the root.
    ///
    /// `cores` and `namer` override the sweep's own settings for this call.
    /// Local jobs run on at most `cores` tasks at a time; queued jobs are
    /// submitted one after the other. Jobs that already have a snapshot are
    /// skipped. Every job's outcome is reported, failures included.
    pub async fn run_jobs_in_parallel(
        &mut self,
        inputs: Vec<ParamMap>,
        cores: Option<usize>,
        namer: Option<&JobNamer>,
    ) -> Result<BatchReport, SweepError> {
        let cores = cores.unwrap_or(self.cores);
        check_cores(cores)?;
        let namer = namer.cloned().unwrap_or_else(|| self.namer.clone());

        let pending: Vec<Pending<P, Q>> = inputs
            .into_iter()
            .enumerate()
            .map(|(index, input)| {
                let name = namer.name(&input, index);
                let job = self.job(&name, input);
                Pending { index, working_directory: self.root.join(&name), name, job }
            })
            .collect();
        info!(jobs = pending.len(), cores, queued = self.is_queued(), "running batch");
        Ok(self.execute(pending, cores, Action::Run).await)
    }

    /// Run a single job in `working_directory`, relative to the root unless
    /// absolute. Returns the queue handle when the sweep is queued.
    pub async fn run_job(
        &mut self,
        working_directory: impl AsRef<Path>,
        input: ParamMap,
    ) -> Result<Option<QueueHandle>, SweepError> {
        let mut job = self
            .job(working_directory.as_ref(), input)
            .map_err(|e| SweepError::job(working_directory.as_ref().display().to_string(), e))?;
        let name = job.name();
        let handle = job.run(false).await.map_err(|e| SweepError::job(&name, e))?;
        if let Some(handle) = &handle {
            self.submitted.push((handle.clone(), name));
        }
        Ok(handle)
    }

    /// Queue state of every submitted job; `None` when the sweep runs locally.
    pub async fn get_job_status(&self) -> Result<Option<Vec<JobStatusEntry>>, SweepError> {
        let RunMode::Queued(settings) = &self.deps.mode else {
            return Ok(None);
        };
        let handles: Vec<QueueHandle> = self.submitted.iter().map(|(h, _)| h.clone()).collect();
        let states = settings.adapter.status(&handles).await?;
        Ok(Some(
            self.submitted
                .iter()
                .zip(states)
                .map(|((handle, job_name), state)| JobStatusEntry {
                    handle: handle.clone(),
                    job_name: job_name.clone(),
                    state,
                })
                .collect(),
        ))
    }

    /// Remove every submitted job from the queue. No-op for local sweeps.
    pub async fn delete_jobs_from_queue(&mut self) -> Result<(), SweepError> {
        let RunMode::Queued(settings) = &self.deps.mode else {
            return Ok(());
        };
        while let Some((handle, job_name)) = self.submitted.first().cloned() {
            settings.adapter.delete(&handle).await?;
            info!(%handle, job = %job_name, "deleted job from queue");
            self.submitted.remove(0);
        }
        Ok(())
    }

    /// Reconcile every member's snapshot into [`results`](Self::results)
    /// and [`broken_jobs`](Self::broken_jobs).
    pub fn collect(&mut self) -> Result<&ResultTable, SweepError> {
        let members = self.members();
        let reconciliation = reconcile(&members)?;
        info!(
            jobs = reconciliation.table.len(),
            broken = reconciliation.broken.len(),
            "collected results"
        );
        self.results = reconciliation.table;
        self.broken = reconciliation.broken;
        Ok(&self.results)
    }

    /// Re-parse every member's output, then [`collect`](Self::collect).
    pub fn run_collect_output(&mut self) -> Result<&ResultTable, SweepError> {
        for dir in self.members() {
            let mut job =
                self.job(&dir, ParamMap::new()).map_err(|e| SweepError::job(dir_label(&dir), e))?;
            job.run_collect_output().map_err(|e| SweepError::job(job.name(), e))?;
        }
        self.collect()
    }

    /// Recover every broken member, then [`collect`](Self::collect) again.
    ///
    /// Members whose output can be collected from disk are only re-collected;
    /// the rest are run again (or resubmitted).
    pub async fn run_broken_again(&mut self) -> Result<BatchReport, SweepError> {
        self.collect()?;
        let pending: Vec<Pending<P, Q>> = self
            .broken
            .iter()
            .enumerate()
            .map(|(index, dir)| Pending {
                index,
                name: dir_label(dir),
                working_directory: dir.clone(),
                job: self.job(dir, ParamMap::new()),
            })
            .collect();
        info!(jobs = pending.len(), "repairing broken jobs");
        let report = self.execute(pending, self.cores, Action::Repair).await;
        self.collect()?;
        Ok(report)
    }

    async fn execute(
        &mut self,
        pending: Vec<Pending<P, Q>>,
        cores: usize,
        action: Action,
    ) -> BatchReport {
        let bar = job_bar(pending.len(), self.show_progress);
        let mut outcomes = if self.is_queued() {
            self.execute_sequential(pending, action, &bar).await
        } else {
            execute_local(pending, cores, action, &bar).await
        };
        bar.finish_and_clear();

        outcomes.sort_by_key(|o| o.index);
        for outcome in &outcomes {
            if let Err(e) = &outcome.result {
                error!(job = %outcome.name, error = %e, "job failed");
            }
        }
        BatchReport { outcomes }
    }

    async fn execute_sequential(
        &mut self,
        pending: Vec<Pending<P, Q>>,
        action: Action,
        bar: &indicatif::ProgressBar,
    ) -> Vec<JobOutcome> {
        let mut outcomes = Vec::with_capacity(pending.len());
        for Pending { index, name, working_directory, job } in pending {
            let result = match job {
                Ok(mut job) => run_action(&mut job, action).await,
                Err(e) => Err(e),
            };
            if let Ok(Some(handle)) = &result {
                self.submitted.push((handle.clone(), name.clone()));
            }
            bar.set_message(name.clone());
            bar.inc(1);
            outcomes.push(JobOutcome { index, name, working_directory, result });
        }
        outcomes
    }
}

async fn run_action<P, Q>(
    job: &mut Job<P, Q>,
    action: Action,
) -> Result<Option<QueueHandle>, JobError>
where
    P: ProcessAdapter,
    Q: QueueAdapter,
{
    match action {
        Action::Run => job.run(false).await,
        Action::Repair => job.run_broken_again().await,
    }
}

/// Run jobs on a bounded set of tasks and join all of them.
async fn execute_local<P, Q>(
    pending: Vec<Pending<P, Q>>,
    cores: usize,
    action: Action,
    bar: &indicatif::ProgressBar,
) -> Vec<JobOutcome>
where
    P: ProcessAdapter,
    Q: QueueAdapter,
{
    let semaphore = Arc::new(Semaphore::new(cores));
    let mut set = JoinSet::new();
    let mut outcomes = Vec::with_capacity(pending.len());
    let mut launched: Vec<(usize, String, PathBuf)> = Vec::new();

    for Pending { index, name, working_directory, job } in pending {
        let mut job = match job {
            Ok(job) => job,
            Err(e) => {
                outcomes.push(JobOutcome { index, name, working_directory, result: Err(e) });
                bar.inc(1);
                continue;
            }
        };
        launched.push((index, name, working_directory));
        let semaphore = Arc::clone(&semaphore);
        set.spawn(async move {
            let result = match semaphore.acquire_owned().await {
                Ok(_permit) => run_action(&mut job, action).await,
                Err(e) => Err(JobError::Aborted(e.to_string())),
            };
            (index, result)
        });
    }

    let mut aborted = Vec::new();
    while let Some(joined) = set.join_next().await {
        match joined {
            Ok((index, result)) => {
                if let Some(pos) = launched.iter().position(|(i, _, _)| *i == index) {
                    let (index, name, working_directory) = launched.swap_remove(pos);
                    bar.set_message(name.clone());
                    outcomes.push(JobOutcome { index, name, working_directory, result });
                }
            }
            Err(e) => aborted.push(e.to_string()),
        }
        bar.inc(1);
    }

    // Tasks that panicked never reported their index.
    for ((index, name, working_directory), reason) in launched.into_iter().zip(
        aborted.into_iter().chain(std::iter::repeat("task did not complete".to_string())),
    ) {
        outcomes.push(JobOutcome {
            index,
            name,
            working_directory,
            result: Err(JobError::Aborted(reason)),
        });
    }
    outcomes
}

fn dir_label(dir: &Path) -> String {
    dir.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| dir.display().to_string())
}

#[cfg(test)]
#[path = "sweep_tests.rs"]
mod tests;
