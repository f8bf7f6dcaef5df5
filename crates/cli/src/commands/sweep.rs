// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw sweep` - run every job described by a sweep file

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Result;
use clap::Args;
use sw_adapters::{CommandQueueAdapter, ShellProcessAdapter};
use sw_core::{Recipe, RecipeRegistry};
use sw_engine::QueueSettings;

use super::{sweep_error, ShellSweep};
use crate::config::SweepConfig;
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{broken_lines, emit_table, eprint_lines, report_lines, OutputFormat};

#[derive(Args)]
pub struct SweepArgs {
    /// Sweep file (TOML)
    pub config: PathBuf,

    /// Local worker count (overrides the sweep file and SW_CORES)
    #[arg(long, short = 'j')]
    pub cores: Option<usize>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Output format of the results table
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write the table to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

pub async fn handle(args: SweepArgs) -> Result<()> {
    let config = SweepConfig::load(&args.config).map_err(|e| ExitError::config(e.to_string()))?;
    let inputs = config.expand_inputs().map_err(|e| ExitError::config(e.to_string()))?;
    if inputs.is_empty() {
        tracing::warn!(config = %args.config.display(), "sweep file defines no inputs");
    }

    let registry = RecipeRegistry::with_builtins();
    let writer = registry
        .writer(&config.input_writer)
        .map_err(|e| ExitError::config(format!("input_writer: {e}")))?;
    let collector = registry
        .collector(&config.output_collector)
        .map_err(|e| ExitError::config(format!("output_collector: {e}")))?;
    let cores = args.cores.or(config.cores).unwrap_or_else(env::default_cores);

    let mut builder = ShellSweep::builder(&config.root, ShellProcessAdapter::new())
        .registry(Arc::new(registry))
        .executable(config.executable.clone())
        .recipe(Recipe::new().with_writer(writer).with_collector(collector))
        .cores(cores)
        .namer(config.namer())
        .show_progress(args.progress);
    if let Some(queue) = &config.queue {
        let adapter = CommandQueueAdapter::new(queue.commands.clone())
            .map_err(|e| ExitError::config(e.to_string()))?;
        let runner = queue.runner.clone().unwrap_or_else(env::runner);
        builder = builder.queue(QueueSettings { adapter, cores, runner });
    }
    let mut sweep = builder.build().map_err(sweep_error)?;

    let report = sweep.run_jobs_in_parallel(inputs, None, None).await.map_err(sweep_error)?;
    eprint_lines(&report_lines(&report));

    if !sweep.is_queued() {
        let table = sweep.collect()?;
        emit_table(table, args.format, args.output.as_deref())?;
        eprint_lines(&broken_lines(sweep.broken_jobs()));
    }

    if !report.is_success() {
        let failed = report.len() - report.succeeded();
        return Err(ExitError::failed_jobs(failed, report.len()).into());
    }
    Ok(())
}
