// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw repair` - recover the broken jobs of a sweep root

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{open_root, sweep_error};
use crate::env;
use crate::exit_error::ExitError;
use crate::output::{broken_lines, emit_table, eprint_lines, report_lines, OutputFormat};

#[derive(Args)]
pub struct RepairArgs {
    /// Sweep root directory
    pub root: PathBuf,

    /// Local worker count (default: SW_CORES or 1)
    #[arg(long, short = 'j')]
    pub cores: Option<usize>,

    /// Show a progress bar
    #[arg(long)]
    pub progress: bool,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write the table to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Re-collect or re-run every broken job, locally.
pub async fn handle(args: RepairArgs) -> Result<()> {
    let mut sweep = open_root(&args.root)?
        .cores(args.cores.unwrap_or_else(env::default_cores))
        .show_progress(args.progress)
        .build()
        .map_err(sweep_error)?;

    let report = sweep.run_broken_again().await?;
    eprint_lines(&report_lines(&report));
    emit_table(sweep.results(), args.format, args.output.as_deref())?;
    eprint_lines(&broken_lines(sweep.broken_jobs()));

    if !report.is_success() {
        let failed = report.len() - report.succeeded();
        return Err(ExitError::failed_jobs(failed, report.len()).into());
    }
    Ok(())
}
