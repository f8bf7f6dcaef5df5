// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw collect` / `sw recollect` - build the results table of a sweep root

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use super::{open_root, sweep_error};
use crate::output::{broken_lines, emit_table, eprint_lines, OutputFormat};

#[derive(Args)]
pub struct CollectArgs {
    /// Sweep root directory
    pub root: PathBuf,

    /// Output format
    #[arg(long, value_enum, default_value_t)]
    pub format: OutputFormat,

    /// Write the table to a file instead of stdout
    #[arg(long, short = 'o')]
    pub output: Option<PathBuf>,
}

/// Reconcile the snapshots under the root. With `reparse`, every job's
/// output is collected from its files again first.
pub fn handle(args: CollectArgs, reparse: bool) -> Result<()> {
    let mut sweep = open_root(&args.root)?.build().map_err(sweep_error)?;
    let table = if reparse { sweep.run_collect_output()? } else { sweep.collect()? };
    emit_table(table, args.format, args.output.as_deref())?;
    eprint_lines(&broken_lines(sweep.broken_jobs()));
    Ok(())
}
