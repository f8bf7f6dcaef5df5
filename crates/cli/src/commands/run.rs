// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! `sw run` - run one job from its snapshot
//!
//! This is what a queue executes on the compute node.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use sw_adapters::{CommandQueueAdapter, ShellProcessAdapter};
use sw_core::ParamMap;
use sw_engine::{Job, JobDeps};

use crate::exit_error::ExitError;

#[derive(Args)]
pub struct RunArgs {
    /// Job working directory holding a snapshot
    #[arg(long)]
    pub path: PathBuf,
}

pub async fn handle(args: RunArgs) -> Result<()> {
    if !sw_storage::exists(&args.path) {
        return Err(ExitError::config(format!(
            "no job snapshot in {}",
            args.path.display()
        ))
        .into());
    }

    let deps = JobDeps::local(ShellProcessAdapter::new());
    let mut job: Job<ShellProcessAdapter, CommandQueueAdapter> =
        Job::new(&args.path, ParamMap::new(), deps)?;
    job.load()?;
    job.run(true).await?;
    tracing::info!(job = %job.name(), "run finished");
    Ok(())
}
