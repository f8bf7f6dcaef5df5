// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! CLI command implementations

use std::path::Path;

use sw_adapters::{CommandQueueAdapter, ShellProcessAdapter};
use sw_engine::{Sweep, SweepBuilder, SweepError};

use crate::exit_error::ExitError;

pub mod collect;
pub mod repair;
pub mod run;
pub mod sweep;

/// Sweeps driven from the command line run shell commands and, when
/// configured, a command-line scheduler.
pub type ShellSweep = Sweep<ShellProcessAdapter, CommandQueueAdapter>;

/// Builder for an existing sweep root.
pub(crate) fn open_root(
    root: &Path,
) -> Result<SweepBuilder<ShellProcessAdapter, CommandQueueAdapter>, ExitError> {
    if !root.is_dir() {
        return Err(ExitError::config(format!("not a directory: {}", root.display())));
    }
    Ok(ShellSweep::builder(root, ShellProcessAdapter::new()))
}

/// Map configuration failures to the configuration exit code.
pub(crate) fn sweep_error(err: SweepError) -> anyhow::Error {
    match err {
        SweepError::Configuration(message) => ExitError::config(message).into(),
        other => other.into(),
    }
}
