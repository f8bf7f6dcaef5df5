// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Job and sweep error types.

use std::path::PathBuf;

use sw_adapters::{ProcessError, QueueError};
use sw_core::RecipeError;
use sw_storage::SnapshotError;
use thiserror::Error;

/// Errors that abort one job's processing.
#[derive(Debug, Error)]
pub enum JobError {
    /// An extension point was invoked without being supplied.
    #[error("{0} is not implemented for this job")]
    NotImplemented(&'static str),
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(
        "`{command}` exited with code {exit_code} in {}\n{output}",
        working_directory.display()
    )]
    Execution {
        command: String,
        working_directory: PathBuf,
        exit_code: i32,
        output: String,
    },
    #[error(transparent)]
    Process(#[from] ProcessError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error("{procedure} failed: {source}")]
    Recipe {
        procedure: &'static str,
        #[source]
        source: RecipeError,
    },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    /// The worker task panicked or was cancelled.
    #[error("job task aborted: {0}")]
    Aborted(String),
}

impl JobError {
    pub fn is_not_implemented(&self) -> bool {
        matches!(self, JobError::NotImplemented(_))
    }

    /// Snapshot missing on load.
    pub fn is_not_found(&self) -> bool {
        matches!(self, JobError::Snapshot(SnapshotError::NotFound(_)))
    }
}

/// Errors that abort a sweep-level operation.
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("job {name}: {source}")]
    Job {
        name: String,
        #[source]
        source: JobError,
    },
    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
    #[error(transparent)]
    Queue(#[from] QueueError),
    #[error("configuration error: {0}")]
    Configuration(String),
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl SweepError {
    pub(crate) fn job(name: impl Into<String>, source: JobError) -> Self {
        SweepError::Job { name: name.into(), source }
    }
}
