// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Queuing-system adapter.
//!
//! The queue is an external black box: jobs are handed over with
//! [`QueueAdapter::submit`] and observed later through
//! [`QueueAdapter::status`].

use async_trait::async_trait;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::PathBuf;
use sw_core::{interpolate_shell, QueueHandle, QueueState};
use thiserror::Error;

use crate::subprocess::{run_with_timeout, shell_command, SubprocessError, QUEUE_COMMAND_TIMEOUT};

/// Errors from queue operations
#[derive(Debug, Error)]
pub enum QueueError {
    #[error(transparent)]
    Subprocess(#[from] SubprocessError),
    #[error("{action} exited with code {exit_code}: {stderr}")]
    CommandFailed { action: &'static str, exit_code: i32, stderr: String },
    #[error("could not read a job handle from submit output: {0:?}")]
    NoHandle(String),
    #[error("invalid handle pattern: {0}")]
    InvalidPattern(#[from] regex::Error),
}

/// One job handed to the queue.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitRequest {
    /// Command the queue runs on the compute node.
    pub command: String,
    pub working_directory: PathBuf,
    pub job_name: String,
    pub cores: usize,
}

/// Adapter for a remote queuing system
#[async_trait]
pub trait QueueAdapter: Clone + Send + Sync + 'static {
    async fn submit(&self, request: &SubmitRequest) -> Result<QueueHandle, QueueError>;

    /// One state per handle, in the same order.
    async fn status(&self, handles: &[QueueHandle]) -> Result<Vec<QueueState>, QueueError>;

    async fn delete(&self, handle: &QueueHandle) -> Result<(), QueueError>;
}

/// Shell command templates for a batch scheduler.
///
/// `submit` sees `${command}`, `${working_directory}`, `${job_name}` and
/// `${cores}`; `status` and `delete` see `${handle}`. Substituted values are
/// escaped for use inside single quotes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QueueCommands {
    pub submit: String,
    pub status: String,
    pub delete: String,
    /// Regex whose first capture group is the handle in the submit output.
    /// Without one, the last non-empty output line is the handle.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_pattern: Option<String>,
}

/// Queue adapter driving a scheduler through its command-line tools.
#[derive(Clone, Debug)]
pub struct CommandQueueAdapter {
    commands: QueueCommands,
    handle_pattern: Option<Regex>,
}

impl CommandQueueAdapter {
    pub fn new(commands: QueueCommands) -> Result<Self, QueueError> {
        let handle_pattern = commands.handle_pattern.as_deref().map(Regex::new).transpose()?;
        Ok(Self { commands, handle_pattern })
    }

    pub fn commands(&self) -> &QueueCommands {
        &self.commands
    }

    fn parse_handle(&self, stdout: &str) -> Result<QueueHandle, QueueError> {
        let found = match &self.handle_pattern {
            Some(re) => re
                .captures(stdout)
                .and_then(|caps| caps.get(1))
                .map(|m| m.as_str().to_string()),
            None => stdout
                .lines()
                .map(str::trim)
                .filter(|l| !l.is_empty())
                .last()
                .map(str::to_string),
        };
        found.map(QueueHandle::new).ok_or_else(|| QueueError::NoHandle(stdout.to_string()))
    }

    async fn run(
        &self,
        action: &'static str,
        template: &str,
        vars: &BTreeMap<&str, String>,
    ) -> Result<std::process::Output, QueueError> {
        let command = interpolate_shell(template, vars);
        tracing::debug!(action, %command, "queue command");
        Ok(run_with_timeout(shell_command(&command), QUEUE_COMMAND_TIMEOUT, action).await?)
    }
}

fn handle_vars(handle: &QueueHandle) -> BTreeMap<&'static str, String> {
    BTreeMap::from([("handle", handle.to_string())])
}

#[async_trait]
impl QueueAdapter for CommandQueueAdapter {
    async fn submit(&self, request: &SubmitRequest) -> Result<QueueHandle, QueueError> {
        let vars = BTreeMap::from([
            ("command", request.command.clone()),
            ("working_directory", request.working_directory.display().to_string()),
            ("job_name", request.job_name.clone()),
            ("cores", request.cores.to_string()),
        ]);
        let output = self.run("submit", &self.commands.submit, &vars).await?;
        if !output.status.success() {
            return Err(QueueError::CommandFailed {
                action: "submit",
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        let handle = self.parse_handle(&String::from_utf8_lossy(&output.stdout))?;
        tracing::info!(job_name = %request.job_name, %handle, "submitted to queue");
        Ok(handle)
    }

    async fn status(&self, handles: &[QueueHandle]) -> Result<Vec<QueueState>, QueueError> {
        let mut states = Vec::with_capacity(handles.len());
        for handle in handles {
            let output = self.run("status", &self.commands.status, &handle_vars(handle)).await?;
            // Schedulers error out on ids they no longer track.
            let state = if output.status.success() {
                QueueState::parse(&String::from_utf8_lossy(&output.stdout))
            } else {
                QueueState::Finished
            };
            states.push(state);
        }
        Ok(states)
    }

    async fn delete(&self, handle: &QueueHandle) -> Result<(), QueueError> {
        let output = self.run("delete", &self.commands.delete, &handle_vars(handle)).await?;
        if !output.status.success() {
            return Err(QueueError::CommandFailed {
                action: "delete",
                exit_code: output.status.code().unwrap_or(-1),
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            });
        }
        tracing::info!(%handle, "deleted from queue");
        Ok(())
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{QueueAdapter, QueueError, SubmitRequest};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::collections::HashMap;
    use std::sync::Arc;
    use sw_core::{QueueHandle, QueueState};

    #[derive(Default)]
    struct FakeQueueState {
        next_id: u64,
        submitted: Vec<(QueueHandle, SubmitRequest)>,
        states: HashMap<QueueHandle, QueueState>,
        deleted: Vec<QueueHandle>,
    }

    /// Fake queue for testing: hands out sequential handles starting at 1,
    /// reports `Pending` until told otherwise.
    #[derive(Clone, Default)]
    pub struct FakeQueueAdapter {
        inner: Arc<Mutex<FakeQueueState>>,
    }

    impl FakeQueueAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn submitted(&self) -> Vec<(QueueHandle, SubmitRequest)> {
            self.inner.lock().submitted.clone()
        }

        pub fn deleted(&self) -> Vec<QueueHandle> {
            self.inner.lock().deleted.clone()
        }

        pub fn set_state(&self, handle: &QueueHandle, state: QueueState) {
            self.inner.lock().states.insert(handle.clone(), state);
        }
    }

    #[async_trait]
    impl QueueAdapter for FakeQueueAdapter {
        async fn submit(&self, request: &SubmitRequest) -> Result<QueueHandle, QueueError> {
            let mut inner = self.inner.lock();
            inner.next_id += 1;
            let handle = QueueHandle::new(inner.next_id.to_string());
            inner.submitted.push((handle.clone(), request.clone()));
            inner.states.insert(handle.clone(), QueueState::Pending);
            Ok(handle)
        }

        async fn status(&self, handles: &[QueueHandle]) -> Result<Vec<QueueState>, QueueError> {
            let inner = self.inner.lock();
            Ok(handles
                .iter()
                .map(|h| inner.states.get(h).copied().unwrap_or(QueueState::Finished))
                .collect())
        }

        async fn delete(&self, handle: &QueueHandle) -> Result<(), QueueError> {
            let mut inner = self.inner.lock();
            inner.states.remove(handle);
            inner.deleted.push(handle.clone());
            Ok(())
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::FakeQueueAdapter;

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
