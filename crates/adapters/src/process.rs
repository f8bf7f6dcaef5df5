// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Running a job's executable in its working directory.

use async_trait::async_trait;
use std::path::Path;
use thiserror::Error;

use crate::subprocess::shell_command;

/// Errors from process execution
#[derive(Debug, Error)]
pub enum ProcessError {
    #[error("failed to start `{command}`: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },
}

/// Exit status and combined stdout/stderr of a finished command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessOutput {
    pub exit_code: i32,
    pub output: String,
}

impl ProcessOutput {
    pub fn success(output: impl Into<String>) -> Self {
        Self { exit_code: 0, output: output.into() }
    }

    pub fn failure(exit_code: i32, output: impl Into<String>) -> Self {
        Self { exit_code, output: output.into() }
    }

    pub fn is_success(&self) -> bool {
        self.exit_code == 0
    }
}

/// Adapter for running an executable to completion.
///
/// A non-zero exit is reported through [`ProcessOutput::exit_code`], not as an
/// error; callers decide whether it is fatal.
#[async_trait]
pub trait ProcessAdapter: Clone + Send + Sync + 'static {
    async fn execute(
        &self,
        command: &str,
        working_directory: &Path,
    ) -> Result<ProcessOutput, ProcessError>;
}

/// Runs commands through `sh -c` with no timeout.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellProcessAdapter;

impl ShellProcessAdapter {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl ProcessAdapter for ShellProcessAdapter {
    async fn execute(
        &self,
        command: &str,
        working_directory: &Path,
    ) -> Result<ProcessOutput, ProcessError> {
        let mut cmd = shell_command(command);
        cmd.current_dir(working_directory);
        let started = std::time::Instant::now();
        let output = cmd
            .output()
            .await
            .map_err(|source| ProcessError::Spawn { command: command.to_string(), source })?;

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        // Killed by a signal: no exit code, report like a shell would.
        let exit_code = output.status.code().unwrap_or(-1);
        tracing::debug!(
            command,
            cwd = %working_directory.display(),
            exit_code,
            elapsed_ms = started.elapsed().as_millis() as u64,
            "process finished"
        );
        Ok(ProcessOutput { exit_code, output: combined })
    }
}

#[cfg(any(test, feature = "test-support"))]
#[cfg_attr(coverage_nightly, coverage(off))]
mod fake {
    use super::{ProcessAdapter, ProcessError, ProcessOutput};
    use async_trait::async_trait;
    use parking_lot::Mutex;
    use std::path::{Path, PathBuf};
    use std::sync::Arc;

    type Handler = Arc<dyn Fn(&str, &Path) -> ProcessOutput + Send + Sync>;

    /// Recorded execution
    #[derive(Debug, Clone)]
    pub struct ProcessCall {
        pub command: String,
        pub working_directory: PathBuf,
    }

    /// Fake process adapter for testing.
    ///
    /// Records every call and answers through a handler, which may also touch
    /// the working directory to stand in for a real executable.
    #[derive(Clone)]
    pub struct FakeProcessAdapter {
        calls: Arc<Mutex<Vec<ProcessCall>>>,
        handler: Handler,
    }

    impl Default for FakeProcessAdapter {
        fn default() -> Self {
            Self::with_handler(|_, _| ProcessOutput::success(""))
        }
    }

    impl FakeProcessAdapter {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn with_handler<F>(handler: F) -> Self
        where
            F: Fn(&str, &Path) -> ProcessOutput + Send + Sync + 'static,
        {
            Self { calls: Arc::new(Mutex::new(Vec::new())), handler: Arc::new(handler) }
        }

        /// Get all recorded executions
        pub fn calls(&self) -> Vec<ProcessCall> {
            self.calls.lock().clone()
        }

        pub fn call_count(&self) -> usize {
            self.calls.lock().len()
        }
    }

    #[async_trait]
    impl ProcessAdapter for FakeProcessAdapter {
        async fn execute(
            &self,
            command: &str,
            working_directory: &Path,
        ) -> Result<ProcessOutput, ProcessError> {
            self.calls.lock().push(ProcessCall {
                command: command.to_string(),
                working_directory: working_directory.to_path_buf(),
            });
            Ok((self.handler)(command, working_directory))
        }
    }
}

#[cfg(any(test, feature = "test-support"))]
pub use fake::{FakeProcessAdapter, ProcessCall};

#[cfg(test)]
#[path = "process_tests.rs"]
mod tests;
