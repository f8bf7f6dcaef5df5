// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Bounded subprocess helpers for short-lived control commands.

use std::process::Output;
use std::time::Duration;

use thiserror::Error;
use tokio::process::Command;

/// Timeout for queue control commands (submit, status, delete).
pub const QUEUE_COMMAND_TIMEOUT: Duration = Duration::from_secs(30);

#[derive(Debug, Error)]
pub enum SubprocessError {
    #[error("{description} failed to start: {source}")]
    Spawn {
        description: String,
        #[source]
        source: std::io::Error,
    },
    #[error("{description} timed out after {}s", timeout.as_secs())]
    TimedOut { description: String, timeout: Duration },
}

/// Build a `sh -c <command>` invocation.
pub fn shell_command(command: &str) -> Command {
    let mut cmd = Command::new("sh");
    cmd.arg("-c").arg(command);
    cmd
}

/// Run `cmd` to completion, capturing its output, or fail after `timeout`.
///
/// The child is killed when the timeout elapses.
pub async fn run_with_timeout(
    mut cmd: Command,
    timeout: Duration,
    description: &str,
) -> Result<Output, SubprocessError> {
    cmd.kill_on_drop(true);
    match tokio::time::timeout(timeout, cmd.output()).await {
        Ok(Ok(output)) => Ok(output),
        Ok(Err(source)) => {
            Err(SubprocessError::Spawn { description: description.to_string(), source })
        }
        Err(_) => {
            Err(SubprocessError::TimedOut { description: description.to_string(), timeout })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn captures_output() {
        let output = run_with_timeout(shell_command("echo hi"), Duration::from_secs(5), "echo")
            .await
            .unwrap();
        assert!(output.status.success());
        assert_eq!(String::from_utf8_lossy(&output.stdout), "hi\n");
    }

    #[tokio::test]
    async fn times_out() {
        let err = run_with_timeout(shell_command("sleep 5"), Duration::from_millis(50), "sleep")
            .await
            .unwrap_err();
        assert!(matches!(err, SubprocessError::TimedOut { .. }));
        assert_eq!(err.to_string(), "sleep timed out after 0s");
    }
}
