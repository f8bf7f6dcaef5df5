// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Remote queue handles and job states.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifier returned by a queuing system when a job is submitted.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueueHandle(String);

impl QueueHandle {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QueueHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for QueueHandle {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for QueueHandle {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// State of a submitted job as reported by the queue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueueState {
    Pending,
    Running,
    /// No longer known to the queue; the snapshot tells whether it succeeded.
    Finished,
    Failed,
    Unknown,
}

impl QueueState {
    /// Map a scheduler's status text onto a state.
    ///
    /// Accepts the long names as well as the short codes printed by the
    /// usual batch schedulers (`PD`, `R`, `CD`, `qw`, ...). Empty output
    /// means the queue has forgotten the job.
    pub fn parse(text: &str) -> Self {
        match text.trim().to_ascii_lowercase().as_str() {
            "" | "finished" | "completed" | "done" | "cd" => QueueState::Finished,
            "pending" | "queued" | "pd" | "qw" | "q" | "h" => QueueState::Pending,
            "running" | "r" | "cg" => QueueState::Running,
            "failed" | "error" | "f" | "eqw" | "to" | "nf" => QueueState::Failed,
            _ => QueueState::Unknown,
        }
    }

    /// Still waiting for or holding queue resources.
    pub fn is_active(self) -> bool {
        matches!(self, QueueState::Pending | QueueState::Running)
    }
}

crate::simple_display! {
    QueueState {
        Pending => "pending",
        Running => "running",
        Finished => "finished",
        Failed => "failed",
        Unknown => "unknown",
    }
}

#[cfg(test)]
#[path = "queue_tests.rs"]
mod tests;
