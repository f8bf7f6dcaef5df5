// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Job lifecycle, sweep orchestration and result reconciliation.

mod error;
mod job;
mod progress;
mod reconcile;
mod sweep;
mod table;

pub use error::{JobError, SweepError};
pub use job::{Job, JobDeps, QueueSettings, RunMode};
pub use reconcile::{reconcile, Reconciliation};
pub use sweep::{BatchReport, JobOutcome, JobStatusEntry, Sweep, SweepBuilder};
pub use table::{ExportError, ResultTable, DIR_COLUMN};
