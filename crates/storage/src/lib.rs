// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Storage layer for sweeper job snapshots

pub mod snapshot;

pub use snapshot::{
    exists, load, save, snapshot_path, JobSettings, JobSnapshot, SnapshotError,
    CURRENT_SNAPSHOT_VERSION, SNAPSHOT_FILE,
};
