// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! Adapters for the collaborators the sweeper does not own: process
//! execution, the remote queue and the directory index.

pub mod index;
pub mod process;
pub mod queue;
pub mod subprocess;

pub use index::{DirectoryIndex, WalkDirIndex};
pub use process::{ProcessAdapter, ProcessError, ProcessOutput, ShellProcessAdapter};
pub use queue::{CommandQueueAdapter, QueueAdapter, QueueCommands, QueueError, SubmitRequest};
pub use subprocess::SubprocessError;

#[cfg(any(test, feature = "test-support"))]
pub use process::{FakeProcessAdapter, ProcessCall};
#[cfg(any(test, feature = "test-support"))]
pub use queue::FakeQueueAdapter;
