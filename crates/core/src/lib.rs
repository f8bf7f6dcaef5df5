// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

// Allow panic!/unwrap/expect in test code
#![cfg_attr(test, allow(clippy::panic))]
#![cfg_attr(test, allow(clippy::unwrap_used))]
#![cfg_attr(test, allow(clippy::expect_used))]

//! sw-core: values, recipes and naming shared by the sweeper crates

pub mod macros;

pub mod builtin;
pub mod naming;
pub mod queue;
pub mod recipe;
pub mod registry;
pub mod template;
pub mod value;

pub use builtin::{JsonOutput, LinesOutput, TemplateInput};
pub use naming::JobNamer;
pub use queue::{QueueHandle, QueueState};
pub use recipe::{InputWriter, OutputCollector, Recipe, RecipeError, RecipeRef};
pub use registry::RecipeRegistry;
pub use template::{interpolate, interpolate_shell};
pub use value::{ParamMap, Value};
