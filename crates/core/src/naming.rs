// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Working-directory names for the members of a sweep.

use std::fmt;
use std::sync::Arc;

use crate::template::interpolate;
use crate::value::{ParamMap, Value};

type NameFn = Arc<dyn Fn(&ParamMap, usize) -> String + Send + Sync>;

/// Computes the directory name of the `index`-th job of a sweep.
///
/// Names must be unique within a sweep; collisions are the caller's problem.
#[derive(Clone, Default)]
pub enum JobNamer {
    /// `job_<index>`
    #[default]
    Index,
    /// `${name}` template over the job input plus `${index}`.
    Template(String),
    Custom(NameFn),
}

impl JobNamer {
    pub fn custom<F>(f: F) -> Self
    where
        F: Fn(&ParamMap, usize) -> String + Send + Sync + 'static,
    {
        JobNamer::Custom(Arc::new(f))
    }

    pub fn name(&self, input: &ParamMap, index: usize) -> String {
        match self {
            JobNamer::Index => format!("job_{index}"),
            JobNamer::Template(template) => {
                let mut vars = input.clone();
                vars.insert("index".to_string(), Value::Int(index as i64));
                interpolate(template, &vars)
            }
            JobNamer::Custom(f) => f(input, index),
        }
    }
}

impl fmt::Debug for JobNamer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JobNamer::Index => f.write_str("Index"),
            JobNamer::Template(t) => f.debug_tuple("Template").field(t).finish(),
            JobNamer::Custom(_) => f.write_str("Custom(..)"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params;

    #[test]
    fn index_naming() {
        assert_eq!(JobNamer::Index.name(&params! {}, 0), "job_0");
        assert_eq!(JobNamer::default().name(&params! { "a" => 1 }, 12), "job_12");
    }

    #[test]
    fn template_naming_sees_input_and_index() {
        let namer = JobNamer::Template("job_${index}_${value_1}".to_string());
        assert_eq!(namer.name(&params! { "value_1" => 1 }, 0), "job_0_1");
    }

    #[test]
    fn custom_naming() {
        let namer = JobNamer::custom(|input, index| {
            format!("run{index}-{}", input.get("label").map(Value::to_string).unwrap_or_default())
        });
        assert_eq!(namer.name(&params! { "label" => "hot" }, 3), "run3-hot");
    }
}
