// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Sweep file parsing.
//!
//! ```toml
//! root = "calc"
//! cores = 2
//! executable = "awk '{ print $1 + $2 }' input_file > output.log"
//! job_name = "job_${index}_${value_1}"
//!
//! [input_writer]
//! kind = "template"
//! params = { file = "input_file", template = "${value_1} ${value_2}" }
//!
//! [output_collector]
//! kind = "lines"
//! params = { file = "output.log" }
//!
//! [defaults]
//! value_2 = 10
//!
//! [grid]
//! value_1 = [1, 2, 3]
//!
//! [[inputs]]
//! value_1 = 100
//! value_2 = 200
//! ```

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;
use sw_adapters::QueueCommands;
use sw_core::{JobNamer, ParamMap, RecipeRef, Value};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid sweep file {}: {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("grid parameter `{0}` has no values")]
    EmptyGrid(String),
}

/// Queue section: scheduler command templates plus the runner program.
#[derive(Debug, Clone, Deserialize)]
pub struct QueueConfig {
    #[serde(flatten)]
    pub commands: QueueCommands,
    /// Program the queue invokes as `<runner> run --path <dir>`.
    #[serde(default)]
    pub runner: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SweepConfig {
    /// Sweep root, relative to the sweep file's directory.
    pub root: PathBuf,
    #[serde(default)]
    pub cores: Option<usize>,
    pub executable: String,
    /// `${name}` template over the input and `${index}`; default `job_${index}`.
    #[serde(default)]
    pub job_name: Option<String>,
    pub input_writer: RecipeRef,
    pub output_collector: RecipeRef,
    #[serde(default)]
    pub queue: Option<QueueConfig>,
    /// Merged under every input.
    #[serde(default)]
    pub defaults: ParamMap,
    /// Cartesian product of these values, in declaration order.
    #[serde(default)]
    pub grid: IndexMap<String, Vec<Value>>,
    #[serde(default)]
    pub inputs: Vec<ParamMap>,
}

impl SweepConfig {
    /// Read a sweep file and resolve `root` against its directory.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Io { path: path.to_path_buf(), source })?;
        let mut config = Self::parse(&text)
            .map_err(|source| ConfigError::Parse { path: path.to_path_buf(), source })?;
        if config.root.is_relative() {
            let base = path.parent().unwrap_or_else(|| Path::new("."));
            config.root = base.join(&config.root);
        }
        Ok(config)
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    pub fn namer(&self) -> JobNamer {
        match &self.job_name {
            Some(template) => JobNamer::Template(template.clone()),
            None => JobNamer::Index,
        }
    }

    /// Every job input: the explicit `inputs` first, then the grid product,
    /// each laid over `defaults`.
    pub fn expand_inputs(&self) -> Result<Vec<ParamMap>, ConfigError> {
        let mut expanded = self.inputs.clone();
        expanded.extend(grid_product(&self.grid)?);
        Ok(expanded
            .into_iter()
            .map(|input| {
                let mut merged = self.defaults.clone();
                merged.extend(input);
                merged
            })
            .collect())
    }
}

/// The first grid key varies slowest.
fn grid_product(grid: &IndexMap<String, Vec<Value>>) -> Result<Vec<ParamMap>, ConfigError> {
    if grid.is_empty() {
        return Ok(Vec::new());
    }
    let mut combinations = vec![ParamMap::new()];
    for (name, values) in grid {
        if values.is_empty() {
            return Err(ConfigError::EmptyGrid(name.clone()));
        }
        combinations = combinations
            .into_iter()
            .flat_map(|base| {
                values.iter().map(move |value| {
                    let mut next = base.clone();
                    next.insert(name.clone(), value.clone());
                    next
                })
            })
            .collect();
    }
    Ok(combinations)
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
