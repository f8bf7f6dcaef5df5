// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Recipe capabilities: writing a job's input files and parsing its output.
//!
//! A recipe is split into two independently bound procedures. Each one
//! describes itself as a [`RecipeRef`] (a registered kind plus parameters),
//! which is what the job snapshot stores. Another process reconstructs the
//! procedure by resolving that reference through a
//! [`RecipeRegistry`](crate::RecipeRegistry).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use thiserror::Error;

use crate::value::ParamMap;

/// Errors raised while building or running a recipe procedure.
#[derive(Debug, Error)]
pub enum RecipeError {
    #[error("unknown recipe kind: {0}")]
    UnknownKind(String),
    #[error("missing recipe parameter `{0}`")]
    MissingParam(String),
    #[error("invalid recipe parameter `{name}`: {reason}")]
    InvalidParam { name: String, reason: String },
    #[error("IO error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {}: {message}", path.display())]
    Parse { path: PathBuf, message: String },
    #[error("{0}")]
    Failed(String),
}

impl RecipeError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        RecipeError::Io { path: path.into(), source }
    }
}

/// Portable reference to a recipe procedure.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecipeRef {
    pub kind: String,
    #[serde(default, skip_serializing_if = "ParamMap::is_empty")]
    pub params: ParamMap,
}

impl RecipeRef {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into(), params: ParamMap::new() }
    }

    pub fn with_params(kind: impl Into<String>, params: ParamMap) -> Self {
        Self { kind: kind.into(), params }
    }

    /// Required string parameter.
    pub fn str_param(&self, name: &str) -> Result<&str, RecipeError> {
        match self.params.get(name) {
            Some(value) => value.as_str().ok_or_else(|| RecipeError::InvalidParam {
                name: name.to_string(),
                reason: "expected a string".to_string(),
            }),
            None => Err(RecipeError::MissingParam(name.to_string())),
        }
    }
}

impl fmt::Display for RecipeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.kind)
    }
}

/// Writes a job's input files into its working directory.
pub trait InputWriter: Send + Sync {
    fn reference(&self) -> RecipeRef;

    fn write_input(&self, input: &ParamMap, working_directory: &Path) -> Result<(), RecipeError>;
}

/// Parses a finished job's working directory into its output map.
pub trait OutputCollector: Send + Sync {
    fn reference(&self) -> RecipeRef;

    fn collect_output(&self, working_directory: &Path) -> Result<ParamMap, RecipeError>;
}

/// The pair of procedures bound to a job. Either side may be unbound, which
/// is the "not implemented" placeholder a snapshot load is allowed to fill.
#[derive(Clone, Default)]
pub struct Recipe {
    writer: Option<Arc<dyn InputWriter>>,
    collector: Option<Arc<dyn OutputCollector>>,
}

impl Recipe {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_writer(mut self, writer: Arc<dyn InputWriter>) -> Self {
        self.writer = Some(writer);
        self
    }

    pub fn with_collector(mut self, collector: Arc<dyn OutputCollector>) -> Self {
        self.collector = Some(collector);
        self
    }

    pub fn writer(&self) -> Option<&Arc<dyn InputWriter>> {
        self.writer.as_ref()
    }

    pub fn collector(&self) -> Option<&Arc<dyn OutputCollector>> {
        self.collector.as_ref()
    }

    pub fn set_writer(&mut self, writer: Arc<dyn InputWriter>) {
        self.writer = Some(writer);
    }

    pub fn set_collector(&mut self, collector: Arc<dyn OutputCollector>) {
        self.collector = Some(collector);
    }
}

impl fmt::Debug for Recipe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Recipe")
            .field("writer", &self.writer.as_ref().map(|w| w.reference()))
            .field("collector", &self.collector.as_ref().map(|c| c.reference()))
            .finish()
    }
}
