// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Built-in recipe procedures.
//!
//! These cover the common "render a text template, read numbers back" shape
//! so a sweep can be driven from a config file without custom code.

use std::fs;
use std::path::Path;

use crate::recipe::{InputWriter, OutputCollector, RecipeError, RecipeRef};
use crate::template::interpolate;
use crate::value::{ParamMap, Value};

pub const TEMPLATE_KIND: &str = "template";
pub const LINES_KIND: &str = "lines";
pub const JSON_KIND: &str = "json";

/// Default output key for [`LinesOutput`].
pub const DEFAULT_LINES_KEY: &str = "result";

/// Renders a `${name}` template with the job input into one file.
#[derive(Debug, Clone, PartialEq)]
pub struct TemplateInput {
    pub file: String,
    pub template: String,
}

impl TemplateInput {
    pub fn new(file: impl Into<String>, template: impl Into<String>) -> Self {
        Self { file: file.into(), template: template.into() }
    }

    pub fn from_ref(reference: &RecipeRef) -> Result<Self, RecipeError> {
        Ok(Self::new(reference.str_param("file")?, reference.str_param("template")?))
    }
}

impl InputWriter for TemplateInput {
    fn reference(&self) -> RecipeRef {
        RecipeRef::with_params(
            TEMPLATE_KIND,
            crate::params! { "file" => self.file.as_str(), "template" => self.template.as_str() },
        )
    }

    fn write_input(&self, input: &ParamMap, working_directory: &Path) -> Result<(), RecipeError> {
        let path = working_directory.join(&self.file);
        fs::write(&path, interpolate(&self.template, input)).map_err(|e| RecipeError::io(&path, e))
    }
}

/// Reads one value per non-empty line of a file into a list.
#[derive(Debug, Clone, PartialEq)]
pub struct LinesOutput {
    pub file: String,
    pub key: String,
}

impl LinesOutput {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into(), key: DEFAULT_LINES_KEY.to_string() }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    pub fn from_ref(reference: &RecipeRef) -> Result<Self, RecipeError> {
        let collector = Self::new(reference.str_param("file")?);
        match reference.params.get("key") {
            Some(_) => Ok(collector.key(reference.str_param("key")?)),
            None => Ok(collector),
        }
    }
}

impl OutputCollector for LinesOutput {
    fn reference(&self) -> RecipeRef {
        RecipeRef::with_params(
            LINES_KIND,
            crate::params! { "file" => self.file.as_str(), "key" => self.key.as_str() },
        )
    }

    fn collect_output(&self, working_directory: &Path) -> Result<ParamMap, RecipeError> {
        let path = working_directory.join(&self.file);
        let text = fs::read_to_string(&path).map_err(|e| RecipeError::io(&path, e))?;
        let values: Vec<Value> = text
            .lines()
            .filter(|line| !line.trim().is_empty())
            .map(Value::parse_scalar)
            .collect();
        let mut output = ParamMap::new();
        output.insert(self.key.clone(), Value::List(values));
        Ok(output)
    }
}

/// Reads a JSON object file as the output map.
#[derive(Debug, Clone, PartialEq)]
pub struct JsonOutput {
    pub file: String,
}

impl JsonOutput {
    pub fn new(file: impl Into<String>) -> Self {
        Self { file: file.into() }
    }

    pub fn from_ref(reference: &RecipeRef) -> Result<Self, RecipeError> {
        Ok(Self::new(reference.str_param("file")?))
    }
}

impl OutputCollector for JsonOutput {
    fn reference(&self) -> RecipeRef {
        RecipeRef::with_params(JSON_KIND, crate::params! { "file" => self.file.as_str() })
    }

    fn collect_output(&self, working_directory: &Path) -> Result<ParamMap, RecipeError> {
        let path = working_directory.join(&self.file);
        let text = fs::read_to_string(&path).map_err(|e| RecipeError::io(&path, e))?;
        serde_json::from_str(&text)
            .map_err(|e| RecipeError::Parse { path, message: e.to_string() })
    }
}

#[cfg(test)]
#[path = "builtin_tests.rs"]
mod tests;
