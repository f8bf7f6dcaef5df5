// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! Resolves stored [`RecipeRef`]s back into live procedures.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::builtin::{
    JsonOutput, LinesOutput, TemplateInput, JSON_KIND, LINES_KIND, TEMPLATE_KIND,
};
use crate::recipe::{InputWriter, OutputCollector, RecipeError, RecipeRef};

type WriterFactory =
    Arc<dyn Fn(&RecipeRef) -> Result<Arc<dyn InputWriter>, RecipeError> + Send + Sync>;
type CollectorFactory =
    Arc<dyn Fn(&RecipeRef) -> Result<Arc<dyn OutputCollector>, RecipeError> + Send + Sync>;

/// Registered recipe kinds, one factory per kind.
#[derive(Clone, Default)]
pub struct RecipeRegistry {
    writers: HashMap<String, WriterFactory>,
    collectors: HashMap<String, CollectorFactory>,
}

impl RecipeRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry with the `template`, `lines` and `json` kinds.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_writer(TEMPLATE_KIND, |r| {
            Ok(Arc::new(TemplateInput::from_ref(r)?) as Arc<dyn InputWriter>)
        });
        registry.register_collector(LINES_KIND, |r| {
            Ok(Arc::new(LinesOutput::from_ref(r)?) as Arc<dyn OutputCollector>)
        });
        registry.register_collector(JSON_KIND, |r| {
            Ok(Arc::new(JsonOutput::from_ref(r)?) as Arc<dyn OutputCollector>)
        });
        registry
    }

    pub fn register_writer<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&RecipeRef) -> Result<Arc<dyn InputWriter>, RecipeError> + Send + Sync + 'static,
    {
        self.writers.insert(kind.into(), Arc::new(factory));
    }

    pub fn register_collector<F>(&mut self, kind: impl Into<String>, factory: F)
    where
        F: Fn(&RecipeRef) -> Result<Arc<dyn OutputCollector>, RecipeError> + Send + Sync + 'static,
    {
        self.collectors.insert(kind.into(), Arc::new(factory));
    }

    /// Register a parameterless writer under its own reference kind.
    pub fn add_writer(&mut self, writer: Arc<dyn InputWriter>) {
        let kind = writer.reference().kind;
        self.register_writer(kind, move |_| Ok(Arc::clone(&writer)));
    }

    /// Register a parameterless collector under its own reference kind.
    pub fn add_collector(&mut self, collector: Arc<dyn OutputCollector>) {
        let kind = collector.reference().kind;
        self.register_collector(kind, move |_| Ok(Arc::clone(&collector)));
    }

    pub fn writer(&self, reference: &RecipeRef) -> Result<Arc<dyn InputWriter>, RecipeError> {
        let factory = self
            .writers
            .get(&reference.kind)
            .ok_or_else(|| RecipeError::UnknownKind(reference.kind.clone()))?;
        factory(reference)
    }

    pub fn collector(
        &self,
        reference: &RecipeRef,
    ) -> Result<Arc<dyn OutputCollector>, RecipeError> {
        let factory = self
            .collectors
            .get(&reference.kind)
            .ok_or_else(|| RecipeError::UnknownKind(reference.kind.clone()))?;
        factory(reference)
    }
}

impl fmt::Debug for RecipeRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut writers: Vec<_> = self.writers.keys().collect();
        let mut collectors: Vec<_> = self.collectors.keys().collect();
        writers.sort();
        collectors.sort();
        f.debug_struct("RecipeRegistry")
            .field("writers", &writers)
            .field("collectors", &collectors)
            .finish()
    }
}

#[cfg(test)]
#[path = "registry_tests.rs"]
mod tests;
