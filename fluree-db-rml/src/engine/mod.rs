//! Mapping evaluation
//!
//! [`MappingEngine`] drives one run over a compiled mapping: every rule is
//! evaluated in mapping order (rules referenced from function parameters
//! may be evaluated earlier, but never twice), then pending joins are
//! resolved across the per-rule outputs.

mod function;
mod join;
mod rule;
mod run;

pub use run::{JoinMeta, PendingCondition, PendingJoin, RuleOutput, RunContext};

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::config::MappingOptions;
use crate::error::RmlResult;
use crate::function::{FunctionRegistry, MappingFunction};
use crate::mapping::CompiledRmlMapping;
use crate::materialize::validate_language_tag;
use crate::output::{records_to_json, replace_references, write_ntriples, MappingOutput, Record};
use crate::source::SourceCache;

/// Evaluates a compiled mapping against supplied source contents
#[derive(Debug, Clone)]
pub struct MappingEngine {
    mapping: Arc<CompiledRmlMapping>,
    registry: FunctionRegistry,
    options: MappingOptions,
    cache: Arc<SourceCache>,
}

impl MappingEngine {
    /// Create an engine with default options and the built-in functions
    pub fn new(mapping: impl Into<Arc<CompiledRmlMapping>>) -> Self {
        Self {
            mapping: mapping.into(),
            registry: FunctionRegistry::new(),
            options: MappingOptions::default(),
            cache: Arc::new(SourceCache::new()),
        }
    }

    /// Set the run options
    pub fn with_options(mut self, options: MappingOptions) -> Self {
        self.options = options;
        self
    }

    /// Register a function override
    pub fn with_function(
        mut self,
        id: impl Into<String>,
        function: impl MappingFunction + 'static,
    ) -> Self {
        self.registry.register(id, function);
        self
    }

    /// Replace the function registry
    pub fn with_registry(mut self, registry: FunctionRegistry) -> Self {
        self.registry = registry;
        self
    }

    /// Share a parsed-source cache across runs
    pub fn with_source_cache(mut self, cache: Arc<SourceCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn mapping(&self) -> &CompiledRmlMapping {
        &self.mapping
    }

    pub fn options(&self) -> &MappingOptions {
        &self.options
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    /// Fresh run state over `sources` (source identifier -> content)
    pub fn context<'r>(&'r self, sources: &'r HashMap<String, String>) -> RunContext<'r> {
        RunContext::new(
            &self.mapping,
            &self.registry,
            &self.options,
            sources,
            &self.cache,
        )
    }

    /// Evaluate every rule and resolve joins
    ///
    /// Records are returned grouped by rule in mapping order, rows in
    /// ascending order within a rule.
    pub async fn run(&self, sources: &HashMap<String, String>) -> RmlResult<Vec<Record>> {
        if let Some(language) = &self.options.language {
            validate_language_tag(language)?;
        }

        let ctx = self.context(sources);
        let mut outputs = Vec::with_capacity(self.mapping.len());
        for idx in 0..self.mapping.len() {
            outputs.push(ctx.evaluate(idx).await?);
        }

        let records = join::resolve(&self.mapping, &outputs);
        debug!(
            rules = self.mapping.len(),
            records = records.len(),
            "mapping run complete"
        );
        Ok(records)
    }

    /// Run and shape the records per the options
    pub async fn process(&self, sources: &HashMap<String, String>) -> RmlResult<MappingOutput> {
        let records = self.run(sources).await?;
        Ok(if self.options.to_rdf {
            MappingOutput::NTriples(write_ntriples(&records))
        } else if self.options.replace {
            MappingOutput::JsonLd(replace_references(&records))
        } else {
            MappingOutput::JsonLd(records_to_json(&records))
        })
    }
}
