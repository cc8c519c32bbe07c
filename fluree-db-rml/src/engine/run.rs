//! Run-scoped evaluation state
//!
//! A [`RunContext`] lives for one mapping run. It owns the per-rule memo
//! (rules are evaluated at most once) and the row views opened for each
//! rule. A rule requested while its own evaluation is in progress is a
//! cyclic dependency and fails the run.

use std::collections::HashMap;
use std::sync::Arc;

use futures::future::{BoxFuture, FutureExt};
use parking_lot::Mutex;
use serde_json::Value;
use tracing::Instrument;

use super::rule::RuleEvaluator;
use crate::config::MappingOptions;
use crate::error::{RmlError, RmlResult};
use crate::function::FunctionRegistry;
use crate::mapping::CompiledRmlMapping;
use crate::output::Record;
use crate::source::{SourceAdapter, SourceCache};

/// Join bookkeeping for one output record
#[derive(Debug, Clone, Default, PartialEq)]
pub struct JoinMeta {
    /// Values of every parent path other rules join on, for this record's row
    pub parent_values: HashMap<String, Vec<Value>>,
    /// Deferred parent-rule references, in predicate-object map order
    pub pending: Vec<PendingJoin>,
}

/// A deferred reference to another rule's records
#[derive(Debug, Clone, PartialEq)]
pub struct PendingJoin {
    /// Predicate the references are added under
    pub predicate: String,
    /// Index of the referenced rule
    pub parent: usize,
    /// Join conditions with this row's child values; empty links every
    /// record of the parent rule
    pub conditions: Vec<PendingCondition>,
}

/// One join condition evaluated for a row
#[derive(Debug, Clone, PartialEq)]
pub struct PendingCondition {
    /// Selector evaluated on the parent rule's rows
    pub parent_path: String,
    /// Values of the child selector for this row
    pub child_values: Vec<Value>,
}

/// Records produced by one rule, with join metadata kept alongside
///
/// `joins[i]` belongs to `records[i]`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RuleOutput {
    pub records: Vec<Record>,
    pub joins: Vec<JoinMeta>,
}

impl RuleOutput {
    pub(crate) fn push(&mut self, record: Record, meta: JoinMeta) {
        self.records.push(record);
        self.joins.push(meta);
    }

    /// Number of records
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Check if the rule produced no records
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[derive(Debug, Clone)]
enum RuleState {
    Pending,
    InProgress,
    Done(Arc<RuleOutput>),
}

/// State of one mapping run
pub struct RunContext<'r> {
    pub(crate) mapping: &'r CompiledRmlMapping,
    pub(crate) registry: &'r FunctionRegistry,
    pub(crate) options: &'r MappingOptions,
    sources: &'r HashMap<String, String>,
    cache: &'r SourceCache,
    states: Mutex<Vec<RuleState>>,
    adapters: Mutex<HashMap<usize, Arc<dyn SourceAdapter>>>,
}

impl<'r> RunContext<'r> {
    /// Create the context for a run over `sources` (source identifier ->
    /// content)
    pub fn new(
        mapping: &'r CompiledRmlMapping,
        registry: &'r FunctionRegistry,
        options: &'r MappingOptions,
        sources: &'r HashMap<String, String>,
        cache: &'r SourceCache,
    ) -> Self {
        Self {
            mapping,
            registry,
            options,
            sources,
            cache,
            states: Mutex::new(vec![RuleState::Pending; mapping.len()]),
            adapters: Mutex::new(HashMap::new()),
        }
    }

    /// Evaluate a rule by IRI
    pub async fn evaluate_iri(&self, iri: &str) -> RmlResult<Arc<RuleOutput>> {
        let idx = self.mapping.require_index(iri)?;
        self.evaluate(idx).await
    }

    /// Evaluate a rule, returning the memoized output on repeated calls
    pub fn evaluate(&self, idx: usize) -> BoxFuture<'_, RmlResult<Arc<RuleOutput>>> {
        async move {
            let iri = &self.mapping.at(idx).iri;
            {
                let mut states = self.states.lock();
                match &states[idx] {
                    RuleState::Done(output) => return Ok(Arc::clone(output)),
                    RuleState::InProgress => return Err(RmlError::CyclicDependency(iri.clone())),
                    RuleState::Pending => {}
                }
                states[idx] = RuleState::InProgress;
            }

            let span = tracing::debug_span!("rml_rule", rule = %iri);
            let result = RuleEvaluator::new(self, idx)
                .evaluate()
                .instrument(span)
                .await;

            let mut states = self.states.lock();
            match result {
                Ok(output) => {
                    let output = Arc::new(output);
                    states[idx] = RuleState::Done(Arc::clone(&output));
                    Ok(output)
                }
                Err(e) => {
                    states[idx] = RuleState::Pending;
                    Err(e)
                }
            }
        }
        .boxed()
    }

    /// Check whether a rule has been evaluated in this run
    pub fn is_evaluated(&self, idx: usize) -> bool {
        matches!(self.states.lock().get(idx), Some(RuleState::Done(_)))
    }

    /// Row view of a rule's logical source
    pub(crate) fn adapter(&self, idx: usize) -> RmlResult<Arc<dyn SourceAdapter>> {
        if let Some(adapter) = self.adapters.lock().get(&idx) {
            return Ok(Arc::clone(adapter));
        }
        let ls = &self.mapping.at(idx).logical_source;
        let content = self.sources.get(&ls.source).map(String::as_str);
        let adapter = self.cache.open(ls, content, self.options)?;
        self.adapters.lock().insert(idx, Arc::clone(&adapter));
        Ok(adapter)
    }
}
