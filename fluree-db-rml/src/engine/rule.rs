//! Rule evaluator
//!
//! Turns every row of a rule's logical source into zero or more records.
//! Rows are processed in ascending order; within a row, predicate-object
//! maps are resolved in mapping order. References to other rules are not
//! resolved here: they are recorded as pending joins next to the record.

use fluree_vocab::rdf;
use serde_json::Value;
use tracing::debug;

use super::function::{unwrap_single, FunctionEvaluator};
use super::run::{JoinMeta, PendingCondition, PendingJoin, RuleOutput, RunContext};
use crate::error::{RmlError, RmlResult};
use crate::mapping::{
    ConstantValue, LanguageMap, ObjectKind, ObjectMap, PredicateMap, PredicateObjectMap,
    RefObjectMap, SubjectKind, Template, TermType, TriplesMap,
};
use crate::materialize::{blank_node_label, expand_template, validate_language_tag};
use crate::output::{ObjectValue, Record};
use crate::source::{lexical, SourceAdapter};

/// Values of one object map for one row
enum Resolved {
    Values(Vec<ObjectValue>),
    Join {
        parent: usize,
        conditions: Vec<PendingCondition>,
    },
}

/// Evaluates one rule against its logical source
pub(crate) struct RuleEvaluator<'c> {
    pub(crate) ctx: &'c RunContext<'c>,
    pub(crate) idx: usize,
    pub(crate) tm: &'c TriplesMap,
}

impl<'c> RuleEvaluator<'c> {
    pub(crate) fn new(ctx: &'c RunContext<'c>, idx: usize) -> Self {
        Self {
            ctx,
            idx,
            tm: ctx.mapping.at(idx),
        }
    }

    /// Evaluate every row of the rule
    pub(crate) async fn evaluate(&self) -> RmlResult<RuleOutput> {
        let adapter = self.ctx.adapter(self.idx)?;
        let rows = adapter.row_count();
        let parent_paths = self.ctx.mapping.parent_paths(self.idx);
        let functions = FunctionEvaluator::new(self, adapter.as_ref());
        let mut output = RuleOutput::default();

        debug!(rule = %self.tm.iri, rows, "evaluating rule");

        for row in 0..rows {
            let mut types = self.tm.subject_map.classes.clone();
            if let Some(class_fn) = &self.tm.subject_map.class_function {
                let classes = functions.invoke(class_fn, row).await?;
                types.extend(value_strings(&unwrap_single(classes)));
            }

            let subjects = self.subjects(&functions, adapter.as_ref(), row).await?;
            if subjects.is_empty() {
                continue;
            }

            let mut base = Record::default();
            for class in types {
                base.add_type(class);
            }
            let mut meta = JoinMeta::default();
            for pom in &self.tm.predicate_object_maps {
                self.apply_predicate_object_map(
                    pom,
                    &functions,
                    adapter.as_ref(),
                    row,
                    &mut base,
                    &mut meta,
                )
                .await?;
            }
            for path in parent_paths {
                let values = self.values(adapter.as_ref(), row, path, None)?;
                meta.parent_values.insert(path.clone(), values);
            }

            for subject in subjects {
                let mut record = base.clone();
                record.id = subject;
                output.push(record, meta.clone());
            }
        }

        debug!(rule = %self.tm.iri, records = output.len(), "rule evaluated");
        Ok(output)
    }

    /// Identity candidates for a row
    async fn subjects(
        &self,
        functions: &FunctionEvaluator<'_>,
        adapter: &dyn SourceAdapter,
        row: usize,
    ) -> RmlResult<Vec<String>> {
        let subject_map = &self.tm.subject_map;
        let term_type = subject_map.resolved_term_type();
        if term_type.is_literal() {
            return Err(RmlError::InvalidTermType(format!(
                "subject map of {} cannot produce literals",
                self.tm.iri
            )));
        }

        let raw: Vec<String> = match &subject_map.kind {
            SubjectKind::Reference(selector) => self
                .strings(adapter, row, selector)?
                .into_iter()
                .filter(|s| !s.is_empty() && !s.chars().any(char::is_whitespace))
                .collect(),
            SubjectKind::Template(template) => self.expand(adapter, row, template, false)?,
            SubjectKind::Function(function) => {
                let value = unwrap_single(functions.invoke(function, row).await?);
                let ids = value_strings(&value);
                if ids.is_empty() {
                    return Ok(vec![self.fallback_id(row)]);
                }
                ids
            }
            SubjectKind::Constant(iri) => vec![iri.clone()],
            SubjectKind::Blank => return Ok(vec![self.fallback_id(row)]),
        };

        Ok(raw
            .into_iter()
            .map(|id| match term_type {
                TermType::BlankNode if !id.starts_with("_:") => format!("_:{}", id),
                _ => id,
            })
            .collect())
    }

    /// Anonymous identity for a row: `_:` + escaped `<rule>_<row+1>`
    fn fallback_id(&self, row: usize) -> String {
        blank_node_label(&format!("{}_{}", self.tm.iri, row + 1))
    }

    async fn apply_predicate_object_map(
        &self,
        pom: &PredicateObjectMap,
        functions: &FunctionEvaluator<'_>,
        adapter: &dyn SourceAdapter,
        row: usize,
        record: &mut Record,
        meta: &mut JoinMeta,
    ) -> RmlResult<()> {
        let mut predicates = Vec::new();
        for pm in &pom.predicates {
            predicates.extend(self.predicate_values(adapter, row, pm)?);
        }
        if predicates.is_empty() {
            return Ok(());
        }

        for om in &pom.object_maps {
            match self.resolve_object(om, functions, adapter, row).await? {
                Resolved::Values(values) => {
                    for predicate in &predicates {
                        add_values(record, predicate, &values);
                    }
                }
                Resolved::Join { parent, conditions } => {
                    for predicate in &predicates {
                        meta.pending.push(PendingJoin {
                            predicate: predicate.clone(),
                            parent,
                            conditions: conditions.clone(),
                        });
                    }
                }
            }
        }
        Ok(())
    }

    pub(crate) fn predicate_values(
        &self,
        adapter: &dyn SourceAdapter,
        row: usize,
        pm: &PredicateMap,
    ) -> RmlResult<Vec<String>> {
        match pm {
            PredicateMap::Constant(iri) => Ok(vec![iri.clone()]),
            PredicateMap::Reference(selector) => self.strings(adapter, row, selector),
            PredicateMap::Template(template) => self.expand(adapter, row, template, false),
        }
    }

    async fn resolve_object(
        &self,
        om: &ObjectMap,
        functions: &FunctionEvaluator<'_>,
        adapter: &dyn SourceAdapter,
        row: usize,
    ) -> RmlResult<Resolved> {
        let term_type = om.resolved_term_type();

        let values = match &om.kind {
            ObjectKind::Parent(rom) => {
                return Ok(Resolved::Join {
                    parent: self.ctx.mapping.require_index(&rom.parent_triples_map)?,
                    conditions: self.pending_conditions(adapter, row, rom)?,
                })
            }
            ObjectKind::Constant(ConstantValue::Iri(iri)) => {
                vec![self.wrap(Value::String(iri.clone()), term_type, None, None)]
            }
            ObjectKind::Constant(ConstantValue::Literal {
                value,
                datatype,
                language,
            }) => {
                let language = match self.language(adapter, row, om)? {
                    Some(lang) => Some(lang),
                    None => language.clone(),
                };
                let datatype = om.datatype.clone().or_else(|| datatype.clone());
                vec![self.wrap(Value::String(value.clone()), term_type, datatype, language)]
            }
            ObjectKind::Reference(selector) => {
                let language = self.language(adapter, row, om)?;
                self.values(adapter, row, selector, om.datatype.as_deref())?
                    .into_iter()
                    .map(|v| self.wrap(v, term_type, om.datatype.clone(), language.clone()))
                    .collect()
            }
            ObjectKind::Template(template) => {
                let literal = term_type.is_some_and(|t| t.is_literal());
                let language = self.language(adapter, row, om)?;
                self.expand(adapter, row, template, literal)?
                    .into_iter()
                    .map(|s| {
                        self.wrap(
                            Value::String(s),
                            term_type,
                            om.datatype.clone(),
                            language.clone(),
                        )
                    })
                    .collect()
            }
            ObjectKind::Function(function) => {
                let result = unwrap_single(functions.invoke(function, row).await?);
                let language = self.language(adapter, row, om)?;
                match (term_type, result) {
                    (_, Value::Null) => Vec::new(),
                    (Some(tt), Value::Array(items)) => items
                        .into_iter()
                        .filter(|v| !v.is_null())
                        .map(|v| self.wrap(v, Some(tt), om.datatype.clone(), language.clone()))
                        .collect(),
                    (tt, value) => vec![self.wrap(value, tt, om.datatype.clone(), language)],
                }
            }
        };

        Ok(Resolved::Values(values))
    }

    fn pending_conditions(
        &self,
        adapter: &dyn SourceAdapter,
        row: usize,
        rom: &RefObjectMap,
    ) -> RmlResult<Vec<PendingCondition>> {
        rom.join_conditions
            .iter()
            .map(|jc| {
                Ok(PendingCondition {
                    parent_path: jc.parent.clone(),
                    child_values: self.values(adapter, row, &jc.child, None)?,
                })
            })
            .collect()
    }

    /// Language of an object map for a row
    ///
    /// A language map overrides the fixed language. The resolved tag must be
    /// valid BCP 47.
    fn language(
        &self,
        adapter: &dyn SourceAdapter,
        row: usize,
        om: &ObjectMap,
    ) -> RmlResult<Option<String>> {
        let from_map = match &om.language_map {
            Some(LanguageMap::Constant(tag)) => Some(tag.clone()),
            Some(LanguageMap::Reference(selector)) => {
                self.strings(adapter, row, selector)?.into_iter().next()
            }
            Some(LanguageMap::Template(template)) => {
                self.expand(adapter, row, template, true)?
                    .into_iter()
                    .next()
            }
            None => None,
        };
        let language = from_map.or_else(|| om.language.clone());
        if let Some(tag) = &language {
            validate_language_tag(tag)?;
        }
        Ok(language)
    }

    /// Wrap a value according to the term type
    ///
    /// Literals without a datatype or language take the run's default
    /// language when they are strings.
    fn wrap(
        &self,
        value: Value,
        term_type: Option<TermType>,
        datatype: Option<String>,
        language: Option<String>,
    ) -> ObjectValue {
        match term_type {
            Some(TermType::Iri) => ObjectValue::Reference(lexical(&value)),
            Some(TermType::BlankNode) => {
                let id = lexical(&value);
                if id.starts_with("_:") {
                    ObjectValue::Reference(id)
                } else {
                    ObjectValue::Reference(format!("_:{}", id))
                }
            }
            Some(TermType::Literal) | None => {
                let language = match (&language, &datatype, &value) {
                    (None, None, Value::String(_)) => self.ctx.options.language.clone(),
                    _ => language,
                };
                ObjectValue::Literal {
                    value,
                    datatype,
                    language,
                }
            }
        }
    }

    // =========================================================================
    // Row access
    // =========================================================================

    /// Selector values for a row, with ignored values removed
    pub(crate) fn values(
        &self,
        adapter: &dyn SourceAdapter,
        row: usize,
        selector: &str,
        datatype: Option<&str>,
    ) -> RmlResult<Vec<Value>> {
        let mut values = adapter.values_at(row, selector, datatype)?;
        values.retain(|v| !self.ctx.options.is_ignored(v));
        Ok(values)
    }

    /// Selector values for a row in lexical form
    pub(crate) fn strings(
        &self,
        adapter: &dyn SourceAdapter,
        row: usize,
        selector: &str,
    ) -> RmlResult<Vec<String>> {
        Ok(self
            .values(adapter, row, selector, None)?
            .iter()
            .map(lexical)
            .collect())
    }

    /// Expand a template for a row
    pub(crate) fn expand(
        &self,
        adapter: &dyn SourceAdapter,
        row: usize,
        template: &Template,
        literal: bool,
    ) -> RmlResult<Vec<String>> {
        expand_template(template, literal, |selector| {
            self.strings(adapter, row, selector)
        })
    }
}

/// Add values under a predicate; `rdf:type` values become record types
fn add_values(record: &mut Record, predicate: &str, values: &[ObjectValue]) {
    for value in values {
        if predicate == rdf::TYPE {
            match value {
                ObjectValue::Reference(id) => record.add_type(id.clone()),
                ObjectValue::Literal { value, .. } => {
                    for class in value_strings(value) {
                        record.add_type(class);
                    }
                }
            }
        } else {
            record.add(predicate, value.clone());
        }
    }
}

/// Lexical forms of a scalar or array value, nulls skipped
fn value_strings(value: &Value) -> Vec<String> {
    match value {
        Value::Null => Vec::new(),
        Value::Array(items) => items.iter().filter(|v| !v.is_null()).map(lexical).collect(),
        other => vec![lexical(other)],
    }
}
