//! Function value resolution
//!
//! A function value is a small set of predicate-object members: one member
//! names the function through `fno:executes`, the rest are parameters keyed
//! by their predicate. Parameters are resolved against the current row and
//! passed to the registered callable as a [`FunctionArgs`] bag.

use futures::future::{BoxFuture, FutureExt};
use serde_json::Value;
use tracing::trace;

use super::rule::RuleEvaluator;
use crate::error::{RmlError, RmlResult};
use crate::function::FunctionArgs;
use crate::mapping::{
    ConstantValue, FunctionValue, ObjectKind, ObjectMap, PredicateObjectMap, RefObjectMap,
};
use crate::source::{lexical, SourceAdapter};
use crate::vocab::RML;

/// Unwrap a single-element array to its element
pub(crate) fn unwrap_single(value: Value) -> Value {
    match value {
        Value::Array(mut items) if items.len() == 1 => items.remove(0),
        other => other,
    }
}

/// Resolves and invokes function values for the rows of one rule
pub(crate) struct FunctionEvaluator<'a> {
    rule: &'a RuleEvaluator<'a>,
    adapter: &'a dyn SourceAdapter,
}

impl<'a> FunctionEvaluator<'a> {
    pub(crate) fn new(rule: &'a RuleEvaluator<'a>, adapter: &'a dyn SourceAdapter) -> Self {
        Self { rule, adapter }
    }

    /// Resolve the parameters of `fv` for `row` and call the function
    pub(crate) fn invoke<'f>(
        &'f self,
        fv: &'f FunctionValue,
        row: usize,
    ) -> BoxFuture<'f, RmlResult<Value>> {
        async move {
            let function_id = executes(fv)?;
            let function = self.rule.ctx.registry.lookup(&function_id).ok_or_else(|| {
                RmlError::function(format!("unknown function identifier {}", function_id))
            })?;

            let mut args = FunctionArgs::new();
            for member in &fv.members {
                if member.has_constant_predicate(RML::EXECUTES) {
                    continue;
                }
                self.collect_parameter(member, row, &mut args).await?;
            }

            trace!(function = %function_id, row, args = args.len(), "calling function");
            function.call(args).await
        }
        .boxed()
    }

    async fn collect_parameter(
        &self,
        member: &PredicateObjectMap,
        row: usize,
        args: &mut FunctionArgs,
    ) -> RmlResult<()> {
        let mut keys = Vec::new();
        for pm in &member.predicates {
            keys.extend(self.rule.predicate_values(self.adapter, row, pm)?);
        }

        for om in &member.object_maps {
            let values = self.parameter_values(om, row).await?;
            for key in &keys {
                if values.is_empty() {
                    args.push(key.clone(), Value::Null);
                }
                for value in &values {
                    args.push(key.clone(), value.clone());
                }
            }
        }
        Ok(())
    }

    /// Values of one parameter object map
    ///
    /// Multi-valued selectors and templates produce one entry per value.
    async fn parameter_values(&self, om: &ObjectMap, row: usize) -> RmlResult<Vec<Value>> {
        match &om.kind {
            ObjectKind::Constant(constant) => {
                Ok(vec![Value::String(constant.lexical().to_string())])
            }
            ObjectKind::Reference(selector) => {
                self.rule
                    .values(self.adapter, row, selector, om.datatype.as_deref())
            }
            ObjectKind::Template(template) => Ok(self
                .rule
                .expand(self.adapter, row, template, true)?
                .into_iter()
                .map(Value::String)
                .collect()),
            ObjectKind::Function(nested) => match self.invoke(nested, row).await? {
                Value::Null => Ok(Vec::new()),
                value => Ok(vec![value]),
            },
            ObjectKind::Parent(rom) => Ok(vec![self.parent_records(rom, row).await?]),
        }
    }

    /// Evaluate a referenced rule now and pass its records as an array
    ///
    /// With join conditions, only the records whose parent values match this
    /// row's child values are passed.
    async fn parent_records(&self, rom: &RefObjectMap, row: usize) -> RmlResult<Value> {
        let ctx = self.rule.ctx;
        let parent = ctx.mapping.require_index(&rom.parent_triples_map)?;
        let output = ctx.evaluate(parent).await?;

        let mut children = Vec::with_capacity(rom.join_conditions.len());
        for jc in &rom.join_conditions {
            let values = self.rule.values(self.adapter, row, &jc.child, None)?;
            children.push((jc.parent.as_str(), values.first().map(lexical)));
        }

        let records = output
            .records
            .iter()
            .zip(&output.joins)
            .filter(|(_, meta)| {
                children.iter().all(|(path, child)| match child {
                    Some(child) => meta
                        .parent_values
                        .get(*path)
                        .is_some_and(|values| values.iter().any(|v| lexical(v) == *child)),
                    None => false,
                })
            })
            .map(|(record, _)| record.to_json())
            .collect();
        Ok(Value::Array(records))
    }
}

/// Function identifier named by the `fno:executes` member
fn executes(fv: &FunctionValue) -> RmlResult<String> {
    let mut ids = Vec::new();
    for member in fv
        .members
        .iter()
        .filter(|m| m.has_constant_predicate(RML::EXECUTES))
    {
        for om in &member.object_maps {
            match &om.kind {
                ObjectKind::Constant(ConstantValue::Iri(id)) => ids.push(id.clone()),
                ObjectKind::Constant(ConstantValue::Literal { value, .. }) => {
                    ids.push(value.clone())
                }
                _ => {
                    return Err(RmlError::function(format!(
                        "executes object of {} is not a constant",
                        fv.id
                    )))
                }
            }
        }
    }

    match ids.len() {
        0 => Err(RmlError::function(format!(
            "no function identifier found for {}",
            fv.id
        ))),
        1 => Ok(ids.remove(0)),
        _ => Err(RmlError::function(format!(
            "multiple function identifiers specified for {}",
            fv.id
        ))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{PredicateMap, Template};

    fn executes_member(id: &str) -> PredicateObjectMap {
        PredicateObjectMap::new(RML::EXECUTES, ObjectMap::constant_iri(id))
    }

    #[test]
    fn test_unwrap_single() {
        assert_eq!(
            unwrap_single(serde_json::json!(["a"])),
            serde_json::json!("a")
        );
        assert_eq!(
            unwrap_single(serde_json::json!(["a", "b"])),
            serde_json::json!(["a", "b"])
        );
        assert_eq!(unwrap_single(serde_json::json!(3)), serde_json::json!(3));
    }

    #[test]
    fn test_executes_single() {
        let fv = FunctionValue::new(
            "_:fn",
            vec![
                executes_member("http://example.com/fn#upper"),
                PredicateObjectMap::new("http://example.com/p", ObjectMap::reference("name")),
            ],
        );
        assert_eq!(executes(&fv).unwrap(), "http://example.com/fn#upper");
    }

    #[test]
    fn test_executes_missing() {
        let fv = FunctionValue::new(
            "_:fn",
            vec![PredicateObjectMap::new(
                "http://example.com/p",
                ObjectMap::reference("name"),
            )],
        );
        assert!(matches!(executes(&fv), Err(RmlError::Function(_))));
    }

    #[test]
    fn test_executes_multiple() {
        let fv = FunctionValue::new(
            "_:fn",
            vec![
                executes_member("http://example.com/fn#a"),
                executes_member("http://example.com/fn#b"),
            ],
        );
        let err = executes(&fv).unwrap_err();
        assert!(err.to_string().contains("multiple"));
    }

    #[test]
    fn test_executes_not_constant() {
        let fv = FunctionValue::new(
            "_:fn",
            vec![PredicateObjectMap {
                predicates: vec![PredicateMap::constant(RML::EXECUTES)],
                object_maps: vec![ObjectMap::template(
                    Template::parse("http://example.com/{fn}").unwrap(),
                )],
            }],
        );
        let err = executes(&fv).unwrap_err();
        assert!(err.to_string().contains("not a constant"));
    }
}
