//! Join resolution
//!
//! Runs once every rule has been evaluated. Pending parent-rule references
//! recorded during evaluation are turned into identity references, either
//! as a cross product (no join conditions) or through a hash join per
//! (predicate, parent path) on the lexical form of the recorded values.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use tracing::{debug, warn};

use super::run::{PendingJoin, RuleOutput};
use crate::mapping::CompiledRmlMapping;
use crate::output::{ObjectValue, Record};
use crate::source::lexical;

/// Parent path value -> positions of the target records carrying it
type JoinIndex = HashMap<String, Vec<usize>>;

/// Resolve pending joins and return the final records in rule order
///
/// `outputs[i]` is the output of the rule at index `i` of `mapping`.
pub(crate) fn resolve(mapping: &CompiledRmlMapping, outputs: &[Arc<RuleOutput>]) -> Vec<Record> {
    let mut indexes: HashMap<(usize, String), JoinIndex> = HashMap::new();
    let mut resolved = Vec::with_capacity(outputs.iter().map(|o| o.len()).sum());

    for (idx, output) in outputs.iter().enumerate() {
        // Every record of a rule shares the first record's join shape
        let shape: &[PendingJoin] = output
            .joins
            .first()
            .map(|meta| meta.pending.as_slice())
            .unwrap_or_default();

        let mut records = output.records.clone();
        for (slot, join) in shape.iter().enumerate() {
            let Some(target) = outputs.get(join.parent) else {
                continue;
            };

            if join.conditions.is_empty() {
                for record in records.iter_mut() {
                    for parent in &target.records {
                        record.add(&join.predicate, ObjectValue::Reference(parent.id.clone()));
                    }
                }
                continue;
            }

            for condition in &join.conditions {
                indexes
                    .entry((join.parent, condition.parent_path.clone()))
                    .or_insert_with(|| {
                        build_index(mapping, join.parent, &condition.parent_path, target)
                    });
            }

            for (record, meta) in records.iter_mut().zip(&output.joins) {
                let Some(pending) = meta.pending.get(slot) else {
                    continue;
                };
                for position in matches(mapping, idx, pending, &indexes) {
                    let parent = &target.records[position];
                    record.add(&join.predicate, ObjectValue::Reference(parent.id.clone()));
                }
            }
        }
        resolved.extend(records);
    }

    resolved
}

/// Index a target rule's records by their recorded value for `parent_path`
fn build_index(
    mapping: &CompiledRmlMapping,
    target: usize,
    parent_path: &str,
    output: &RuleOutput,
) -> JoinIndex {
    let mut index = JoinIndex::new();
    for (position, meta) in output.joins.iter().enumerate() {
        let values = meta
            .parent_values
            .get(parent_path)
            .map(Vec::as_slice)
            .unwrap_or_default();
        match values {
            [] => {}
            [value] => index.entry(lexical(value)).or_default().push(position),
            _ => warn!(
                rule = %mapping.at(target).iri,
                record = %output.records[position].id,
                parent_path,
                "multiple values for join parent path, record not indexed"
            ),
        }
    }
    debug!(
        rule = %mapping.at(target).iri,
        parent_path,
        keys = index.len(),
        "join index built"
    );
    index
}

/// Target record positions matching every condition of a pending join
fn matches(
    mapping: &CompiledRmlMapping,
    rule: usize,
    pending: &PendingJoin,
    indexes: &HashMap<(usize, String), JoinIndex>,
) -> Vec<usize> {
    let mut surviving: Option<Vec<usize>> = None;

    for condition in &pending.conditions {
        let child = match condition.child_values.as_slice() {
            [] => return Vec::new(),
            [value] => lexical(value),
            [first, ..] => {
                warn!(
                    rule = %mapping.at(rule).iri,
                    predicate = %pending.predicate,
                    "multiple values for join child path, using the first"
                );
                lexical(first)
            }
        };

        let found: &[usize] = indexes
            .get(&(pending.parent, condition.parent_path.clone()))
            .and_then(|index| index.get(&child))
            .map(Vec::as_slice)
            .unwrap_or_default();

        surviving = Some(match surviving {
            None => found.to_vec(),
            Some(previous) => {
                let keep: HashSet<usize> = found.iter().copied().collect();
                previous.into_iter().filter(|p| keep.contains(p)).collect()
            }
        });
    }

    surviving.unwrap_or_default()
}
