//! Function-valued term maps (`fnml:functionValue`)

use serde::{Deserialize, Serialize};

use super::{ObjectKind, PredicateObjectMap, RefObjectMap};

/// A function value
///
/// Structurally a restricted set of predicate-object maps: exactly one
/// member names the function through `fno:executes`, every other member
/// supplies parameters keyed by its predicate. The members are kept as
/// written; the function evaluator locates the function identifier and
/// reports malformed shapes when the value is invoked.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionValue {
    /// Node identifier of the function value in the mapping graph
    pub id: String,
    /// Predicate-object members of the function value
    pub members: Vec<PredicateObjectMap>,
}

impl FunctionValue {
    /// Create a function value from its members
    pub fn new(id: impl Into<String>, members: Vec<PredicateObjectMap>) -> Self {
        Self {
            id: id.into(),
            members,
        }
    }

    /// Every RefObjectMap reachable from this function value, nested
    /// function values included
    pub fn ref_object_maps(&self) -> Vec<&RefObjectMap> {
        let mut out = Vec::new();
        for member in &self.members {
            for om in &member.object_maps {
                match &om.kind {
                    ObjectKind::Parent(rom) => out.push(rom),
                    ObjectKind::Function(nested) => out.extend(nested.ref_object_maps()),
                    _ => {}
                }
            }
        }
        out
    }
}
