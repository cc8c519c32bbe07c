//! RML RefObjectMap structures
//!
//! RefObjectMaps define references between TriplesMap definitions,
//! enabling joins across independently iterated logical sources.

use serde::{Deserialize, Serialize};

/// Reference to another TriplesMap with join conditions
///
/// # Example RML
///
/// ```turtle
/// <#RouteMapping> a rr:TriplesMap ;
///     rr:predicateObjectMap [
///         rr:predicate ex:airline ;
///         rr:objectMap [
///             rr:parentTriplesMap <#AirlineMapping> ;
///             rr:joinCondition [
///                 rr:child "airline_id" ;
///                 rr:parent "id"
///             ]
///         ]
///     ] .
/// ```
///
/// For each route record, the `ex:airline` predicate receives the identity of
/// every AirlineMapping record whose `id` equals the route's `airline_id`.
/// Without join conditions every parent record is referenced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RefObjectMap {
    /// IRI of the parent TriplesMap
    pub parent_triples_map: String,
    /// Join conditions (empty means cross product)
    pub join_conditions: Vec<JoinCondition>,
}

impl RefObjectMap {
    /// Create a RefObjectMap with a single join condition
    pub fn new(
        parent_triples_map: impl Into<String>,
        child: impl Into<String>,
        parent: impl Into<String>,
    ) -> Self {
        Self {
            parent_triples_map: parent_triples_map.into(),
            join_conditions: vec![JoinCondition::new(child, parent)],
        }
    }

    /// Create a RefObjectMap without join conditions
    pub fn unconditional(parent_triples_map: impl Into<String>) -> Self {
        Self {
            parent_triples_map: parent_triples_map.into(),
            join_conditions: Vec::new(),
        }
    }

    /// Create a RefObjectMap with multiple join conditions (composite key)
    pub fn with_conditions(
        parent_triples_map: impl Into<String>,
        conditions: Vec<JoinCondition>,
    ) -> Self {
        Self {
            parent_triples_map: parent_triples_map.into(),
            join_conditions: conditions,
        }
    }

    /// Get all parent selectors used in join conditions
    pub fn parent_paths(&self) -> Vec<&str> {
        self.join_conditions
            .iter()
            .map(|jc| jc.parent.as_str())
            .collect()
    }
}

/// A single join condition
///
/// The child selector, evaluated on the referencing row, must equal the
/// parent selector evaluated on the parent TriplesMap's row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JoinCondition {
    /// Selector in the current (child) TriplesMap's logical source
    pub child: String,
    /// Selector in the parent TriplesMap's logical source
    pub parent: String,
}

impl JoinCondition {
    /// Create a new join condition
    pub fn new(child: impl Into<String>, parent: impl Into<String>) -> Self {
        Self {
            child: child.into(),
            parent: parent.into(),
        }
    }
}
