//! Compiled RML mapping with indexes
//!
//! Rules are stored in an arena (document order) and addressed by index.
//! The indexes give the evaluation engine constant-time lookup by IRI and
//! the per-rule list of parent-side join selectors.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::TriplesMap;
use crate::error::{RmlError, RmlResult};

/// Complete compiled RML mapping
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct CompiledRmlMapping {
    /// All TriplesMap definitions in mapping order
    triples_maps: Vec<TriplesMap>,

    /// Index: TriplesMap IRI → arena index
    by_iri: HashMap<String, usize>,

    /// Index: arena index → parent-side selectors of every join condition
    /// that references this TriplesMap, function parameters included
    /// (deduplicated, discovery order)
    parent_paths: Vec<Vec<String>>,
}

impl CompiledRmlMapping {
    /// Create a compiled mapping from a list of TriplesMap definitions
    ///
    /// Fails if two TriplesMaps share an IRI or if any RefObjectMap
    /// (including function parameters) names an unknown TriplesMap.
    pub fn new(triples_maps: Vec<TriplesMap>) -> RmlResult<Self> {
        let mut by_iri = HashMap::with_capacity(triples_maps.len());
        for (idx, tm) in triples_maps.iter().enumerate() {
            if by_iri.insert(tm.iri.clone(), idx).is_some() {
                return Err(RmlError::InvalidValue {
                    property: "rr:TriplesMap".to_string(),
                    message: format!("duplicate TriplesMap {}", tm.iri),
                });
            }
        }

        let mut parent_paths: Vec<Vec<String>> = vec![Vec::new(); triples_maps.len()];
        for tm in &triples_maps {
            for rom in tm.all_ref_object_maps() {
                let Some(&parent_idx) = by_iri.get(&rom.parent_triples_map) else {
                    return Err(RmlError::UnknownTriplesMap(rom.parent_triples_map.clone()));
                };
                let paths = &mut parent_paths[parent_idx];
                for path in rom.parent_paths() {
                    if !paths.iter().any(|p| p == path) {
                        paths.push(path.to_string());
                    }
                }
            }
        }

        Ok(Self {
            triples_maps,
            by_iri,
            parent_paths,
        })
    }

    /// Get a TriplesMap by IRI
    pub fn get(&self, iri: &str) -> Option<&TriplesMap> {
        self.by_iri.get(iri).map(|&idx| &self.triples_maps[idx])
    }

    /// Arena index of a TriplesMap
    pub fn index_of(&self, iri: &str) -> Option<usize> {
        self.by_iri.get(iri).copied()
    }

    /// Arena index of a TriplesMap, as an error when unknown
    pub fn require_index(&self, iri: &str) -> RmlResult<usize> {
        self.index_of(iri)
            .ok_or_else(|| RmlError::UnknownTriplesMap(iri.to_string()))
    }

    /// TriplesMap at an arena index
    pub fn at(&self, idx: usize) -> &TriplesMap {
        &self.triples_maps[idx]
    }

    /// All TriplesMaps in mapping order
    pub fn triples_maps(&self) -> &[TriplesMap] {
        &self.triples_maps
    }

    /// Parent-side join selectors this TriplesMap must record per row
    pub fn parent_paths(&self, idx: usize) -> &[String] {
        &self.parent_paths[idx]
    }

    /// Get the number of TriplesMap definitions
    pub fn len(&self) -> usize {
        self.triples_maps.len()
    }

    /// Check if the mapping is empty
    pub fn is_empty(&self) -> bool {
        self.triples_maps.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{
        JoinCondition, LogicalSource, ObjectMap, PredicateObjectMap, RefObjectMap,
        ReferenceFormulation, SubjectMap, Template,
    };

    fn make_airline_mapping() -> TriplesMap {
        let mut tm = TriplesMap::new(
            "#AirlineMapping",
            LogicalSource::new("airlines.csv", ReferenceFormulation::Csv, None),
        );
        tm.subject_map = SubjectMap::template(
            Template::parse("http://example.org/airline/{id}").unwrap(),
        )
        .with_class("http://example.org/Airline");
        tm.predicate_object_maps = vec![
            PredicateObjectMap::new("http://example.org/name", ObjectMap::reference("name")),
            PredicateObjectMap::new(
                "http://example.org/country",
                ObjectMap::reference("country"),
            ),
        ];
        tm
    }

    fn make_route_mapping() -> TriplesMap {
        let mut tm = TriplesMap::new(
            "#RouteMapping",
            LogicalSource::new("routes.csv", ReferenceFormulation::Csv, None),
        );
        tm.subject_map =
            SubjectMap::template(Template::parse("http://example.org/route/{id}").unwrap());
        tm.predicate_object_maps = vec![PredicateObjectMap::new(
            "http://example.org/airline",
            ObjectMap::parent(RefObjectMap::with_conditions(
                "#AirlineMapping",
                vec![
                    JoinCondition::new("airline_id", "id"),
                    JoinCondition::new("airline_code", "code"),
                ],
            )),
        )];
        tm
    }

    #[test]
    fn test_compiled_mapping_new() {
        let mapping = CompiledRmlMapping::new(vec![make_airline_mapping()]).unwrap();

        assert_eq!(mapping.len(), 1);
        assert!(!mapping.is_empty());
        assert!(mapping.get("#AirlineMapping").is_some());
        assert_eq!(mapping.index_of("#AirlineMapping"), Some(0));
        assert!(mapping.require_index("#Missing").is_err());
    }

    #[test]
    fn test_parent_paths() {
        let mapping =
            CompiledRmlMapping::new(vec![make_airline_mapping(), make_route_mapping()]).unwrap();

        assert_eq!(
            mapping.parent_paths(0),
            &["id".to_string(), "code".to_string()]
        );
        assert!(mapping.parent_paths(1).is_empty());
    }

    #[test]
    fn test_unknown_parent_is_rejected() {
        let err = CompiledRmlMapping::new(vec![make_route_mapping()]).unwrap_err();
        assert!(matches!(err, RmlError::UnknownTriplesMap(ref iri) if iri == "#AirlineMapping"));
    }

    #[test]
    fn test_duplicate_iri_is_rejected() {
        let result = CompiledRmlMapping::new(vec![make_airline_mapping(), make_airline_mapping()]);
        assert!(result.is_err());
    }
}
