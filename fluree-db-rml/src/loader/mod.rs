//! RML loader module
//!
//! Mappings are read into a [`NodeGraph`] (an identity-indexed view of the
//! mapping document) and TriplesMap definitions are extracted from it.
//!
//! For custom parsers, build a `NodeGraph` and use `RmlLoader::from_graph()`.

mod extractor;
mod node_graph;

pub use extractor::MappingExtractor;
pub use node_graph::{Node, NodeGraph, NodeTerm};

use serde_json::Value;

use crate::error::{RmlError, RmlResult};
use crate::mapping::CompiledRmlMapping;

/// RML mapping loader
///
/// Use `from_jsonld()` or `from_graph()` to create a loader, then call
/// `compile()` to extract and index the mappings.
pub struct RmlLoader {
    /// The flattened mapping document
    graph: NodeGraph,
}

impl RmlLoader {
    /// Load RML from a node graph
    pub fn from_graph(graph: NodeGraph) -> Self {
        Self { graph }
    }

    /// Load RML from a JSON-LD document
    pub fn from_jsonld(content: &str) -> RmlResult<Self> {
        let doc: Value = serde_json::from_str(content).map_err(|e| RmlError::Parse(e.to_string()))?;
        Self::from_jsonld_value(&doc)
    }

    /// Load RML from an already parsed JSON-LD value
    pub fn from_jsonld_value(doc: &Value) -> RmlResult<Self> {
        Ok(Self {
            graph: NodeGraph::from_jsonld(doc)?,
        })
    }

    /// Get a reference to the underlying graph
    pub fn graph(&self) -> &NodeGraph {
        &self.graph
    }

    /// Extract all TriplesMap definitions and index them
    pub fn compile(self) -> RmlResult<CompiledRmlMapping> {
        let extractor = MappingExtractor::new(&self.graph);
        let triples_maps = extractor.extract_all()?;
        CompiledRmlMapping::new(triples_maps)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SIMPLE_MAPPING: &str = r#"{
        "@context": {
            "rr": "http://www.w3.org/ns/r2rml#",
            "rml": "http://semweb.mmlab.be/ns/rml#",
            "ql": "http://semweb.mmlab.be/ns/ql#",
            "ex": "http://example.org/"
        },
        "@graph": [{
            "@id": "ex:AirlineMapping",
            "@type": "rr:TriplesMap",
            "rml:logicalSource": {
                "rml:source": "airlines.csv",
                "rml:referenceFormulation": { "@id": "ql:CSV" }
            },
            "rr:subjectMap": {
                "rr:template": "http://example.org/airline/{id}",
                "rr:class": { "@id": "ex:Airline" }
            },
            "rr:predicateObjectMap": [{
                "rr:predicate": { "@id": "ex:name" },
                "rr:objectMap": { "rml:reference": "name" }
            }]
        }]
    }"#;

    #[test]
    fn test_from_jsonld() {
        let loader = RmlLoader::from_jsonld(SIMPLE_MAPPING).unwrap();
        assert!(!loader.graph().is_empty());
    }

    #[test]
    fn test_compile() {
        let loader = RmlLoader::from_jsonld(SIMPLE_MAPPING).unwrap();
        let mapping = loader.compile().unwrap();

        assert_eq!(mapping.len(), 1);
        assert!(mapping.get("http://example.org/AirlineMapping").is_some());
    }

    #[test]
    fn test_invalid_json() {
        assert!(matches!(RmlLoader::from_jsonld("{ nope"), Err(RmlError::Parse(_))));
    }
}
