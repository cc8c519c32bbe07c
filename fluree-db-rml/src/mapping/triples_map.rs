//! RML TriplesMap structures

use serde::{Deserialize, Serialize};

use super::{FunctionValue, ObjectKind, PredicateObjectMap, RefObjectMap, Template, TermType};
use crate::vocab::RML;

/// Selector language of a logical source
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferenceFormulation {
    /// `ql:CSV` - rows are CSV records, selectors are column names
    Csv,
    /// `ql:JSONPath`
    JsonPath,
    /// `ql:XPath`
    XPath,
}

impl ReferenceFormulation {
    /// Parse a reference formulation from its vocabulary IRI
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            RML::QL_CSV => Some(ReferenceFormulation::Csv),
            RML::QL_JSONPATH => Some(ReferenceFormulation::JsonPath),
            RML::QL_XPATH => Some(ReferenceFormulation::XPath),
            _ => None,
        }
    }

    /// Short name for diagnostics
    pub fn name(&self) -> &'static str {
        match self {
            ReferenceFormulation::Csv => "CSV",
            ReferenceFormulation::JsonPath => "JSONPath",
            ReferenceFormulation::XPath => "XPath",
        }
    }
}

/// Logical source (`rml:logicalSource`)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LogicalSource {
    /// Source identifier, used to look up the supplied content
    pub source: String,
    /// Iterator selector; ignored for CSV
    pub iterator: Option<String>,
    /// Selector language
    pub reference_formulation: ReferenceFormulation,
}

impl LogicalSource {
    /// Create a logical source
    pub fn new(
        source: impl Into<String>,
        reference_formulation: ReferenceFormulation,
        iterator: Option<&str>,
    ) -> Self {
        Self {
            source: source.into(),
            iterator: iterator.map(str::to_string),
            reference_formulation,
        }
    }
}

/// How a subject map produces record identities
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum SubjectKind {
    /// `rml:reference` - one identity per non-empty selector value
    Reference(String),
    /// `rr:template` - Cartesian expansion of the placeholders
    Template(Template),
    /// `fnml:functionValue` - identity computed per row
    Function(Box<FunctionValue>),
    /// `rr:constant` / `rr:subject` - the same identity for every row
    Constant(String),
    /// No value source - an anonymous identity per row
    Blank,
}

/// Subject map
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubjectMap {
    /// Identity assignment path
    pub kind: SubjectKind,
    /// Explicit `rr:termType`, if any
    pub term_type: Option<TermType>,
    /// Constant `rr:class` values
    pub classes: Vec<String>,
    /// Function-derived `rr:class`
    pub class_function: Option<FunctionValue>,
}

impl SubjectMap {
    fn of(kind: SubjectKind) -> Self {
        Self {
            kind,
            term_type: None,
            classes: Vec::new(),
            class_function: None,
        }
    }

    /// Create a template subject map
    pub fn template(template: Template) -> Self {
        Self::of(SubjectKind::Template(template))
    }

    /// Create a reference subject map
    pub fn reference(selector: impl Into<String>) -> Self {
        Self::of(SubjectKind::Reference(selector.into()))
    }

    /// Create a constant subject map
    pub fn constant(iri: impl Into<String>) -> Self {
        Self::of(SubjectKind::Constant(iri.into()))
    }

    /// Create a blank-node subject map
    pub fn blank() -> Self {
        Self::of(SubjectKind::Blank)
    }

    /// Create a function-valued subject map
    pub fn function(function: FunctionValue) -> Self {
        Self::of(SubjectKind::Function(Box::new(function)))
    }

    /// Add a class
    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    /// Set the term type
    pub fn with_term_type(mut self, term_type: TermType) -> Self {
        self.term_type = Some(term_type);
        self
    }

    /// Effective term type: blank subjects default to blank nodes, every
    /// other variant to IRIs
    pub fn resolved_term_type(&self) -> TermType {
        match (self.term_type, &self.kind) {
            (Some(tt), _) => tt,
            (None, SubjectKind::Blank) => TermType::BlankNode,
            (None, _) => TermType::Iri,
        }
    }
}

/// A TriplesMap (mapping rule)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TriplesMap {
    /// IRI (or blank node label) of the TriplesMap
    pub iri: String,
    /// Logical source iterated by this rule
    pub logical_source: LogicalSource,
    /// Subject map
    pub subject_map: SubjectMap,
    /// Predicate-object maps in mapping order
    pub predicate_object_maps: Vec<PredicateObjectMap>,
}

impl TriplesMap {
    /// Create a TriplesMap with a blank subject and no predicate-object maps
    pub fn new(iri: impl Into<String>, logical_source: LogicalSource) -> Self {
        Self {
            iri: iri.into(),
            logical_source,
            subject_map: SubjectMap::blank(),
            predicate_object_maps: Vec::new(),
        }
    }

    /// RefObjectMaps deferred to the join resolver (top-level object maps)
    pub fn join_ref_object_maps(&self) -> impl Iterator<Item = &RefObjectMap> {
        self.predicate_object_maps
            .iter()
            .flat_map(|pom| pom.ref_object_maps())
    }

    /// Every RefObjectMap in this TriplesMap, including those used as
    /// function parameters
    pub fn all_ref_object_maps(&self) -> Vec<&RefObjectMap> {
        let mut out: Vec<&RefObjectMap> = self.join_ref_object_maps().collect();
        let mut functions: Vec<&FunctionValue> = Vec::new();
        if let SubjectKind::Function(f) = &self.subject_map.kind {
            functions.push(f);
        }
        if let Some(f) = &self.subject_map.class_function {
            functions.push(f);
        }
        for pom in &self.predicate_object_maps {
            for om in &pom.object_maps {
                if let ObjectKind::Function(f) = &om.kind {
                    functions.push(f);
                }
            }
        }
        for f in functions {
            out.extend(f.ref_object_maps());
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mapping::{ObjectMap, PredicateObjectMap};

    #[test]
    fn test_reference_formulation_from_iri() {
        assert_eq!(
            ReferenceFormulation::from_iri(RML::QL_JSONPATH),
            Some(ReferenceFormulation::JsonPath)
        );
        assert_eq!(
            ReferenceFormulation::from_iri(RML::QL_CSV),
            Some(ReferenceFormulation::Csv)
        );
        assert_eq!(ReferenceFormulation::from_iri("http://example.org/x"), None);
    }

    #[test]
    fn test_subject_term_type_defaults() {
        assert_eq!(
            SubjectMap::blank().resolved_term_type(),
            TermType::BlankNode
        );
        assert_eq!(
            SubjectMap::reference("id").resolved_term_type(),
            TermType::Iri
        );
        assert_eq!(
            SubjectMap::reference("id")
                .with_term_type(TermType::BlankNode)
                .resolved_term_type(),
            TermType::BlankNode
        );
    }

    #[test]
    fn test_ref_object_maps_include_function_parameters() {
        let mut tm = TriplesMap::new(
            "#People",
            LogicalSource::new("people.json", ReferenceFormulation::JsonPath, Some("$[*]")),
        );
        tm.predicate_object_maps.push(PredicateObjectMap::new(
            "http://example.org/knows",
            ObjectMap::parent(RefObjectMap::unconditional("#Other")),
        ));
        tm.predicate_object_maps.push(PredicateObjectMap::new(
            "http://example.org/all",
            ObjectMap::function(FunctionValue::new(
                "_:fn",
                vec![PredicateObjectMap::new(
                    "http://example.org/param",
                    ObjectMap::parent(RefObjectMap::unconditional("#Third")),
                )],
            )),
        ));

        assert_eq!(tm.join_ref_object_maps().count(), 1);
        let all: Vec<_> = tm
            .all_ref_object_maps()
            .into_iter()
            .map(|r| r.parent_triples_map.as_str())
            .collect();
        assert_eq!(all, vec!["#Other", "#Third"]);
    }
}
