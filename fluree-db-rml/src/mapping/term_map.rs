//! RML term map structures
//!
//! Term maps define how record identities, predicates and values are
//! generated from logical source rows.

use serde::{Deserialize, Serialize};

use super::{FunctionValue, RefObjectMap, Template};
use crate::vocab::RML;

/// RML term type
///
/// Specifies whether a term map generates IRIs, blank nodes, or literals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum TermType {
    /// Generate an IRI (default for subject and predicate maps)
    #[default]
    Iri,
    /// Generate a blank node
    BlankNode,
    /// Generate a literal
    Literal,
}

impl TermType {
    /// Parse term type from its vocabulary IRI
    pub fn from_iri(iri: &str) -> Option<Self> {
        match iri {
            RML::IRI => Some(TermType::Iri),
            RML::BLANK_NODE => Some(TermType::BlankNode),
            RML::LITERAL => Some(TermType::Literal),
            _ => None,
        }
    }

    /// Check if this term type produces IRIs
    pub fn is_iri(&self) -> bool {
        matches!(self, TermType::Iri)
    }

    /// Check if this term type produces blank nodes
    pub fn is_blank_node(&self) -> bool {
        matches!(self, TermType::BlankNode)
    }

    /// Check if this term type produces literals
    pub fn is_literal(&self) -> bool {
        matches!(self, TermType::Literal)
    }
}

/// Predicate-object map
///
/// Pairs one or more predicate maps with one or more object maps. Every
/// resolved predicate receives every resolved object.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PredicateObjectMap {
    /// Predicate maps (`rr:predicate` shortcuts and `rr:predicateMap`s)
    pub predicates: Vec<PredicateMap>,
    /// Object maps (`rr:object` shortcuts and `rr:objectMap`s)
    pub object_maps: Vec<ObjectMap>,
}

impl PredicateObjectMap {
    /// Create a predicate-object map with a single constant predicate
    pub fn new(predicate: impl Into<String>, object_map: ObjectMap) -> Self {
        Self {
            predicates: vec![PredicateMap::constant(predicate)],
            object_maps: vec![object_map],
        }
    }

    /// Check whether any constant predicate alternative equals `iri`
    pub fn has_constant_predicate(&self, iri: &str) -> bool {
        self.predicates.iter().any(|p| p.as_constant() == Some(iri))
    }

    /// Reference object maps of this predicate-object map
    pub fn ref_object_maps(&self) -> impl Iterator<Item = &RefObjectMap> {
        self.object_maps.iter().filter_map(|om| om.as_ref())
    }
}

/// Predicate map
///
/// Most mappings use constant predicates via `rr:predicate`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum PredicateMap {
    /// `rr:predicate` or `rr:predicateMap [ rr:constant ]`
    Constant(String),
    /// `rr:predicateMap [ rml:reference ]`
    Reference(String),
    /// `rr:predicateMap [ rr:template ]`
    Template(Template),
}

impl PredicateMap {
    /// Create a constant predicate map
    pub fn constant(iri: impl Into<String>) -> Self {
        PredicateMap::Constant(iri.into())
    }

    /// Get the constant IRI if this is a constant predicate
    pub fn as_constant(&self) -> Option<&str> {
        match self {
            PredicateMap::Constant(iri) => Some(iri),
            _ => None,
        }
    }

    /// Check if this predicate map generates a constant value
    pub fn is_constant(&self) -> bool {
        matches!(self, PredicateMap::Constant(_))
    }
}

/// Constant value of a term map
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ConstantValue {
    /// Constant IRI
    Iri(String),
    /// Constant literal with optional datatype and language
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl ConstantValue {
    /// Lexical form of the constant
    pub fn lexical(&self) -> &str {
        match self {
            ConstantValue::Iri(iri) => iri,
            ConstantValue::Literal { value, .. } => value,
        }
    }
}

/// Language map (`rml:languageMap`)
///
/// Overrides a fixed `rr:language` on the same object map.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum LanguageMap {
    /// `rr:constant`
    Constant(String),
    /// `rml:reference`
    Reference(String),
    /// `rr:template`
    Template(Template),
}

/// How an object map produces its values
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum ObjectKind {
    /// `rr:constant` / `rr:object`
    Constant(ConstantValue),
    /// `rml:reference` - selector evaluated against the row
    Reference(String),
    /// `rr:template`
    Template(Template),
    /// `fnml:functionValue`
    Function(Box<FunctionValue>),
    /// `rr:parentTriplesMap` - resolved by the join resolver
    Parent(RefObjectMap),
}

/// Object map (term specification)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObjectMap {
    /// Value source of this object map
    pub kind: ObjectKind,
    /// Explicit `rr:termType`, if any
    pub term_type: Option<TermType>,
    /// `rr:datatype`
    pub datatype: Option<String>,
    /// Fixed `rr:language`
    pub language: Option<String>,
    /// `rml:languageMap`
    pub language_map: Option<LanguageMap>,
}

impl ObjectMap {
    fn of(kind: ObjectKind) -> Self {
        Self {
            kind,
            term_type: None,
            datatype: None,
            language: None,
            language_map: None,
        }
    }

    /// Create a reference object map
    pub fn reference(selector: impl Into<String>) -> Self {
        Self::of(ObjectKind::Reference(selector.into()))
    }

    /// Create a constant IRI object map
    pub fn constant_iri(iri: impl Into<String>) -> Self {
        Self::of(ObjectKind::Constant(ConstantValue::Iri(iri.into())))
    }

    /// Create a constant literal object map
    pub fn constant_literal(value: impl Into<String>) -> Self {
        Self::of(ObjectKind::Constant(ConstantValue::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }))
    }

    /// Create a template object map
    pub fn template(template: Template) -> Self {
        Self::of(ObjectKind::Template(template))
    }

    /// Create a function-valued object map
    pub fn function(function: FunctionValue) -> Self {
        Self::of(ObjectKind::Function(Box::new(function)))
    }

    /// Create a reference object map to another TriplesMap
    pub fn parent(ref_object_map: RefObjectMap) -> Self {
        Self::of(ObjectKind::Parent(ref_object_map))
    }

    /// Set the term type
    pub fn with_term_type(mut self, term_type: TermType) -> Self {
        self.term_type = Some(term_type);
        self
    }

    /// Set the datatype
    pub fn with_datatype(mut self, datatype: impl Into<String>) -> Self {
        self.datatype = Some(datatype.into());
        self
    }

    /// Set the fixed language
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Check if this is a reference to another TriplesMap
    pub fn is_ref(&self) -> bool {
        matches!(self.kind, ObjectKind::Parent(_))
    }

    /// Get the RefObjectMap if this is a reference
    pub fn as_ref(&self) -> Option<&RefObjectMap> {
        match &self.kind {
            ObjectKind::Parent(ref_map) => Some(ref_map),
            _ => None,
        }
    }

    /// Effective term type
    ///
    /// Returns `None` for function values without an explicit term type:
    /// their results are stored as plain values.
    pub fn resolved_term_type(&self) -> Option<TermType> {
        if let Some(tt) = self.term_type {
            return Some(tt);
        }
        match &self.kind {
            ObjectKind::Constant(ConstantValue::Iri(_)) => Some(TermType::Iri),
            ObjectKind::Constant(ConstantValue::Literal { .. }) => Some(TermType::Literal),
            ObjectKind::Reference(_) => Some(TermType::Literal),
            ObjectKind::Template(_) => {
                if self.datatype.is_some() || self.language.is_some() || self.language_map.is_some()
                {
                    Some(TermType::Literal)
                } else {
                    Some(TermType::Iri)
                }
            }
            ObjectKind::Function(_) => None,
            ObjectKind::Parent(_) => Some(TermType::Iri),
        }
    }
}
