//! RML mapping structures
//!
//! This module provides the compiled representation of RML mappings.
//! These structures are produced by the [`crate::loader`] module and
//! consumed by the evaluation engine.

mod compiled;
mod function_value;
mod ref_object_map;
mod template;
mod term_map;
mod triples_map;

pub use compiled::CompiledRmlMapping;
pub use function_value::FunctionValue;
pub use ref_object_map::{JoinCondition, RefObjectMap};
pub use template::{Template, TemplateSegment};
pub use term_map::{
    ConstantValue, LanguageMap, ObjectKind, ObjectMap, PredicateMap, PredicateObjectMap, TermType,
};
pub use triples_map::{LogicalSource, ReferenceFormulation, SubjectKind, SubjectMap, TriplesMap};
