//! RML mapping evaluation for Fluree DB
//!
//! This crate turns heterogeneous source documents (CSV, JSON, XML) into
//! linked-data records by evaluating an RML mapping: a set of rules, each
//! binding a logical source to a subject map and predicate-object maps.
//!
//! # Key Features
//!
//! - **Rule evaluation**: rows are processed in ascending order; every rule
//!   is evaluated at most once per run and its output memoized
//! - **Function values**: `fnml:functionValue` term maps call registered
//!   functions (built-in GREL functions or caller overrides, sync or async)
//!   with a parameter bag addressable by name and by position
//! - **Joins**: `rr:parentTriplesMap` references are resolved after all
//!   rules have run, as a cross product or a hash join on
//!   `rr:joinCondition`s
//! - **Output**: records, JSON-LD (optionally with referenced records nested
//!   in place) or N-Triples
//!
//! # Usage
//!
//! Load a mapping with [`RmlLoader::from_jsonld()`] and `compile()` it, wrap
//! the [`CompiledRmlMapping`] in a [`MappingEngine`], then call
//! [`MappingEngine::run()`] or [`MappingEngine::process()`] with the source
//! contents keyed by `rml:source`.

pub mod config;
pub mod engine;
pub mod error;
pub mod function;
pub mod loader;
pub mod mapping;
pub mod materialize;
pub mod output;
pub mod source;
pub mod vocab;

pub use config::MappingOptions;
pub use engine::{MappingEngine, RuleOutput, RunContext};
pub use error::{RmlError, RmlResult};
pub use function::{AsyncFn, FunctionArgs, FunctionRegistry, MappingFunction};
pub use loader::{NodeGraph, RmlLoader};
pub use mapping::{
    CompiledRmlMapping, FunctionValue, JoinCondition, LogicalSource, ObjectMap, PredicateMap,
    PredicateObjectMap, RefObjectMap, ReferenceFormulation, SubjectMap, TermType, TriplesMap,
};
pub use materialize::{expand_template, RdfTerm};
pub use output::{MappingOutput, ObjectValue, Record};
pub use source::{SourceAdapter, SourceCache};
pub use vocab::RML;
