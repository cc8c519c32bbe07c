//! RML vocabulary constants
//!
//! RML extends R2RML (https://www.w3.org/TR/r2rml/) with logical sources over
//! CSV, JSON and XML documents. Function-valued term maps come from the FnO
//! and FNML vocabularies.
//!
//! # Usage
//!
//! ```
//! use fluree_db_rml::RML;
//!
//! let iri = "http://www.w3.org/ns/r2rml#TriplesMap";
//! assert_eq!(iri, RML::TRIPLES_MAP);
//! ```

/// RML vocabulary namespaces and constants
pub struct RML;

impl RML {
    // ==========================================================================
    // Namespaces
    // ==========================================================================

    /// R2RML namespace IRI
    pub const RR_NS: &'static str = "http://www.w3.org/ns/r2rml#";

    /// RML namespace IRI
    pub const RML_NS: &'static str = "http://semweb.mmlab.be/ns/rml#";

    /// Query language namespace IRI (reference formulations)
    pub const QL_NS: &'static str = "http://semweb.mmlab.be/ns/ql#";

    /// FNML namespace IRI
    pub const FNML_NS: &'static str = "http://semweb.mmlab.be/ns/fnml#";

    /// FnO namespace IRI
    pub const FNO_NS: &'static str = "https://w3id.org/function/ontology#";

    // ==========================================================================
    // Classes
    // ==========================================================================

    /// rr:TriplesMap - A rule generating records from a logical source
    pub const TRIPLES_MAP: &'static str = "http://www.w3.org/ns/r2rml#TriplesMap";

    // ==========================================================================
    // Properties - Logical Source
    // ==========================================================================

    /// rml:logicalSource - Links a TriplesMap to its logical source
    pub const LOGICAL_SOURCE: &'static str = "http://semweb.mmlab.be/ns/rml#logicalSource";

    /// rml:source - Identifier of the source document
    pub const SOURCE: &'static str = "http://semweb.mmlab.be/ns/rml#source";

    /// rml:iterator - Selector producing the rows of the logical source
    pub const ITERATOR: &'static str = "http://semweb.mmlab.be/ns/rml#iterator";

    /// rml:referenceFormulation - Selector language of the logical source
    pub const REFERENCE_FORMULATION: &'static str =
        "http://semweb.mmlab.be/ns/rml#referenceFormulation";

    /// rml:reference - Selector evaluated against the current row
    pub const REFERENCE: &'static str = "http://semweb.mmlab.be/ns/rml#reference";

    /// rml:languageMap - Term map producing a language tag
    pub const LANGUAGE_MAP: &'static str = "http://semweb.mmlab.be/ns/rml#languageMap";

    /// ql:CSV
    pub const QL_CSV: &'static str = "http://semweb.mmlab.be/ns/ql#CSV";

    /// ql:JSONPath
    pub const QL_JSONPATH: &'static str = "http://semweb.mmlab.be/ns/ql#JSONPath";

    /// ql:XPath
    pub const QL_XPATH: &'static str = "http://semweb.mmlab.be/ns/ql#XPath";

    // ==========================================================================
    // Properties - Subject Map
    // ==========================================================================

    /// rr:subjectMap - Links a TriplesMap to its subject map
    pub const SUBJECT_MAP: &'static str = "http://www.w3.org/ns/r2rml#subjectMap";

    /// rr:subject - Shortcut for constant-valued subject map
    pub const SUBJECT: &'static str = "http://www.w3.org/ns/r2rml#subject";

    /// rr:class - Specifies the class of generated subjects
    pub const CLASS: &'static str = "http://www.w3.org/ns/r2rml#class";

    // ==========================================================================
    // Properties - Predicate-Object Map
    // ==========================================================================

    /// rr:predicateObjectMap
    pub const PREDICATE_OBJECT_MAP: &'static str =
        "http://www.w3.org/ns/r2rml#predicateObjectMap";

    /// rr:predicateMap
    pub const PREDICATE_MAP: &'static str = "http://www.w3.org/ns/r2rml#predicateMap";

    /// rr:predicate - Shortcut for constant-valued predicate map
    pub const PREDICATE: &'static str = "http://www.w3.org/ns/r2rml#predicate";

    /// rr:objectMap
    pub const OBJECT_MAP: &'static str = "http://www.w3.org/ns/r2rml#objectMap";

    /// rr:object - Shortcut for constant-valued object map
    pub const OBJECT: &'static str = "http://www.w3.org/ns/r2rml#object";

    // ==========================================================================
    // Properties - Term Maps (common)
    // ==========================================================================

    /// rr:template
    pub const TEMPLATE: &'static str = "http://www.w3.org/ns/r2rml#template";

    /// rr:column - R2RML spelling of a reference, accepted for CSV sources
    pub const COLUMN: &'static str = "http://www.w3.org/ns/r2rml#column";

    /// rr:constant
    pub const CONSTANT: &'static str = "http://www.w3.org/ns/r2rml#constant";

    /// rr:termType
    pub const TERM_TYPE: &'static str = "http://www.w3.org/ns/r2rml#termType";

    /// rr:datatype
    pub const DATATYPE: &'static str = "http://www.w3.org/ns/r2rml#datatype";

    /// rr:language
    pub const LANGUAGE: &'static str = "http://www.w3.org/ns/r2rml#language";

    // ==========================================================================
    // Properties - RefObjectMap
    // ==========================================================================

    /// rr:parentTriplesMap
    pub const PARENT_TRIPLES_MAP: &'static str = "http://www.w3.org/ns/r2rml#parentTriplesMap";

    /// rr:joinCondition
    pub const JOIN_CONDITION: &'static str = "http://www.w3.org/ns/r2rml#joinCondition";

    /// rr:child
    pub const CHILD: &'static str = "http://www.w3.org/ns/r2rml#child";

    /// rr:parent
    pub const PARENT: &'static str = "http://www.w3.org/ns/r2rml#parent";

    // ==========================================================================
    // Properties - Function values
    // ==========================================================================

    /// fnml:functionValue - Term map computed by a function call
    pub const FUNCTION_VALUE: &'static str = "http://semweb.mmlab.be/ns/fnml#functionValue";

    /// fno:executes - Names the function of a function value
    pub const EXECUTES: &'static str = "https://w3id.org/function/ontology#executes";

    // ==========================================================================
    // Term Type Values
    // ==========================================================================

    /// rr:IRI
    pub const IRI: &'static str = "http://www.w3.org/ns/r2rml#IRI";

    /// rr:BlankNode
    pub const BLANK_NODE: &'static str = "http://www.w3.org/ns/r2rml#BlankNode";

    /// rr:Literal
    pub const LITERAL: &'static str = "http://www.w3.org/ns/r2rml#Literal";

    // ==========================================================================
    // Other namespaces used in RML processing
    // (Re-exported from fluree-vocab for convenience)
    // ==========================================================================

    /// rdf:type
    pub const RDF_TYPE: &'static str = fluree_vocab::rdf::TYPE;
}
