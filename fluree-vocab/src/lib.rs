//! RDF Vocabulary Constants for the Fluree RML mapping crates
//!
//! This crate provides a centralized location for the vocabulary IRIs shared
//! by the mapping loader, the evaluation engine and the output writers.
//!
//! # Organization
//!
//! Constants are organized by vocabulary:
//! - `rdf` - RDF vocabulary (http://www.w3.org/1999/02/22-rdf-syntax-ns#)
//! - `xsd` - XSD vocabulary (http://www.w3.org/2001/XMLSchema#)
//! - `grel` - GREL function vocabulary used by the built-in function library

/// RDF vocabulary constants
pub mod rdf {
    /// RDF namespace IRI
    pub const NS: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#";

    /// rdf:type IRI
    pub const TYPE: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#type";

    /// rdf:langString IRI
    pub const LANG_STRING: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#langString";

    /// rdf:JSON IRI
    pub const JSON: &str = "http://www.w3.org/1999/02/22-rdf-syntax-ns#JSON";
}

/// XSD vocabulary constants
pub mod xsd {
    /// XSD namespace IRI
    pub const NS: &str = "http://www.w3.org/2001/XMLSchema#";

    /// xsd:string IRI
    pub const STRING: &str = "http://www.w3.org/2001/XMLSchema#string";

    /// xsd:integer IRI
    pub const INTEGER: &str = "http://www.w3.org/2001/XMLSchema#integer";

    /// xsd:long IRI
    pub const LONG: &str = "http://www.w3.org/2001/XMLSchema#long";

    /// xsd:int IRI
    pub const INT: &str = "http://www.w3.org/2001/XMLSchema#int";

    /// xsd:short IRI
    pub const SHORT: &str = "http://www.w3.org/2001/XMLSchema#short";

    /// xsd:decimal IRI
    pub const DECIMAL: &str = "http://www.w3.org/2001/XMLSchema#decimal";

    /// xsd:float IRI
    pub const FLOAT: &str = "http://www.w3.org/2001/XMLSchema#float";

    /// xsd:double IRI
    pub const DOUBLE: &str = "http://www.w3.org/2001/XMLSchema#double";

    /// xsd:boolean IRI
    pub const BOOLEAN: &str = "http://www.w3.org/2001/XMLSchema#boolean";

    /// xsd:dateTime IRI
    pub const DATE_TIME: &str = "http://www.w3.org/2001/XMLSchema#dateTime";

    /// xsd:date IRI
    pub const DATE: &str = "http://www.w3.org/2001/XMLSchema#date";

    /// xsd:anyURI IRI
    pub const ANY_URI: &str = "http://www.w3.org/2001/XMLSchema#anyURI";

    /// Check whether a datatype belongs to the integer family
    ///
    /// Used when coercing textual source values (CSV cells, XML text) into
    /// JSON numbers for a datatype hint.
    #[inline]
    pub fn is_integer_family(datatype_iri: &str) -> bool {
        matches!(datatype_iri, INTEGER | LONG | INT | SHORT)
    }

    /// Check whether a datatype is a floating point or decimal type
    #[inline]
    pub fn is_decimal_family(datatype_iri: &str) -> bool {
        matches!(datatype_iri, DECIMAL | FLOAT | DOUBLE)
    }
}

/// GREL function vocabulary
///
/// Identifiers of the functions shipped in the built-in function library and
/// the parameter predicates they read.
pub mod grel {
    /// GREL namespace IRI
    pub const NS: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#";

    // Functions

    /// grel:toUpperCase
    pub const TO_UPPER_CASE: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#toUpperCase";

    /// grel:toLowerCase
    pub const TO_LOWER_CASE: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#toLowerCase";

    /// grel:string_trim
    pub const STRING_TRIM: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#string_trim";

    /// grel:string_length
    pub const STRING_LENGTH: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#string_length";

    /// grel:string_replace
    pub const STRING_REPLACE: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#string_replace";

    /// grel:string_split
    pub const STRING_SPLIT: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#string_split";

    /// grel:string_concat
    pub const STRING_CONCAT: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#string_concat";

    /// grel:array_join
    pub const ARRAY_JOIN: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#array_join";

    /// grel:controls_if
    pub const CONTROLS_IF: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#controls_if";

    /// grel:boolean_not
    pub const BOOLEAN_NOT: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#boolean_not";

    /// grel:math_round
    pub const MATH_ROUND: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#math_round";

    // Parameters

    /// grel:valueParameter - primary input value
    pub const VALUE_PARAMETER: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#valueParameter";

    /// grel:valueParameter2 - secondary input value
    pub const VALUE_PARAMETER_2: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#valueParameter2";

    /// grel:p_array_a - array input
    pub const P_ARRAY_A: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#p_array_a";

    /// grel:p_string_sep - separator
    pub const P_STRING_SEP: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#p_string_sep";

    /// grel:p_string_find - search string
    pub const P_STRING_FIND: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#p_string_find";

    /// grel:p_string_replace - replacement string
    pub const P_STRING_REPLACE: &str =
        "http://users.ugent.be/~bjdmeest/function/grel.ttl#p_string_replace";

    /// grel:bool_b - condition
    pub const BOOL_B: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#bool_b";

    /// grel:any_true - value when the condition holds
    pub const ANY_TRUE: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#any_true";

    /// grel:any_false - value when the condition does not hold
    pub const ANY_FALSE: &str = "http://users.ugent.be/~bjdmeest/function/grel.ttl#any_false";
}
