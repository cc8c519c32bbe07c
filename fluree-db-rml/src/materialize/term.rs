//! RDF terms
//!
//! Output records are rendered as triples of these terms when N-Triples
//! output is requested.

use std::fmt;

use fluree_vocab::{rdf, xsd};

/// Materialized RDF term
#[derive(Debug, Clone, PartialEq)]
pub enum RdfTerm {
    /// An IRI
    Iri(String),
    /// A blank node, label without the `_:` prefix
    BlankNode(String),
    /// A literal with optional datatype and language
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl RdfTerm {
    /// Create an IRI term
    pub fn iri(iri: impl Into<String>) -> Self {
        RdfTerm::Iri(iri.into())
    }

    /// Create a blank node term
    pub fn blank_node(id: impl Into<String>) -> Self {
        RdfTerm::BlankNode(id.into())
    }

    /// IRI or blank node from a record identity (`_:` marks blank nodes)
    pub fn from_id(id: &str) -> Self {
        match id.strip_prefix("_:") {
            Some(label) => RdfTerm::blank_node(label),
            None => RdfTerm::iri(id),
        }
    }

    /// Create a plain string literal
    pub fn string(value: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create a typed literal
    pub fn typed(value: impl Into<String>, datatype: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: Some(datatype.into()),
            language: None,
        }
    }

    /// Create a language-tagged string
    pub fn lang_string(value: impl Into<String>, lang: impl Into<String>) -> Self {
        RdfTerm::Literal {
            value: value.into(),
            datatype: Some(rdf::LANG_STRING.to_string()),
            language: Some(lang.into()),
        }
    }

    /// Check if this is an IRI
    pub fn is_iri(&self) -> bool {
        matches!(self, RdfTerm::Iri(_))
    }

    /// Check if this is a blank node
    pub fn is_blank_node(&self) -> bool {
        matches!(self, RdfTerm::BlankNode(_))
    }

    /// Check if this is a literal
    pub fn is_literal(&self) -> bool {
        matches!(self, RdfTerm::Literal { .. })
    }
}

impl fmt::Display for RdfTerm {
    /// N-Triples form
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RdfTerm::Iri(iri) => write!(f, "<{}>", iri),
            RdfTerm::BlankNode(label) => write!(f, "_:{}", label),
            RdfTerm::Literal {
                value,
                datatype,
                language,
            } => {
                write!(f, "\"{}\"", escape_literal(value))?;
                match (language, datatype.as_deref()) {
                    (Some(lang), _) => write!(f, "@{}", lang),
                    (None, None) | (None, Some(xsd::STRING)) => Ok(()),
                    (None, Some(dt)) => write!(f, "^^<{}>", dt),
                }
            }
        }
    }
}

fn escape_literal(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for c in value.chars() {
        match c {
            '"' => out.push_str("\\\""),
            '\\' => out.push_str("\\\\"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_id() {
        assert_eq!(RdfTerm::from_id("_:b1"), RdfTerm::blank_node("b1"));
        assert!(RdfTerm::from_id("http://example.org/a").is_iri());
    }

    #[test]
    fn test_ntriples_rendering() {
        assert_eq!(
            RdfTerm::iri("http://ex.org/a").to_string(),
            "<http://ex.org/a>"
        );
        assert_eq!(RdfTerm::blank_node("x").to_string(), "_:x");
        assert_eq!(
            RdfTerm::string("say \"hi\"\n").to_string(),
            r#""say \"hi\"\n""#
        );
        assert_eq!(
            RdfTerm::lang_string("hallo", "de").to_string(),
            "\"hallo\"@de"
        );
        assert_eq!(
            RdfTerm::typed("15", xsd::INTEGER).to_string(),
            "\"15\"^^<http://www.w3.org/2001/XMLSchema#integer>"
        );
        assert_eq!(RdfTerm::typed("x", xsd::STRING).to_string(), "\"x\"");
    }
}
