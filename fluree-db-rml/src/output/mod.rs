//! Output records
//!
//! Records are the finalized result of a run: an identity, class IRIs and
//! predicate values. Join bookkeeping never appears here. Records can be
//! shaped as JSON-LD node objects (optionally with referenced records
//! nested in place of their identities) or written as N-Triples.

mod jsonld;
mod ntriples;

pub use jsonld::{records_to_json, replace_references};
pub use ntriples::{record_triples, write_ntriples};

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// A value of a record property
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ObjectValue {
    /// A plain or annotated value
    Literal {
        value: Value,
        datatype: Option<String>,
        language: Option<String>,
    },
    /// Identity of another record or resource
    Reference(String),
}

impl ObjectValue {
    /// Plain value without annotations
    pub fn plain(value: impl Into<Value>) -> Self {
        ObjectValue::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Identity reference
    pub fn reference(id: impl Into<String>) -> Self {
        ObjectValue::Reference(id.into())
    }

    /// Referenced identity, if this is a reference
    pub fn as_reference(&self) -> Option<&str> {
        match self {
            ObjectValue::Reference(id) => Some(id),
            ObjectValue::Literal { .. } => None,
        }
    }

    /// JSON-LD form: bare values, `{"@value", "@type"|"@language"}` or
    /// `{"@id"}`
    pub fn to_json(&self) -> Value {
        match self {
            ObjectValue::Reference(id) => serde_json::json!({ "@id": id }),
            ObjectValue::Literal {
                value,
                datatype: None,
                language: None,
            } => value.clone(),
            ObjectValue::Literal {
                value,
                datatype,
                language,
            } => {
                let mut obj = serde_json::Map::new();
                obj.insert("@value".to_string(), value.clone());
                if let Some(lang) = language {
                    obj.insert("@language".to_string(), Value::String(lang.clone()));
                } else if let Some(dt) = datatype {
                    obj.insert("@type".to_string(), Value::String(dt.clone()));
                }
                Value::Object(obj)
            }
        }
    }
}

/// A finalized output record
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Record {
    /// Identity: an IRI, or a `_:`-prefixed blank node label
    pub id: String,
    /// Class IRIs
    pub types: Vec<String>,
    /// Predicate IRI -> values, in resolution order per predicate
    pub properties: BTreeMap<String, Vec<ObjectValue>>,
}

impl Record {
    /// Create a record with an identity and no values
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Append a value under a predicate
    pub fn add(&mut self, predicate: impl Into<String>, value: ObjectValue) {
        self.properties
            .entry(predicate.into())
            .or_default()
            .push(value);
    }

    /// Add a class unless already present
    pub fn add_type(&mut self, class: impl Into<String>) {
        let class = class.into();
        if !self.types.contains(&class) {
            self.types.push(class);
        }
    }

    /// Values of a predicate
    pub fn values(&self, predicate: &str) -> &[ObjectValue] {
        self.properties
            .get(predicate)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Check if the record is anonymous
    pub fn is_blank(&self) -> bool {
        self.id.starts_with("_:")
    }

    /// JSON-LD node object
    pub fn to_json(&self) -> Value {
        jsonld::record_to_json(self, |v| v.to_json())
    }
}

/// Result of a run, shaped per the run options
#[derive(Debug, Clone, PartialEq)]
pub enum MappingOutput {
    /// JSON-LD array of node objects
    JsonLd(Value),
    /// N-Triples document
    NTriples(String),
}

impl MappingOutput {
    /// JSON-LD value, if that is what was produced
    pub fn as_json(&self) -> Option<&Value> {
        match self {
            MappingOutput::JsonLd(v) => Some(v),
            MappingOutput::NTriples(_) => None,
        }
    }

    /// N-Triples text, if that is what was produced
    pub fn as_ntriples(&self) -> Option<&str> {
        match self {
            MappingOutput::NTriples(s) => Some(s),
            MappingOutput::JsonLd(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_object_value_json() {
        assert_eq!(ObjectValue::plain("Tom").to_json(), json!("Tom"));
        assert_eq!(ObjectValue::plain(15).to_json(), json!(15));
        assert_eq!(
            ObjectValue::reference("_:a").to_json(),
            json!({ "@id": "_:a" })
        );
        let tagged = ObjectValue::Literal {
            value: json!("hallo"),
            datatype: None,
            language: Some("de".into()),
        };
        assert_eq!(
            tagged.to_json(),
            json!({ "@value": "hallo", "@language": "de" })
        );
        let typed = ObjectValue::Literal {
            value: json!("2020-01-01"),
            datatype: Some("http://www.w3.org/2001/XMLSchema#date".into()),
            language: None,
        };
        assert_eq!(
            typed.to_json(),
            json!({ "@value": "2020-01-01", "@type": "http://www.w3.org/2001/XMLSchema#date" })
        );
    }

    #[test]
    fn test_record_json_shape() {
        let mut record = Record::new("_:p1");
        record.add_type("http://ex.org/Person");
        record.add_type("http://ex.org/Person");
        record.add("http://ex.org/name", ObjectValue::plain("Tom A."));
        record.add("http://ex.org/knows", ObjectValue::reference("_:p2"));
        record.add("http://ex.org/knows", ObjectValue::reference("_:p3"));

        assert_eq!(
            record.to_json(),
            json!({
                "@id": "_:p1",
                "@type": "http://ex.org/Person",
                "http://ex.org/knows": [{ "@id": "_:p2" }, { "@id": "_:p3" }],
                "http://ex.org/name": "Tom A."
            })
        );
        assert!(record.is_blank());
        assert!(record.values("http://ex.org/missing").is_empty());
    }
}
