//! N-Triples writer

use fluree_vocab::{rdf, xsd};
use serde_json::Value;

use super::{ObjectValue, Record};
use crate::materialize::RdfTerm;

/// Triples of one record: types first, then predicates in key order
pub fn record_triples(record: &Record) -> Vec<(RdfTerm, RdfTerm, RdfTerm)> {
    let subject = RdfTerm::from_id(&record.id);
    let mut triples = Vec::new();

    for class in &record.types {
        triples.push((
            subject.clone(),
            RdfTerm::iri(rdf::TYPE),
            RdfTerm::from_id(class),
        ));
    }
    for (predicate, values) in &record.properties {
        let p = RdfTerm::iri(predicate.as_str());
        for value in values {
            for object in object_terms(value) {
                triples.push((subject.clone(), p.clone(), object));
            }
        }
    }
    triples
}

/// Render records as an N-Triples document
pub fn write_ntriples(records: &[Record]) -> String {
    let mut out = String::new();
    for record in records {
        for (s, p, o) in record_triples(record) {
            out.push_str(&format!("{} {} {} .\n", s, p, o));
        }
    }
    out
}

fn object_terms(value: &ObjectValue) -> Vec<RdfTerm> {
    match value {
        ObjectValue::Reference(id) => vec![RdfTerm::from_id(id)],
        ObjectValue::Literal {
            value,
            datatype,
            language,
        } => {
            let mut terms = Vec::new();
            literal_terms(value, datatype.as_deref(), language.as_deref(), &mut terms);
            terms
        }
    }
}

fn literal_terms(
    value: &Value,
    datatype: Option<&str>,
    language: Option<&str>,
    out: &mut Vec<RdfTerm>,
) {
    let (lexical, inferred) = match value {
        Value::Null => return,
        Value::Array(items) => {
            for item in items {
                literal_terms(item, datatype, language, out);
            }
            return;
        }
        Value::String(s) => (s.clone(), None),
        Value::Bool(b) => (b.to_string(), Some(xsd::BOOLEAN)),
        Value::Number(n) if n.is_f64() => (n.to_string(), Some(xsd::DOUBLE)),
        Value::Number(n) => (n.to_string(), Some(xsd::INTEGER)),
        Value::Object(_) => (value.to_string(), Some(rdf::JSON)),
    };

    out.push(match (language, datatype.or(inferred)) {
        (Some(lang), _) => RdfTerm::lang_string(lexical, lang),
        (None, Some(dt)) => RdfTerm::typed(lexical, dt),
        (None, None) => RdfTerm::string(lexical),
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_write_ntriples() {
        let mut record = Record::new("_:p1");
        record.add_type("http://ex.org/Person");
        record.add("http://ex.org/age", ObjectValue::plain(15));
        record.add(
            "http://ex.org/knows",
            ObjectValue::reference("http://ex.org/p2"),
        );
        record.add("http://ex.org/name", ObjectValue::plain("Tom A."));
        record.add(
            "http://ex.org/label",
            ObjectValue::Literal {
                value: json!("Hallo"),
                datatype: None,
                language: Some("de".into()),
            },
        );

        let nt = write_ntriples(&[record]);
        let lines: Vec<&str> = nt.lines().collect();
        assert_eq!(
            lines,
            vec![
                "_:p1 <http://www.w3.org/1999/02/22-rdf-syntax-ns#type> <http://ex.org/Person> .",
                "_:p1 <http://ex.org/age> \"15\"^^<http://www.w3.org/2001/XMLSchema#integer> .",
                "_:p1 <http://ex.org/knows> <http://ex.org/p2> .",
                "_:p1 <http://ex.org/label> \"Hallo\"@de .",
                "_:p1 <http://ex.org/name> \"Tom A.\" .",
            ]
        );
    }

    #[test]
    fn test_array_values_expand() {
        let mut record = Record::new("http://ex.org/a");
        record.add(
            "http://ex.org/tag",
            ObjectValue::plain(json!(["x", null, true])),
        );
        let triples = record_triples(&record);
        assert_eq!(triples.len(), 2);
        assert_eq!(triples[1].2, RdfTerm::typed("true", xsd::BOOLEAN));
    }
}
