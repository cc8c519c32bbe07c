//! JSON-LD shaping of records

use std::collections::{HashMap, HashSet};

use serde_json::{Map, Value};

use super::{ObjectValue, Record};

/// Build a node object, rendering each value with `render`
pub(super) fn record_to_json<F>(record: &Record, mut render: F) -> Value
where
    F: FnMut(&ObjectValue) -> Value,
{
    let mut obj = Map::new();
    obj.insert("@id".to_string(), Value::String(record.id.clone()));
    match record.types.as_slice() {
        [] => {}
        [single] => {
            obj.insert("@type".to_string(), Value::String(single.clone()));
        }
        many => {
            obj.insert(
                "@type".to_string(),
                Value::Array(many.iter().cloned().map(Value::String).collect()),
            );
        }
    }
    for (predicate, values) in &record.properties {
        let mut rendered: Vec<Value> = values.iter().map(&mut render).collect();
        let value = if rendered.len() == 1 {
            rendered.remove(0)
        } else {
            Value::Array(rendered)
        };
        obj.insert(predicate.clone(), value);
    }
    Value::Object(obj)
}

/// JSON-LD array of node objects
pub fn records_to_json(records: &[Record]) -> Value {
    Value::Array(records.iter().map(Record::to_json).collect())
}

/// JSON-LD array where references to other records are replaced by nested
/// copies of those records
///
/// Records that are referenced by another record appear only nested. A
/// record on a reference cycle is nested once and then left as `{"@id"}`.
/// Records that are only reachable through a cycle are kept at the top level
/// in their original order.
pub fn replace_references(records: &[Record]) -> Value {
    let index: HashMap<&str, &Record> = records.iter().map(|r| (r.id.as_str(), r)).collect();

    let referenced: HashSet<&str> = records
        .iter()
        .flat_map(|r| {
            r.properties
                .values()
                .flatten()
                .filter_map(ObjectValue::as_reference)
                .filter(move |id| *id != r.id)
        })
        .filter(|id| index.contains_key(id))
        .collect();

    let mut covered: HashSet<String> = HashSet::new();
    let mut roots: HashMap<&str, Value> = HashMap::new();

    let first_pass = records
        .iter()
        .filter(|r| !referenced.contains(r.id.as_str()));
    for record in first_pass {
        let nested = nest(record, &index, &mut Vec::new(), &mut covered);
        roots.insert(record.id.as_str(), nested);
    }
    for record in records {
        if roots.contains_key(record.id.as_str()) || covered.contains(&record.id) {
            continue;
        }
        let nested = nest(record, &index, &mut Vec::new(), &mut covered);
        roots.insert(record.id.as_str(), nested);
    }

    Value::Array(
        records
            .iter()
            .filter_map(|r| roots.remove(r.id.as_str()))
            .collect(),
    )
}

fn nest<'r>(
    record: &'r Record,
    index: &HashMap<&str, &'r Record>,
    stack: &mut Vec<&'r str>,
    covered: &mut HashSet<String>,
) -> Value {
    stack.push(record.id.as_str());
    let value = record_to_json(record, |v| match v.as_reference() {
        Some(id) if !stack.iter().any(|s| *s == id) => match index.get(id) {
            Some(&target) => {
                covered.insert(target.id.clone());
                nest(target, index, stack, covered)
            }
            None => v.to_json(),
        },
        _ => v.to_json(),
    });
    stack.pop();
    value
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn person(id: &str, name: &str) -> Record {
        let mut r = Record::new(id);
        r.add("http://ex.org/name", ObjectValue::plain(name));
        r
    }

    #[test]
    fn test_records_to_json() {
        let out = records_to_json(&[person("_:a", "A"), person("_:b", "B")]);
        assert_eq!(out.as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_replace_nests_and_removes() {
        let mut a = person("_:a", "A");
        a.add("http://ex.org/knows", ObjectValue::reference("_:b"));
        a.add(
            "http://ex.org/sameAs",
            ObjectValue::reference("http://other.org/x"),
        );
        let b = person("_:b", "B");

        let out = replace_references(&[b, a]);
        assert_eq!(
            out,
            json!([{
                "@id": "_:a",
                "http://ex.org/knows": { "@id": "_:b", "http://ex.org/name": "B" },
                "http://ex.org/name": "A",
                "http://ex.org/sameAs": { "@id": "http://other.org/x" }
            }])
        );
    }

    #[test]
    fn test_replace_cycle_guard() {
        let mut a = person("_:a", "A");
        a.add("http://ex.org/knows", ObjectValue::reference("_:b"));
        let mut b = person("_:b", "B");
        b.add("http://ex.org/knows", ObjectValue::reference("_:a"));

        let out = replace_references(&[a, b]);
        assert_eq!(
            out,
            json!([{
                "@id": "_:a",
                "http://ex.org/knows": {
                    "@id": "_:b",
                    "http://ex.org/knows": { "@id": "_:a" },
                    "http://ex.org/name": "B"
                },
                "http://ex.org/name": "A"
            }])
        );
    }
}
