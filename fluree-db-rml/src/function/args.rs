//! Function argument bag

use std::collections::HashMap;
use std::ops::Index;

use serde_json::Value;

static NULL: Value = Value::Null;

/// Arguments passed to a mapping function
///
/// Every value is addressable by its parameter predicate IRI and by the
/// position at which it was resolved. A key supplied more than once
/// accumulates its values into an array, in resolution order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FunctionArgs {
    named: HashMap<String, Value>,
    counts: HashMap<String, usize>,
    positional: Vec<Value>,
}

impl FunctionArgs {
    /// Create an empty argument bag
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a parameter value under `key`
    pub fn push(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        self.positional.push(value.clone());

        let count = self.counts.entry(key.clone()).or_insert(0);
        *count += 1;
        match (*count, self.named.get_mut(&key)) {
            (1, _) | (_, None) => {
                self.named.insert(key, value);
            }
            (2, Some(existing)) => {
                let first = existing.take();
                *existing = Value::Array(vec![first, value]);
            }
            (_, Some(existing)) => {
                if let Value::Array(items) = existing {
                    items.push(value);
                }
            }
        }
    }

    /// Builder form of [`push`](Self::push)
    pub fn with(mut self, key: impl Into<String>, value: Value) -> Self {
        self.push(key, value);
        self
    }

    /// Value for a parameter predicate
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    /// Value at a position
    pub fn at(&self, position: usize) -> Option<&Value> {
        self.positional.get(position)
    }

    /// String value for a parameter predicate
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.get(key).and_then(Value::as_str)
    }

    /// All values in resolution order
    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    /// Number of resolved values
    pub fn len(&self) -> usize {
        self.positional.len()
    }

    /// Check if no values were resolved
    pub fn is_empty(&self) -> bool {
        self.positional.is_empty()
    }

    /// Named view as a JSON object
    pub fn to_json(&self) -> Value {
        Value::Object(
            self.named
                .iter()
                .map(|(k, v)| (k.clone(), v.clone()))
                .collect(),
        )
    }
}

impl Index<usize> for FunctionArgs {
    type Output = Value;

    fn index(&self, position: usize) -> &Value {
        self.positional.get(position).unwrap_or(&NULL)
    }
}

impl Index<&str> for FunctionArgs {
    type Output = Value;

    fn index(&self, key: &str) -> &Value {
        self.named.get(key).unwrap_or(&NULL)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_named_and_positional() {
        let args = FunctionArgs::new()
            .with("http://example.org/name", json!("tom"))
            .with("http://example.org/age", json!(15));

        assert_eq!(args["http://example.org/name"], json!("tom"));
        assert_eq!(args[0], json!("tom"));
        assert_eq!(args[1], json!(15));
        assert_eq!(args.len(), 2);
        assert_eq!(args["missing"], Value::Null);
        assert_eq!(args[9], Value::Null);
    }

    #[test]
    fn test_repeated_key_accumulates() {
        let args = FunctionArgs::new()
            .with("k", json!("a"))
            .with("k", json!("b"))
            .with("k", json!("c"));

        assert_eq!(args["k"], json!(["a", "b", "c"]));
        assert_eq!(args.positional(), &[json!("a"), json!("b"), json!("c")]);
    }

    #[test]
    fn test_array_value_is_not_flattened() {
        let args = FunctionArgs::new()
            .with("k", json!([1, 2]))
            .with("k", json!(3));
        assert_eq!(args["k"], json!([[1, 2], 3]));
    }
}
