//! Run configuration
//!
//! Options recognized by a mapping run. Deserializable from the camelCase
//! JSON form (`{"toRDF": true, "csvDelimiter": ";"}`); missing keys take
//! their defaults.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Options for one mapping run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MappingOptions {
    /// Replace identity references with nested copies of the referenced
    /// records; records embedded this way are removed from the top level.
    /// Default: false
    pub replace: bool,

    /// Emit N-Triples instead of JSON-LD records.
    /// Default: false
    #[serde(rename = "toRDF")]
    pub to_rdf: bool,

    /// Language tag applied to plain string literals.
    pub language: Option<String>,

    /// XML namespace declarations (attribute -> value) stripped before
    /// parsing, e.g. `{"xmlns": "http://example.org/ns"}`.
    #[serde(rename = "removeNameSpace")]
    pub remove_namespace: HashMap<String, String>,

    /// CSV field delimiter.
    /// Default: ','
    pub csv_delimiter: char,

    /// Selector values that are treated as absent.
    pub ignore_values: Vec<String>,

    /// Treat empty strings as absent.
    /// Default: false
    pub ignore_empty_strings: bool,
}

impl Default for MappingOptions {
    fn default() -> Self {
        Self {
            replace: false,
            to_rdf: false,
            language: None,
            remove_namespace: HashMap::new(),
            csv_delimiter: ',',
            ignore_values: Vec::new(),
            ignore_empty_strings: false,
        }
    }
}

impl MappingOptions {
    /// Set nested-object replacement.
    pub fn with_replace(mut self, replace: bool) -> Self {
        self.replace = replace;
        self
    }

    /// Set N-Triples output.
    pub fn with_to_rdf(mut self, to_rdf: bool) -> Self {
        self.to_rdf = to_rdf;
        self
    }

    /// Set the default literal language.
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Strip an XML namespace declaration before parsing.
    pub fn with_removed_namespace(
        mut self,
        attribute: impl Into<String>,
        value: impl Into<String>,
    ) -> Self {
        self.remove_namespace.insert(attribute.into(), value.into());
        self
    }

    /// Set the CSV delimiter.
    pub fn with_csv_delimiter(mut self, delimiter: char) -> Self {
        self.csv_delimiter = delimiter;
        self
    }

    /// Add a value to the ignore list.
    pub fn with_ignored_value(mut self, value: impl Into<String>) -> Self {
        self.ignore_values.push(value.into());
        self
    }

    /// Set empty-string filtering.
    pub fn with_ignore_empty_strings(mut self, ignore: bool) -> Self {
        self.ignore_empty_strings = ignore;
        self
    }

    /// Whether a selector value should be dropped
    pub(crate) fn is_ignored(&self, value: &serde_json::Value) -> bool {
        match value {
            serde_json::Value::String(s) => {
                (self.ignore_empty_strings && s.is_empty())
                    || self.ignore_values.iter().any(|v| v == s)
            }
            serde_json::Value::Null => true,
            other => {
                !self.ignore_values.is_empty()
                    && self.ignore_values.contains(&other.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_defaults() {
        let options = MappingOptions::default();
        assert!(!options.replace);
        assert!(!options.to_rdf);
        assert_eq!(options.csv_delimiter, ',');
    }

    #[test]
    fn test_deserialize_camel_case() {
        let options: MappingOptions = serde_json::from_value(json!({
            "toRDF": true,
            "replace": true,
            "language": "en",
            "removeNameSpace": { "xmlns": "http://example.org/ns" },
            "csvDelimiter": ";",
            "ignoreValues": ["n/a"],
            "ignoreEmptyStrings": true
        }))
        .unwrap();

        assert!(options.to_rdf);
        assert!(options.replace);
        assert_eq!(options.language.as_deref(), Some("en"));
        assert_eq!(options.remove_namespace["xmlns"], "http://example.org/ns");
        assert_eq!(options.csv_delimiter, ';');
        assert!(options.ignore_empty_strings);
    }

    #[test]
    fn test_is_ignored() {
        let options = MappingOptions::default()
            .with_ignored_value("n/a")
            .with_ignored_value("0")
            .with_ignore_empty_strings(true);
        assert!(options.is_ignored(&json!("n/a")));
        assert!(options.is_ignored(&json!("")));
        assert!(options.is_ignored(&json!(0)));
        assert!(options.is_ignored(&json!(null)));
        assert!(!options.is_ignored(&json!("ok")));
        assert!(!MappingOptions::default().is_ignored(&json!("")));
    }
}
