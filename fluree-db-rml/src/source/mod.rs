//! Logical source adapters
//!
//! A [`SourceAdapter`] turns one parsed source document plus the rule's
//! iterator into an addressable sequence of rows. Every reference
//! formulation presents the same contract:
//!
//! - `row_count()` - number of rows produced by the iterator
//! - `values_at(row, selector, datatype)` - zero or more values selected
//!   relative to that row; "not found" is an empty result, never an error
//!
//! Selectors starting with [`PATH_MARKER`] return the structural path of
//! each matched node instead of its value.

mod cache;
mod csv;
mod json;
mod xml;

pub use cache::{ParsedSource, SourceCache};
pub use csv::{CsvSource, CsvTable};
pub use json::{JsonPath, JsonSource};
pub use xml::{XPath, XmlDocument, XmlSource};

use std::fmt::Debug;

use fluree_vocab::xsd;
use serde_json::{Number, Value};

use crate::error::RmlResult;

/// Selector prefix requesting node paths instead of node values
pub const PATH_MARKER: &str = "PATH~";

/// Row-addressable view of one logical source
pub trait SourceAdapter: Debug + Send + Sync {
    /// Number of rows produced by the iterator
    fn row_count(&self) -> usize;

    /// Values selected by `selector` relative to `row`
    ///
    /// `datatype` is a coercion hint for formats whose values are text.
    fn values_at(&self, row: usize, selector: &str, datatype: Option<&str>)
        -> RmlResult<Vec<Value>>;
}

/// Split off the path marker, returning the bare selector and whether
/// paths were requested
pub fn split_path_marker(selector: &str) -> (&str, bool) {
    match selector.strip_prefix(PATH_MARKER) {
        Some(rest) => (rest, true),
        None => (selector, false),
    }
}

/// Convert a textual value according to a datatype hint
///
/// Numeric and boolean hints produce JSON numbers and booleans when the text
/// parses; anything else stays a string.
pub fn coerce_text(text: &str, datatype: Option<&str>) -> Value {
    let Some(dt) = datatype else {
        return Value::String(text.to_string());
    };
    let trimmed = text.trim();

    if xsd::is_integer_family(dt) {
        if let Ok(n) = trimmed.parse::<i64>() {
            return Value::Number(n.into());
        }
    } else if xsd::is_decimal_family(dt) {
        if let Some(n) = trimmed.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
    } else if dt == xsd::BOOLEAN {
        match trimmed {
            "true" | "1" => return Value::Bool(true),
            "false" | "0" => return Value::Bool(false),
            _ => {}
        }
    }

    Value::String(text.to_string())
}

/// Lexical form of a scalar value
///
/// Strings are returned without quotes; other values use their JSON form.
pub fn lexical(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_coerce_text() {
        assert_eq!(coerce_text("42", Some(xsd::INTEGER)), json!(42));
        assert_eq!(coerce_text(" 7 ", Some(xsd::INT)), json!(7));
        assert_eq!(coerce_text("2.5", Some(xsd::DOUBLE)), json!(2.5));
        assert_eq!(coerce_text("true", Some(xsd::BOOLEAN)), json!(true));
        assert_eq!(coerce_text("abc", Some(xsd::INTEGER)), json!("abc"));
        assert_eq!(coerce_text("42", None), json!("42"));
        assert_eq!(coerce_text("42", Some(xsd::STRING)), json!("42"));
    }

    #[test]
    fn test_split_path_marker() {
        assert_eq!(split_path_marker("PATH~name"), ("name", true));
        assert_eq!(split_path_marker("name"), ("name", false));
    }

    #[test]
    fn test_lexical() {
        assert_eq!(lexical(&json!("1")), "1");
        assert_eq!(lexical(&json!(1)), "1");
        assert_eq!(lexical(&json!(true)), "true");
    }
}
