//! JSON source adapter
//!
//! Supports the JSONPath subset used by mapping documents:
//! `$`, `@`, `.name`, `['name']`, `[n]` (negative counts from the end),
//! `[*]`, `.*` and `..name` / `..*`. The iterator is evaluated against the
//! document root; references are evaluated relative to the row node.

use std::sync::Arc;

use serde_json::Value;

use super::{split_path_marker, SourceAdapter};
use crate::error::{RmlError, RmlResult};

/// One JSONPath step
#[derive(Debug, Clone, PartialEq)]
enum Step {
    /// Object member
    Field(String),
    /// Array element
    Index(i64),
    /// Every member or element
    Wildcard,
    /// Named member at any depth
    Descendant(String),
    /// Every node below the current one
    DescendantWildcard,
}

/// A parsed JSONPath expression
#[derive(Debug, Clone, PartialEq)]
pub struct JsonPath {
    steps: Vec<Step>,
}

impl JsonPath {
    /// Parse a JSONPath expression
    ///
    /// A leading `$` or `@` is optional; a bare `name.other` is read as
    /// `$.name.other`.
    pub fn parse(expr: &str) -> RmlResult<Self> {
        let err = |message: &str| RmlError::selector(expr, message);
        let chars: Vec<char> = expr.trim().chars().collect();
        let mut steps = Vec::new();
        let mut i = 0;

        if matches!(chars.first(), Some('$') | Some('@')) {
            i = 1;
        } else if !chars.is_empty() && chars[0] != '.' && chars[0] != '[' {
            let (name, next) = read_name(&chars, 0);
            steps.push(name_step(name));
            i = next;
        }

        while i < chars.len() {
            match chars[i] {
                '.' if chars.get(i + 1) == Some(&'.') => {
                    let (name, next) = read_name(&chars, i + 2);
                    if name.is_empty() {
                        return Err(err("expected a name after '..'"));
                    }
                    steps.push(if name == "*" {
                        Step::DescendantWildcard
                    } else {
                        Step::Descendant(name)
                    });
                    i = next;
                }
                '.' => {
                    let (name, next) = read_name(&chars, i + 1);
                    if name.is_empty() {
                        return Err(err("expected a name after '.'"));
                    }
                    steps.push(name_step(name));
                    i = next;
                }
                '[' => {
                    let close = chars[i..]
                        .iter()
                        .position(|&c| c == ']')
                        .map(|p| p + i)
                        .ok_or_else(|| err("unclosed '['"))?;
                    let inner: String = chars[i + 1..close].iter().collect();
                    steps.push(bracket_step(inner.trim()).ok_or_else(|| {
                        err("unsupported bracket expression")
                    })?);
                    i = close + 1;
                }
                c => {
                    return Err(RmlError::selector(
                        expr,
                        format!("unexpected character '{}'", c),
                    ))
                }
            }
        }

        Ok(Self { steps })
    }

    /// Evaluate against `root`, returning (path, node) pairs in document order
    ///
    /// `base` is the normalized path of `root` itself.
    pub fn select<'v>(&self, root: &'v Value, base: &str) -> Vec<(String, &'v Value)> {
        let mut current = vec![(base.to_string(), root)];
        for step in &self.steps {
            let mut next = Vec::new();
            for (path, node) in &current {
                apply_step(step, path, node, &mut next);
            }
            current = next;
        }
        current
    }
}

fn read_name(chars: &[char], start: usize) -> (String, usize) {
    let mut end = start;
    while end < chars.len() && chars[end] != '.' && chars[end] != '[' {
        end += 1;
    }
    (chars[start..end].iter().collect(), end)
}

fn name_step(name: String) -> Step {
    if name == "*" {
        Step::Wildcard
    } else {
        Step::Field(name)
    }
}

fn bracket_step(inner: &str) -> Option<Step> {
    if inner == "*" {
        return Some(Step::Wildcard);
    }
    for quote in ['\'', '"'] {
        if let Some(name) = inner
            .strip_prefix(quote)
            .and_then(|rest| rest.strip_suffix(quote))
        {
            return Some(Step::Field(name.to_string()));
        }
    }
    inner.parse::<i64>().ok().map(Step::Index)
}

fn apply_step<'v>(step: &Step, path: &str, node: &'v Value, out: &mut Vec<(String, &'v Value)>) {
    match step {
        Step::Field(name) => {
            if let Some(child) = node.as_object().and_then(|obj| obj.get(name)) {
                out.push((member_path(path, name), child));
            }
        }
        Step::Index(idx) => {
            if let Some(items) = node.as_array() {
                let len = items.len() as i64;
                let pos = if *idx < 0 { len + idx } else { *idx };
                if (0..len).contains(&pos) {
                    out.push((format!("{}[{}]", path, pos), &items[pos as usize]));
                }
            }
        }
        Step::Wildcard => push_children(path, node, out),
        Step::Descendant(name) => {
            let mut all = Vec::new();
            collect_self_and_descendants(path, node, &mut all);
            for (p, n) in all {
                apply_step(&Step::Field(name.clone()), &p, n, out);
            }
        }
        Step::DescendantWildcard => {
            let mut all = Vec::new();
            collect_self_and_descendants(path, node, &mut all);
            for (p, n) in all {
                push_children(&p, n, out);
            }
        }
    }
}

fn push_children<'v>(path: &str, node: &'v Value, out: &mut Vec<(String, &'v Value)>) {
    match node {
        Value::Object(obj) => {
            for (k, v) in obj {
                out.push((member_path(path, k), v));
            }
        }
        Value::Array(items) => {
            for (i, v) in items.iter().enumerate() {
                out.push((format!("{}[{}]", path, i), v));
            }
        }
        _ => {}
    }
}

fn collect_self_and_descendants<'v>(
    path: &str,
    node: &'v Value,
    out: &mut Vec<(String, &'v Value)>,
) {
    out.push((path.to_string(), node));
    let mut children = Vec::new();
    push_children(path, node, &mut children);
    for (p, child) in children {
        collect_self_and_descendants(&p, child, out);
    }
}

fn member_path(path: &str, name: &str) -> String {
    let plain = !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '-');
    if plain {
        format!("{}.{}", path, name)
    } else {
        format!("{}['{}']", path, name.replace('\'', "\\'"))
    }
}

/// Row view over a parsed JSON document
#[derive(Debug, Clone)]
pub struct JsonSource {
    rows: Vec<(String, Value)>,
}

impl JsonSource {
    /// Select rows from `document` with the iterator (defaults to `$`)
    pub fn new(document: Arc<Value>, iterator: Option<&str>) -> RmlResult<Self> {
        let path = JsonPath::parse(iterator.unwrap_or("$"))?;
        let rows = path
            .select(&document, "$")
            .into_iter()
            .flat_map(|(p, node)| match node {
                // an iterator landing on an array iterates its elements
                Value::Array(items) if path.steps.is_empty() => items
                    .iter()
                    .enumerate()
                    .map(|(i, v)| (format!("{}[{}]", p, i), v.clone()))
                    .collect::<Vec<_>>(),
                other => vec![(p, other.clone())],
            })
            .collect();
        Ok(Self { rows })
    }
}

impl SourceAdapter for JsonSource {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn values_at(
        &self,
        row: usize,
        selector: &str,
        _datatype: Option<&str>,
    ) -> RmlResult<Vec<Value>> {
        let Some((row_path, node)) = self.rows.get(row) else {
            return Ok(Vec::new());
        };
        let (reference, want_path) = split_path_marker(selector);
        let path = JsonPath::parse(reference)?;

        let mut values = Vec::new();
        for (p, v) in path.select(node, row_path) {
            if want_path {
                values.push(Value::String(p));
                continue;
            }
            match v {
                Value::Null => {}
                Value::Array(items) => {
                    values.extend(items.iter().filter(|v| !v.is_null()).cloned())
                }
                other => values.push(other.clone()),
            }
        }
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn doc() -> Arc<Value> {
        Arc::new(json!({
            "people": [
                {
                    "name": "Tom A.",
                    "age": 15,
                    "tags": ["a", "b"],
                    "address": { "city": "Berlin" }
                },
                { "name": "Anna", "age": 20, "tags": [], "odd key": "x" }
            ]
        }))
    }

    #[test]
    fn test_parse_steps() {
        let p = JsonPath::parse("$.people[*]['name']").unwrap();
        assert_eq!(
            p.steps,
            vec![
                Step::Field("people".into()),
                Step::Wildcard,
                Step::Field("name".into())
            ]
        );
        assert_eq!(JsonPath::parse("address.city").unwrap().steps.len(), 2);
        assert!(JsonPath::parse("$.a[").is_err());
        assert!(JsonPath::parse("$.a[?(@.x)]").is_err());
    }

    #[test]
    fn test_rows_and_relative_references() {
        let src = JsonSource::new(doc(), Some("$.people[*]")).unwrap();
        assert_eq!(src.row_count(), 2);
        assert_eq!(
            src.values_at(0, "name", None).unwrap(),
            vec![json!("Tom A.")]
        );
        assert_eq!(src.values_at(0, "age", None).unwrap(), vec![json!(15)]);
        assert_eq!(
            src.values_at(0, "address.city", None).unwrap(),
            vec![json!("Berlin")]
        );
        assert_eq!(
            src.values_at(0, "tags", None).unwrap(),
            vec![json!("a"), json!("b")]
        );
        assert_eq!(
            src.values_at(1, "['odd key']", None).unwrap(),
            vec![json!("x")]
        );
        assert!(src.values_at(1, "address.city", None).unwrap().is_empty());
        assert!(src.values_at(1, "tags", None).unwrap().is_empty());
    }

    #[test]
    fn test_paths() {
        let src = JsonSource::new(doc(), Some("$.people[*]")).unwrap();
        assert_eq!(
            src.values_at(0, "PATH~address.city", None).unwrap(),
            vec![json!("$.people[0].address.city")]
        );
        assert_eq!(
            src.values_at(1, "PATH~['odd key']", None).unwrap(),
            vec![json!("$.people[1]['odd key']")]
        );
    }

    #[test]
    fn test_root_array_and_descendants() {
        let src = JsonSource::new(Arc::new(json!([{ "id": 1 }, { "id": 2 }])), None).unwrap();
        assert_eq!(src.row_count(), 2);
        assert_eq!(src.values_at(1, "id", None).unwrap(), vec![json!(2)]);

        let root = doc();
        let names: Vec<_> = JsonPath::parse("$..name")
            .unwrap()
            .select(&root, "$")
            .into_iter()
            .map(|(_, v)| v.clone())
            .collect();
        assert_eq!(names, vec![json!("Tom A."), json!("Anna")]);

        let last = JsonPath::parse("$.people[-1].name")
            .unwrap()
            .select(&root, "$");
        assert_eq!(last[0].1, &json!("Anna"));
    }
}
