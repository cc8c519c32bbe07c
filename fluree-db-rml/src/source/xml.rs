//! XML source adapter
//!
//! Documents are parsed with `quick-xml` into a small element arena and
//! queried with an XPath subset: absolute and relative child steps, `//`,
//! `.`, `..`, `*`, `@name`, `@*`, `text()`, and `[n]` / `[@name='v']`
//! predicates.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;

use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use serde_json::Value;

use super::{coerce_text, split_path_marker, SourceAdapter};
use crate::error::{RmlError, RmlResult};

/// Element of a parsed document
#[derive(Debug, Clone, PartialEq)]
struct Element {
    name: String,
    attributes: Vec<(String, String)>,
    children: Vec<usize>,
    parent: Option<usize>,
    /// Directly contained character data
    text: String,
}

/// Parsed XML document
///
/// Index 0 is a synthetic document node whose only child is the root
/// element.
#[derive(Debug, Clone, PartialEq)]
pub struct XmlDocument {
    elements: Vec<Element>,
}

impl XmlDocument {
    /// Parse XML text
    ///
    /// Every `(attribute, value)` pair of `remove_namespace` is stripped from
    /// the raw text (e.g. `xmlns="http://..."`) so element names can be
    /// selected without prefixes.
    pub fn parse(
        source_id: &str,
        content: &str,
        remove_namespace: &HashMap<String, String>,
    ) -> RmlResult<Self> {
        let mut text = content.to_string();
        for (attr, value) in remove_namespace {
            text = text.replace(&format!("{}=\"{}\"", attr, value), "");
        }

        let mut elements = vec![Element {
            name: String::new(),
            attributes: Vec::new(),
            children: Vec::new(),
            parent: None,
            text: String::new(),
        }];
        let mut stack = vec![0usize];

        let mut reader = Reader::from_str(&text);
        reader.trim_text(true);

        loop {
            match reader.read_event() {
                Ok(Event::Start(ref e)) => {
                    let idx = push_element(&mut elements, &stack, e);
                    stack.push(idx);
                }
                Ok(Event::Empty(ref e)) => {
                    push_element(&mut elements, &stack, e);
                }
                Ok(Event::End(_)) => {
                    if stack.len() > 1 {
                        stack.pop();
                    }
                }
                Ok(Event::Text(ref e)) => {
                    let unescaped = e.unescape().map_err(|e| RmlError::source(source_id, e))?;
                    if let Some(&top) = stack.last() {
                        elements[top].text.push_str(&unescaped);
                    }
                }
                Ok(Event::CData(e)) => {
                    let raw = e.into_inner();
                    if let Some(&top) = stack.last() {
                        elements[top].text.push_str(&String::from_utf8_lossy(&raw));
                    }
                }
                Ok(Event::Eof) => break,
                Err(e) => {
                    return Err(RmlError::source(
                        source_id,
                        format!("XML parse error at {}: {}", reader.buffer_position(), e),
                    ))
                }
                _ => {}
            }
        }

        Ok(Self { elements })
    }

    /// Number of elements, excluding the document node
    pub fn len(&self) -> usize {
        self.elements.len() - 1
    }

    /// Check if the document has no elements
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Concatenated character data of an element and its descendants
    fn string_value(&self, idx: usize) -> String {
        let mut out = self.elements[idx].text.clone();
        for &child in &self.elements[idx].children {
            out.push_str(&self.string_value(child));
        }
        out
    }

    /// `/a[1]/b[2]` path of an element
    fn path(&self, idx: usize) -> String {
        let mut segments = Vec::new();
        let mut current = idx;
        while let Some(parent) = self.elements[current].parent {
            let name = &self.elements[current].name;
            let position = self.elements[parent]
                .children
                .iter()
                .filter(|&&c| self.elements[c].name == *name)
                .position(|&c| c == current)
                .map_or(1, |p| p + 1);
            segments.push(format!("/{}[{}]", name, position));
            current = parent;
        }
        segments.reverse();
        segments.concat()
    }

    fn descendants_or_self(&self, idx: usize, out: &mut Vec<usize>) {
        out.push(idx);
        for &child in &self.elements[idx].children {
            self.descendants_or_self(child, out);
        }
    }

    fn attribute(&self, idx: usize, name: &str) -> Option<&str> {
        self.elements[idx]
            .attributes
            .iter()
            .find(|(k, _)| k == name)
            .map(|(_, v)| v.as_str())
    }
}

fn push_element(elements: &mut Vec<Element>, stack: &[usize], e: &BytesStart) -> usize {
    let parent = stack.last().copied().unwrap_or(0);
    let attributes = e
        .attributes()
        .flatten()
        .map(|attr| {
            let key = String::from_utf8_lossy(attr.key.as_ref()).to_string();
            let value = attr
                .unescape_value()
                .map(|v| v.to_string())
                .unwrap_or_else(|_| String::from_utf8_lossy(&attr.value).to_string());
            (key, value)
        })
        .collect();

    let idx = elements.len();
    elements.push(Element {
        name: String::from_utf8_lossy(e.name().as_ref()).to_string(),
        attributes,
        children: Vec::new(),
        parent: Some(parent),
        text: String::new(),
    });
    elements[parent].children.push(idx);
    idx
}

/// Axis of an XPath step
#[derive(Debug, Clone, Copy, PartialEq)]
enum Axis {
    Child,
    Descendant,
}

/// Node test of an XPath step
#[derive(Debug, Clone, PartialEq)]
enum NodeTest {
    /// Named element, or `*`
    Element(Option<String>),
    /// Named attribute, or `@*`
    Attribute(Option<String>),
    Text,
    SelfNode,
    Parent,
}

/// Filter applied to the nodes a step selects
#[derive(Debug, Clone, PartialEq)]
enum Predicate {
    /// 1-based position among the nodes selected from one context node
    Position(usize),
    AttributeEquals(String, String),
}

#[derive(Debug, Clone, PartialEq)]
struct XStep {
    axis: Axis,
    test: NodeTest,
    predicates: Vec<Predicate>,
}

/// A node matched by an XPath expression
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum Hit<'d> {
    Element(usize),
    Attribute(usize, &'d str, &'d str),
    Text(usize),
}

/// A parsed XPath expression
#[derive(Debug, Clone, PartialEq)]
pub struct XPath {
    absolute: bool,
    steps: Vec<XStep>,
}

impl XPath {
    /// Parse an XPath expression
    pub fn parse(expr: &str) -> RmlResult<Self> {
        let src = expr.trim();
        if src.is_empty() {
            return Err(RmlError::selector(expr, "empty expression"));
        }
        let absolute = src.starts_with('/');
        let mut steps = Vec::new();
        let mut rest = src;
        let mut axis = Axis::Child;

        if let Some(r) = rest.strip_prefix("//") {
            axis = Axis::Descendant;
            rest = r;
        } else if let Some(r) = rest.strip_prefix('/') {
            rest = r;
        }

        while !rest.is_empty() {
            let (step_text, remainder) = split_step(rest);
            steps.push(parse_step(expr, step_text, axis)?);
            if let Some(r) = remainder.strip_prefix("//") {
                axis = Axis::Descendant;
                rest = r;
            } else if let Some(r) = remainder.strip_prefix('/') {
                axis = Axis::Child;
                rest = r;
            } else {
                rest = remainder;
            }
            if rest.is_empty() && remainder.ends_with('/') {
                return Err(RmlError::selector(expr, "trailing '/'"));
            }
        }

        Ok(Self { absolute, steps })
    }

    fn select<'d>(&self, doc: &'d XmlDocument, context: usize) -> Vec<Hit<'d>> {
        let start = if self.absolute { 0 } else { context };
        let mut current = vec![Hit::Element(start)];

        for step in &self.steps {
            let mut next: Vec<Hit<'d>> = Vec::new();
            let mut seen: HashSet<Hit<'d>> = HashSet::new();
            for hit in &current {
                let Hit::Element(node) = *hit else {
                    continue;
                };
                let mut origins = Vec::new();
                match step.axis {
                    Axis::Child => origins.push(node),
                    Axis::Descendant => doc.descendants_or_self(node, &mut origins),
                }
                for origin in origins {
                    let mut selected = step_candidates(doc, origin, &step.test);
                    for predicate in &step.predicates {
                        selected = apply_predicate(doc, selected, predicate);
                    }
                    for h in selected {
                        if seen.insert(h) {
                            next.push(h);
                        }
                    }
                }
            }
            current = next;
        }
        current
    }
}

/// Split the first step off, respecting brackets and quotes
fn split_step(rest: &str) -> (&str, &str) {
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    for (i, c) in rest.char_indices() {
        match (c, quote) {
            ('\'' | '"', None) => quote = Some(c),
            (q, Some(open)) if q == open => quote = None,
            ('[', None) => depth += 1,
            (']', None) => depth = depth.saturating_sub(1),
            ('/', None) if depth == 0 => return (&rest[..i], &rest[i..]),
            _ => {}
        }
    }
    (rest, "")
}

fn parse_step(expr: &str, text: &str, axis: Axis) -> RmlResult<XStep> {
    let (head, mut preds_text) = match text.find('[') {
        Some(pos) => (&text[..pos], &text[pos..]),
        None => (text, ""),
    };

    let test = match head {
        "" => return Err(RmlError::selector(expr, "empty step")),
        "." => NodeTest::SelfNode,
        ".." => NodeTest::Parent,
        "*" => NodeTest::Element(None),
        "text()" => NodeTest::Text,
        "@*" => NodeTest::Attribute(None),
        h if h.starts_with('@') => NodeTest::Attribute(Some(h[1..].to_string())),
        h if h.contains(['(', ')', '=', ' ']) => {
            return Err(RmlError::selector(
                expr,
                format!("unsupported step '{}'", h),
            ))
        }
        h => NodeTest::Element(Some(h.to_string())),
    };

    let mut predicates = Vec::new();
    while let Some(inner_start) = preds_text.strip_prefix('[') {
        let close = inner_start
            .find(']')
            .ok_or_else(|| RmlError::selector(expr, "unclosed '['"))?;
        let inner = inner_start[..close].trim();
        predicates.push(parse_predicate(expr, inner)?);
        preds_text = &inner_start[close + 1..];
    }
    if !preds_text.is_empty() {
        return Err(RmlError::selector(
            expr,
            format!("unexpected '{}'", preds_text),
        ));
    }

    Ok(XStep {
        axis,
        test,
        predicates,
    })
}

fn parse_predicate(expr: &str, inner: &str) -> RmlResult<Predicate> {
    if let Ok(n) = inner.parse::<usize>() {
        if n == 0 {
            return Err(RmlError::selector(expr, "positions start at 1"));
        }
        return Ok(Predicate::Position(n));
    }
    if let Some((lhs, rhs)) = inner.split_once('=') {
        let name = lhs.trim().strip_prefix('@');
        let value = rhs.trim();
        let value = value
            .strip_prefix('\'')
            .and_then(|v| v.strip_suffix('\''))
            .or_else(|| value.strip_prefix('"').and_then(|v| v.strip_suffix('"')));
        if let (Some(name), Some(value)) = (name, value) {
            return Ok(Predicate::AttributeEquals(
                name.to_string(),
                value.to_string(),
            ));
        }
    }
    Err(RmlError::selector(
        expr,
        format!("unsupported predicate '[{}]'", inner),
    ))
}

fn step_candidates<'d>(doc: &'d XmlDocument, origin: usize, test: &NodeTest) -> Vec<Hit<'d>> {
    let element = &doc.elements[origin];
    match test {
        NodeTest::Element(name) => element
            .children
            .iter()
            .filter(|&&c| name.as_ref().map_or(true, |n| doc.elements[c].name == *n))
            .map(|&c| Hit::Element(c))
            .collect(),
        NodeTest::Attribute(name) => element
            .attributes
            .iter()
            .filter(|(k, _)| name.as_ref().map_or(true, |n| k == n))
            .map(|(k, v)| Hit::Attribute(origin, k.as_str(), v.as_str()))
            .collect(),
        NodeTest::Text => {
            if element.text.is_empty() {
                Vec::new()
            } else {
                vec![Hit::Text(origin)]
            }
        }
        NodeTest::SelfNode => vec![Hit::Element(origin)],
        NodeTest::Parent => element.parent.map(Hit::Element).into_iter().collect(),
    }
}

fn apply_predicate<'d>(
    doc: &'d XmlDocument,
    selected: Vec<Hit<'d>>,
    predicate: &Predicate,
) -> Vec<Hit<'d>> {
    match predicate {
        Predicate::Position(n) => selected.into_iter().nth(n - 1).into_iter().collect(),
        Predicate::AttributeEquals(name, value) => selected
            .into_iter()
            .filter(|hit| match hit {
                Hit::Element(idx) => doc.attribute(*idx, name) == Some(value.as_str()),
                _ => false,
            })
            .collect(),
    }
}

/// Row view over a parsed XML document
#[derive(Debug, Clone)]
pub struct XmlSource {
    document: Arc<XmlDocument>,
    rows: Vec<usize>,
}

impl XmlSource {
    /// Select row elements from `document` with the iterator (defaults to the
    /// root element)
    pub fn new(document: Arc<XmlDocument>, iterator: Option<&str>) -> RmlResult<Self> {
        let path = XPath::parse(iterator.unwrap_or("/*"))?;
        let rows = path
            .select(&document, 0)
            .into_iter()
            .filter_map(|hit| match hit {
                Hit::Element(idx) => Some(idx),
                _ => None,
            })
            .collect();
        Ok(Self { document, rows })
    }
}

impl SourceAdapter for XmlSource {
    fn row_count(&self) -> usize {
        self.rows.len()
    }

    fn values_at(
        &self,
        row: usize,
        selector: &str,
        datatype: Option<&str>,
    ) -> RmlResult<Vec<Value>> {
        let Some(&context) = self.rows.get(row) else {
            return Ok(Vec::new());
        };
        let (reference, want_path) = split_path_marker(selector);
        let path = XPath::parse(reference)?;
        let doc = &*self.document;

        let values = path
            .select(doc, context)
            .into_iter()
            .map(|hit| {
                if want_path {
                    let p = match hit {
                        Hit::Element(idx) => doc.path(idx),
                        Hit::Attribute(idx, name, _) => format!("{}/@{}", doc.path(idx), name),
                        Hit::Text(idx) => format!("{}/text()", doc.path(idx)),
                    };
                    return Value::String(p);
                }
                let text = match hit {
                    Hit::Element(idx) => doc.string_value(idx),
                    Hit::Attribute(_, _, value) => value.to_string(),
                    Hit::Text(idx) => doc.elements[idx].text.clone(),
                };
                coerce_text(&text, datatype)
            })
            .collect();
        Ok(values)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fluree_vocab::xsd;
    use serde_json::json;

    const PEOPLE: &str = r#"<?xml version="1.0"?>
        <people xmlns="http://example.org/ns">
            <person id="1"><name>Tom</name><age>15</age></person>
            <person id="2"><name>Anna</name><name>Annie</name></person>
        </people>"#;

    fn source(iterator: &str) -> XmlSource {
        let mut remove = HashMap::new();
        remove.insert("xmlns".to_string(), "http://example.org/ns".to_string());
        let doc = XmlDocument::parse("people.xml", PEOPLE, &remove).unwrap();
        XmlSource::new(Arc::new(doc), Some(iterator)).unwrap()
    }

    #[test]
    fn test_rows_and_values() {
        let src = source("/people/person");
        assert_eq!(src.row_count(), 2);
        assert_eq!(src.values_at(0, "name", None).unwrap(), vec![json!("Tom")]);
        assert_eq!(src.values_at(0, "@id", None).unwrap(), vec![json!("1")]);
        assert_eq!(
            src.values_at(0, "age", Some(xsd::INTEGER)).unwrap(),
            vec![json!(15)]
        );
        assert_eq!(
            src.values_at(1, "name/text()", None).unwrap(),
            vec![json!("Anna"), json!("Annie")]
        );
        assert!(src.values_at(1, "age", None).unwrap().is_empty());
    }

    #[test]
    fn test_descendant_and_predicates() {
        let src = source("//person[@id='2']");
        assert_eq!(src.row_count(), 1);
        assert_eq!(
            src.values_at(0, "name[2]", None).unwrap(),
            vec![json!("Annie")]
        );
        assert_eq!(
            src.values_at(0, "../person[1]/name", None).unwrap(),
            vec![json!("Tom")]
        );
    }

    #[test]
    fn test_paths() {
        let src = source("/people/person");
        assert_eq!(
            src.values_at(1, "PATH~name", None).unwrap(),
            vec![
                json!("/people[1]/person[2]/name[1]"),
                json!("/people[1]/person[2]/name[2]"),
            ]
        );
        assert_eq!(
            src.values_at(0, "PATH~@id", None).unwrap(),
            vec![json!("/people[1]/person[1]/@id")]
        );
        assert_eq!(
            src.values_at(0, "PATH~.", None).unwrap(),
            vec![json!("/people[1]/person[1]")]
        );
    }

    #[test]
    fn test_nested_descendants_select_once() {
        let xml = "<root><s><s><i>a</i></s><i>b</i></s><i>c</i></root>";
        let doc = XmlDocument::parse("nested.xml", xml, &HashMap::new()).unwrap();
        let src = XmlSource::new(Arc::new(doc), Some("//s//i")).unwrap();
        assert_eq!(src.row_count(), 2);
        let mut values: Vec<Value> = (0..2)
            .flat_map(|row| src.values_at(row, ".", None).unwrap())
            .collect();
        values.sort_by_key(|v| v.to_string());
        assert_eq!(values, vec![json!("a"), json!("b")]);
    }

    #[test]
    fn test_large_iterator() {
        let n = 50_000;
        let mut xml = String::from("<root>");
        for i in 0..n {
            xml.push_str(&format!("<item id=\"{}\"/>", i));
        }
        xml.push_str("</root>");
        let doc = XmlDocument::parse("large.xml", &xml, &HashMap::new()).unwrap();
        let src = XmlSource::new(Arc::new(doc), Some("/root/item")).unwrap();
        assert_eq!(src.row_count(), n);
        assert_eq!(
            src.values_at(n - 1, "@id", None).unwrap(),
            vec![json!("49999")]
        );
    }

    #[test]
    fn test_invalid_selectors() {
        assert!(XPath::parse("").is_err());
        assert!(XPath::parse("/a[").is_err());
        assert!(XPath::parse("/a[last()]").is_err());
        assert!(XPath::parse("count(/a)").is_err());
    }

    #[test]
    fn test_malformed_document() {
        let err = XmlDocument::parse("bad.xml", "<a><b></a>", &HashMap::new()).unwrap_err();
        assert!(matches!(err, RmlError::Source { .. }));
    }
}
