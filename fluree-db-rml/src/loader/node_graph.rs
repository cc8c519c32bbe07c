//! Identity-indexed node graph
//!
//! The extractor consumes mappings in this flattened form: every node has an
//! identifier (IRI or `_:` blank label) and an ordered list of
//! (predicate, object) pairs. Property order is preserved so rule and
//! predicate-object map order in the output follows the mapping document.

use std::collections::HashMap;

use fluree_vocab::{rdf, xsd};
use serde_json::{Map, Value};

use crate::error::{RmlError, RmlResult};

/// Object of a node property
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NodeTerm {
    /// An IRI
    Iri(String),
    /// A blank node, label including the `_:` prefix
    Blank(String),
    /// A literal
    Literal {
        value: String,
        datatype: Option<String>,
        language: Option<String>,
    },
}

impl NodeTerm {
    /// Create an IRI term
    pub fn iri(iri: impl Into<String>) -> Self {
        NodeTerm::Iri(iri.into())
    }

    /// Create a plain literal term
    pub fn literal(value: impl Into<String>) -> Self {
        NodeTerm::Literal {
            value: value.into(),
            datatype: None,
            language: None,
        }
    }

    /// Create an IRI or blank term from a node identifier
    pub fn node(id: impl Into<String>) -> Self {
        let id = id.into();
        if id.starts_with("_:") {
            NodeTerm::Blank(id)
        } else {
            NodeTerm::Iri(id)
        }
    }

    /// Get as IRI string if this is an IRI
    pub fn as_iri(&self) -> Option<&str> {
        match self {
            NodeTerm::Iri(iri) => Some(iri),
            _ => None,
        }
    }

    /// Identifier of the referenced node (IRI or blank label)
    pub fn as_node_id(&self) -> Option<&str> {
        match self {
            NodeTerm::Iri(id) | NodeTerm::Blank(id) => Some(id),
            NodeTerm::Literal { .. } => None,
        }
    }

    /// Lexical string form: literal value or IRI
    pub fn as_str(&self) -> Option<&str> {
        match self {
            NodeTerm::Literal { value, .. } => Some(value),
            NodeTerm::Iri(iri) => Some(iri),
            NodeTerm::Blank(_) => None,
        }
    }
}

/// A node and its properties
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node {
    /// Node identifier
    pub id: String,
    /// (predicate IRI, object) pairs in insertion order
    pub properties: Vec<(String, NodeTerm)>,
}

/// Identity-indexed collection of nodes
#[derive(Debug, Clone, Default)]
pub struct NodeGraph {
    nodes: Vec<Node>,
    by_id: HashMap<String, usize>,
}

impl NodeGraph {
    /// Create an empty graph
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a (subject, predicate, object) statement, creating the subject
    /// node on first use
    pub fn add(&mut self, subject: &str, predicate: impl Into<String>, object: NodeTerm) {
        let idx = self.ensure_node(subject);
        self.nodes[idx].properties.push((predicate.into(), object));
    }

    fn ensure_node(&mut self, id: &str) -> usize {
        if let Some(&idx) = self.by_id.get(id) {
            return idx;
        }
        let idx = self.nodes.len();
        self.nodes.push(Node {
            id: id.to_string(),
            properties: Vec::new(),
        });
        self.by_id.insert(id.to_string(), idx);
        idx
    }

    /// Get a node by identifier
    pub fn node(&self, id: &str) -> Option<&Node> {
        self.by_id.get(id).map(|&idx| &self.nodes[idx])
    }

    /// All nodes in insertion order
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Number of nodes
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if the graph has no nodes
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// All objects of `predicate` on node `id`
    pub fn objects<'a>(
        &'a self,
        id: &str,
        predicate: &'a str,
    ) -> impl Iterator<Item = &'a NodeTerm> + 'a {
        self.node(id)
            .into_iter()
            .flat_map(|n| n.properties.iter())
            .filter(move |(p, _)| p == predicate)
            .map(|(_, o)| o)
    }

    /// First object of `predicate` on node `id`
    pub fn object(&self, id: &str, predicate: &str) -> Option<&NodeTerm> {
        self.node(id)?
            .properties
            .iter()
            .find(|(p, _)| p == predicate)
            .map(|(_, o)| o)
    }

    /// Build a node graph from JSON-LD
    ///
    /// Accepts a single node object, an array of nodes, or a document with
    /// `@graph`. Only prefix definitions and plain term definitions of
    /// `@context` are honored. Embedded node objects without `@id` receive
    /// generated blank labels (`_:b0`, `_:b1`, ...).
    pub fn from_jsonld(doc: &Value) -> RmlResult<Self> {
        let mut flattener = JsonLdFlattener::default();
        match doc {
            Value::Array(items) => {
                for item in items {
                    flattener.flatten_node(item)?;
                }
            }
            Value::Object(obj) => {
                if let Some(ctx) = obj.get("@context") {
                    flattener.read_context(ctx)?;
                }
                match obj.get("@graph") {
                    Some(Value::Array(items)) => {
                        for item in items {
                            flattener.flatten_node(item)?;
                        }
                    }
                    Some(other) => {
                        flattener.flatten_node(other)?;
                    }
                    None => {
                        flattener.flatten_node(doc)?;
                    }
                }
            }
            _ => {
                return Err(RmlError::Parse(
                    "JSON-LD document must be an object or an array".to_string(),
                ))
            }
        }
        Ok(flattener.graph)
    }
}

#[derive(Default)]
struct JsonLdFlattener {
    context: HashMap<String, String>,
    graph: NodeGraph,
    next_blank: usize,
}

impl JsonLdFlattener {
    fn read_context(&mut self, ctx: &Value) -> RmlResult<()> {
        match ctx {
            Value::Array(items) => {
                for item in items {
                    self.read_context(item)?;
                }
                Ok(())
            }
            Value::Object(defs) => {
                for (term, def) in defs {
                    match def {
                        Value::String(iri) => {
                            self.context.insert(term.clone(), iri.clone());
                        }
                        Value::Object(expanded) => {
                            if let Some(Value::String(iri)) = expanded.get("@id") {
                                self.context.insert(term.clone(), iri.clone());
                            }
                        }
                        _ => {}
                    }
                }
                Ok(())
            }
            Value::Null => Ok(()),
            _ => Err(RmlError::Parse(
                "remote @context references are not supported".to_string(),
            )),
        }
    }

    fn expand(&self, term: &str) -> String {
        if term.starts_with("_:") {
            return term.to_string();
        }
        if let Some(iri) = self.context.get(term) {
            return iri.clone();
        }
        if let Some((prefix, local)) = term.split_once(':') {
            if !local.starts_with("//") {
                if let Some(ns) = self.context.get(prefix) {
                    return format!("{}{}", ns, local);
                }
            }
        }
        term.to_string()
    }

    fn fresh_blank(&mut self) -> String {
        let label = format!("_:b{}", self.next_blank);
        self.next_blank += 1;
        label
    }

    fn flatten_node(&mut self, value: &Value) -> RmlResult<String> {
        let obj = value
            .as_object()
            .ok_or_else(|| RmlError::Parse(format!("expected node object, found {}", value)))?;

        let id = match obj.get("@id") {
            Some(Value::String(id)) => self.expand(id),
            Some(other) => return Err(RmlError::Parse(format!("invalid @id: {}", other))),
            None => self.fresh_blank(),
        };
        self.graph.ensure_node(&id);

        for (key, val) in obj {
            match key.as_str() {
                "@id" | "@context" => {}
                "@type" => {
                    for t in as_items(val) {
                        let t = t.as_str().ok_or_else(|| {
                            RmlError::Parse(format!("invalid @type value: {}", t))
                        })?;
                        let iri = self.expand(t);
                        self.graph.add(&id, rdf::TYPE, NodeTerm::node(iri));
                    }
                }
                k if k.starts_with('@') => {}
                k => {
                    let predicate = self.expand(k);
                    for item in as_items(val) {
                        if let Some(term) = self.object_term(item)? {
                            self.graph.add(&id, predicate.clone(), term);
                        }
                    }
                }
            }
        }

        Ok(id)
    }

    fn object_term(&mut self, value: &Value) -> RmlResult<Option<NodeTerm>> {
        let term = match value {
            Value::Null => return Ok(None),
            Value::String(s) => NodeTerm::literal(s.clone()),
            Value::Bool(b) => NodeTerm::Literal {
                value: b.to_string(),
                datatype: Some(xsd::BOOLEAN.to_string()),
                language: None,
            },
            Value::Number(n) => {
                let datatype = if n.is_f64() { xsd::DOUBLE } else { xsd::INTEGER };
                NodeTerm::Literal {
                    value: n.to_string(),
                    datatype: Some(datatype.to_string()),
                    language: None,
                }
            }
            Value::Object(obj) => {
                if let Some(v) = obj.get("@value") {
                    self.value_object(v, obj)?
                } else if is_node_reference(obj) {
                    let id = obj
                        .get("@id")
                        .and_then(Value::as_str)
                        .map(|id| self.expand(id))
                        .unwrap_or_default();
                    NodeTerm::node(id)
                } else {
                    NodeTerm::node(self.flatten_node(value)?)
                }
            }
            Value::Array(_) => {
                return Err(RmlError::Parse(
                    "nested arrays are not supported".to_string(),
                ))
            }
        };
        Ok(Some(term))
    }

    fn value_object(&self, v: &Value, obj: &Map<String, Value>) -> RmlResult<NodeTerm> {
        let value = match v {
            Value::String(s) => s.clone(),
            Value::Number(n) => n.to_string(),
            Value::Bool(b) => b.to_string(),
            other => return Err(RmlError::Parse(format!("invalid @value: {}", other))),
        };
        let datatype = obj
            .get("@type")
            .and_then(Value::as_str)
            .map(|t| self.expand(t));
        let language = obj
            .get("@language")
            .and_then(Value::as_str)
            .map(str::to_string);
        Ok(NodeTerm::Literal {
            value,
            datatype,
            language,
        })
    }
}

fn is_node_reference(obj: &Map<String, Value>) -> bool {
    obj.len() == 1 && obj.contains_key("@id")
}

fn as_items(value: &Value) -> Vec<&Value> {
    match value {
        Value::Array(items) => items.iter().collect(),
        other => vec![other],
    }
}
