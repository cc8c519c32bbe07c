//! Parsed-source cache
//!
//! Parsing a source document is independent of the iterator applied to it,
//! so parsed documents are shared by every rule reading the same source with
//! the same reference formulation and parse options (CSV delimiter, removed
//! XML namespaces). The cache is populated lazily and never
//! invalidated; callers may keep one across runs.

use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::RwLock;
use serde_json::Value;
use tracing::debug;

use super::{CsvSource, CsvTable, JsonSource, SourceAdapter, XmlDocument, XmlSource};
use crate::config::MappingOptions;
use crate::error::{RmlError, RmlResult};
use crate::mapping::{LogicalSource, ReferenceFormulation};

/// A parsed source document
#[derive(Debug, Clone)]
pub enum ParsedSource {
    Csv(Arc<CsvTable>),
    Json(Arc<Value>),
    Xml(Arc<XmlDocument>),
}

impl ParsedSource {
    /// Parse raw content according to a reference formulation
    pub fn parse(
        source_id: &str,
        content: &str,
        formulation: ReferenceFormulation,
        options: &MappingOptions,
    ) -> RmlResult<Self> {
        Ok(match formulation {
            ReferenceFormulation::Csv => ParsedSource::Csv(Arc::new(CsvTable::parse(
                source_id,
                content,
                options.csv_delimiter,
            )?)),
            ReferenceFormulation::JsonPath => ParsedSource::Json(Arc::new(
                serde_json::from_str(content).map_err(|e| RmlError::source(source_id, e))?,
            )),
            ReferenceFormulation::XPath => ParsedSource::Xml(Arc::new(XmlDocument::parse(
                source_id,
                content,
                &options.remove_namespace,
            )?)),
        })
    }

    /// Build the row view of this document for an iterator
    pub fn adapter(&self, iterator: Option<&str>) -> RmlResult<Arc<dyn SourceAdapter>> {
        Ok(match self {
            ParsedSource::Csv(table) => Arc::new(CsvSource::new(Arc::clone(table))),
            ParsedSource::Json(doc) => Arc::new(JsonSource::new(Arc::clone(doc), iterator)?),
            ParsedSource::Xml(doc) => Arc::new(XmlSource::new(Arc::clone(doc), iterator)?),
        })
    }
}

/// Source identifier, reference formulation and the options the parse
/// depends on
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    source: String,
    formulation: ReferenceFormulation,
    settings: Vec<String>,
}

impl CacheKey {
    fn new(logical_source: &LogicalSource, options: &MappingOptions) -> Self {
        let settings = match logical_source.reference_formulation {
            ReferenceFormulation::Csv => vec![options.csv_delimiter.to_string()],
            ReferenceFormulation::XPath => {
                let mut removed: Vec<String> = options
                    .remove_namespace
                    .iter()
                    .map(|(attr, value)| format!("{}={}", attr, value))
                    .collect();
                removed.sort();
                removed
            }
            ReferenceFormulation::JsonPath => Vec::new(),
        };
        Self {
            source: logical_source.source.clone(),
            formulation: logical_source.reference_formulation,
            settings,
        }
    }
}

/// Shared cache of parsed sources
#[derive(Debug, Default)]
pub struct SourceCache {
    parsed: RwLock<HashMap<CacheKey, ParsedSource>>,
}

impl SourceCache {
    /// Create an empty cache
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of parsed documents held
    pub fn len(&self) -> usize {
        self.parsed.read().len()
    }

    /// Check if nothing has been parsed yet
    pub fn is_empty(&self) -> bool {
        self.parsed.read().is_empty()
    }

    /// Drop every parsed document
    pub fn clear(&self) {
        self.parsed.write().clear();
    }

    /// Get the parsed document for a logical source, parsing `content` on
    /// first access
    pub fn get_or_parse(
        &self,
        logical_source: &LogicalSource,
        content: Option<&str>,
        options: &MappingOptions,
    ) -> RmlResult<ParsedSource> {
        let key = CacheKey::new(logical_source, options);
        if let Some(parsed) = self.parsed.read().get(&key) {
            return Ok(parsed.clone());
        }

        let content =
            content.ok_or_else(|| RmlError::MissingSource(logical_source.source.clone()))?;
        let parsed = ParsedSource::parse(
            &logical_source.source,
            content,
            logical_source.reference_formulation,
            options,
        )?;
        debug!(
            source = %logical_source.source,
            formulation = logical_source.reference_formulation.name(),
            "parsed logical source"
        );

        let mut guard = self.parsed.write();
        Ok(guard.entry(key).or_insert(parsed).clone())
    }

    /// Build the row view for a logical source
    pub fn open(
        &self,
        logical_source: &LogicalSource,
        content: Option<&str>,
        options: &MappingOptions,
    ) -> RmlResult<Arc<dyn SourceAdapter>> {
        self.get_or_parse(logical_source, content, options)?
            .adapter(logical_source.iterator.as_deref())
    }
}
