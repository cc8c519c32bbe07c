//! CSV source adapter
//!
//! RFC 4180 reader: quoted fields may contain the delimiter, line breaks and
//! doubled quotes. The first record is the header row; every following
//! record is one row. Selectors are column names.

use std::collections::HashMap;
use std::sync::Arc;

use serde_json::Value;

use super::{coerce_text, split_path_marker, SourceAdapter};
use crate::error::{RmlError, RmlResult};

/// Parsed CSV document
#[derive(Debug, Clone, PartialEq)]
pub struct CsvTable {
    headers: Vec<String>,
    columns: HashMap<String, usize>,
    rows: Vec<Vec<String>>,
}

impl CsvTable {
    /// Parse CSV text with the given delimiter
    pub fn parse(source_id: &str, content: &str, delimiter: char) -> RmlResult<Self> {
        let mut records = read_records(content, delimiter)
            .map_err(|message| RmlError::source(source_id, message))?
            .into_iter();

        let headers = records.next().unwrap_or_default();
        let columns = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        let rows = records.collect();

        Ok(Self {
            headers,
            columns,
            rows,
        })
    }

    /// Column names in header order
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    /// Number of data rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Check if the table has no data rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Cell at (row, column); short rows read as missing
    pub fn cell(&self, row: usize, column: &str) -> Option<&str> {
        let col = *self.columns.get(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }
}

/// Split CSV text into records of fields
fn read_records(content: &str, delimiter: char) -> Result<Vec<Vec<String>>, String> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut records = Vec::new();
    let mut record: Vec<String> = Vec::new();
    let mut field = String::new();
    let mut chars = content.chars().peekable();
    let mut in_quotes = false;
    let mut line = 1usize;

    while let Some(c) = chars.next() {
        if in_quotes {
            match c {
                '"' if chars.peek() == Some(&'"') => {
                    chars.next();
                    field.push('"');
                }
                '"' => in_quotes = false,
                '\n' => {
                    line += 1;
                    field.push(c);
                }
                _ => field.push(c),
            }
            continue;
        }

        match c {
            '"' if field.is_empty() => in_quotes = true,
            c if c == delimiter => record.push(std::mem::take(&mut field)),
            '\r' if chars.peek() == Some(&'\n') => {}
            '\n' | '\r' => {
                line += 1;
                record.push(std::mem::take(&mut field));
                push_record(&mut records, std::mem::take(&mut record));
            }
            _ => field.push(c),
        }
    }

    if in_quotes {
        return Err(format!(
            "unterminated quoted field starting before line {}",
            line
        ));
    }
    if !field.is_empty() || !record.is_empty() {
        record.push(field);
        push_record(&mut records, record);
    }

    Ok(records)
}

/// Blank lines do not produce records
fn push_record(records: &mut Vec<Vec<String>>, record: Vec<String>) {
    if !(record.len() == 1 && record[0].is_empty()) {
        records.push(record);
    }
}

/// Row view over a parsed CSV table
#[derive(Debug, Clone)]
pub struct CsvSource {
    table: Arc<CsvTable>,
}

impl CsvSource {
    /// Create a source over a parsed table
    pub fn new(table: Arc<CsvTable>) -> Self {
        Self { table }
    }
}

impl SourceAdapter for CsvSource {
    fn row_count(&self) -> usize {
        self.table.len()
    }

    fn values_at(
        &self,
        row: usize,
        selector: &str,
        datatype: Option<&str>,
    ) -> RmlResult<Vec<Value>> {
        let (column, want_path) = split_path_marker(selector);
        let Some(cell) = self.table.cell(row, column) else {
            return Ok(Vec::new());
        };

        if want_path {
            return Ok(vec![Value::String(format!("/{}/{}", row, column))]);
        }
        Ok(vec![coerce_text(cell, datatype)])
    }
}
