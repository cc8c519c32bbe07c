//! String templates with `{reference}` placeholders

use serde::{Deserialize, Serialize};

use crate::error::{RmlError, RmlResult};

/// One piece of a parsed template
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateSegment {
    /// Literal text, with `\{` and `\}` escapes already removed
    Literal(String),
    /// A `{reference}` placeholder
    Reference(String),
}

/// A parsed `rr:template` value
///
/// Placeholders are `{selector}`. A backslash escapes a brace (or another
/// backslash) so that it is kept as literal text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Template {
    source: String,
    segments: Vec<TemplateSegment>,
}

impl Template {
    /// Parse a template string
    pub fn parse(template: impl Into<String>) -> RmlResult<Self> {
        let source = template.into();
        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut reference: Option<String> = None;
        let mut chars = source.chars();

        while let Some(c) = chars.next() {
            match c {
                '\\' => {
                    let escaped = chars
                        .next()
                        .ok_or_else(|| invalid(&source, "dangling escape"))?;
                    match reference.as_mut() {
                        Some(r) => r.push(escaped),
                        None => literal.push(escaped),
                    }
                }
                '{' => {
                    if reference.is_some() {
                        return Err(invalid(&source, "nested '{'"));
                    }
                    if !literal.is_empty() {
                        segments.push(TemplateSegment::Literal(std::mem::take(&mut literal)));
                    }
                    reference = Some(String::new());
                }
                '}' => match reference.take() {
                    Some(r) if r.is_empty() => return Err(invalid(&source, "empty placeholder")),
                    Some(r) => segments.push(TemplateSegment::Reference(r)),
                    None => literal.push('}'),
                },
                _ => match reference.as_mut() {
                    Some(r) => r.push(c),
                    None => literal.push(c),
                },
            }
        }

        if reference.is_some() {
            return Err(invalid(&source, "unclosed '{'"));
        }
        if !literal.is_empty() {
            segments.push(TemplateSegment::Literal(literal));
        }

        Ok(Self { source, segments })
    }

    /// The template as written in the mapping
    pub fn as_str(&self) -> &str {
        &self.source
    }

    /// Parsed segments in template order
    pub fn segments(&self) -> &[TemplateSegment] {
        &self.segments
    }
}

fn invalid(template: &str, message: &str) -> RmlError {
    RmlError::InvalidValue {
        property: "rr:template".to_string(),
        message: format!("{} in '{}'", message, template),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_placeholders() {
        let t = Template::parse("http://example.org/{a}-{b}").unwrap();
        assert_eq!(
            t.segments(),
            &[
                TemplateSegment::Literal("http://example.org/".to_string()),
                TemplateSegment::Reference("a".to_string()),
                TemplateSegment::Literal("-".to_string()),
                TemplateSegment::Reference("b".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_escaped_braces() {
        let t = Template::parse(r"\{literal\} {id}").unwrap();
        assert_eq!(
            t.segments(),
            &[
                TemplateSegment::Literal("{literal} ".to_string()),
                TemplateSegment::Reference("id".to_string()),
            ]
        );
    }

    #[test]
    fn test_parse_no_placeholders() {
        let t = Template::parse("plain").unwrap();
        assert_eq!(
            t.segments(),
            &[TemplateSegment::Literal("plain".to_string())]
        );
        assert_eq!(t.as_str(), "plain");
    }

    #[test]
    fn test_parse_errors() {
        assert!(Template::parse("http://example.org/{id").is_err());
        assert!(Template::parse("http://example.org/{}").is_err());
        assert!(Template::parse("{a{b}}").is_err());
    }
}
