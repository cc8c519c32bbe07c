//! Template expansion

use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use crate::error::RmlResult;
use crate::mapping::{Template, TemplateSegment};

/// Characters left unescaped in IRI substitutions (RFC 3986 unreserved)
const IRI_UNRESERVED: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Percent-encode a value for substitution into an IRI
pub fn iri_escape(value: &str) -> String {
    utf8_percent_encode(value, IRI_UNRESERVED).to_string()
}

/// Build a blank-node label (`_:` + escaped name)
pub fn blank_node_label(name: &str) -> String {
    format!("_:{}", iri_escape(name))
}

/// Expand a template against the values of each placeholder
///
/// `values` returns the (possibly multiple) values of a placeholder's
/// selector for the current row. The result holds one string per element
/// of the Cartesian product of placeholder values, with the first
/// placeholder varying slowest. A placeholder without values yields no
/// expansions; a template without placeholders yields itself.
///
/// Substitutions are percent-encoded unless `literal` is set.
pub fn expand_template<F>(
    template: &Template,
    literal: bool,
    mut values: F,
) -> RmlResult<Vec<String>>
where
    F: FnMut(&str) -> RmlResult<Vec<String>>,
{
    let mut expansions = vec![String::new()];

    for segment in template.segments() {
        match segment {
            TemplateSegment::Literal(text) => {
                for expansion in &mut expansions {
                    expansion.push_str(text);
                }
            }
            TemplateSegment::Reference(selector) => {
                let substitutions: Vec<String> = values(selector)?
                    .into_iter()
                    .map(|v| if literal { v } else { iri_escape(&v) })
                    .collect();
                if substitutions.is_empty() {
                    return Ok(Vec::new());
                }
                expansions = expansions
                    .iter()
                    .flat_map(|prefix| {
                        substitutions
                            .iter()
                            .map(move |s| format!("{}{}", prefix, s))
                    })
                    .collect();
            }
        }
    }

    Ok(expansions)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup<'a>(
        values: &'a HashMap<&str, Vec<&str>>,
    ) -> impl FnMut(&str) -> RmlResult<Vec<String>> + 'a {
        move |selector: &str| {
            Ok(values
                .get(selector)
                .map(|vs| vs.iter().map(|v| v.to_string()).collect())
                .unwrap_or_default())
        }
    }

    #[test]
    fn test_multi_valued_expansion() {
        let t = Template::parse("{a}-{b}").unwrap();
        let values = HashMap::from([("a", vec!["1", "2"]), ("b", vec!["x"])]);
        assert_eq!(
            expand_template(&t, false, lookup(&values)).unwrap(),
            vec!["1-x", "2-x"]
        );
    }

    #[test]
    fn test_first_placeholder_varies_slowest() {
        let t = Template::parse("{a}{b}").unwrap();
        let values = HashMap::from([("a", vec!["1", "2"]), ("b", vec!["x", "y"])]);
        assert_eq!(
            expand_template(&t, true, lookup(&values)).unwrap(),
            vec!["1x", "1y", "2x", "2y"]
        );
    }

    #[test]
    fn test_escaping_depends_on_term_kind() {
        let t = Template::parse("http://example.org/{name}").unwrap();
        let values = HashMap::from([("name", vec!["Tom A./é"])]);
        assert_eq!(
            expand_template(&t, false, lookup(&values)).unwrap(),
            vec!["http://example.org/Tom%20A.%2F%C3%A9"]
        );
        assert_eq!(
            expand_template(&t, true, lookup(&values)).unwrap(),
            vec!["http://example.org/Tom A./é"]
        );
    }

    #[test]
    fn test_missing_values_and_constant_templates() {
        let t = Template::parse("x/{missing}").unwrap();
        let values = HashMap::new();
        assert!(expand_template(&t, false, lookup(&values))
            .unwrap()
            .is_empty());

        let t = Template::parse("no placeholders").unwrap();
        assert_eq!(
            expand_template(&t, false, lookup(&values)).unwrap(),
            vec!["no placeholders"]
        );
    }

    #[test]
    fn test_escaped_braces() {
        let t = Template::parse(r"\{{a}\}").unwrap();
        let values = HashMap::from([("a", vec!["v"])]);
        assert_eq!(
            expand_template(&t, true, lookup(&values)).unwrap(),
            vec!["{v}"]
        );
    }

    #[test]
    fn test_blank_node_label() {
        assert_eq!(
            blank_node_label("http://ex.org/Map_1"),
            "_:http%3A%2F%2Fex.org%2FMap_1"
        );
    }
}
