//! BCP 47 language tag validation

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::{RmlError, RmlResult};

static LANGUAGE_TAG_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(concat!(
        r"^(?:",
        // grandfathered
        r"(?:en-GB-oed|i-ami|i-bnn|i-default|i-enochian|i-hak|i-klingon|i-lux|i-mingo|",
        r"i-navajo|i-pwn|i-tao|i-tay|i-tsu|sgn-BE-FR|sgn-BE-NL|sgn-CH-DE|art-lojban|",
        r"cel-gaulish|no-bok|no-nyn|zh-guoyu|zh-hakka|zh-min|zh-min-nan|zh-xiang)",
        // langtag
        r"|(?:(?:[A-Za-z]{2,3}(?:-[A-Za-z]{3}){0,3}|[A-Za-z]{4}|[A-Za-z]{5,8})",
        r"(?:-[A-Za-z]{4})?",
        r"(?:-(?:[A-Za-z]{2}|[0-9]{3}))?",
        r"(?:-(?:[A-Za-z0-9]{5,8}|[0-9][A-Za-z0-9]{3}))*",
        r"(?:-[0-9A-WY-Za-wy-z](?:-[A-Za-z0-9]{2,8})+)*",
        r"(?:-[Xx](?:-[A-Za-z0-9]{1,8})+)?)",
        // private use
        r"|[Xx](?:-[A-Za-z0-9]{1,8})+",
        r")$"
    ))
    .expect("valid regex")
});

/// Validate a language tag against the BCP 47 grammar
pub fn validate_language_tag(tag: &str) -> RmlResult<()> {
    if LANGUAGE_TAG_RE.is_match(tag) {
        Ok(())
    } else {
        Err(RmlError::InvalidLanguageTag(tag.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_tags() {
        for tag in [
            "en",
            "en-US",
            "de-CH-1901",
            "zh-Hant-TW",
            "es-419",
            "x-private",
            "i-klingon",
            "sl-rozaj-biske",
        ] {
            assert!(
                validate_language_tag(tag).is_ok(),
                "{} should be valid",
                tag
            );
        }
    }

    #[test]
    fn test_invalid_tags() {
        for tag in [
            "",
            "english language",
            "en_US",
            "e",
            "en-",
            "123",
            "toolonglanguage",
        ] {
            assert!(
                matches!(validate_language_tag(tag), Err(RmlError::InvalidLanguageTag(_))),
                "{} should be invalid",
                tag
            );
        }
    }
}
