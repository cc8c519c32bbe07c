//! RML error types

use thiserror::Error;

/// RML mapping and evaluation errors
///
/// Every variant is fatal for the run that produced it. Recoverable
/// conditions (ambiguous join keys) are logged instead of returned.
#[derive(Debug, Error)]
pub enum RmlError {
    /// Error building the node graph from its input form
    #[error("Parse error: {0}")]
    Parse(String),

    /// Missing required property in mapping
    #[error("Missing required property: {0}")]
    MissingProperty(String),

    /// Invalid property value
    #[error("Invalid value for {property}: {message}")]
    InvalidValue { property: String, message: String },

    /// Term type not allowed for the term map it appears on
    #[error("Invalid term type: {0}")]
    InvalidTermType(String),

    /// Resolved language tag does not match the BCP 47 grammar
    #[error("Invalid language tag: {0}")]
    InvalidLanguageTag(String),

    /// Reference to non-existent TriplesMap
    #[error("Unknown TriplesMap: {0}")]
    UnknownTriplesMap(String),

    /// A TriplesMap was requested while its own evaluation was in progress
    #[error("Cyclic dependency while evaluating TriplesMap {0}")]
    CyclicDependency(String),

    /// Function value resolution or invocation failure
    #[error("Function error: {0}")]
    Function(String),

    /// Logical source content was not supplied for the run
    #[error("Missing source: {0}")]
    MissingSource(String),

    /// Logical source content could not be parsed
    #[error("Source error in {source_id}: {message}")]
    Source { source_id: String, message: String },

    /// Unparsable iterator or reference expression
    #[error("Invalid selector '{selector}': {message}")]
    InvalidSelector { selector: String, message: String },
}

impl RmlError {
    /// Build a `Function` error from anything displayable
    pub fn function(message: impl Into<String>) -> Self {
        RmlError::Function(message.into())
    }

    /// Build a `Source` error for a source identifier
    pub fn source(source_id: impl Into<String>, message: impl std::fmt::Display) -> Self {
        RmlError::Source {
            source_id: source_id.into(),
            message: message.to_string(),
        }
    }

    /// Build an `InvalidSelector` error
    pub fn selector(selector: impl Into<String>, message: impl Into<String>) -> Self {
        RmlError::InvalidSelector {
            selector: selector.into(),
            message: message.into(),
        }
    }
}

/// Result type for RML operations
pub type RmlResult<T> = Result<T, RmlError>;
