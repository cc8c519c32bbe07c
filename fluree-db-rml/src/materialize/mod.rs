//! Term materialization module
//!
//! Helpers for turning selector values into output terms:
//!
//! - **Templates**: `expand_template` computes the Cartesian expansion of a
//!   parsed template, percent-encoding substitutions for non-literal terms.
//! - **Language tags**: `validate_language_tag` checks BCP 47 syntax.
//! - **Terms**: `RdfTerm` and its N-Triples rendering.

mod language;
mod template;
mod term;

pub use language::validate_language_tag;
pub use template::{blank_node_label, expand_template, iri_escape};
pub use term::RdfTerm;
