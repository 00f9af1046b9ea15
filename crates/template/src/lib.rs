//! Bidirectional text templates.
//!
//! A template is plain text with field markers (`<>DEFAULT<name>` for a
//! single-line field, `<m>DEFAULT<name>` for a multi-line one).  Compiling it
//! yields a [`Schema`] that parses conforming text into [`Record`]s and writes
//! records back with the template's exact framing.
//!
//! Values that contain the template's own literal text are not escaped, so
//! such records are not guaranteed to survive a write/parse round trip.

pub mod defaults;
pub mod error;
pub mod marker;
mod matcher;
pub mod record;
pub mod schema;

pub use defaults::{DEFAULT_BASE_TEMPLATE, DEFAULT_INTERFACE_TEMPLATE, DEFAULT_TREE_TEMPLATE};
pub use error::TemplateError;
pub use marker::LineMode;
pub use record::{FieldValue, LIST_SEPARATOR, ParseResult, Record};
pub use schema::{Schema, Segment};

/// Shorthand for [`Schema::compile`].
pub fn compile(template: &str) -> Result<Schema, TemplateError> {
    Schema::compile(template)
}
