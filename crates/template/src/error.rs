use thiserror::Error;

/// A template that cannot be compiled into a [`crate::Schema`].
///
/// Always fatal for the template it came from: there is no fallback schema,
/// the user has to fix the template file by hand.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    #[error("field marker at byte {offset} is not closed by a `<name>` tag")]
    UnterminatedMarker { offset: usize },

    #[error("field marker at byte {offset} has an empty name")]
    EmptyFieldName { offset: usize },

    #[error("field name `{name}` at byte {offset} may only contain letters, digits and `_`")]
    InvalidFieldName { name: String, offset: usize },

    #[error("field `{0}` is declared more than once")]
    DuplicateField(String),

    #[error(
        "multi-line field `{field}` touches field `{neighbour}` with no literal text between them"
    )]
    AmbiguousMultiline { field: String, neighbour: String },

    #[error("template declares no fields")]
    NoFields,
}
