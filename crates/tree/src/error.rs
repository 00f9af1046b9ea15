use thiserror::Error;

/// Recoverable tree-building failures.  Each one is meant to be shown to the
/// user, never to abort the program.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TreeError {
    /// `victim` (an index into the input slice) is reached again through
    /// `offending_parent`, which it lists among its tags.
    #[error("record \"{victim_name}\" is its own ancestor through parent \"{offending_parent}\"")]
    Circular {
        victim: usize,
        victim_name: String,
        offending_parent: String,
    },

    #[error("no root records found: every record has a parent")]
    NoRoot,

    #[error("no visible record named \"{0}\"")]
    UnknownRoot(String),
}
