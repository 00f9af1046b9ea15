//! The base: an ordered list of notes mirrored from one text file.
//!
//! The whole file is rewritten through the base template on every change;
//! there is no incremental update.

pub mod file;
pub mod merge;
pub mod note;
pub mod store;

pub use file::{BaseFile, atomic_write, backup};
pub use merge::{merge_tags, merge_text, prettify_list};
pub use note::{NAME_FIELD, Note, TAGS_FIELD, TEXT_FIELD};
pub use store::RecordStore;
