//! Tag-based tree reconstruction.
//!
//! Records point at their parents through tags: a tag equal (trimmed,
//! case-insensitive) to another record's name makes that record a parent.
//! [`build_tree`] rebuilds the resulting multi-parent forest, rejects
//! circular references and returns a sorted, depth-annotated pre-order list.

pub mod builder;
pub mod error;
mod graph;

pub use builder::{FlatNode, TreeItem, TreeOptions, build_tree};
pub use error::TreeError;
