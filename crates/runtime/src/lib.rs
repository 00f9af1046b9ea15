//! The interface controller and everything it needs from the outside world.
//!
//! [`Session`] renders the note being edited into the interface file, parses
//! the user's saves back, runs the typed [`Command`] against the base and
//! renders again.

pub mod command;
pub mod files;
pub mod messages;
pub mod session;
pub mod templates;
pub mod view;

pub use command::Command;
pub use files::{FileSystem, LocalFiles, MemoryFiles};
pub use session::{COMMAND_FIELD, Flow, InterfaceState, Session, TAGS_USED_FIELD};
pub use templates::Templates;
pub use view::render_tree;
