//! Mutable document tree consumed by the relocation engine.
//!
//! The tree is arena-backed and deliberately small: it carries exactly the
//! structure and mutation primitives the relocation core relies on
//! (insert before/after, prepend, append, replace, remove, sibling and
//! child reads) plus an id lookup index and a synchronous element-event
//! stream for lifecycle notifications.

pub mod events;
mod printing;
pub mod tree;

pub use events::{ElementEvent, EventReceiver};
pub use indextree::NodeId;
pub use tree::{Document, DomNode, NodeKind};
