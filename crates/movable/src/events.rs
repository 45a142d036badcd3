//! Lifecycle notifications bracketing every relocation.
//!
//! Each move and each return dispatches exactly one before/after pair,
//! bubbling, carrying the subject node. These are the only externally
//! observable signals besides the tree mutation itself.

use dom::{Document, ElementEvent, NodeId};

pub const BEFORE_MOVE: &str = "before-movable-element-move";
pub const AFTER_MOVE: &str = "after-movable-element-move";
pub const BEFORE_RETURN: &str = "before-movable-element-return";
pub const AFTER_RETURN: &str = "after-movable-element-return";

pub(crate) fn notify(doc: &mut Document, name: &'static str, subject: NodeId) {
    doc.dispatch_event(ElementEvent {
        name,
        target: subject,
        bubbles: true,
    });
}
