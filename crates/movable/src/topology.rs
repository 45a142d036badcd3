//! Topology executor: the seven relocation actions and their inverses.
//!
//! Every action assumes the caller already gated on the moved state and
//! substituted the placeholder at the subject's resting spot; the
//! placeholder is what makes each transform reversible after
//! intervening tree changes.

use crate::placement::{self, Action, Position, Specifier};
use anyhow::{Error, bail};
use dom::{Document, NodeId};
use std::collections::HashSet;

/// Relocate the subject per the resolved action. For `In`, the
/// candidate sibling is recomputed live at the configured index.
#[allow(clippy::too_many_arguments)]
pub(crate) fn perform(
    doc: &mut Document,
    subject: NodeId,
    target: NodeId,
    placeholder: NodeId,
    action: Action,
    position: Option<Position>,
    to: Specifier,
    moved: &HashSet<NodeId>,
) -> Result<(), Error> {
    match action {
        Action::Start => doc.prepend(target, subject),
        Action::End => doc.append(target, subject),
        Action::Before => doc.insert_before(target, subject),
        Action::After => doc.insert_after(target, subject),
        Action::Replace => doc.replace(target, subject),
        Action::Swap => {
            // Two-step exchange: take the target's spot, then hand the
            // target the spot the placeholder marks.
            doc.replace(target, subject)?;
            doc.replace(placeholder, target)
        }
        Action::In => insert_at_index(doc, subject, target, position, to, moved),
    }
}

fn insert_at_index(
    doc: &mut Document,
    subject: NodeId,
    target: NodeId,
    position: Option<Position>,
    to: Specifier,
    moved: &HashSet<NodeId>,
) -> Result<(), Error> {
    let Specifier::Index(index) = to else {
        bail!("action `in` requires an index specifier, got `{to}`");
    };
    match placement::target_child(doc, target, index, moved) {
        Some(sibling) => match position.unwrap_or(Position::Before) {
            Position::Before => doc.insert_before(sibling, subject),
            Position::After => doc.insert_after(sibling, subject),
        },
        // Sibling membership drifted since resolution; normalize the
        // way out-of-range resolution does.
        None if index < 0 => doc.prepend(target, subject),
        None => doc.append(target, subject),
    }
}

/// Undo a performed action, restoring the subject to the spot the
/// placeholder marks and the target to its own position.
pub(crate) fn unwind(
    doc: &mut Document,
    subject: NodeId,
    target: NodeId,
    placeholder: NodeId,
    action: Action,
) -> Result<(), Error> {
    match action {
        Action::Replace => {
            // The target was held off-tree since the move; it takes the
            // subject's current spot back before the subject returns.
            doc.replace(subject, target)?;
            doc.replace(placeholder, subject)
        }
        Action::Swap => {
            doc.replace(subject, placeholder)?;
            doc.replace(target, subject)?;
            doc.replace(placeholder, target)
        }
        _ => doc.replace(placeholder, subject),
    }
}
