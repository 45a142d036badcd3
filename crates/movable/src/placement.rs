//! Placement resolution: from a declarative specifier to a concrete
//! action, plus the self-placement difference check.

use crate::error::ConfigError;
use dom::{Document, NodeId};
use std::collections::HashSet;
use std::fmt;
use std::str::FromStr;

/// Declarative placement relative to the target.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Specifier {
    Start,
    End,
    Before,
    After,
    Replace,
    Swap,
    /// Signed child index within the target; negative counts from the end.
    Index(i64),
}

impl FromStr for Specifier {
    type Err = ConfigError;

    fn from_str(text: &str) -> Result<Self, Self::Err> {
        match text {
            "start" => Ok(Self::Start),
            "end" => Ok(Self::End),
            "before" => Ok(Self::Before),
            "after" => Ok(Self::After),
            "replace" => Ok(Self::Replace),
            "swap" => Ok(Self::Swap),
            other => parse_index(other)
                .map(Self::Index)
                .ok_or_else(|| ConfigError::InvalidSpecifier(other.to_owned())),
        }
    }
}

impl fmt::Display for Specifier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Start => f.write_str("start"),
            Self::End => f.write_str("end"),
            Self::Before => f.write_str("before"),
            Self::After => f.write_str("after"),
            Self::Replace => f.write_str("replace"),
            Self::Swap => f.write_str("swap"),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

/// Strict signed-integer form: an optional leading minus, digits only.
fn parse_index(text: &str) -> Option<i64> {
    let digits = text.strip_prefix('-').unwrap_or(text);
    if digits.is_empty() || !digits.bytes().all(|byte| byte.is_ascii_digit()) {
        return None;
    }
    text.parse().ok()
}

/// The structural operation resolved from a specifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Start,
    End,
    Before,
    After,
    Replace,
    Swap,
    /// Insert next to a resolved sibling inside the target.
    In,
}

/// Which side of the resolved sibling an `In` action inserts on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Position {
    Before,
    After,
}

/// Element children of `target`, excluding movable subjects currently
/// moved away so cooperating subjects never collide over an index.
pub(crate) fn filtered_children(
    doc: &Document,
    target: NodeId,
    moved: &HashSet<NodeId>,
) -> Vec<NodeId> {
    doc.element_children(target)
        .into_iter()
        .filter(|child| !moved.contains(child))
        .collect()
}

/// Child at a signed index; negative indices count from the end.
fn child_at(children: &[NodeId], index: i64) -> Option<NodeId> {
    let len = children.len() as i64;
    let resolved = if index < 0 { len + index } else { index };
    (0..len)
        .contains(&resolved)
        .then(|| children[resolved as usize])
}

/// Candidate sibling at the configured index, computed live against the
/// current filtered child set. Never cached: membership can change
/// between moves.
pub(crate) fn target_child(
    doc: &Document,
    target: NodeId,
    index: i64,
    moved: &HashSet<NodeId>,
) -> Option<NodeId> {
    child_at(&filtered_children(doc, target, moved), index)
}

/// Reject configurations whose destination is the subject's own resting
/// position. A caller bug, not a runtime condition.
pub(crate) fn difference_check(
    doc: &Document,
    subject: NodeId,
    target: NodeId,
    to: Specifier,
    moved: &HashSet<NodeId>,
) -> Result<(), ConfigError> {
    let same = target == subject
        || match to {
            Specifier::Start | Specifier::Index(0) => {
                target_child(doc, target, 0, moved) == Some(subject)
            }
            Specifier::End | Specifier::Index(-1) => {
                target_child(doc, target, -1, moved) == Some(subject)
            }
            Specifier::Before => doc.previous_element_sibling(target) == Some(subject),
            Specifier::After => doc.next_element_sibling(target) == Some(subject),
            Specifier::Index(index) => target_child(doc, target, index, moved) == Some(subject),
            Specifier::Replace | Specifier::Swap => false,
        };
    if same {
        Err(ConfigError::SelfPlacement)
    } else {
        Ok(())
    }
}

/// Resolve a specifier to its action, and for index placement the side
/// of the candidate sibling.
pub(crate) fn resolve(
    doc: &Document,
    target: NodeId,
    to: Specifier,
    moved: &HashSet<NodeId>,
) -> (Action, Option<Position>) {
    match to {
        Specifier::Start => (Action::Start, None),
        Specifier::End => (Action::End, None),
        Specifier::Before => (Action::Before, None),
        Specifier::After => (Action::After, None),
        Specifier::Replace => (Action::Replace, None),
        Specifier::Swap => (Action::Swap, None),
        Specifier::Index(index) => {
            if target_child(doc, target, index, moved).is_some() {
                // Negative indices count from the end, so insertion
                // reads naturally after the found sibling there.
                let position = if index < 0 {
                    Position::After
                } else {
                    Position::Before
                };
                (Action::In, Some(position))
            } else if index < 0 {
                (Action::Start, None)
            } else {
                (Action::End, None)
            }
        }
    }
}
