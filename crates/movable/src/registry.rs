//! Breakpoint controller and subject lifecycle.
//!
//! The registry owns every prepared subject and drives the state
//! machine: Uninitialized → Prepared → Active ⇄ {Resting, Moved} →
//! Destroyed. The host signals tree entry/exit via
//! [`MovableRegistry::connect`] / [`MovableRegistry::disconnect`] and
//! routes viewport flips through
//! [`MovableRegistry::apply_media_changes`]; manual subjects are driven
//! with `relocate`/`restore`/`toggle` directly.

use crate::config::{self, ATTR_MANUAL, ATTR_MEDIA, ATTR_TARGET, ATTR_TO, InitAttributes, Prepared};
use crate::events::{self, AFTER_MOVE, AFTER_RETURN, BEFORE_MOVE, BEFORE_RETURN};
use crate::placement::{self, Action, Position, Specifier};
use crate::topology;
use anyhow::Error;
use dom::{Document, NodeId};
use media::{MediaChange, MediaHub, MediaQuery, WatchId};
use std::collections::{HashMap, HashSet};

/// Per-subject record. `action`/`position` are resolved once at
/// preparation and only recomputed through `reinit`.
struct Subject {
    manual: bool,
    target: NodeId,
    query: MediaQuery,
    to: Specifier,
    action: Action,
    position: Option<Position>,
    /// Inert comment node owned by this subject; in the tree exactly
    /// while the subject is moved (modulo the swap exchange steps).
    placeholder: NodeId,
    watch: Option<WatchId>,
    is_moved: bool,
}

/// Registry of movable subjects within one document.
#[derive(Default)]
pub struct MovableRegistry {
    subjects: HashMap<NodeId, Subject>,
}

impl MovableRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether the subject is prepared.
    pub fn is_prepared(&self, node: NodeId) -> bool {
        self.subjects.contains_key(&node)
    }

    /// Whether the subject is currently relocated.
    pub fn is_moved(&self, node: NodeId) -> bool {
        self.subjects
            .get(&node)
            .is_some_and(|subject| subject.is_moved)
    }

    /// Resolved action for a prepared subject.
    pub fn action(&self, node: NodeId) -> Option<Action> {
        self.subjects.get(&node).map(|subject| subject.action)
    }

    /// Resolved position for a prepared `in`-action subject.
    pub fn position(&self, node: NodeId) -> Option<Position> {
        self.subjects.get(&node)?.position
    }

    /// Subjects currently moved away from their resting position.
    fn moved_set(&self) -> HashSet<NodeId> {
        self.subjects
            .iter()
            .filter(|(_, subject)| subject.is_moved)
            .map(|(node, _)| *node)
            .collect()
    }

    // ------------------------------------------------------------------
    // Lifecycle
    // ------------------------------------------------------------------

    /// Tree-entry signal. Prepares the subject from its attributes if
    /// needed, then activates breakpoint-driven toggling unless the
    /// subject is manual.
    ///
    /// # Errors
    /// Propagates [`crate::ConfigError`] when preparation fails; the
    /// subject is left uninitialized.
    pub fn connect(
        &mut self,
        doc: &mut Document,
        hub: &mut MediaHub,
        node: NodeId,
    ) -> Result<(), Error> {
        if !self.subjects.contains_key(&node) && !self.prepare(doc, node)? {
            return Ok(());
        }
        let manual = self
            .subjects
            .get(&node)
            .is_none_or(|subject| subject.manual);
        if !manual {
            self.activate(doc, hub, node)?;
        }
        Ok(())
    }

    /// Tree-exit signal. Cancels the breakpoint subscription but keeps
    /// the prepared state, so re-entry re-activates without re-parsing.
    pub fn disconnect(&mut self, hub: &mut MediaHub, node: NodeId) {
        if let Some(subject) = self.subjects.get_mut(&node)
            && let Some(watch) = subject.watch.take()
        {
            hub.unwatch(watch);
        }
    }

    /// Programmatic initialization. A no-op on an already prepared
    /// subject; otherwise the supplied values are written through to
    /// the attributes and preparation runs.
    ///
    /// # Errors
    /// Propagates [`crate::ConfigError`] when preparation fails.
    pub fn init(
        &mut self,
        doc: &mut Document,
        hub: &mut MediaHub,
        node: NodeId,
        attrs: &InitAttributes,
    ) -> Result<(), Error> {
        if self.subjects.contains_key(&node) {
            return Ok(());
        }
        if let Some(target_id) = &attrs.target_id {
            doc.set_attribute(node, ATTR_TARGET, target_id);
        }
        if let Some(media) = &attrs.media {
            doc.set_attribute(node, ATTR_MEDIA, media);
        }
        if let Some(to) = &attrs.to {
            doc.set_attribute(node, ATTR_TO, to);
        }
        if attrs.manual {
            doc.set_attribute(node, ATTR_MANUAL, "");
        } else {
            doc.remove_attribute(node, ATTR_MANUAL);
        }

        if !self.prepare(doc, node)? {
            return Ok(());
        }
        let manual = self
            .subjects
            .get(&node)
            .is_none_or(|subject| subject.manual);
        if !manual {
            self.activate(doc, hub, node)?;
        }
        Ok(())
    }

    /// Tear the subject down. With `restore`, a moved subject is
    /// returned to its resting position first; without it, the subject
    /// stays wherever it is and only the tracking state is cleared.
    /// The placeholder is removed in either case.
    ///
    /// # Errors
    /// Propagates tree mutation failures from the forced restore.
    pub fn destroy(
        &mut self,
        doc: &mut Document,
        hub: &mut MediaHub,
        node: NodeId,
        restore: bool,
    ) -> Result<(), Error> {
        if !self.subjects.contains_key(&node) {
            return Ok(());
        }
        self.disconnect(hub, node);
        if restore {
            self.restore(doc, node)?;
        }
        if let Some(subject) = self.subjects.remove(&node) {
            doc.remove(subject.placeholder);
            log::debug!("destroyed subject {node:?} (restore={restore})");
        }
        Ok(())
    }

    /// `destroy` followed by `init`: the only supported way to change
    /// `target`/`to`/`media` after setup.
    ///
    /// # Errors
    /// Propagates failures from either phase.
    pub fn reinit(
        &mut self,
        doc: &mut Document,
        hub: &mut MediaHub,
        node: NodeId,
        attrs: &InitAttributes,
        restore: bool,
    ) -> Result<(), Error> {
        self.destroy(doc, hub, node, restore)?;
        self.init(doc, hub, node, attrs)
    }

    fn prepare(&mut self, doc: &mut Document, node: NodeId) -> Result<bool, Error> {
        match config::read_config(doc, node)? {
            Prepared::Inert => Ok(false),
            Prepared::Ready { manual, config } => {
                let moved = self.moved_set();
                placement::difference_check(doc, node, config.target, config.to, &moved)?;
                let (action, position) = placement::resolve(doc, config.target, config.to, &moved);
                let placeholder = doc.create_comment(" <movable-element-placeholder> ");
                log::debug!(
                    "prepared subject {node:?}: to={} action={action:?} position={position:?}",
                    config.to
                );
                self.subjects.insert(
                    node,
                    Subject {
                        manual,
                        target: config.target,
                        query: config.query,
                        to: config.to,
                        action,
                        position,
                        placeholder,
                        watch: None,
                        is_moved: false,
                    },
                );
                Ok(true)
            }
        }
    }

    /// Subscribe to the breakpoint and evaluate the current match state
    /// once, so a breakpoint that already matches moves the subject
    /// immediately.
    fn activate(
        &mut self,
        doc: &mut Document,
        hub: &mut MediaHub,
        node: NodeId,
    ) -> Result<(), Error> {
        let watch = {
            let Some(subject) = self.subjects.get_mut(&node) else {
                return Ok(());
            };
            if subject.watch.is_none() {
                subject.watch = Some(hub.watch(subject.query.clone()));
            }
            subject.watch
        };
        let Some(watch) = watch else {
            return Ok(());
        };
        if hub.is_matching(watch) == Some(true) {
            self.relocate(doc, node)
        } else {
            self.restore(doc, node)
        }
    }

    // ------------------------------------------------------------------
    // Move / return / toggle
    // ------------------------------------------------------------------

    /// Move the subject to its target-relative position. Idempotent:
    /// a moved subject stays put and dispatches nothing.
    ///
    /// # Errors
    /// Propagates tree mutation failures.
    pub fn relocate(&mut self, doc: &mut Document, node: NodeId) -> Result<(), Error> {
        let moved = self.moved_set();
        let Some(subject) = self.subjects.get_mut(&node) else {
            return Ok(());
        };
        if subject.is_moved {
            return Ok(());
        }
        let (target, placeholder, action, position, to) = (
            subject.target,
            subject.placeholder,
            subject.action,
            subject.position,
            subject.to,
        );
        events::notify(doc, BEFORE_MOVE, node);
        subject.is_moved = true;
        // Substitute the placeholder first: it captures the restore point.
        doc.replace(node, placeholder)?;
        topology::perform(doc, node, target, placeholder, action, position, to, &moved)?;
        events::notify(doc, AFTER_MOVE, node);
        log::debug!("subject {node:?} moved via {action:?}");
        Ok(())
    }

    /// Return the subject to its resting position. Idempotent: a
    /// resting subject stays put and dispatches nothing.
    ///
    /// # Errors
    /// Propagates tree mutation failures.
    pub fn restore(&mut self, doc: &mut Document, node: NodeId) -> Result<(), Error> {
        let Some(subject) = self.subjects.get_mut(&node) else {
            return Ok(());
        };
        if !subject.is_moved {
            return Ok(());
        }
        let (target, placeholder, action) =
            (subject.target, subject.placeholder, subject.action);
        events::notify(doc, BEFORE_RETURN, node);
        subject.is_moved = false;
        topology::unwind(doc, node, target, placeholder, action)?;
        events::notify(doc, AFTER_RETURN, node);
        log::debug!("subject {node:?} returned");
        Ok(())
    }

    /// Flip between moved and resting.
    ///
    /// # Errors
    /// Propagates tree mutation failures.
    pub fn toggle(&mut self, doc: &mut Document, node: NodeId) -> Result<(), Error> {
        if self.is_moved(node) {
            self.restore(doc, node)
        } else {
            self.relocate(doc, node)
        }
    }

    /// Route viewport flips to their subjects: match moves, no-match
    /// returns. Changes for cancelled or unknown watches are ignored.
    ///
    /// # Errors
    /// Propagates tree mutation failures.
    pub fn apply_media_changes(
        &mut self,
        doc: &mut Document,
        changes: &[MediaChange],
    ) -> Result<(), Error> {
        for change in changes {
            let Some(node) = self
                .subjects
                .iter()
                .find(|(_, subject)| subject.watch == Some(change.id))
                .map(|(node, _)| *node)
            else {
                continue;
            };
            if change.matches {
                self.relocate(doc, node)?;
            } else {
                self.restore(doc, node)?;
            }
        }
        Ok(())
    }
}
