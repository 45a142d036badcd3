//! Document tree structure, node data, and mutation primitives.

use crate::events::{ElementEvent, EventReceiver, EventSenders};
use anyhow::{Error, anyhow};
use indextree::{Arena, NodeId};
use smallvec::SmallVec;
use std::collections::HashMap;

/// What a node in the tree is.
#[derive(Debug, Clone, Default)]
pub enum NodeKind {
    #[default]
    Document,
    Element {
        tag: String,
    },
    Text {
        text: String,
    },
    Comment {
        text: String,
    },
}

impl NodeKind {
    /// Whether the node is an element.
    pub const fn is_element(&self) -> bool {
        matches!(self, Self::Element { .. })
    }
}

/// Data stored for each node.
#[derive(Debug, Clone, Default)]
pub struct DomNode {
    pub kind: NodeKind,
    pub attrs: SmallVec<(String, String), 4>,
}

/// Arena-backed document tree.
///
/// All mutations are synchronous and immediately observable through the
/// read primitives. Nodes survive detachment: relocating a node is a
/// detach followed by a re-insert, and its [`NodeId`] stays valid.
pub struct Document {
    arena: Arena<DomNode>,
    root: NodeId,
    /// Reverse index from the `id` attribute to its element.
    id_index: HashMap<String, NodeId>,
    events: EventSenders,
}

impl Document {
    /// Create an empty document holding only the document root.
    pub fn new() -> Self {
        let mut arena = Arena::new();
        Self {
            root: arena.new_node(DomNode::default()),
            arena,
            id_index: HashMap::new(),
            events: EventSenders::default(),
        }
    }

    /// The document root node.
    pub const fn root(&self) -> NodeId {
        self.root
    }

    /// Create a detached element node.
    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.arena.new_node(DomNode {
            kind: NodeKind::Element {
                tag: tag.to_ascii_lowercase(),
            },
            attrs: SmallVec::new(),
        })
    }

    /// Create a detached text node.
    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode {
            kind: NodeKind::Text {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
        })
    }

    /// Create a detached comment node.
    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(DomNode {
            kind: NodeKind::Comment {
                text: text.to_owned(),
            },
            attrs: SmallVec::new(),
        })
    }

    /// Node data, if the node still exists.
    pub fn node(&self, node: NodeId) -> Option<&DomNode> {
        self.arena.get(node).map(indextree::Node::get)
    }

    /// Element tag name, if the node is an element.
    pub fn tag(&self, node: NodeId) -> Option<&str> {
        match &self.node(node)?.kind {
            NodeKind::Element { tag } => Some(tag.as_str()),
            _ => None,
        }
    }

    /// Whether the node is an element.
    pub fn is_element(&self, node: NodeId) -> bool {
        self.node(node).is_some_and(|data| data.kind.is_element())
    }

    // ------------------------------------------------------------------
    // Attributes
    // ------------------------------------------------------------------

    /// Set an attribute on an element, replacing any existing value.
    /// Writes to the `id` attribute keep the reverse id index current.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let name_lc = name.to_ascii_lowercase();
        if name_lc == "id" {
            self.reindex_id(node, value);
        }
        let Some(data) = self.arena.get_mut(node).map(indextree::Node::get_mut) else {
            return;
        };
        if let Some(pair) = data.attrs.iter_mut().find(|(k, _)| *k == name_lc) {
            pair.1 = value.to_owned();
        } else {
            data.attrs.push((name_lc, value.to_owned()));
        }
    }

    /// Read an attribute value.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        let needle = name.to_ascii_lowercase();
        self.node(node)?
            .attrs
            .iter()
            .find(|(k, _)| *k == needle)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the attribute is present (boolean attribute semantics).
    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Remove an attribute if present.
    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let name_lc = name.to_ascii_lowercase();
        if name_lc == "id" {
            self.drop_id_entry(node);
        }
        if let Some(data) = self.arena.get_mut(node).map(indextree::Node::get_mut) {
            data.attrs.retain(|(k, _)| *k != name_lc);
        }
    }

    /// Look up an element by its `id` attribute.
    pub fn element_by_id(&self, id: &str) -> Option<NodeId> {
        self.id_index.get(id).copied()
    }

    /// Update the id index for a write to the `id` attribute. The old
    /// mapping is dropped only if it still points at this node.
    fn reindex_id(&mut self, node: NodeId, value: &str) {
        self.drop_id_entry(node);
        if !value.is_empty() {
            self.id_index.insert(value.to_owned(), node);
        }
    }

    /// Remove the index entry owned by `node`, if any.
    fn drop_id_entry(&mut self, node: NodeId) {
        if let Some(old) = self
            .attribute(node, "id")
            .map(str::to_owned)
            .filter(|old| matches!(self.id_index.get(old), Some(&n) if n == node))
        {
            self.id_index.remove(&old);
        }
    }

    // ------------------------------------------------------------------
    // Structure reads
    // ------------------------------------------------------------------

    /// Parent of a node, if attached.
    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.parent()
    }

    /// Previous sibling of any kind.
    pub fn previous_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.previous_sibling()
    }

    /// Next sibling of any kind.
    pub fn next_sibling(&self, node: NodeId) -> Option<NodeId> {
        self.arena.get(node)?.next_sibling()
    }

    /// Previous sibling, skipping text and comment nodes.
    pub fn previous_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.previous_sibling(node);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.previous_sibling(sibling);
        }
        None
    }

    /// Next sibling, skipping text and comment nodes.
    pub fn next_element_sibling(&self, node: NodeId) -> Option<NodeId> {
        let mut current = self.next_sibling(node);
        while let Some(sibling) = current {
            if self.is_element(sibling) {
                return Some(sibling);
            }
            current = self.next_sibling(sibling);
        }
        None
    }

    /// All direct children, in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena).collect()
    }

    /// Direct element children, in order (text and comments excluded).
    pub fn element_children(&self, node: NodeId) -> Vec<NodeId> {
        node.children(&self.arena)
            .filter(|child| self.is_element(*child))
            .collect()
    }

    /// Whether the node is reachable from the document root.
    pub fn is_attached(&self, node: NodeId) -> bool {
        self.arena
            .get(node)
            .is_some_and(|entry| !entry.is_removed())
            && node.ancestors(&self.arena).any(|a| a == self.root)
    }

    // ------------------------------------------------------------------
    // Structure mutations
    // ------------------------------------------------------------------

    /// Insert `child` as the last child of `parent`.
    ///
    /// # Errors
    /// Fails when the insertion would create a cycle or touch a freed node.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        child.detach(&mut self.arena);
        parent.checked_append(child, &mut self.arena)?;
        log::trace!("append {child:?} under {parent:?}");
        Ok(())
    }

    /// Insert `child` as the first child of `parent`.
    ///
    /// # Errors
    /// Fails when the insertion would create a cycle or touch a freed node.
    pub fn prepend(&mut self, parent: NodeId, child: NodeId) -> Result<(), Error> {
        child.detach(&mut self.arena);
        parent.checked_prepend(child, &mut self.arena)?;
        log::trace!("prepend {child:?} under {parent:?}");
        Ok(())
    }

    /// Insert `node` immediately before `sibling`.
    ///
    /// # Errors
    /// Fails when `sibling` is detached or the insertion is invalid.
    pub fn insert_before(&mut self, sibling: NodeId, node: NodeId) -> Result<(), Error> {
        self.require_attached_parent(sibling)?;
        node.detach(&mut self.arena);
        sibling.checked_insert_before(node, &mut self.arena)?;
        log::trace!("insert {node:?} before {sibling:?}");
        Ok(())
    }

    /// Insert `node` immediately after `sibling`.
    ///
    /// # Errors
    /// Fails when `sibling` is detached or the insertion is invalid.
    pub fn insert_after(&mut self, sibling: NodeId, node: NodeId) -> Result<(), Error> {
        self.require_attached_parent(sibling)?;
        node.detach(&mut self.arena);
        sibling.checked_insert_after(node, &mut self.arena)?;
        log::trace!("insert {node:?} after {sibling:?}");
        Ok(())
    }

    /// Replace `old` with `new` at the exact same tree position. `old`
    /// is detached but stays alive and can be re-inserted later.
    ///
    /// # Errors
    /// Fails when `old` has no parent or the insertion is invalid.
    pub fn replace(&mut self, old: NodeId, new: NodeId) -> Result<(), Error> {
        self.require_attached_parent(old)?;
        new.detach(&mut self.arena);
        old.checked_insert_before(new, &mut self.arena)?;
        old.detach(&mut self.arena);
        log::trace!("replace {old:?} with {new:?}");
        Ok(())
    }

    /// Detach a node from its parent, keeping it alive.
    pub fn detach(&mut self, node: NodeId) {
        node.detach(&mut self.arena);
    }

    /// Remove a node and its descendants permanently, dropping id index
    /// entries owned by the removed subtree.
    pub fn remove(&mut self, node: NodeId) {
        let removed: Vec<NodeId> = node.descendants(&self.arena).collect();
        for gone in removed {
            self.drop_id_entry(gone);
        }
        node.remove_subtree(&mut self.arena);
    }

    fn require_attached_parent(&self, node: NodeId) -> Result<(), Error> {
        if self.parent(node).is_some() {
            Ok(())
        } else {
            Err(anyhow!("node {node:?} has no parent in the tree"))
        }
    }

    // ------------------------------------------------------------------
    // Events
    // ------------------------------------------------------------------

    /// Register an event subscriber; the receiver sees every event
    /// dispatched after this call.
    pub fn subscribe_events(&mut self) -> EventReceiver {
        self.events.subscribe()
    }

    /// Dispatch an event on a node. Delivery is synchronous; bubbling is
    /// carried as a flag for observers, the document does not re-route.
    pub fn dispatch_event(&mut self, event: ElementEvent) {
        log::debug!("dispatch {} on {:?}", event.name, event.target);
        self.events.dispatch(&event);
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}
