//! Synchronous element-event stream.
//!
//! Events are delivered over `std::sync::mpsc` channels so observers can
//! drain them at their own pace within the same task; delivery is
//! strictly in dispatch order and never re-entrant.

use indextree::NodeId;
use std::sync::mpsc;

/// An event dispatched against a node in the document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ElementEvent {
    /// Event name, e.g. `before-movable-element-move`.
    pub name: &'static str,
    /// The node the event was dispatched on.
    pub target: NodeId,
    /// Whether the event propagates up the ancestor chain.
    pub bubbles: bool,
}

/// Receiving half of a document event subscription.
pub type EventReceiver = mpsc::Receiver<ElementEvent>;

/// Fan-out list of event subscribers owned by a [`crate::Document`].
#[derive(Debug, Default)]
pub(crate) struct EventSenders {
    senders: Vec<mpsc::Sender<ElementEvent>>,
}

impl EventSenders {
    /// Register a new subscriber and return its receiving end.
    pub(crate) fn subscribe(&mut self) -> EventReceiver {
        let (tx, rx) = mpsc::channel();
        self.senders.push(tx);
        rx
    }

    /// Deliver an event to every live subscriber, dropping closed ones.
    pub(crate) fn dispatch(&mut self, event: &ElementEvent) {
        self.senders.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
