#![allow(dead_code)]
//! Shared fixtures for the relocation integration tests.

use dom::{Document, EventReceiver, NodeId};
use media::{MediaHub, Viewport};
use movable::MovableRegistry;
use movable::config::{ATTR_MANUAL, ATTR_MEDIA, ATTR_TARGET, ATTR_TO, MOVABLE_TAG};

pub const WIDE: (i32, i32) = (1280, 800);
pub const NARROW: (i32, i32) = (480, 800);

/// Initialize logger for visibility during test runs.
pub fn init_logging() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

/// Document with a target menu and a movable subject in a separate
/// container:
///
/// ```text
/// #document
///   <main id="content">
///     <nav id="menu"> <span id="a"> <span id="b"> <span id="c">
///   <aside id="dock">
///     <movable-element target="menu" ...>
/// ```
pub struct Fixture {
    pub doc: Document,
    pub hub: MediaHub,
    pub registry: MovableRegistry,
    pub menu: NodeId,
    pub items: Vec<NodeId>,
    pub dock: NodeId,
    pub subject: NodeId,
}

impl Fixture {
    /// Build the fixture. `to`/`media` map to attributes when given;
    /// `manual` sets the boolean attribute.
    pub fn new(viewport: (i32, i32), to: Option<&str>, media: Option<&str>, manual: bool) -> Self {
        init_logging();
        let mut doc = Document::new();

        let content = doc.create_element("main");
        doc.set_attribute(content, "id", "content");
        doc.append(doc.root(), content).expect("attach content");

        let menu = doc.create_element("nav");
        doc.set_attribute(menu, "id", "menu");
        doc.append(content, menu).expect("attach menu");

        let items = ["a", "b", "c"]
            .into_iter()
            .map(|name| {
                let item = doc.create_element("span");
                doc.set_attribute(item, "id", name);
                doc.append(menu, item).expect("attach item");
                item
            })
            .collect();

        let dock = doc.create_element("aside");
        doc.set_attribute(dock, "id", "dock");
        doc.append(doc.root(), dock).expect("attach dock");

        let subject = doc.create_element(MOVABLE_TAG);
        doc.set_attribute(subject, ATTR_TARGET, "menu");
        if let Some(to) = to {
            doc.set_attribute(subject, ATTR_TO, to);
        }
        if let Some(media) = media {
            doc.set_attribute(subject, ATTR_MEDIA, media);
        }
        if manual {
            doc.set_attribute(subject, ATTR_MANUAL, "");
        }
        doc.append(dock, subject).expect("attach subject");

        Self {
            doc,
            hub: MediaHub::new(Viewport::new(viewport.0, viewport.1)),
            registry: MovableRegistry::new(),
            menu,
            items,
            dock,
            subject,
        }
    }

    /// Manual-mode fixture prepared via `connect`.
    pub fn manual(to: &str) -> Self {
        let mut fixture = Self::new(WIDE, Some(to), None, true);
        fixture.connect();
        fixture
    }

    /// Connect the subject, panicking on configuration errors.
    pub fn connect(&mut self) {
        self.registry
            .connect(&mut self.doc, &mut self.hub, self.subject)
            .expect("connect subject");
    }

    /// Resize the viewport and route the resulting flips.
    pub fn resize(&mut self, viewport: (i32, i32)) {
        let changes = self.hub.set_viewport(viewport.0, viewport.1);
        self.registry
            .apply_media_changes(&mut self.doc, &changes)
            .expect("apply media changes");
    }

    pub fn snapshot(&self) -> String {
        self.doc.to_json_string()
    }
}

/// Drain every pending event name from a receiver.
pub fn drain_events(rx: &EventReceiver) -> Vec<&'static str> {
    rx.try_iter().map(|event| event.name).collect()
}
