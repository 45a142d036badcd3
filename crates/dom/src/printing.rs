//! Deterministic snapshots of the document tree for tests and logging.

use crate::tree::{Document, NodeKind};
use indextree::NodeId;
use serde_json::{Map, Value, json};
use std::fmt;

fn node_to_json(doc: &Document, id: NodeId) -> Value {
    let Some(data) = doc.node(id) else {
        return Value::Null;
    };
    match &data.kind {
        NodeKind::Document => json!({
            "type": "document",
            "children": children_to_json(doc, id),
        }),
        NodeKind::Element { tag } => {
            // Sort attributes by name so snapshots compare stably.
            let mut pairs: Vec<(String, String)> = data.attrs.iter().cloned().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            let mut attrs = Map::new();
            for (name, value) in pairs {
                attrs.insert(name, Value::String(value));
            }
            json!({
                "type": "element",
                "tag": tag,
                "attrs": Value::Object(attrs),
                "children": children_to_json(doc, id),
            })
        }
        NodeKind::Text { text } => json!({ "type": "text", "text": text }),
        NodeKind::Comment { text } => json!({ "type": "comment", "text": text }),
    }
}

fn children_to_json(doc: &Document, id: NodeId) -> Vec<Value> {
    doc.children(id)
        .into_iter()
        .map(|child| node_to_json(doc, child))
        .filter(|value| !value.is_null())
        .collect()
}

impl Document {
    /// Build a deterministic JSON representation of the tree.
    /// Schema:
    /// - Document: `{ "type":"document", "children":[ ... ] }`
    /// - Element: `{ "type":"element", "tag":"div", "attrs":{..}, "children":[ ... ] }`
    /// - Text / Comment: `{ "type":"text"|"comment", "text":"..." }`
    pub fn to_json_value(&self) -> Value {
        node_to_json(self, self.root())
    }

    /// Pretty JSON string for snapshots and test comparisons.
    pub fn to_json_string(&self) -> String {
        serde_json::to_string_pretty(&self.to_json_value()).unwrap_or_else(|_| String::from("{}"))
    }
}

fn fmt_node(doc: &Document, id: NodeId, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
    let Some(data) = doc.node(id) else {
        return Ok(());
    };
    let indent = "  ".repeat(depth);
    match &data.kind {
        NodeKind::Document => {
            writeln!(f, "{indent}#document")?;
        }
        NodeKind::Element { tag } => {
            write!(f, "{indent}<{tag}")?;
            let mut pairs: Vec<(String, String)> = data.attrs.iter().cloned().collect();
            pairs.sort_by(|a, b| a.0.cmp(&b.0));
            for (name, value) in pairs {
                write!(f, " {name}={value:?}")?;
            }
            writeln!(f, ">")?;
        }
        NodeKind::Text { text } => {
            writeln!(f, "{indent}{text:?}")?;
            return Ok(());
        }
        NodeKind::Comment { text } => {
            writeln!(f, "{indent}<!--{text}-->")?;
            return Ok(());
        }
    }
    for child in doc.children(id) {
        fmt_node(doc, child, f, depth + 1)?;
    }
    Ok(())
}

impl fmt::Debug for Document {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_node(self, self.root(), f, 0)
    }
}
