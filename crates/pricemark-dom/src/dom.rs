//! Minimal in-memory element tree with subtree mutation observers.
//!
//! Only what the price component needs: elements with attributes and classes, text nodes,
//! `textContent` reads/writes, and observers that queue [`MutationRecord`]s for their subtree in
//! mutation order.

use crate::host::{MutationRecord, PriceHost};
use crate::{Error, Result};
use pricemark_core::Marker;
use rustc_hash::FxHashMap;

/// Index of a node in the [`Document`] that created it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(usize);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(usize);

#[derive(Debug, Clone)]
enum NodeKind {
    Root,
    Element(Element),
    Text(String),
}

#[derive(Debug, Clone)]
struct Element {
    tag_name: String,
    attrs: FxHashMap<String, String>,
}

#[derive(Debug, Clone)]
struct Node {
    parent: Option<NodeId>,
    children: Vec<NodeId>,
    kind: NodeKind,
}

#[derive(Debug, Clone)]
struct Observer {
    target: NodeId,
    connected: bool,
    queue: Vec<MutationRecord<NodeId>>,
}

/// Arena-backed document tree.
///
/// # Panics
///
/// Methods taking a [`NodeId`] expect an id handed out by this `Document`. A foreign id panics
/// when it is out of range, and otherwise refers to an unrelated node. Ids are never invalidated
/// within their own document: replaced nodes are only detached.
#[derive(Debug, Clone)]
pub struct Document {
    nodes: Vec<Node>,
    root: NodeId,
    observers: Vec<Observer>,
}

impl Default for Document {
    fn default() -> Self {
        Self::new()
    }
}

impl Document {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node {
                parent: None,
                children: Vec::new(),
                kind: NodeKind::Root,
            }],
            root: NodeId(0),
            observers: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    #[cfg(test)]
    pub(crate) fn node_count(&self) -> usize {
        self.nodes.len()
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id.0]
    }

    fn element(&self, id: NodeId) -> Option<&Element> {
        match &self.node(id).kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn element_mut(&mut self, id: NodeId) -> Option<&mut Element> {
        match &mut self.nodes[id.0].kind {
            NodeKind::Element(el) => Some(el),
            _ => None,
        }
    }

    fn push_node(&mut self, parent: NodeId, kind: NodeKind) -> Result<NodeId> {
        if matches!(self.node(parent).kind, NodeKind::Text(_)) {
            return Err(Error::NotAContainer { node: parent });
        }
        let id = NodeId(self.nodes.len());
        self.nodes.push(Node {
            parent: Some(parent),
            children: Vec::new(),
            kind,
        });
        self.nodes[parent.0].children.push(id);
        self.record(MutationRecord::child_list(parent));
        Ok(id)
    }

    /// Appends a new element to `parent`. `attrs` may include `class`.
    pub fn create_element(
        &mut self,
        parent: NodeId,
        tag_name: &str,
        attrs: &[(&str, &str)],
    ) -> Result<NodeId> {
        let attrs = attrs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        self.push_node(
            parent,
            NodeKind::Element(Element {
                tag_name: tag_name.to_ascii_lowercase(),
                attrs,
            }),
        )
    }

    pub fn append_text(&mut self, parent: NodeId, text: &str) -> Result<NodeId> {
        self.push_node(parent, NodeKind::Text(text.to_string()))
    }

    pub fn tag_name(&self, node: NodeId) -> Option<&str> {
        self.element(node).map(|el| el.tag_name.as_str())
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.node(node).parent
    }

    pub fn children(&self, node: NodeId) -> &[NodeId] {
        &self.node(node).children
    }

    pub fn is_text(&self, node: NodeId) -> bool {
        matches!(self.node(node).kind, NodeKind::Text(_))
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        self.element(node)?.attrs.get(name).map(String::as_str)
    }

    pub fn has_attribute(&self, node: NodeId, name: &str) -> bool {
        self.attribute(node, name).is_some()
    }

    /// Sets an attribute; a no-op for non-element nodes.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        el.attrs.insert(name.to_string(), value.to_string());
        self.record(MutationRecord::attributes(node, name));
    }

    pub fn remove_attribute(&mut self, node: NodeId, name: &str) {
        let Some(el) = self.element_mut(node) else {
            return;
        };
        if el.attrs.remove(name).is_some() {
            self.record(MutationRecord::attributes(node, name));
        }
    }

    pub fn has_class(&self, node: NodeId, class: &str) -> bool {
        self.attribute(node, "class")
            .is_some_and(|list| list.split_whitespace().any(|c| c == class))
    }

    pub fn add_class(&mut self, node: NodeId, class: &str) {
        if self.element(node).is_none() || self.has_class(node, class) {
            return;
        }
        let value = match self.attribute(node, "class") {
            Some(list) if !list.trim().is_empty() => format!("{} {class}", list.trim()),
            _ => class.to_string(),
        };
        self.set_attribute(node, "class", &value);
    }

    pub fn remove_class(&mut self, node: NodeId, class: &str) {
        if !self.has_class(node, class) {
            return;
        }
        let value = self
            .attribute(node, "class")
            .unwrap_or_default()
            .split_whitespace()
            .filter(|c| *c != class)
            .collect::<Vec<_>>()
            .join(" ");
        self.set_attribute(node, "class", &value);
    }

    pub fn matches(&self, node: NodeId, marker: &Marker) -> bool {
        match marker {
            Marker::Attribute(name) => self.has_attribute(node, name),
            Marker::Class(name) => self.has_class(node, name),
        }
    }

    /// Concatenated text of all descendant text nodes.
    pub fn text_content(&self, node: NodeId) -> String {
        match &self.node(node).kind {
            NodeKind::Text(text) => text.clone(),
            NodeKind::Root | NodeKind::Element(_) => {
                let mut out = String::new();
                for child in &self.node(node).children {
                    out.push_str(&self.text_content(*child));
                }
                out
            }
        }
    }

    /// Replaces all children with a single text node (none for an empty string).
    ///
    /// On a text node, or on an element whose only child is a text node, the existing text
    /// node's data is changed in place and a `CharacterData` record is queued for it. Repeated
    /// writes therefore do not grow the arena.
    pub fn set_text_content(&mut self, node: NodeId, value: &str) {
        let target = match self.nodes[node.0].children.as_slice() {
            &[only] if self.is_text(only) => only,
            _ => node,
        };
        if let NodeKind::Text(text) = &mut self.nodes[target.0].kind {
            *text = value.to_string();
            self.record(MutationRecord::character_data(target));
            return;
        }

        for child in std::mem::take(&mut self.nodes[node.0].children) {
            self.nodes[child.0].parent = None;
        }
        if !value.is_empty() {
            let id = NodeId(self.nodes.len());
            self.nodes.push(Node {
                parent: Some(node),
                children: Vec::new(),
                kind: NodeKind::Text(value.to_string()),
            });
            self.nodes[node.0].children.push(id);
        }
        self.record(MutationRecord::child_list(node));
    }

    /// Returns `true` when `node` is `ancestor` or lies inside its subtree.
    pub fn is_inclusive_descendant(&self, node: NodeId, ancestor: NodeId) -> bool {
        let mut cur = Some(node);
        while let Some(id) = cur {
            if id == ancestor {
                return true;
            }
            cur = self.node(id).parent;
        }
        false
    }

    /// First descendant of `scope` (document order, `scope` excluded) carrying `marker`.
    pub fn query(&self, scope: NodeId, marker: &Marker) -> Option<NodeId> {
        self.descendants(scope)
            .into_iter()
            .find(|id| self.matches(*id, marker))
    }

    pub fn query_all(&self, scope: NodeId, marker: &Marker) -> Vec<NodeId> {
        self.descendants(scope)
            .into_iter()
            .filter(|id| self.matches(*id, marker))
            .collect()
    }

    fn descendants(&self, scope: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut stack: Vec<NodeId> = self.node(scope).children.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            out.push(id);
            stack.extend(self.node(id).children.iter().rev().copied());
        }
        out
    }

    pub fn observe(&mut self, target: NodeId) -> ObserverId {
        let id = ObserverId(self.observers.len());
        self.observers.push(Observer {
            target,
            connected: true,
            queue: Vec::new(),
        });
        id
    }

    /// Stops delivery to `observer` and drops anything still queued for it.
    pub fn disconnect(&mut self, observer: ObserverId) {
        if let Some(obs) = self.observers.get_mut(observer.0) {
            obs.connected = false;
            obs.queue.clear();
        }
    }

    pub fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord<NodeId>> {
        self.observers
            .get_mut(observer.0)
            .map(|obs| std::mem::take(&mut obs.queue))
            .unwrap_or_default()
    }

    pub fn has_pending_records(&self) -> bool {
        self.observers.iter().any(|obs| !obs.queue.is_empty())
    }

    fn record(&mut self, record: MutationRecord<NodeId>) {
        let interested: Vec<usize> = self
            .observers
            .iter()
            .enumerate()
            .filter(|(_, obs)| {
                obs.connected && self.is_inclusive_descendant(record.target, obs.target)
            })
            .map(|(idx, _)| idx)
            .collect();
        for idx in interested {
            self.observers[idx].queue.push(record.clone());
        }
    }
}

impl PriceHost for Document {
    type Node = NodeId;
    type Observer = ObserverId;

    fn text_content(&self, node: NodeId) -> String {
        Document::text_content(self, node)
    }

    fn set_text_content(&mut self, node: NodeId, text: &str) {
        Document::set_text_content(self, node, text);
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        Document::parent(self, node)
    }

    fn matches(&self, node: NodeId, marker: &Marker) -> bool {
        Document::matches(self, node, marker)
    }

    fn observe(&mut self, node: NodeId) -> ObserverId {
        Document::observe(self, node)
    }

    fn take_records(&mut self, observer: ObserverId) -> Vec<MutationRecord<NodeId>> {
        Document::take_records(self, observer)
    }
}
