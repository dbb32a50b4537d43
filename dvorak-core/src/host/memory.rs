//! In-memory host tree.
//!
//! [`MemoryDom`] keeps nodes in an arena indexed by [`NodeId`]. Besides the
//! [`Host`] operations it records every structural and attribute mutation,
//! renders subtrees as markup, and dispatches events to listeners.

use std::cell::RefCell;
use std::fmt::Write as _;

use indexmap::IndexMap;
use serde::Serialize;

use super::{Event, EventHandler, Host, NodeId};

/// What a host node is.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum HostNodeKind {
    /// An element with a tag name.
    Element {
        /// Tag name.
        tag: String,
    },
    /// A text node.
    Text {
        /// Text content.
        text: String,
    },
    /// An inert marker.
    Marker,
}

/// One recorded change to the tree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum Mutation {
    Append { parent: NodeId, child: NodeId },
    InsertBefore { node: NodeId, reference: NodeId },
    Remove { node: NodeId },
    Replace { parent: NodeId, new: NodeId, old: NodeId },
    SetAttribute { node: NodeId, name: String, value: String },
}

/// Serializable view of a subtree.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Snapshot {
    pub id: NodeId,
    #[serde(flatten)]
    pub kind: HostNodeKind,
    #[serde(skip_serializing_if = "IndexMap::is_empty")]
    pub attributes: IndexMap<String, String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<Snapshot>,
}

struct HostNode {
    kind: HostNodeKind,
    attributes: IndexMap<String, String>,
    listeners: Vec<(String, EventHandler)>,
    parent: Option<NodeId>,
    children: Vec<NodeId>,
}

impl HostNode {
    fn new(kind: HostNodeKind) -> Self {
        Self {
            kind,
            attributes: IndexMap::new(),
            listeners: Vec::new(),
            parent: None,
            children: Vec::new(),
        }
    }
}

/// A host tree living entirely in memory.
///
/// # Example
///
/// ```rust
/// use dvorak_core::host::{Host, MemoryDom};
///
/// let dom = MemoryDom::with_root("root");
/// let root = dom.element_by_id("root").unwrap();
/// let text = dom.create_text("hello");
/// dom.append_child(root, text);
/// assert_eq!(dom.to_html(root), r#"<div id="root">hello</div>"#);
/// ```
pub struct MemoryDom {
    nodes: RefCell<Vec<HostNode>>,
    body: NodeId,
    log: RefCell<Vec<Mutation>>,
}

impl MemoryDom {
    /// Create a tree holding only a `body` element.
    pub fn new() -> Self {
        let body = HostNode::new(HostNodeKind::Element {
            tag: "body".to_string(),
        });

        Self {
            nodes: RefCell::new(vec![body]),
            body: NodeId(0),
            log: RefCell::new(Vec::new()),
        }
    }

    /// Create a tree whose body holds one `div` with the given id.
    ///
    /// The setup mutations are not recorded.
    pub fn with_root(root_id: &str) -> Self {
        let dom = Self::new();
        let root = dom.create_element("div");
        dom.set_attribute(root, "id", root_id);
        dom.append_child(dom.body, root);
        dom.log.borrow_mut().clear();
        dom
    }

    /// Number of nodes ever created, attached or not.
    pub fn node_count(&self) -> usize {
        self.nodes.borrow().len()
    }

    /// Kind of a node.
    pub fn kind(&self, node: NodeId) -> Option<HostNodeKind> {
        self.nodes.borrow().get(index(node)).map(|n| n.kind.clone())
    }

    /// Children of a node, in order.
    pub fn children(&self, node: NodeId) -> Vec<NodeId> {
        self.nodes
            .borrow()
            .get(index(node))
            .map(|n| n.children.clone())
            .unwrap_or_default()
    }

    /// Value of an attribute.
    pub fn attribute(&self, node: NodeId, name: &str) -> Option<String> {
        self.nodes
            .borrow()
            .get(index(node))
            .and_then(|n| n.attributes.get(name).cloned())
    }

    /// Number of listeners registered on a node.
    pub fn listener_count(&self, node: NodeId) -> usize {
        self.nodes
            .borrow()
            .get(index(node))
            .map_or(0, |n| n.listeners.len())
    }

    /// Concatenated text of a subtree.
    pub fn text_content(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.collect_text(node, &mut out);
        out
    }

    fn collect_text(&self, node: NodeId, out: &mut String) {
        let (text, children) = match self.nodes.borrow().get(index(node)) {
            Some(n) => match &n.kind {
                HostNodeKind::Text { text } => (Some(text.clone()), Vec::new()),
                _ => (None, n.children.clone()),
            },
            None => return,
        };

        if let Some(text) = text {
            out.push_str(&text);
        }
        for child in children {
            self.collect_text(child, out);
        }
    }

    /// Render a subtree as markup. Markers render as empty comments.
    pub fn to_html(&self, node: NodeId) -> String {
        let mut out = String::new();
        self.write_html(node, &mut out);
        out
    }

    fn write_html(&self, node: NodeId, out: &mut String) {
        let (kind, attributes, children) = {
            let nodes = self.nodes.borrow();
            let Some(n) = nodes.get(index(node)) else {
                return;
            };
            (n.kind.clone(), n.attributes.clone(), n.children.clone())
        };

        match kind {
            HostNodeKind::Text { text } => out.push_str(&text),
            HostNodeKind::Marker => out.push_str("<!---->"),
            HostNodeKind::Element { tag } => {
                let _ = write!(out, "<{tag}");
                for (name, value) in &attributes {
                    let _ = write!(out, " {name}=\"{value}\"");
                }
                out.push('>');
                for child in children {
                    self.write_html(child, out);
                }
                let _ = write!(out, "</{tag}>");
            }
        }
    }

    /// Serializable view of a subtree.
    pub fn snapshot(&self, node: NodeId) -> Option<Snapshot> {
        let (kind, attributes, children) = {
            let nodes = self.nodes.borrow();
            let n = nodes.get(index(node))?;
            (n.kind.clone(), n.attributes.clone(), n.children.clone())
        };

        Some(Snapshot {
            id: node,
            kind,
            attributes,
            children: children
                .into_iter()
                .filter_map(|child| self.snapshot(child))
                .collect(),
        })
    }

    /// JSON form of [`MemoryDom::snapshot`].
    pub fn snapshot_json(&self, node: NodeId) -> serde_json::Result<String> {
        serde_json::to_string(&self.snapshot(node))
    }

    /// Mutations recorded so far.
    pub fn mutations(&self) -> Vec<Mutation> {
        self.log.borrow().clone()
    }

    /// Return and clear the recorded mutations.
    pub fn take_mutations(&self) -> Vec<Mutation> {
        std::mem::take(&mut *self.log.borrow_mut())
    }

    /// Fire `kind` on `node`, invoking its listeners in registration order.
    ///
    /// Returns how many listeners ran.
    pub fn dispatch(&self, node: NodeId, kind: &str) -> usize {
        self.dispatch_event(Event {
            kind: kind.to_string(),
            target: node,
            value: None,
        })
    }

    /// Fire an event carrying a form value.
    pub fn dispatch_with_value(&self, node: NodeId, kind: &str, value: &str) -> usize {
        self.dispatch_event(Event {
            kind: kind.to_string(),
            target: node,
            value: Some(value.to_string()),
        })
    }

    fn dispatch_event(&self, event: Event) -> usize {
        let handlers: Vec<EventHandler> = match self.nodes.borrow().get(index(event.target)) {
            Some(n) => n
                .listeners
                .iter()
                .filter(|(kind, _)| *kind == event.kind)
                .map(|(_, handler)| handler.clone())
                .collect(),
            None => return 0,
        };

        tracing::trace!(target_node = ?event.target, kind = %event.kind, listeners = handlers.len(), "dispatch");
        for handler in &handlers {
            handler.call(&event);
        }
        handlers.len()
    }

    fn exists(&self, node: NodeId) -> bool {
        index(node) < self.nodes.borrow().len()
    }

    fn detach(&self, node: NodeId) -> bool {
        let mut nodes = self.nodes.borrow_mut();
        let Some(parent) = nodes.get_mut(index(node)).and_then(|n| n.parent.take()) else {
            return false;
        };
        if let Some(p) = nodes.get_mut(index(parent)) {
            p.children.retain(|child| *child != node);
        }
        true
    }

    fn record(&self, mutation: Mutation) {
        self.log.borrow_mut().push(mutation);
    }

    fn push(&self, kind: HostNodeKind) -> NodeId {
        let mut nodes = self.nodes.borrow_mut();
        nodes.push(HostNode::new(kind));
        NodeId((nodes.len() - 1) as u64)
    }
}

impl Default for MemoryDom {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for MemoryDom {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemoryDom")
            .field("nodes", &self.node_count())
            .field("body", &self.to_html(self.body))
            .finish()
    }
}

fn index(node: NodeId) -> usize {
    node.0 as usize
}

impl Host for MemoryDom {
    fn create_element(&self, tag: &str) -> NodeId {
        self.push(HostNodeKind::Element {
            tag: tag.to_string(),
        })
    }

    fn create_text(&self, text: &str) -> NodeId {
        self.push(HostNodeKind::Text {
            text: text.to_string(),
        })
    }

    fn create_marker(&self) -> NodeId {
        self.push(HostNodeKind::Marker)
    }

    fn append_child(&self, parent: NodeId, child: NodeId) {
        if !self.exists(parent) || !self.exists(child) {
            tracing::warn!(?parent, ?child, "append_child on unknown node");
            return;
        }

        self.detach(child);
        {
            let mut nodes = self.nodes.borrow_mut();
            nodes[index(parent)].children.push(child);
            nodes[index(child)].parent = Some(parent);
        }
        self.record(Mutation::Append { parent, child });
    }

    fn insert_before(&self, node: NodeId, reference: NodeId) {
        if node == reference || !self.exists(node) {
            return;
        }
        let Some(parent) = self.parent(reference) else {
            tracing::warn!(?node, ?reference, "insert_before a detached reference");
            return;
        };

        self.detach(node);
        {
            let mut nodes = self.nodes.borrow_mut();
            let siblings = &mut nodes[index(parent)].children;
            let position = siblings
                .iter()
                .position(|child| *child == reference)
                .unwrap_or(siblings.len());
            siblings.insert(position, node);
            nodes[index(node)].parent = Some(parent);
        }
        self.record(Mutation::InsertBefore { node, reference });
    }

    fn remove(&self, node: NodeId) {
        if self.detach(node) {
            self.record(Mutation::Remove { node });
        }
    }

    fn replace_child(&self, parent: NodeId, new: NodeId, old: NodeId) {
        if self.parent(old) != Some(parent) || !self.exists(new) {
            tracing::warn!(?parent, ?new, ?old, "replace_child on a non-child");
            return;
        }
        if new == old {
            return;
        }

        self.detach(new);
        {
            let mut nodes = self.nodes.borrow_mut();
            let siblings = &mut nodes[index(parent)].children;
            if let Some(position) = siblings.iter().position(|child| *child == old) {
                siblings[position] = new;
            }
            nodes[index(old)].parent = None;
            nodes[index(new)].parent = Some(parent);
        }
        self.record(Mutation::Replace { parent, new, old });
    }

    fn set_attribute(&self, node: NodeId, name: &str, value: &str) {
        {
            let mut nodes = self.nodes.borrow_mut();
            match nodes.get_mut(index(node)) {
                Some(n) if matches!(n.kind, HostNodeKind::Element { .. }) => {
                    n.attributes.insert(name.to_string(), value.to_string());
                }
                _ => {
                    tracing::warn!(?node, name, "set_attribute on a non-element");
                    return;
                }
            }
        }
        self.record(Mutation::SetAttribute {
            node,
            name: name.to_string(),
            value: value.to_string(),
        });
    }

    fn add_event_listener(&self, node: NodeId, event: &str, handler: EventHandler) {
        if let Some(n) = self.nodes.borrow_mut().get_mut(index(node)) {
            n.listeners.push((event.to_string(), handler));
        }
    }

    fn parent(&self, node: NodeId) -> Option<NodeId> {
        self.nodes.borrow().get(index(node)).and_then(|n| n.parent)
    }

    fn body(&self) -> NodeId {
        self.body
    }

    fn element_by_id(&self, id: &str) -> Option<NodeId> {
        let candidates: Vec<NodeId> = self
            .nodes
            .borrow()
            .iter()
            .enumerate()
            .filter(|(_, n)| n.attributes.get("id").is_some_and(|value| value == id))
            .map(|(i, _)| NodeId(i as u64))
            .collect();

        candidates.into_iter().find(|node| self.is_connected(*node))
    }
}

impl MemoryDom {
    /// Whether `node` is reachable from the body.
    pub fn is_connected(&self, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(n) = current {
            if n == self.body {
                return true;
            }
            current = self.parent(n);
        }
        false
    }
}
