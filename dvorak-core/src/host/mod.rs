//! Host Tree Adapter
//!
//! The render engine never owns concrete nodes. It drives a retained-mode
//! tree (a DOM or anything shaped like one) through the [`Host`] trait and
//! refers to nodes by opaque [`NodeId`] handles.
//!
//! Every operation is synchronous and assumed to succeed for valid nodes.
//! [`MemoryDom`] is a complete in-memory implementation for headless use
//! and tests.

mod memory;

use std::fmt;
use std::rc::Rc;

use serde::Serialize;

pub use memory::{HostNodeKind, MemoryDom, Mutation, Snapshot};

/// Opaque handle to a node in the host tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct NodeId(u64);

impl NodeId {
    /// Get the raw ID value.
    pub fn raw(&self) -> u64 {
        self.0
    }
}

impl From<u64> for NodeId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

/// An event delivered to a listener.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Event {
    /// Native event type, e.g. `click`.
    pub kind: String,
    /// Node the listener was registered on.
    pub target: NodeId,
    /// Current value of the target, for form controls.
    pub value: Option<String>,
}

/// Shared event listener.
#[derive(Clone)]
pub struct EventHandler(Rc<dyn Fn(&Event)>);

impl EventHandler {
    /// Wrap a closure as an event handler.
    pub fn new(handler: impl Fn(&Event) + 'static) -> Self {
        Self(Rc::new(handler))
    }

    /// Invoke the handler.
    pub fn call(&self, event: &Event) {
        (self.0)(event);
    }
}

impl fmt::Debug for EventHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EventHandler")
    }
}

/// A retained-mode host tree.
///
/// Methods take `&self`; implementations use interior mutability so that
/// event listeners fired by the host can call back into the render engine.
pub trait Host {
    /// Create a detached element for `tag`.
    fn create_element(&self, tag: &str) -> NodeId;

    /// Create a detached text node.
    fn create_text(&self, text: &str) -> NodeId;

    /// Create a detached, inert marker node (a comment in a DOM).
    fn create_marker(&self) -> NodeId;

    /// Append `child` as the last child of `parent`, detaching it from any
    /// previous parent first.
    fn append_child(&self, parent: NodeId, child: NodeId);

    /// Insert `node` immediately before `reference` under the reference's
    /// parent.
    fn insert_before(&self, node: NodeId, reference: NodeId);

    /// Detach `node` from its parent, if it has one.
    fn remove(&self, node: NodeId);

    /// Put `new` in the position `old` occupies under `parent`, detaching
    /// `old`.
    fn replace_child(&self, parent: NodeId, new: NodeId, old: NodeId);

    /// Set an attribute on an element.
    fn set_attribute(&self, node: NodeId, name: &str, value: &str);

    /// Register a listener for a native event type.
    fn add_event_listener(&self, node: NodeId, event: &str, handler: EventHandler);

    /// Parent of `node`, or `None` when detached.
    fn parent(&self, node: NodeId) -> Option<NodeId>;

    /// The document body.
    fn body(&self) -> NodeId;

    /// Look up an element by its `id` attribute.
    fn element_by_id(&self, id: &str) -> Option<NodeId>;

    /// Whether `node` currently sits in the tree.
    fn is_attached(&self, node: NodeId) -> bool {
        self.parent(node).is_some()
    }
}
