//! Host-tag render nodes.

use std::rc::{Rc, Weak};

use smallvec::smallvec;

use super::attributes::Attributes;
use super::binding;
use super::mount::{Mount, NodeList};
use super::{visible_initially, Child, RenderNode};
use crate::context::BuildContext;
use crate::error::Result;
use crate::host::{Host, NodeId};
use crate::runtime::Runtime;

pub(crate) struct ElementInner {
    tag: String,
    attributes: Attributes,
    children: Vec<Child>,
    mount: Mount,
}

/// A render node for one host element.
///
/// Building creates exactly one host element, applies its attributes, then
/// materializes children in declaration order: signals become dynamic
/// slots, render nodes are loaded under the element and initialized
/// depth-first, and anything else becomes a static text node.
#[derive(Clone)]
pub struct RawElement(Rc<ElementInner>);

impl RawElement {
    /// Create an unbuilt element node.
    pub fn new(tag: impl Into<String>, attributes: Attributes, children: Vec<Child>) -> Self {
        Self(Rc::new(ElementInner {
            tag: tag.into(),
            attributes,
            children,
            mount: Mount::default(),
        }))
    }

    /// Tag name.
    pub fn tag(&self) -> &str {
        &self.0.tag
    }

    /// Attributes as declared.
    pub fn attributes(&self) -> &Attributes {
        &self.0.attributes
    }

    /// Children as declared.
    pub fn children(&self) -> &[Child] {
        &self.0.children
    }

    /// Host nodes owned by this node; empty before the first build.
    pub fn nodes(&self) -> NodeList {
        self.0.mount.nodes()
    }

    /// The placeholder marker, once built.
    pub fn placeholder(&self) -> Option<NodeId> {
        self.0.mount.placeholder()
    }

    /// Whether `build` has run.
    pub fn is_built(&self) -> bool {
        self.0.mount.is_built()
    }

    /// Number of live bindings owned by this node.
    pub fn binding_count(&self) -> usize {
        self.0.mount.binding_count()
    }

    /// Materialize the host element. Repeat calls return the cached nodes.
    pub fn build(&self, cx: &mut BuildContext) -> Result<NodeList> {
        if self.0.mount.is_built() {
            return Ok(self.0.mount.nodes());
        }

        let runtime = cx.runtime().clone();
        let host = runtime.host();

        self.0.mount.ensure_placeholder(host);
        let element = host.create_element(&self.0.tag);
        self.0.mount.set_nodes(smallvec![element]);
        tracing::trace!(tag = %self.0.tag, ?element, "build element");

        let owner = RenderNode::Element(self.clone());
        self.0
            .mount
            .keep_all(binding::bind_attributes(&runtime, &owner, element, &self.0.attributes));

        for child in &self.0.children {
            match child {
                Child::Signal(signal) => {
                    self.0
                        .mount
                        .keep(binding::bind_dynamic_child(&runtime, element, signal));
                }
                Child::Node(node) => {
                    node.load_at(element).init(cx)?;
                }
                Child::Text(text) => {
                    let text = host.create_text(text);
                    host.append_child(element, text);
                }
            }
        }

        Ok(self.0.mount.nodes())
    }

    /// Record where `init` attaches this node.
    pub fn load_at(&self, host_node: NodeId) -> &Self {
        self.0.mount.load_at(host_node);
        self
    }

    /// The recorded mount location.
    pub fn host_node(&self) -> Option<NodeId> {
        self.0.mount.host_node()
    }

    /// Build if needed, then attach the element, or the placeholder when a
    /// `d-if` signal currently reads false.
    pub fn init(&self, cx: &mut BuildContext) -> Result<()> {
        if !self.0.mount.is_built() {
            self.build(cx)?;
        }

        let runtime = cx.runtime().clone();
        let visible = visible_initially(&self.0.attributes);
        self.0.mount.place(runtime.host(), visible)?;
        if visible {
            self.render(&runtime)?;
        }
        Ok(())
    }

    /// Host elements have no lifecycle; nothing to do.
    pub fn render(&self, _runtime: &Runtime) -> Result<()> {
        Ok(())
    }

    /// Host elements have no lifecycle; nothing to do.
    pub fn unrender(&self, _runtime: &Runtime) -> Result<()> {
        Ok(())
    }

    /// Show or hide the element by swapping it with its placeholder.
    pub fn directive_if(&self, host: &dyn Host, show: bool) -> Result<()> {
        self.0.mount.directive_if(host, show)
    }

    /// Whether the element (rather than its placeholder) is attached.
    pub fn is_shown(&self, host: &dyn Host) -> bool {
        self.0.mount.is_shown(host)
    }

    pub(crate) fn release(&self) -> usize {
        let mut released = self.0.mount.release();
        for child in &self.0.children {
            if let Child::Node(node) = child {
                released += node.release();
            }
        }
        released
    }

    pub(crate) fn detach(&self, host: &dyn Host) {
        self.0.mount.detach(host);
    }

    pub(crate) fn downgrade(&self) -> Weak<ElementInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_inner(inner: Rc<ElementInner>) -> Self {
        Self(inner)
    }

    /// Whether both handles refer to the same node.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for RawElement {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawElement")
            .field("tag", &self.0.tag)
            .field("attributes", &self.0.attributes.len())
            .field("children", &self.0.children.len())
            .field("nodes", &self.0.mount.nodes())
            .finish()
    }
}
