//! Render Nodes
//!
//! A render node is either a [`RawElement`] (one host element) or a
//! [`Component`] (a function producing another render node). Both share the
//! same lifecycle:
//!
//! 1. `build` materializes host nodes, once.
//! 2. `load_at` records the parent host node.
//! 3. `init` builds if needed and attaches content or placeholder.
//! 4. `render` / `unrender` run on `d-if` writes.
//!
//! Trees are described with [`create_element`] or the [`element`] and
//! [`component`] builders.

mod attributes;
mod binding;
mod component;
mod element;
mod mount;

use std::fmt;
use std::rc::{Rc, Weak};

pub use attributes::{AttrValue, Attributes};
pub use binding::native_event;
pub use component::{Component, ComponentFn};
pub use element::RawElement;
pub use mount::NodeList;

use crate::context::BuildContext;
use crate::directive;
use crate::error::Result;
use crate::host::{Event, Host, NodeId};
use crate::reactive::{AnySignal, ReadSignal, SignalValue};
use crate::runtime::Runtime;

/// Either kind of render node.
#[derive(Clone, Debug)]
pub enum RenderNode {
    Element(RawElement),
    Component(Component),
}

impl RenderNode {
    /// Materialize host nodes. Repeat calls return the cached nodes.
    pub fn build(&self, cx: &mut BuildContext) -> Result<NodeList> {
        match self {
            Self::Element(node) => node.build(cx),
            Self::Component(node) => node.build(cx),
        }
    }

    /// Record where `init` attaches this node.
    pub fn load_at(&self, host_node: NodeId) -> &Self {
        match self {
            Self::Element(node) => {
                node.load_at(host_node);
            }
            Self::Component(node) => {
                node.load_at(host_node);
            }
        }
        self
    }

    /// Build if needed, then attach content or placeholder.
    pub fn init(&self, cx: &mut BuildContext) -> Result<()> {
        match self {
            Self::Element(node) => node.init(cx),
            Self::Component(node) => node.init(cx),
        }
    }

    pub fn render(&self, runtime: &Runtime) -> Result<()> {
        match self {
            Self::Element(node) => node.render(runtime),
            Self::Component(node) => node.render(runtime),
        }
    }

    pub fn unrender(&self, runtime: &Runtime) -> Result<()> {
        match self {
            Self::Element(node) => node.unrender(runtime),
            Self::Component(node) => node.unrender(runtime),
        }
    }

    /// Show or hide by swapping content and placeholder.
    pub fn directive_if(&self, host: &dyn Host, show: bool) -> Result<()> {
        match self {
            Self::Element(node) => node.directive_if(host, show),
            Self::Component(node) => node.directive_if(host, show),
        }
    }

    pub fn nodes(&self) -> NodeList {
        match self {
            Self::Element(node) => node.nodes(),
            Self::Component(node) => node.nodes(),
        }
    }

    pub fn placeholder(&self) -> Option<NodeId> {
        match self {
            Self::Element(node) => node.placeholder(),
            Self::Component(node) => node.placeholder(),
        }
    }

    pub fn is_shown(&self, host: &dyn Host) -> bool {
        match self {
            Self::Element(node) => node.is_shown(host),
            Self::Component(node) => node.is_shown(host),
        }
    }

    pub fn as_component(&self) -> Option<&Component> {
        match self {
            Self::Component(node) => Some(node),
            Self::Element(_) => None,
        }
    }

    pub fn as_element(&self) -> Option<&RawElement> {
        match self {
            Self::Element(node) => Some(node),
            Self::Component(_) => None,
        }
    }

    /// Unsubscribe every binding in this subtree. Returns how many were
    /// released.
    pub(crate) fn release(&self) -> usize {
        match self {
            Self::Element(node) => node.release(),
            Self::Component(node) => node.release(),
        }
    }

    /// Release every binding in this subtree and take the node out of the
    /// host tree. Returns how many bindings were released.
    ///
    /// Unload hooks are not scheduled; disposal is not a lifecycle event.
    pub fn dispose(&self, host: &dyn Host) -> usize {
        let released = self.release();
        match self {
            Self::Element(node) => node.detach(host),
            Self::Component(node) => node.detach(host),
        }
        tracing::debug!(released, "render node disposed");
        released
    }

    pub(crate) fn downgrade(&self) -> WeakRenderNode {
        match self {
            Self::Element(node) => WeakRenderNode::Element(node.downgrade()),
            Self::Component(node) => WeakRenderNode::Component(node.downgrade()),
        }
    }
}

impl From<RawElement> for RenderNode {
    fn from(node: RawElement) -> Self {
        Self::Element(node)
    }
}

impl From<Component> for RenderNode {
    fn from(node: Component) -> Self {
        Self::Component(node)
    }
}

/// Non-owning handle held by directive bindings.
pub(crate) enum WeakRenderNode {
    Element(Weak<element::ElementInner>),
    Component(Weak<component::ComponentInner>),
}

impl WeakRenderNode {
    pub(crate) fn upgrade(&self) -> Option<RenderNode> {
        match self {
            Self::Element(inner) => inner.upgrade().map(RawElement::from_inner).map(RenderNode::Element),
            Self::Component(inner) => inner
                .upgrade()
                .map(Component::from_inner)
                .map(RenderNode::Component),
        }
    }
}

/// Whether a node with these attributes attaches its content on `init`.
/// Absent or non-signal `d-if` means visible.
pub(crate) fn visible_initially(attributes: &Attributes) -> bool {
    attributes.signal(directive::IF).map_or(true, AnySignal::truthy)
}

/// One declared child.
#[derive(Clone, Debug)]
pub enum Child {
    /// Loaded under the parent element and initialized during its build.
    Node(RenderNode),
    /// A dynamic slot that follows the signal.
    Signal(AnySignal),
    /// Static text.
    Text(String),
}

impl Child {
    /// Static text from anything displayable.
    pub fn text(value: impl fmt::Display) -> Self {
        Self::Text(value.to_string())
    }
}

impl From<RenderNode> for Child {
    fn from(node: RenderNode) -> Self {
        Self::Node(node)
    }
}

impl From<RawElement> for Child {
    fn from(node: RawElement) -> Self {
        Self::Node(node.into())
    }
}

impl From<Component> for Child {
    fn from(node: Component) -> Self {
        Self::Node(node.into())
    }
}

impl From<&str> for Child {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Child {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<AnySignal> for Child {
    fn from(signal: AnySignal) -> Self {
        Self::Signal(signal)
    }
}

impl<T: SignalValue> From<ReadSignal<T>> for Child {
    fn from(signal: ReadSignal<T>) -> Self {
        Self::Signal(signal.into())
    }
}

impl<T: SignalValue> From<&ReadSignal<T>> for Child {
    fn from(signal: &ReadSignal<T>) -> Self {
        Self::Signal(signal.into())
    }
}

/// What [`create_element`] builds: a host tag or a component function.
#[derive(Clone)]
pub enum Tag {
    Raw(String),
    Component(ComponentFn),
}

impl Tag {
    pub fn component<F>(func: F) -> Self
    where
        F: Fn(&mut BuildContext, &Attributes, &[Child]) -> RenderNode + 'static,
    {
        Self::Component(Rc::new(func))
    }
}

impl From<&str> for Tag {
    fn from(tag: &str) -> Self {
        Self::Raw(tag.to_string())
    }
}

impl From<String> for Tag {
    fn from(tag: String) -> Self {
        Self::Raw(tag)
    }
}

impl From<ComponentFn> for Tag {
    fn from(func: ComponentFn) -> Self {
        Self::Component(func)
    }
}

impl fmt::Debug for Tag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw(tag) => f.debug_tuple("Raw").field(tag).finish(),
            Self::Component(_) => f.write_str("Component(..)"),
        }
    }
}

/// Create an unbuilt render node: a [`RawElement`] for a host tag, a
/// [`Component`] with a fresh id for a function. Nothing touches the host
/// tree until `build`.
pub fn create_element(tag: impl Into<Tag>, attributes: Attributes, children: Vec<Child>) -> RenderNode {
    match tag.into() {
        Tag::Raw(tag) => RawElement::new(tag, attributes, children).into(),
        Tag::Component(func) => Component::new(func, attributes, children).into(),
    }
}

/// Fluent form of [`create_element`].
///
/// ```
/// use dvorak_core::{create_signal, element};
///
/// let (count, _) = create_signal(0);
/// let button = element("button")
///     .attr("class", "primary")
///     .on("onClick", |_| {})
///     .dynamic(&count)
///     .into_node();
/// assert!(button.as_element().is_some());
/// ```
#[derive(Debug)]
#[must_use]
pub struct Builder {
    tag: Tag,
    attributes: Attributes,
    children: Vec<Child>,
}

/// Start describing a host element.
pub fn element(tag: impl Into<String>) -> Builder {
    Builder::new(Tag::Raw(tag.into()))
}

/// Start describing a component.
pub fn component<F>(func: F) -> Builder
where
    F: Fn(&mut BuildContext, &Attributes, &[Child]) -> RenderNode + 'static,
{
    Builder::new(Tag::component(func))
}

impl Builder {
    pub fn new(tag: Tag) -> Self {
        Self {
            tag,
            attributes: Attributes::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.attributes.insert(key, value);
        self
    }

    /// Attach an event handler under `key`, e.g. `onClick`.
    pub fn on(mut self, key: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        self.attributes = self.attributes.on(key, handler);
        self
    }

    /// Bind a host attribute to a signal.
    pub fn bind<T: SignalValue>(self, key: impl Into<String>, signal: &ReadSignal<T>) -> Self {
        self.attr(key, signal)
    }

    /// Attach a directive by key.
    pub fn directive(self, key: &str, signal: impl Into<AnySignal>) -> Self {
        self.attr(key, signal.into())
    }

    pub fn child(mut self, child: impl Into<Child>) -> Self {
        self.children.push(child.into());
        self
    }

    pub fn children<I>(mut self, children: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<Child>,
    {
        self.children.extend(children.into_iter().map(Into::into));
        self
    }

    pub fn text(self, text: impl fmt::Display) -> Self {
        self.child(Child::text(text))
    }

    /// Add a dynamic child slot.
    pub fn dynamic(self, signal: impl Into<AnySignal>) -> Self {
        self.child(Child::Signal(signal.into()))
    }

    pub fn into_node(self) -> RenderNode {
        create_element(self.tag, self.attributes, self.children)
    }

    /// The component, when this builder describes one.
    pub fn into_component(self) -> Option<Component> {
        match self.into_node() {
            RenderNode::Component(node) => Some(node),
            RenderNode::Element(_) => None,
        }
    }
}

impl From<Builder> for RenderNode {
    fn from(builder: Builder) -> Self {
        builder.into_node()
    }
}

impl From<Builder> for Child {
    fn from(builder: Builder) -> Self {
        Self::Node(builder.into_node())
    }
}
