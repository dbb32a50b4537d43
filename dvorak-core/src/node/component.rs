//! Function-component render nodes.
//!
//! A component wraps a user function. Building runs the function once,
//! builds the render node it returns, and adopts that node's host nodes as
//! its own. The component itself creates no host nodes besides its
//! placeholder.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use super::attributes::{AttrValue, Attributes};
use super::mount::{Mount, NodeList};
use super::{visible_initially, Child, RenderNode};
use crate::context::{next_id, BuildContext};
use crate::directive;
use crate::error::Result;
use crate::host::{Host, NodeId};
use crate::lifecycle::Hook;
use crate::runtime::Runtime;

/// Signature of a component function.
pub type ComponentFn = Rc<dyn Fn(&mut BuildContext, &Attributes, &[Child]) -> RenderNode>;

pub(crate) struct ComponentInner {
    id: u64,
    func: ComponentFn,
    attributes: Attributes,
    children: Vec<Child>,
    mount: Mount,
    parent: RefCell<Weak<ComponentInner>>,
    child_components: RefCell<Vec<Component>>,
    result: RefCell<Option<RenderNode>>,
    onload: RefCell<Option<Hook>>,
    unload: RefCell<Option<Hook>>,
    rendered: Cell<bool>,
}

/// A render node backed by a component function.
#[derive(Clone)]
pub struct Component(Rc<ComponentInner>);

impl Component {
    /// Create an unbuilt component with a fresh identity.
    pub fn new(func: ComponentFn, attributes: Attributes, children: Vec<Child>) -> Self {
        Self(Rc::new(ComponentInner {
            id: next_id(),
            func,
            attributes,
            children,
            mount: Mount::default(),
            parent: RefCell::new(Weak::new()),
            child_components: RefCell::new(Vec::new()),
            result: RefCell::new(None),
            onload: RefCell::new(None),
            unload: RefCell::new(None),
            rendered: Cell::new(false),
        }))
    }

    /// Identity assigned at construction.
    pub fn id(&self) -> u64 {
        self.0.id
    }

    /// Attributes as declared.
    pub fn attributes(&self) -> &Attributes {
        &self.0.attributes
    }

    /// The component this one was built under, if any.
    pub fn parent(&self) -> Option<Component> {
        self.0.parent.borrow().upgrade().map(Self)
    }

    /// Components built under this one, in build order.
    pub fn child_components(&self) -> Vec<Component> {
        self.0.child_components.borrow().clone()
    }

    /// The render node the component function returned, once built.
    pub fn result(&self) -> Option<RenderNode> {
        self.0.result.borrow().clone()
    }

    /// Whether the last lifecycle transition was `render`.
    pub fn is_rendered(&self) -> bool {
        self.0.rendered.get()
    }

    /// Whether `build` has run.
    pub fn is_built(&self) -> bool {
        self.0.mount.is_built()
    }

    /// Host nodes produced by the component function; empty before build.
    pub fn nodes(&self) -> NodeList {
        self.0.mount.nodes()
    }

    /// The placeholder marker, once built.
    pub fn placeholder(&self) -> Option<NodeId> {
        self.0.mount.placeholder()
    }

    /// Number of live directive bindings owned by this component.
    pub fn binding_count(&self) -> usize {
        self.0.mount.binding_count()
    }

    pub(crate) fn set_onload(&self, hook: Hook) {
        *self.0.onload.borrow_mut() = Some(hook);
    }

    pub(crate) fn set_unload(&self, hook: Hook) {
        *self.0.unload.borrow_mut() = Some(hook);
    }

    /// Whether an onload hook is registered.
    pub fn has_onload(&self) -> bool {
        self.0.onload.borrow().is_some()
    }

    /// Whether an unload hook is registered.
    pub fn has_unload(&self) -> bool {
        self.0.unload.borrow().is_some()
    }

    fn add_child_component(&self, child: Component) {
        self.0.child_components.borrow_mut().push(child);
    }

    /// Run the component function and build what it returns.
    ///
    /// Repeat calls return the cached nodes. The first call links this
    /// component under whichever component is building, then binds the
    /// component's own directives once its content exists.
    pub fn build(&self, cx: &mut BuildContext) -> Result<NodeList> {
        if self.0.mount.is_built() {
            return Ok(self.0.mount.nodes());
        }

        let runtime = cx.runtime().clone();
        self.0.mount.ensure_placeholder(runtime.host());

        if let Some(parent) = cx.top() {
            *self.0.parent.borrow_mut() = Rc::downgrade(&parent.0);
            parent.add_child_component(self.clone());
        }

        cx.enter_build(self.clone());
        let produced = self.run_body(cx);
        cx.exit_build();
        let (result, nodes) = produced?;

        self.0.mount.set_nodes(nodes.clone());
        *self.0.result.borrow_mut() = Some(result);

        let owner = RenderNode::Component(self.clone());
        for (key, value) in &self.0.attributes {
            let AttrValue::Signal(signal) = value else {
                continue;
            };
            if directive::is_directive(key) {
                if let Some(subscription) = directive::bind_directive(&runtime, &owner, key, signal) {
                    self.0.mount.keep(subscription);
                }
            }
        }

        tracing::trace!(component = self.0.id, nodes = nodes.len(), "component built");
        Ok(nodes)
    }

    fn run_body(&self, cx: &mut BuildContext) -> Result<(RenderNode, NodeList)> {
        let result = (self.0.func)(cx, &self.0.attributes, &self.0.children);
        let nodes = result.build(cx)?;
        Ok((result, nodes))
    }

    /// Record where `init` attaches this component.
    pub fn load_at(&self, host_node: NodeId) -> &Self {
        self.0.mount.load_at(host_node);
        self
    }

    /// The recorded mount location.
    pub fn host_node(&self) -> Option<NodeId> {
        self.0.mount.host_node()
    }

    /// Build if needed, then attach the content and render, or attach the
    /// placeholder when a `d-if` signal currently reads false.
    ///
    /// The hidden path does not call `unrender`, so an unload hook never
    /// runs for a component that starts hidden.
    pub fn init(&self, cx: &mut BuildContext) -> Result<()> {
        if !self.0.mount.is_built() {
            self.build(cx)?;
        }

        let runtime = cx.runtime().clone();
        let visible = visible_initially(&self.0.attributes);
        self.0.mount.place(runtime.host(), visible)?;
        tracing::debug!(component = self.0.id, visible, "component mounted");

        if visible {
            self.render(&runtime)?;
        }
        Ok(())
    }

    /// Show the content and schedule the onload hook.
    pub fn render(&self, runtime: &Runtime) -> Result<()> {
        self.0.mount.directive_if(runtime.host(), true)?;
        self.0.rendered.set(true);

        let hook = self.0.onload.borrow().clone();
        if let Some(hook) = hook {
            tracing::debug!(component = self.0.id, "onload scheduled");
            runtime.schedule(hook);
        }
        Ok(())
    }

    /// Hide the content and schedule the unload hook.
    pub fn unrender(&self, runtime: &Runtime) -> Result<()> {
        self.0.mount.directive_if(runtime.host(), false)?;
        self.0.rendered.set(false);

        let hook = self.0.unload.borrow().clone();
        if let Some(hook) = hook {
            tracing::debug!(component = self.0.id, "unload scheduled");
            runtime.schedule(hook);
        }
        Ok(())
    }

    /// Show or hide the content by swapping it with the placeholder.
    pub fn directive_if(&self, host: &dyn Host, show: bool) -> Result<()> {
        self.0.mount.directive_if(host, show)
    }

    /// Whether the content (rather than the placeholder) is attached.
    pub fn is_shown(&self, host: &dyn Host) -> bool {
        self.0.mount.is_shown(host)
    }

    pub(crate) fn release(&self) -> usize {
        let mut released = self.0.mount.release();
        if let Some(result) = self.result() {
            released += result.release();
        }
        for child in self.child_components() {
            released += child.release();
        }
        released
    }

    pub(crate) fn detach(&self, host: &dyn Host) {
        self.0.mount.detach(host);
    }

    pub(crate) fn downgrade(&self) -> Weak<ComponentInner> {
        Rc::downgrade(&self.0)
    }

    pub(crate) fn from_inner(inner: Rc<ComponentInner>) -> Self {
        Self(inner)
    }

    /// Whether both handles refer to the same component.
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl std::fmt::Debug for Component {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.0.id)
            .field("parent", &self.parent().map(|p| p.id()))
            .field("children", &self.0.child_components.borrow().len())
            .field("rendered", &self.0.rendered.get())
            .finish()
    }
}
