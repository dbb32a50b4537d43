//! State shared by both render node variants.
//!
//! A mount owns the host nodes a render node produced, the placeholder that
//! stands in for them while hidden, the location the node was loaded at, and
//! the subscriptions its bindings created. Once placed, exactly one of
//! {content, placeholder} is attached.

use std::cell::{Cell, RefCell};

use smallvec::SmallVec;

use crate::error::{Error, Result};
use crate::host::{Host, NodeId};
use crate::reactive::Subscription;

/// Host nodes owned by a render node, in order.
pub type NodeList = SmallVec<[NodeId; 1]>;

#[derive(Default)]
pub(crate) struct Mount {
    nodes: RefCell<NodeList>,
    placeholder: Cell<Option<NodeId>>,
    host: Cell<Option<NodeId>>,
    bindings: RefCell<Vec<Subscription>>,
}

impl Mount {
    pub(crate) fn nodes(&self) -> NodeList {
        self.nodes.borrow().clone()
    }

    pub(crate) fn is_built(&self) -> bool {
        !self.nodes.borrow().is_empty()
    }

    pub(crate) fn set_nodes(&self, nodes: NodeList) {
        *self.nodes.borrow_mut() = nodes;
    }

    pub(crate) fn placeholder(&self) -> Option<NodeId> {
        self.placeholder.get()
    }

    /// Create the placeholder on first use. It is never replaced.
    pub(crate) fn ensure_placeholder(&self, host: &dyn Host) -> NodeId {
        match self.placeholder.get() {
            Some(placeholder) => placeholder,
            None => {
                let placeholder = host.create_marker();
                self.placeholder.set(Some(placeholder));
                placeholder
            }
        }
    }

    pub(crate) fn load_at(&self, host_node: NodeId) {
        self.host.set(Some(host_node));
    }

    pub(crate) fn host_node(&self) -> Option<NodeId> {
        self.host.get()
    }

    pub(crate) fn keep(&self, subscription: Subscription) {
        self.bindings.borrow_mut().push(subscription);
    }

    pub(crate) fn keep_all(&self, subscriptions: impl IntoIterator<Item = Subscription>) {
        self.bindings.borrow_mut().extend(subscriptions);
    }

    pub(crate) fn binding_count(&self) -> usize {
        self.bindings.borrow().len()
    }

    /// Initial placement under the load location: content when `visible`,
    /// otherwise the placeholder.
    pub(crate) fn place(&self, host: &dyn Host, visible: bool) -> Result<()> {
        let target = self.host.get().ok_or(Error::NotLoaded)?;

        if visible {
            for node in self.nodes.borrow().iter() {
                host.append_child(target, *node);
            }
        } else {
            let placeholder = self.ensure_placeholder(host);
            host.append_child(target, placeholder);
        }
        Ok(())
    }

    /// Whether the content (rather than the placeholder) is attached.
    pub(crate) fn is_shown(&self, host: &dyn Host) -> bool {
        self.nodes
            .borrow()
            .first()
            .is_some_and(|first| host.is_attached(*first))
    }

    pub(crate) fn directive_if(&self, host: &dyn Host, show: bool) -> Result<()> {
        let nodes = self.nodes();
        let first = *nodes.first().ok_or(Error::NotBuilt)?;
        let placeholder = self.placeholder.get().ok_or(Error::NotBuilt)?;

        if show {
            if host.is_attached(first) {
                return Ok(());
            }
            if !host.is_attached(placeholder) {
                tracing::error!(?placeholder, "show requested with detached placeholder");
                return Err(Error::PlaceholderDetached { node: placeholder });
            }

            for node in &nodes {
                host.insert_before(*node, placeholder);
            }
            host.remove(placeholder);
            tracing::debug!(?first, count = nodes.len(), "content shown");
        } else {
            if !host.is_attached(first) {
                return Ok(());
            }

            host.insert_before(placeholder, first);
            for node in &nodes {
                host.remove(*node);
            }
            tracing::debug!(?first, count = nodes.len(), "content hidden");
        }
        Ok(())
    }

    /// Drop every subscription this mount's bindings hold.
    pub(crate) fn release(&self) -> usize {
        let bindings = std::mem::take(&mut *self.bindings.borrow_mut());
        let released = bindings.len();
        for subscription in bindings {
            subscription.unsubscribe();
        }
        released
    }

    /// Take content and placeholder out of the host tree.
    pub(crate) fn detach(&self, host: &dyn Host) {
        for node in self.nodes.borrow().iter() {
            host.remove(*node);
        }
        if let Some(placeholder) = self.placeholder.get() {
            host.remove(placeholder);
        }
    }
}
