//! Runtime
//!
//! The runtime is the coordinator a render tree is built against. It owns:
//!
//! - the host tree adapter every render node mutates,
//! - the [`Config`] read by builds and the mount entry point,
//! - the [`HookQueue`] that defers lifecycle hooks.
//!
//! A `Runtime` is a cheap handle; clones share the same state. Binding
//! closures hold a clone, so the runtime lives until the last node built
//! against it is disposed.

use std::rc::Rc;

use crate::config::Config;
use crate::context::BuildContext;
use crate::error::{Error, Result};
use crate::host::{Host, NodeId};
use crate::lifecycle::{Hook, HookQueue};
use crate::node::{Builder, Component, RawElement, RenderNode};

struct RuntimeInner {
    host: Rc<dyn Host>,
    config: Config,
    hooks: HookQueue,
}

/// Handle to the shared runtime state.
#[derive(Clone)]
pub struct Runtime(Rc<RuntimeInner>);

impl Runtime {
    /// A runtime over `host` with the default configuration.
    pub fn new<H: Host + 'static>(host: Rc<H>) -> Self {
        Self::with_config(host, Config::default())
    }

    pub fn with_config<H: Host + 'static>(host: Rc<H>, config: Config) -> Self {
        tracing::debug!(root = %config.root_id, restore = config.restore_build_context, "runtime created");
        Self(Rc::new(RuntimeInner {
            host,
            config,
            hooks: HookQueue::new(),
        }))
    }

    /// The host tree adapter.
    pub fn host(&self) -> &dyn Host {
        self.0.host.as_ref()
    }

    pub fn config(&self) -> &Config {
        &self.0.config
    }

    /// A fresh build pass against this runtime.
    pub fn build_context(&self) -> BuildContext {
        BuildContext::new(self.clone())
    }

    pub(crate) fn schedule(&self, hook: Hook) {
        self.0.hooks.schedule(hook);
    }

    /// Run every lifecycle hook scheduled so far, in scheduling order.
    /// Returns how many ran.
    ///
    /// Call this once the synchronous work that scheduled them (a mount,
    /// an event dispatch, a signal write) has returned.
    pub fn flush_hooks(&self) -> usize {
        self.0.hooks.flush()
    }

    /// Number of hooks waiting for [`Runtime::flush_hooks`].
    pub fn pending_hooks(&self) -> usize {
        self.0.hooks.len()
    }

    /// Mount entry point.
    ///
    /// A host node is appended to the body. A render node is loaded at the
    /// element whose id is [`Config::root_id`] and initialized with a fresh
    /// build context.
    pub fn render_root(&self, root: impl Into<Root>) -> Result<()> {
        match root.into() {
            Root::Host(node) => {
                let host = self.host();
                host.append_child(host.body(), node);
                Ok(())
            }
            Root::Node(node) => {
                let root_id = &self.0.config.root_id;
                let target = self
                    .host()
                    .element_by_id(root_id)
                    .ok_or_else(|| Error::MissingRoot { id: root_id.clone() })?;

                tracing::debug!(root = %root_id, ?target, "mounting root");
                node.load_at(target).init(&mut self.build_context())
            }
        }
    }
}

impl std::fmt::Debug for Runtime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Runtime")
            .field("config", &self.0.config)
            .field("hooks", &self.0.hooks)
            .finish()
    }
}

/// What [`Runtime::render_root`] mounts.
#[derive(Debug, Clone)]
pub enum Root {
    /// An existing host node, appended to the body as is.
    Host(NodeId),
    /// A render node, mounted at the configured root element.
    Node(RenderNode),
}

impl From<NodeId> for Root {
    fn from(node: NodeId) -> Self {
        Self::Host(node)
    }
}

impl From<RenderNode> for Root {
    fn from(node: RenderNode) -> Self {
        Self::Node(node)
    }
}

impl From<RawElement> for Root {
    fn from(node: RawElement) -> Self {
        Self::Node(node.into())
    }
}

impl From<Component> for Root {
    fn from(node: Component) -> Self {
        Self::Node(node.into())
    }
}

impl From<Builder> for Root {
    fn from(builder: Builder) -> Self {
        Self::Node(builder.into_node())
    }
}
