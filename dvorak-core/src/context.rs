//! Build Context
//!
//! The build context tracks which component is currently building. This
//! enables two things:
//!
//! - Parent/child linkage. A component that starts building while another
//!   component is on the build stack becomes that component's child.
//! - Lifecycle hook attribution. `on_mount`/`on_unmount` target the
//!   component whose body is executing.
//!
//! # Implementation
//!
//! The context is an explicit value threaded through every `build` and
//! `init` call and handed to component functions. Each component build
//! pushes itself onto the stack and becomes the hook target; leaving the
//! build pops the stack. What happens to the hook target on exit depends on
//! [`Config::restore_build_context`](crate::Config::restore_build_context).

use std::sync::atomic::{AtomicU64, Ordering};

use crate::host::Host;
use crate::node::Component;
use crate::runtime::Runtime;

/// Next component identity. Strictly increasing, starting at 1.
pub fn next_id() -> u64 {
    static COUNTER: AtomicU64 = AtomicU64::new(1);
    COUNTER.fetch_add(1, Ordering::Relaxed)
}

/// State of one build pass.
pub struct BuildContext {
    runtime: Runtime,
    stack: Vec<Component>,
    current: Option<Component>,
}

impl BuildContext {
    /// Start an empty build pass against `runtime`.
    pub fn new(runtime: Runtime) -> Self {
        Self {
            runtime,
            stack: Vec::new(),
            current: None,
        }
    }

    /// The runtime this pass builds against.
    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Shorthand for the runtime's host tree.
    pub fn host(&self) -> &dyn Host {
        self.runtime.host()
    }

    /// The component whose body is executing, if any.
    pub fn currently_building(&self) -> Option<&Component> {
        self.current.as_ref()
    }

    /// The innermost component on the build stack.
    pub fn top(&self) -> Option<&Component> {
        self.stack.last()
    }

    /// Number of components on the build stack.
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Whether a component build is in progress.
    pub fn is_building(&self) -> bool {
        !self.stack.is_empty()
    }

    pub(crate) fn enter_build(&mut self, component: Component) {
        tracing::trace!(component = component.id(), depth = self.stack.len(), "enter build");
        self.current = Some(component.clone());
        self.stack.push(component);
    }

    pub(crate) fn exit_build(&mut self) {
        let finished = self.stack.pop();
        debug_assert!(finished.is_some(), "exit_build without matching enter_build");

        self.current = if self.runtime.config().restore_build_context {
            self.stack.last().cloned()
        } else {
            None
        };

        if let Some(component) = finished {
            tracing::trace!(component = component.id(), depth = self.stack.len(), "exit build");
        }
    }
}

impl std::fmt::Debug for BuildContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BuildContext")
            .field("stack", &self.stack.iter().map(Component::id).collect::<Vec<_>>())
            .field("current", &self.current.as_ref().map(Component::id))
            .finish()
    }
}
