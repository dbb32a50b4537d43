//! Directive Registry
//!
//! A directive is a reserved attribute key whose signal value drives a
//! render node instead of a host attribute. One directive exists:
//!
//! - `d-if`: on every write, show the node (`render`) when the signal is
//!   truthy, hide it (`unrender`) otherwise.
//!
//! Binding only governs changes after the binding is made. Initial
//! visibility is decided by `init`, which reads the signal directly.

use crate::node::RenderNode;
use crate::reactive::{AnySignal, Subscription};
use crate::runtime::Runtime;

/// Key of the conditional-render directive.
pub const IF: &str = "d-if";

/// A recognized directive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Directive {
    /// Conditional render.
    If,
}

impl Directive {
    /// Every recognized directive.
    pub const ALL: [Directive; 1] = [Directive::If];

    /// Look up a directive by attribute key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            IF => Some(Self::If),
            _ => None,
        }
    }

    /// Attribute key of this directive.
    pub fn key(self) -> &'static str {
        match self {
            Self::If => IF,
        }
    }
}

/// Whether `key` names a directive.
pub fn is_directive(key: &str) -> bool {
    Directive::from_key(key).is_some()
}

/// Bind the directive named `key` on `node` to `signal`.
///
/// Returns `None` for keys that are not directives.
pub fn bind_directive(
    runtime: &Runtime,
    node: &RenderNode,
    key: &str,
    signal: &AnySignal,
) -> Option<Subscription> {
    let Some(directive) = Directive::from_key(key) else {
        tracing::trace!(key, "not a directive, ignored");
        return None;
    };

    match directive {
        Directive::If => Some(bind_if(runtime, node, signal)),
    }
}

fn bind_if(runtime: &Runtime, node: &RenderNode, signal: &AnySignal) -> Subscription {
    let target = node.downgrade();
    let source = signal.downgrade();
    let runtime = runtime.clone();

    signal.observe(move || {
        let (Some(node), Some(signal)) = (target.upgrade(), source.upgrade()) else {
            return;
        };

        let result = if signal.truthy() {
            node.render(&runtime)
        } else {
            node.unrender(&runtime)
        };

        // Nothing above us can handle a corrupted node; abort the write.
        if let Err(err) = result {
            tracing::error!(%err, "d-if toggle failed");
            panic!("d-if toggle failed: {err}");
        }
    })
}
