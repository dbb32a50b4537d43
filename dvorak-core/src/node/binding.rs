//! Per-node bindings: attributes, events and dynamic child slots.
//!
//! Every function here returns the subscriptions it created so the owning
//! render node can release them on dispose.

use std::cell::Cell;

use super::attributes::{AttrValue, Attributes};
use super::RenderNode;
use crate::directive;
use crate::host::{EventHandler, Host, NodeId};
use crate::reactive::{AnySignal, Content, Subscription};
use crate::runtime::Runtime;

/// Native event type for a recognized handler key.
pub fn native_event(key: &str) -> Option<&'static str> {
    match key {
        "onClick" => Some("click"),
        "onChange" => Some("change"),
        _ => None,
    }
}

/// Apply `attributes` to `element`.
///
/// Per key, in order: a directive key with a signal value binds the
/// directive on `owner`; otherwise a handler binds an event. Independently,
/// a literal is set once and a signal is set now and on every write.
pub(crate) fn bind_attributes(
    runtime: &Runtime,
    owner: &RenderNode,
    element: NodeId,
    attributes: &Attributes,
) -> Vec<Subscription> {
    let host = runtime.host();
    let mut subscriptions = Vec::new();

    for (key, value) in attributes {
        match value {
            AttrValue::Signal(signal) if directive::is_directive(key) => {
                subscriptions.extend(directive::bind_directive(runtime, owner, key, signal));
            }
            AttrValue::Handler(handler) => bind_event(host, element, key, handler),
            _ => {}
        }

        match value {
            AttrValue::Literal(text) => host.set_attribute(element, key, text),
            AttrValue::Signal(signal) => {
                subscriptions.push(bind_attribute(runtime, element, key, signal));
            }
            AttrValue::Handler(_) => {}
        }
    }

    subscriptions
}

fn bind_event(host: &dyn Host, element: NodeId, key: &str, handler: &EventHandler) {
    match native_event(key) {
        Some(event) => host.add_event_listener(element, event, handler.clone()),
        None => tracing::trace!(key, "unrecognized event handler ignored"),
    }
}

fn bind_attribute(runtime: &Runtime, element: NodeId, key: &str, signal: &AnySignal) -> Subscription {
    runtime.host().set_attribute(element, key, &signal.text());

    let runtime = runtime.clone();
    let key = key.to_string();
    let source = signal.downgrade();
    signal.observe(move || {
        if let Some(signal) = source.upgrade() {
            runtime.host().set_attribute(element, &key, &signal.text());
        }
    })
}

/// Fill a child slot of `parent` from `signal` and keep it in sync.
///
/// Exactly one content node occupies the slot at any time; each write
/// replaces it in place.
pub(crate) fn bind_dynamic_child(runtime: &Runtime, parent: NodeId, signal: &AnySignal) -> Subscription {
    let host = runtime.host();
    let initial = content_node(host, signal.content());
    host.append_child(parent, initial);

    let previous = Cell::new(initial);
    let runtime = runtime.clone();
    let source = signal.downgrade();
    signal.observe(move || {
        let Some(signal) = source.upgrade() else {
            return;
        };
        let host = runtime.host();
        let next = content_node(host, signal.content());
        host.replace_child(parent, next, previous.get());
        previous.set(next);
    })
}

fn content_node(host: &dyn Host, content: Content) -> NodeId {
    match content {
        Content::Node(node) => node,
        Content::Text(text) => host.create_text(&text),
    }
}
