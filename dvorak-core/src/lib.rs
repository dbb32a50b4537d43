//! Dvorak Core
//!
//! This crate provides the core of the Dvorak fine-grained reactive UI
//! library. It renders a declarative tree of render nodes onto a mutable
//! host tree and keeps attributes, child slots and conditional visibility in
//! sync with signals. There is no virtual DOM: every binding knows exactly
//! which host node it updates.
//!
//! It implements:
//!
//! - Signals with explicit subscriptions
//! - Host-element and function-component render nodes
//! - The `d-if` conditional-render directive
//! - Deferred mount/unmount lifecycle hooks
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//!
//! - `reactive`: signals, subscriptions and type-erased signal handles
//! - `host`: the host tree trait and the in-memory `MemoryDom`
//! - `node`: render nodes, attributes and the `create_element` factory
//! - `directive`: the directive registry
//! - `context`: build-pass state and component identities
//! - `lifecycle`: hook registration and the deferred hook queue
//! - `runtime`: the coordinator and mount entry point
//!
//! # Example
//!
//! ```rust
//! use std::rc::Rc;
//! use dvorak_core::{component, create_signal, element, on_mount, MemoryDom, Runtime};
//! use dvorak_core::{Attributes, BuildContext, Child, Host};
//!
//! let dom = Rc::new(MemoryDom::with_root("root"));
//! let runtime = Runtime::new(Rc::clone(&dom));
//!
//! let (count, set_count) = create_signal(0);
//! let (show, set_show) = create_signal(true);
//!
//! let counter = component(move |cx: &mut BuildContext, _: &Attributes, _: &[Child]| {
//!     on_mount(cx, || println!("mounted"));
//!     let set_count = set_count.clone();
//!     element("button")
//!         .on("onClick", move |_| set_count.update(|n| n + 1))
//!         .dynamic(&count)
//!         .into()
//! })
//! .attr("d-if", &show);
//!
//! runtime.render_root(counter).unwrap();
//! runtime.flush_hooks();
//!
//! let root = dom.element_by_id("root").unwrap();
//! let button = dom.children(root)[0];
//! dom.dispatch(button, "click");
//! assert_eq!(dom.text_content(button), "1");
//!
//! set_show.set(false);
//! assert_eq!(dom.to_html(root), r#"<div id="root"><!----></div>"#);
//! ```

pub mod config;
pub mod context;
pub mod directive;
pub mod error;
pub mod host;
pub mod lifecycle;
pub mod node;
pub mod reactive;
pub mod runtime;

pub use config::Config;
pub use context::{next_id, BuildContext};
pub use error::{Error, Result};
pub use host::{Event, EventHandler, Host, MemoryDom, Mutation, NodeId};
pub use lifecycle::{on_mount, on_unmount, HookQueue};
pub use node::{
    component, create_element, element, AttrValue, Attributes, Builder, Child, Component, ComponentFn,
    RawElement, RenderNode, Tag,
};
pub use reactive::{create_signal, AnySignal, Content, ReadSignal, SignalValue, Subscription, WriteSignal};
pub use runtime::{Root, Runtime};
