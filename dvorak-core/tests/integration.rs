//! Integration Tests for the Render Engine
//!
//! These tests mount whole trees on a `MemoryDom` and verify that signals,
//! directives, bindings and lifecycle hooks work together correctly.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use dvorak_core::{
    component, create_signal, element, on_mount, on_unmount, Attributes, BuildContext, Child,
    Config, Error, Host, MemoryDom, Mutation, NodeId, RenderNode, Runtime,
};
use proptest::prelude::*;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn mount() -> (Rc<MemoryDom>, Runtime, NodeId) {
    init_tracing();
    let dom = Rc::new(MemoryDom::with_root("root"));
    let runtime = Runtime::new(Rc::clone(&dom));
    let root = dom.element_by_id("root").unwrap();
    (dom, runtime, root)
}

fn panel(text: &'static str) -> RenderNode {
    component(move |_: &mut BuildContext, _: &Attributes, _: &[Child]| {
        element("section").text(text).into()
    })
    .into_node()
}

/// Test the counter app end to end: events, dynamic text and attributes.
#[test]
fn counter_app_updates_in_place() {
    let (dom, runtime, root) = mount();
    let (count, set_count) = create_signal(0);
    let (class, set_class) = create_signal("idle");

    let app = {
        let count = count.clone();
        component(move |_: &mut BuildContext, _: &Attributes, _: &[Child]| {
            let set_count = set_count.clone();
            let set_class = set_class.clone();
            element("div")
                .bind("class", &class)
                .child(element("h1").text("Counter"))
                .child(
                    element("button")
                        .on("onClick", move |_| {
                            set_count.update(|n| n + 1);
                            set_class.set("busy");
                        })
                        .text("clicks: ")
                        .dynamic(&count),
                )
                .into()
        })
    };

    runtime.render_root(app).unwrap();
    assert_eq!(
        dom.to_html(root),
        r#"<div id="root"><div class="idle"><h1>Counter</h1><button>clicks: 0</button></div></div>"#
    );

    let app_node = dom.children(root)[0];
    let button = dom.children(app_node)[1];
    let header = dom.children(app_node)[0];

    assert_eq!(dom.dispatch(button, "click"), 1);
    assert_eq!(dom.dispatch(button, "click"), 1);
    assert_eq!(count.get(), 2);
    assert_eq!(dom.text_content(button), "clicks: 2");
    assert_eq!(dom.attribute(app_node, "class").as_deref(), Some("busy"));

    // Only the dynamic slot and the attribute changed.
    assert_eq!(dom.children(app_node)[0], header);
    assert_eq!(dom.children(app_node)[1], button);
}

/// Test that hiding and showing swap content with the placeholder in place.
#[test]
fn d_if_swaps_with_placeholder_in_order() {
    let (dom, runtime, root) = mount();
    let (show, set_show) = create_signal(true);

    let before = dom.create_element("header");
    dom.append_child(root, before);
    let node = component(|_: &mut BuildContext, _: &Attributes, _: &[Child]| {
        element("main").text("body").into()
    })
    .attr("d-if", &show)
    .into_node();
    runtime.render_root(node.clone()).unwrap();
    let after = dom.create_element("footer");
    dom.append_child(root, after);

    let content = node.nodes()[0];
    let placeholder = node.placeholder().unwrap();
    dom.take_mutations();

    set_show.set(false);
    assert_eq!(
        dom.take_mutations(),
        vec![
            Mutation::InsertBefore { node: placeholder, reference: content },
            Mutation::Remove { node: content },
        ]
    );
    assert_eq!(dom.children(root), vec![before, placeholder, after]);

    set_show.set(true);
    assert_eq!(
        dom.take_mutations(),
        vec![
            Mutation::InsertBefore { node: content, reference: placeholder },
            Mutation::Remove { node: placeholder },
        ]
    );
    assert_eq!(dom.children(root), vec![before, content, after]);
}

/// Test that repeated writes with the same value do not touch the tree.
#[test]
fn d_if_repeat_writes_are_noops() {
    let (dom, runtime, _) = mount();
    let (show, set_show) = create_signal(false);
    let node = component(|_: &mut BuildContext, _: &Attributes, _: &[Child]| {
        element("section").into()
    })
    .attr("d-if", &show);
    runtime.render_root(node).unwrap();
    dom.take_mutations();

    set_show.set(false);
    set_show.set(false);
    assert!(dom.mutations().is_empty());

    set_show.set(true);
    dom.take_mutations();
    set_show.set(true);
    assert!(dom.mutations().is_empty());
}

/// Test that a nested component is linked to its builder exactly once.
#[test]
fn parent_child_linkage() {
    let (_, runtime, _) = mount();
    let inner = panel("inner");
    let inner_clone = inner.clone();

    let outer = component(move |_: &mut BuildContext, _: &Attributes, _: &[Child]| {
        element("div")
            .child(inner_clone.clone())
            .child(element("p").text("sibling"))
            .into()
    })
    .into_component()
    .unwrap();

    runtime.render_root(outer.clone()).unwrap();
    // Rebuilding is a no-op and must not link again.
    outer.build(&mut runtime.build_context()).unwrap();

    let children = outer.child_components();
    assert_eq!(children.len(), 1);
    let inner = inner.as_component().unwrap();
    assert!(children[0].ptr_eq(inner));
    assert!(inner.parent().unwrap().ptr_eq(&outer));
}

/// Test that grandchildren link to the nearest enclosing component.
#[test]
fn linkage_follows_build_stack() {
    let (_, runtime, _) = mount();
    let leaf = panel("leaf");
    let leaf_clone = leaf.clone();
    let middle = component(move |_: &mut BuildContext, _: &Attributes, _: &[Child]| {
        element("div").child(leaf_clone.clone()).into()
    })
    .into_node();
    let middle_clone = middle.clone();
    let top = component(move |_: &mut BuildContext, _: &Attributes, _: &[Child]| middle_clone.clone())
        .into_component()
        .unwrap();

    runtime.render_root(top.clone()).unwrap();

    let middle = middle.as_component().unwrap();
    let leaf = leaf.as_component().unwrap();
    assert!(middle.parent().unwrap().ptr_eq(&top));
    assert!(leaf.parent().unwrap().ptr_eq(middle));
    assert_eq!(top.child_components().len(), 1);
    assert_eq!(middle.child_components().len(), 1);
    assert!(top.nodes() == middle.nodes());
}

/// Test that lifecycle hooks never run inside the call that scheduled them.
#[test]
fn lifecycle_hooks_are_deferred() {
    let (dom, runtime, root) = mount();
    let (show, set_show) = create_signal(true);
    let log = Rc::new(RefCell::new(Vec::new()));

    let log_clone = log.clone();
    let dom_clone = Rc::clone(&dom);
    let node = component(move |cx: &mut BuildContext, _: &Attributes, _: &[Child]| {
        let mounted = log_clone.clone();
        let unmounted = log_clone.clone();
        let dom = Rc::clone(&dom_clone);
        on_mount(cx, move || {
            let root = dom.element_by_id("root").unwrap();
            mounted.borrow_mut().push(format!("mount:{}", dom.text_content(root)));
        });
        on_unmount(cx, move || unmounted.borrow_mut().push("unmount".to_string()));
        element("p").text("ready").into()
    })
    .attr("d-if", &show)
    .into_component()
    .unwrap();

    runtime.render_root(node.clone()).unwrap();
    assert!(log.borrow().is_empty());
    assert_eq!(runtime.pending_hooks(), 1);

    assert_eq!(runtime.flush_hooks(), 1);
    assert_eq!(*log.borrow(), vec!["mount:ready"]);

    set_show.set(false);
    assert_eq!(log.borrow().len(), 1);
    assert!(!node.is_rendered());
    runtime.flush_hooks();
    assert_eq!(log.borrow().last().map(String::as_str), Some("unmount"));

    set_show.set(true);
    set_show.set(false);
    assert_eq!(runtime.pending_hooks(), 2);
    runtime.flush_hooks();
    assert_eq!(*log.borrow(), vec!["mount:ready", "unmount", "mount:", "unmount"]);
    assert!(dom.text_content(root).is_empty());
}

/// Test that an initially hidden component never schedules its unload hook.
#[test]
fn initial_hide_skips_unrender() {
    let (_, runtime, _) = mount();
    let (show, set_show) = create_signal(false);
    let unloaded = Rc::new(Cell::new(0));
    let loaded = Rc::new(Cell::new(0));

    let (unloaded_clone, loaded_clone) = (unloaded.clone(), loaded.clone());
    let node = component(move |cx: &mut BuildContext, _: &Attributes, _: &[Child]| {
        let loaded = loaded_clone.clone();
        let unloaded = unloaded_clone.clone();
        on_mount(cx, move || loaded.set(loaded.get() + 1));
        on_unmount(cx, move || unloaded.set(unloaded.get() + 1));
        element("p").into()
    })
    .attr("d-if", &show);

    runtime.render_root(node).unwrap();
    runtime.flush_hooks();
    assert_eq!((loaded.get(), unloaded.get()), (0, 0));

    set_show.set(true);
    runtime.flush_hooks();
    assert_eq!((loaded.get(), unloaded.get()), (1, 0));
}

/// Test that a signal attribute reflects the last write, with no batching.
#[test]
fn attribute_reflects_last_write() {
    let (dom, runtime, root) = mount();
    let (title, set_title) = create_signal(String::from("a"));
    runtime
        .render_root(element("span").attr("title", "static").bind("data-title", &title))
        .unwrap();
    let span = dom.children(root)[0];
    dom.take_mutations();

    for value in ["b", "c", "d"] {
        set_title.set(value.to_string());
    }

    assert_eq!(dom.attribute(span, "data-title").as_deref(), Some("d"));
    let writes: Vec<_> = dom
        .take_mutations()
        .into_iter()
        .filter_map(|m| match m {
            Mutation::SetAttribute { name, value, .. } => Some((name, value)),
            _ => None,
        })
        .collect();
    assert_eq!(writes.len(), 3);
    assert!(writes.iter().all(|(name, _)| name == "data-title"));
}

/// Test that `onChange` handlers receive the event value.
#[test]
fn change_events_carry_values() {
    let (dom, runtime, root) = mount();
    let (text, set_text) = create_signal(String::new());
    runtime
        .render_root(
            element("label")
                .child(element("input").on("onChange", move |event| {
                    set_text.set(event.value.clone().unwrap_or_default());
                }))
                .dynamic(&text),
        )
        .unwrap();

    let label = dom.children(root)[0];
    let input = dom.children(label)[0];
    dom.dispatch_with_value(input, "change", "hello");
    assert_eq!(dom.text_content(label), "hello");
    assert_eq!(dom.dispatch(input, "click"), 0);
}

/// Test that building twice creates no extra host nodes or bindings.
#[test]
fn build_is_idempotent_across_tree() {
    let (dom, runtime, _) = mount();
    let (count, _) = create_signal(0);
    let node = element("ul")
        .child(element("li").dynamic(&count))
        .child(panel("p"))
        .into_node();

    let mut cx = runtime.build_context();
    let first = node.build(&mut cx).unwrap();
    let created = dom.node_count();
    let subscribers = count.subscriber_count();

    let second = node.build(&mut cx).unwrap();
    assert_eq!(first, second);
    assert_eq!(dom.node_count(), created);
    assert_eq!(count.subscriber_count(), subscribers);
}

/// Test that disposing a tree detaches every binding it created.
#[test]
fn dispose_releases_bindings() {
    let (dom, runtime, root) = mount();
    let (show, set_show) = create_signal(true);
    let (count, set_count) = create_signal(0);

    let inner = component(|_: &mut BuildContext, _: &Attributes, _: &[Child]| element("b").into())
        .attr("d-if", &show);
    let tree = element("div").child(inner).dynamic(&count).into_node();
    runtime.render_root(tree.clone()).unwrap();
    assert_eq!(show.subscriber_count(), 1);
    assert_eq!(count.subscriber_count(), 1);

    assert_eq!(tree.dispose(&*dom), 2);
    assert_eq!(show.subscriber_count(), 0);
    assert_eq!(count.subscriber_count(), 0);
    assert!(dom.children(root).is_empty());

    dom.take_mutations();
    set_show.set(false);
    set_count.set(9);
    assert!(dom.mutations().is_empty());
}

/// Test both mount entry point variants.
#[test]
fn render_root_variants() {
    init_tracing();
    let dom = Rc::new(MemoryDom::new());
    let runtime = Runtime::new(Rc::clone(&dom));

    let banner = dom.create_element("aside");
    runtime.render_root(banner).unwrap();
    assert_eq!(dom.children(dom.body()), vec![banner]);

    let err = runtime.render_root(panel("x")).unwrap_err();
    assert!(matches!(err, Error::MissingRoot { ref id } if id == "root"));
    assert_eq!(err.to_string(), "no host element with id `root`");
}

/// Test hook attribution after a nested build inside a component body.
#[test]
fn hook_target_after_nested_build() {
    for restore in [false, true] {
        init_tracing();
        let dom = Rc::new(MemoryDom::with_root("root"));
        let config = Config::default().with_restore_build_context(restore);
        let runtime = Runtime::with_config(Rc::clone(&dom), config);

        let child = panel("child");
        let child_clone = child.clone();
        let outer = component(move |cx: &mut BuildContext, _: &Attributes, _: &[Child]| {
            child_clone.build(cx).unwrap();
            on_mount(cx, || {});
            element("div").child(child_clone.clone()).into()
        })
        .into_component()
        .unwrap();

        runtime.render_root(outer.clone()).unwrap();

        assert_eq!(outer.has_onload(), restore);
        assert!(!child.as_component().unwrap().has_onload());
        assert_eq!(outer.child_components().len(), 1);
    }
}

/// Test that the root id can come from JSON configuration.
#[test]
fn config_from_json_drives_mount() {
    init_tracing();
    let config = Config::from_json(r#"{ "root_id": "app" }"#).unwrap();
    let dom = Rc::new(MemoryDom::with_root("app"));
    let runtime = Runtime::with_config(Rc::clone(&dom), config);

    runtime.render_root(element("p").text("hi")).unwrap();
    let app = dom.element_by_id("app").unwrap();
    assert_eq!(dom.text_content(app), "hi");
}

/// Test that showing a built but never mounted component is fatal.
#[test]
#[should_panic(expected = "d-if toggle failed")]
fn toggle_before_mount_panics() {
    let (_, runtime, _) = mount();
    let (show, set_show) = create_signal(true);
    let node = component(|_: &mut BuildContext, _: &Attributes, _: &[Child]| element("p").into())
        .attr("d-if", &show)
        .into_node();

    node.build(&mut runtime.build_context()).unwrap();
    set_show.set(true);
}

proptest! {
    /// A signal always reads the last value written to it.
    #[test]
    fn signal_reads_last_write(writes in prop::collection::vec(any::<i64>(), 1..32)) {
        let (value, set_value) = create_signal(0i64);
        let seen = Rc::new(Cell::new(0i64));
        let seen_clone = seen.clone();
        let reader = value.clone();
        let _subscription = value.subscribe(move || seen_clone.set(reader.get()));

        for write in &writes {
            set_value.set(*write);
            prop_assert_eq!(seen.get(), *write);
        }
        prop_assert_eq!(value.get(), *writes.last().unwrap());
    }

    /// Exactly one of content and placeholder is attached after any write sequence.
    #[test]
    fn d_if_keeps_one_of_content_or_placeholder(
        initial in any::<bool>(),
        writes in prop::collection::vec(any::<bool>(), 0..24),
    ) {
        let dom = Rc::new(MemoryDom::with_root("root"));
        let runtime = Runtime::new(Rc::clone(&dom));
        let root = dom.element_by_id("root").unwrap();
        let (show, set_show) = create_signal(initial);

        let node = component(|_: &mut BuildContext, _: &Attributes, _: &[Child]| {
            element("div").child(element("span")).into()
        })
        .attr("d-if", &show)
        .into_node();
        runtime.render_root(node.clone()).unwrap();

        let content = node.nodes()[0];
        let placeholder = node.placeholder().unwrap();
        let mut expected = initial;
        for write in writes {
            set_show.set(write);
            expected = write;
            let children = dom.children(root);
            prop_assert_eq!(children.len(), 1);
            prop_assert_eq!(children[0], if expected { content } else { placeholder });
        }
        prop_assert_eq!(node.is_shown(&*dom), expected);
    }
}
