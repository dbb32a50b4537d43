//! Lifecycle Hooks
//!
//! A component body registers at most one mount hook and one unmount hook.
//! Neither runs inline: `render` and `unrender` push the hook onto the
//! runtime's [`HookQueue`], and [`Runtime::flush_hooks`] runs queued hooks in
//! FIFO order. By the time a mount hook runs, the component's content has
//! been attached.
//!
//! [`Runtime::flush_hooks`]: crate::Runtime::flush_hooks

use std::cell::RefCell;
use std::collections::VecDeque;
use std::rc::Rc;

use crate::context::BuildContext;

/// A deferred lifecycle callback.
pub type Hook = Rc<dyn Fn()>;

/// FIFO of hooks waiting to run.
#[derive(Default)]
pub struct HookQueue {
    pending: RefCell<VecDeque<Hook>>,
}

impl HookQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `hook` behind everything already scheduled.
    pub fn schedule(&self, hook: Hook) {
        self.pending.borrow_mut().push_back(hook);
    }

    /// Run the hooks queued at the time of the call, oldest first.
    ///
    /// Hooks scheduled while flushing wait for the next flush. Returns how
    /// many hooks ran.
    pub fn flush(&self) -> usize {
        let batch = std::mem::take(&mut *self.pending.borrow_mut());
        let count = batch.len();
        for hook in batch {
            hook();
        }
        if count > 0 {
            tracing::debug!(count, "hooks flushed");
        }
        count
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}

impl std::fmt::Debug for HookQueue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("HookQueue").field("pending", &self.len()).finish()
    }
}

/// Register `f` as the mount hook of the component currently building.
///
/// Outside a component body this does nothing. A second call in the same
/// body replaces the first.
pub fn on_mount(cx: &BuildContext, f: impl Fn() + 'static) {
    match cx.currently_building() {
        Some(component) => component.set_onload(Rc::new(f)),
        None => tracing::trace!("on_mount outside a component build ignored"),
    }
}

/// Register `f` as the unmount hook of the component currently building.
///
/// Same targeting rules as [`on_mount`].
pub fn on_unmount(cx: &BuildContext, f: impl Fn() + 'static) {
    match cx.currently_building() {
        Some(component) => component.set_unload(Rc::new(f)),
        None => tracing::trace!("on_unmount outside a component build ignored"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::host::{Host, MemoryDom};
    use crate::node::{component, element, Attributes, Child};
    use crate::Runtime;
    use std::cell::Cell;

    #[test]
    fn queue_runs_in_fifo_order() {
        let queue = HookQueue::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        for i in 0..3 {
            let log = log.clone();
            queue.schedule(Rc::new(move || log.borrow_mut().push(i)));
        }

        assert_eq!(queue.len(), 3);
        assert_eq!(queue.flush(), 3);
        assert_eq!(*log.borrow(), vec![0, 1, 2]);
        assert!(queue.is_empty());
    }

    #[test]
    fn hooks_scheduled_during_flush_wait() {
        let queue = Rc::new(HookQueue::new());
        let ran = Rc::new(Cell::new(0));

        let inner_ran = ran.clone();
        let requeue = queue.clone();
        queue.schedule(Rc::new(move || {
            let inner_ran = inner_ran.clone();
            requeue.schedule(Rc::new(move || inner_ran.set(inner_ran.get() + 1)));
        }));

        assert_eq!(queue.flush(), 1);
        assert_eq!(ran.get(), 0);
        assert_eq!(queue.flush(), 1);
        assert_eq!(ran.get(), 1);
    }

    #[test]
    fn registration_outside_build_is_ignored() {
        let runtime = Runtime::new(Rc::new(MemoryDom::new()));
        let cx = runtime.build_context();
        on_mount(&cx, || panic!("must not run"));
        on_unmount(&cx, || panic!("must not run"));
        assert_eq!(runtime.pending_hooks(), 0);
    }

    #[test]
    fn last_registration_wins() {
        let dom = Rc::new(MemoryDom::with_root("root"));
        let runtime = Runtime::new(Rc::clone(&dom));
        let root = dom.element_by_id("root").unwrap();
        let which = Rc::new(Cell::new(0));

        let which_clone = which.clone();
        let node = component(move |cx: &mut BuildContext, _: &Attributes, _: &[Child]| {
            let first = which_clone.clone();
            let second = which_clone.clone();
            on_mount(cx, move || first.set(1));
            on_mount(cx, move || second.set(2));
            element("p").into()
        })
        .into_component()
        .unwrap();

        node.load_at(root).init(&mut runtime.build_context()).unwrap();
        runtime.flush_hooks();

        assert_eq!(which.get(), 2);
        assert!(node.has_onload());
        assert!(!node.has_unload());
    }
}
