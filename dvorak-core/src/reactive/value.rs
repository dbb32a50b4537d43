//! Type-erased signal values.
//!
//! Attributes, directives and child slots accept signals of many value
//! types. [`AnySignal`] erases the value type and keeps the three views the
//! render engine needs: text (for attributes and text nodes), [`Content`]
//! (for dynamic child slots) and truthiness (for `d-if`).

use std::fmt;
use std::rc::Rc;

use super::signal::ReadSignal;
use super::subscriber::{Callback, Subscription};
use crate::host::NodeId;

/// What a dynamic child slot shows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Content {
    /// Rendered as a text node.
    Text(String),
    /// An existing host node, inserted as is.
    Node(NodeId),
}

impl From<&str> for Content {
    fn from(text: &str) -> Self {
        Self::Text(text.to_string())
    }
}

impl From<String> for Content {
    fn from(text: String) -> Self {
        Self::Text(text)
    }
}

impl From<NodeId> for Content {
    fn from(node: NodeId) -> Self {
        Self::Node(node)
    }
}

/// A value that can flow out of a signal into the host tree.
pub trait SignalValue: 'static {
    /// Text form, used for attribute values and text nodes.
    fn to_text(&self) -> String;

    /// Form used when the value fills a dynamic child slot.
    fn to_content(&self) -> Content {
        Content::Text(self.to_text())
    }

    /// Whether a `d-if` bound to this value shows its node.
    fn truthy(&self) -> bool;
}

impl SignalValue for bool {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn truthy(&self) -> bool {
        *self
    }
}

impl SignalValue for String {
    fn to_text(&self) -> String {
        self.clone()
    }

    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl SignalValue for &'static str {
    fn to_text(&self) -> String {
        (*self).to_string()
    }

    fn truthy(&self) -> bool {
        !self.is_empty()
    }
}

impl SignalValue for char {
    fn to_text(&self) -> String {
        self.to_string()
    }

    fn truthy(&self) -> bool {
        true
    }
}

macro_rules! int_signal_value {
    ($($ty:ty),*) => {
        $(
            impl SignalValue for $ty {
                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn truthy(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

int_signal_value!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize);

macro_rules! float_signal_value {
    ($($ty:ty),*) => {
        $(
            impl SignalValue for $ty {
                fn to_text(&self) -> String {
                    self.to_string()
                }

                fn truthy(&self) -> bool {
                    *self != 0.0 && !self.is_nan()
                }
            }
        )*
    };
}

float_signal_value!(f32, f64);

impl SignalValue for Content {
    fn to_text(&self) -> String {
        match self {
            Content::Text(text) => text.clone(),
            Content::Node(_) => String::new(),
        }
    }

    fn to_content(&self) -> Content {
        self.clone()
    }

    fn truthy(&self) -> bool {
        match self {
            Content::Text(text) => !text.is_empty(),
            Content::Node(_) => true,
        }
    }
}

trait ErasedSignal {
    fn id(&self) -> u64;
    fn text(&self) -> String;
    fn content(&self) -> Content;
    fn truthy(&self) -> bool;
    fn observe(&self, callback: Callback) -> Subscription;
    fn downgrade(&self) -> WeakAnySignal;
}

impl<T: SignalValue> ErasedSignal for ReadSignal<T> {
    fn id(&self) -> u64 {
        ReadSignal::id(self)
    }

    fn text(&self) -> String {
        self.with(|value| value.to_text())
    }

    fn content(&self) -> Content {
        self.with(|value| value.to_content())
    }

    fn truthy(&self) -> bool {
        self.with(|value| value.truthy())
    }

    fn observe(&self, callback: Callback) -> Subscription {
        self.subscribe_rc(callback)
    }

    fn downgrade(&self) -> WeakAnySignal {
        let weak = ReadSignal::downgrade(self);
        WeakAnySignal(Rc::new(move || weak.upgrade().map(AnySignal::from)))
    }
}

/// A signal read accessor with its value type erased.
#[derive(Clone)]
pub struct AnySignal(Rc<dyn ErasedSignal>);

impl AnySignal {
    /// ID of the underlying signal.
    pub fn id(&self) -> u64 {
        self.0.id()
    }

    /// Current value as text.
    pub fn text(&self) -> String {
        self.0.text()
    }

    /// Current value as dynamic child content.
    pub fn content(&self) -> Content {
        self.0.content()
    }

    /// Current value as a visibility flag.
    pub fn truthy(&self) -> bool {
        self.0.truthy()
    }

    /// Subscribe to the underlying signal.
    pub fn observe(&self, callback: impl Fn() + 'static) -> Subscription {
        self.0.observe(Rc::new(callback))
    }

    /// Non-owning handle to the underlying signal.
    pub fn downgrade(&self) -> WeakAnySignal {
        self.0.downgrade()
    }
}

/// Non-owning form of [`AnySignal`].
#[derive(Clone)]
pub struct WeakAnySignal(Rc<dyn Fn() -> Option<AnySignal>>);

impl WeakAnySignal {
    /// Recover the signal if it still exists.
    pub fn upgrade(&self) -> Option<AnySignal> {
        (self.0)()
    }
}

impl<T: SignalValue> From<ReadSignal<T>> for AnySignal {
    fn from(signal: ReadSignal<T>) -> Self {
        Self(Rc::new(signal))
    }
}

impl<T: SignalValue> From<&ReadSignal<T>> for AnySignal {
    fn from(signal: &ReadSignal<T>) -> Self {
        Self(Rc::new(signal.clone()))
    }
}

impl fmt::Debug for AnySignal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnySignal")
            .field("id", &self.id())
            .field("text", &self.text())
            .finish()
    }
}
