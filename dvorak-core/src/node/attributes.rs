//! Attribute maps.

use indexmap::map::Iter;
use indexmap::IndexMap;

use crate::host::{Event, EventHandler};
use crate::reactive::{AnySignal, ReadSignal, SignalValue};

/// Value of one attribute.
#[derive(Clone, Debug)]
pub enum AttrValue {
    /// Set once as a host attribute.
    Literal(String),
    /// Event handler, bound for recognized event keys.
    Handler(EventHandler),
    /// Reactive value: a directive input or a live host attribute.
    Signal(AnySignal),
}

impl AttrValue {
    /// The signal, if this value is reactive.
    pub fn as_signal(&self) -> Option<&AnySignal> {
        match self {
            AttrValue::Signal(signal) => Some(signal),
            _ => None,
        }
    }

    /// The literal text, if this value is static.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            AttrValue::Literal(text) => Some(text),
            _ => None,
        }
    }
}

impl From<&str> for AttrValue {
    fn from(text: &str) -> Self {
        Self::Literal(text.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(text: String) -> Self {
        Self::Literal(text)
    }
}

impl From<EventHandler> for AttrValue {
    fn from(handler: EventHandler) -> Self {
        Self::Handler(handler)
    }
}

impl From<AnySignal> for AttrValue {
    fn from(signal: AnySignal) -> Self {
        Self::Signal(signal)
    }
}

impl<T: SignalValue> From<ReadSignal<T>> for AttrValue {
    fn from(signal: ReadSignal<T>) -> Self {
        Self::Signal(signal.into())
    }
}

impl<T: SignalValue> From<&ReadSignal<T>> for AttrValue {
    fn from(signal: &ReadSignal<T>) -> Self {
        Self::Signal(signal.into())
    }
}

/// Insertion-ordered attribute map with unique keys.
#[derive(Clone, Debug, Default)]
pub struct Attributes(IndexMap<String, AttrValue>);

impl Attributes {
    /// An empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a value. A replaced key keeps its position.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Option<AttrValue> {
        self.0.insert(key.into(), value.into())
    }

    /// Builder form of [`Attributes::insert`].
    pub fn with(mut self, key: impl Into<String>, value: impl Into<AttrValue>) -> Self {
        self.insert(key, value);
        self
    }

    /// Builder form for an event handler.
    pub fn on(self, key: impl Into<String>, handler: impl Fn(&Event) + 'static) -> Self {
        self.with(key, EventHandler::new(handler))
    }

    /// Look up a value.
    pub fn get(&self, key: &str) -> Option<&AttrValue> {
        self.0.get(key)
    }

    /// Look up a reactive value.
    pub fn signal(&self, key: &str) -> Option<&AnySignal> {
        self.get(key).and_then(AttrValue::as_signal)
    }

    /// Whether `key` is present.
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> Iter<'_, String, AttrValue> {
        self.0.iter()
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Whether the map is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a Attributes {
    type Item = (&'a String, &'a AttrValue);
    type IntoIter = Iter<'a, String, AttrValue>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl<K: Into<String>, V: Into<AttrValue>> FromIterator<(K, V)> for Attributes {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}
