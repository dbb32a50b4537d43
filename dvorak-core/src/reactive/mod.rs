//! Reactive Primitives
//!
//! This module implements the signal primitive the render engine binds
//! against.
//!
//! # Concepts
//!
//! ## Signals
//!
//! A signal is a value cell with an ordered subscriber list. It is created
//! as a pair: a [`ReadSignal`] accessor and a [`WriteSignal`] mutator. Every
//! write runs every subscriber, synchronously, in subscription order.
//!
//! ## Explicit subscription
//!
//! There is no automatic dependency tracking. Bindings subscribe explicitly
//! and keep the returned [`Subscription`] so the owning render node can
//! detach them when it is disposed.
//!
//! ## Erased values
//!
//! Render nodes accept signals of any [`SignalValue`] type through
//! [`AnySignal`], which replaces runtime shape checks with a tagged variant.

mod signal;
mod subscriber;
mod value;

pub use signal::{create_signal, ReadSignal, WeakReadSignal, WriteSignal};
pub use subscriber::{Callback, SubscriberId, Subscription};
pub use value::{AnySignal, Content, SignalValue, WeakAnySignal};
