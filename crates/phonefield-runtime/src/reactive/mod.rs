#![forbid(unsafe_code)]

//! Reactive primitives for phonefield.
//!
//! - [`Observable`]: a shared, version-tracked value with subscriber callbacks.
//! - [`EventChannel`]: a broadcast channel that delivers every event, equal
//!   or not.
//! - [`Subscription`]: RAII guard returned by both; dropping it unsubscribes.
//! - [`Binding`] / [`BindingCell`]: read-only and get/set views over state.
//! - [`BindingScope`]: owns the subscriptions of a mounted field.
//!
//! # Architecture
//!
//! Everything here is single-threaded (`Rc<RefCell<..>>`). Sources keep
//! subscribers as `Weak` function pointers and prune dead ones lazily.
//! No borrow is held while callbacks run, so callbacks may re-enter the
//! source that notified them.

pub mod binding;
pub mod channel;
pub mod observable;

pub use binding::{Binding, BindingCell, BindingScope, bind_observable};
pub use channel::EventChannel;
pub use observable::{Observable, Subscription, WeakObservable};
