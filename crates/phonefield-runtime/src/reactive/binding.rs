#![forbid(unsafe_code)]

//! Bindings that connect field state to caller-owned storage.
//!
//! - [`Binding<T>`] is a read-only view evaluated on every `get()`. The
//!   field uses it to expose the parsed number, which must never be served
//!   from a stale cache.
//! - [`BindingCell<T>`] is the two-way get/set cell a field writes into. It
//!   does not own the storage behind it: the caller keeps ownership and
//!   lifetime authority.
//! - [`BindingScope`] holds the subscriptions of a logical scope (a mounted
//!   field) and releases them together.
//!
//! # Usage
//!
//! ```
//! use phonefield_runtime::reactive::{BindingCell, Observable};
//!
//! let value = Observable::new(String::new());
//! let cell = BindingCell::from_observable(&value);
//!
//! cell.set("+14155551234".to_string());
//! assert_eq!(value.get(), "+14155551234");
//!
//! drop(value);
//! // Storage is gone; reads fall back to the default and writes are dropped.
//! assert_eq!(cell.get(), "");
//! ```
//!
//! # Invariants
//!
//! 1. `Binding::get()` always returns the current value (no caching).
//! 2. `BindingCell` never extends the lifetime of observable storage.
//! 3. Dropping a `BindingScope` releases every held subscription.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use super::observable::{Observable, Subscription};

// ---------------------------------------------------------------------------
// Binding<T>: one-way read binding
// ---------------------------------------------------------------------------

/// A read-only binding evaluated lazily on each `get()`.
pub struct Binding<T> {
    eval: Rc<dyn Fn() -> T>,
}

impl<T> Clone for Binding<T> {
    fn clone(&self) -> Self {
        Self {
            eval: Rc::clone(&self.eval),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Binding<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Binding")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> Binding<T> {
    /// Create a binding that evaluates `f` on each `get()` call.
    pub fn new(f: impl Fn() -> T + 'static) -> Self {
        Self { eval: Rc::new(f) }
    }

    /// Get the current bound value.
    #[must_use]
    pub fn get(&self) -> T {
        (self.eval)()
    }

    /// Apply a further transform, returning a new `Binding`.
    pub fn then<U: 'static>(self, f: impl Fn(T) -> U + 'static) -> Binding<U> {
        Binding {
            eval: Rc::new(move || f((self.eval)())),
        }
    }
}

/// Create a direct read binding to an observable.
pub fn bind_observable<T: Clone + PartialEq + 'static>(source: &Observable<T>) -> Binding<T> {
    let src = source.clone();
    Binding {
        eval: Rc::new(move || src.get()),
    }
}

// ---------------------------------------------------------------------------
// BindingCell<T>: get/set cell over caller storage
// ---------------------------------------------------------------------------

/// A get/set cell backed by storage the holder does not own.
pub struct BindingCell<T> {
    get: Rc<dyn Fn() -> T>,
    set: Rc<dyn Fn(T)>,
}

impl<T> Clone for BindingCell<T> {
    fn clone(&self) -> Self {
        Self {
            get: Rc::clone(&self.get),
            set: Rc::clone(&self.set),
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for BindingCell<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingCell")
            .field("value", &self.get())
            .finish()
    }
}

impl<T: 'static> BindingCell<T> {
    /// Build a cell from a getter and a setter.
    pub fn new(get: impl Fn() -> T + 'static, set: impl Fn(T) + 'static) -> Self {
        Self {
            get: Rc::new(get),
            set: Rc::new(set),
        }
    }

    #[must_use]
    pub fn get(&self) -> T {
        (self.get)()
    }

    pub fn set(&self, value: T) {
        (self.set)(value);
    }

    /// A read-only view of this cell.
    #[must_use]
    pub fn read_only(&self) -> Binding<T> {
        let get = Rc::clone(&self.get);
        Binding::new(move || get())
    }
}

impl<T: Clone + 'static> BindingCell<T> {
    /// A cell over private storage, for state the caller did not supply.
    #[must_use]
    pub fn detached(initial: T) -> Self {
        let storage = Rc::new(RefCell::new(initial));
        let read = Rc::clone(&storage);
        Self::new(
            move || read.borrow().clone(),
            move |value| *storage.borrow_mut() = value,
        )
    }
}

impl<T: Clone + PartialEq + Default + 'static> BindingCell<T> {
    /// A cell over an observable, holding only a weak reference to it.
    ///
    /// Once the observable's owner drops it, `get` returns `T::default()`
    /// and `set` is ignored.
    #[must_use]
    pub fn from_observable(source: &Observable<T>) -> Self {
        let read = source.downgrade();
        let write = source.downgrade();
        Self::new(
            move || read.upgrade().map(|obs| obs.get()).unwrap_or_default(),
            move |value| match write.upgrade() {
                Some(obs) => obs.set(value),
                None => tracing::trace!("binding write after storage was dropped"),
            },
        )
    }
}

// ---------------------------------------------------------------------------
// BindingScope: lifecycle management
// ---------------------------------------------------------------------------

/// Collects the subscriptions of a logical scope (e.g. a mounted field).
///
/// # Invariants
///
/// 1. After drop or `clear()`, no callback registered through this scope
///    fires again.
/// 2. `binding_count()` is the number of held subscriptions.
pub struct BindingScope {
    subscriptions: Vec<Subscription>,
}

impl BindingScope {
    #[must_use]
    pub fn new() -> Self {
        Self {
            subscriptions: Vec::new(),
        }
    }

    /// Keep `sub` alive until the scope is dropped or cleared.
    pub fn hold(&mut self, sub: Subscription) {
        self.subscriptions.push(sub);
    }

    /// Subscribe to an observable within this scope.
    pub fn subscribe<T: Clone + PartialEq + 'static>(
        &mut self,
        source: &Observable<T>,
        callback: impl Fn(&T) + 'static,
    ) -> &mut Self {
        let sub = source.subscribe(callback);
        self.subscriptions.push(sub);
        self
    }

    #[must_use]
    pub fn binding_count(&self) -> usize {
        self.subscriptions.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscriptions.is_empty()
    }

    /// Release all subscriptions now; the scope stays reusable.
    pub fn clear(&mut self) {
        self.subscriptions.clear();
    }
}

impl Default for BindingScope {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for BindingScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BindingScope")
            .field("binding_count", &self.subscriptions.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn binding_tracks_observable() {
        let obs = Observable::new(42);
        let b = bind_observable(&obs);
        assert_eq!(b.get(), 42);
        obs.set(100);
        assert_eq!(b.get(), 100);
    }

    #[test]
    fn binding_is_never_cached() {
        let counter = Rc::new(Cell::new(0));
        let c = Rc::clone(&counter);
        let b = Binding::new(move || {
            c.set(c.get() + 1);
            c.get()
        });
        assert_eq!(b.get(), 1);
        assert_eq!(b.get(), 2);
    }

    #[test]
    fn binding_then_chain() {
        let obs = Observable::new(String::from("415"));
        let len = bind_observable(&obs).then(|s| s.len());
        assert_eq!(len.get(), 3);
        obs.set("4155551234".to_string());
        assert_eq!(len.get(), 10);
    }

    #[test]
    fn cell_writes_through_to_observable() {
        let obs = Observable::new(String::new());
        let cell = BindingCell::from_observable(&obs);
        cell.set("555".to_string());
        assert_eq!(obs.get(), "555");
        obs.set("+1555".to_string());
        assert_eq!(cell.get(), "+1555");
    }

    #[test]
    fn cell_does_not_own_observable() {
        let obs = Observable::new(String::from("kept"));
        let cell = BindingCell::from_observable(&obs);
        drop(obs);
        assert_eq!(cell.get(), "");
        cell.set("ignored".to_string());
        assert_eq!(cell.get(), "");
    }

    #[test]
    fn cell_from_closures() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&log);
        let cell = BindingCell::new(|| 7, move |v| sink.borrow_mut().push(v));
        assert_eq!(cell.get(), 7);
        cell.set(1);
        cell.set(2);
        assert_eq!(*log.borrow(), vec![1, 2]);
    }

    #[test]
    fn detached_cell_keeps_its_value() {
        let cell = BindingCell::detached(String::from("a"));
        let twin = cell.clone();
        cell.set("b".to_string());
        assert_eq!(twin.get(), "b");
    }

    #[test]
    fn read_only_view_follows_cell() {
        let cell = BindingCell::detached(1);
        let view = cell.read_only();
        cell.set(5);
        assert_eq!(view.get(), 5);
    }

    #[test]
    fn scope_drop_releases_subscriptions() {
        let obs = Observable::new(0);
        let seen = Rc::new(Cell::new(0));
        {
            let mut scope = BindingScope::new();
            let s = Rc::clone(&seen);
            scope.subscribe(&obs, move |v| s.set(*v));
            assert_eq!(scope.binding_count(), 1);
            obs.set(1);
            assert_eq!(seen.get(), 1);
        }
        obs.set(99);
        assert_eq!(seen.get(), 1, "callback should not fire after scope dropped");
    }

    #[test]
    fn scope_clear_is_reusable() {
        let obs = Observable::new(0);
        let mut scope = BindingScope::new();

        let first = Rc::new(Cell::new(false));
        let f = Rc::clone(&first);
        scope.subscribe(&obs, move |_| f.set(true));
        scope.clear();
        assert!(scope.is_empty());

        let second = Rc::new(Cell::new(false));
        let s = Rc::clone(&second);
        scope.hold(obs.subscribe(move |_| s.set(true)));

        obs.set(1);
        assert!(!first.get());
        assert!(second.get());
    }

    #[test]
    fn scope_debug_format() {
        let mut scope = BindingScope::new();
        let obs = Observable::new(0);
        scope.subscribe(&obs, |_| {});
        scope.subscribe(&obs, |_| {});
        assert!(format!("{scope:?}").contains("binding_count: 2"));
    }
}
