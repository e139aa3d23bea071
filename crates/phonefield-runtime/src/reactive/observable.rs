#![forbid(unsafe_code)]

//! Shared, version-tracked values with change notification.
//!
//! # Invariants
//!
//! 1. Version increments exactly once per `set` that changes the value.
//! 2. Subscribers are notified in registration order.
//! 3. Setting a value equal to the current value is a no-op.
//! 4. No internal borrow is held while subscriber callbacks run, so a
//!    callback may read or write the same observable.

use std::any::Any;
use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

/// RAII guard for a subscriber callback.
///
/// The callback is held strongly only by this guard; sources keep weak
/// references and prune dead entries lazily. Dropping (or [`cancel`]ing)
/// the guard removes the callback before the next notification.
///
/// [`cancel`]: Subscription::cancel
#[must_use = "dropping a Subscription unsubscribes immediately"]
pub struct Subscription {
    _callback: Rc<dyn Any>,
}

impl Subscription {
    pub(crate) fn new<T: ?Sized + 'static>(callback: Rc<T>) -> Self {
        Self {
            _callback: Rc::new(callback),
        }
    }

    /// Explicitly unsubscribe. Equivalent to dropping the guard.
    pub fn cancel(self) {}
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription").finish_non_exhaustive()
    }
}

type Callback<T> = dyn Fn(&T);

struct Inner<T> {
    value: T,
    version: u64,
    subscribers: Vec<Weak<Callback<T>>>,
}

/// A shared value with version tracking and subscriber callbacks.
///
/// Cloning an `Observable` clones the handle, not the value: all clones see
/// the same state.
pub struct Observable<T> {
    inner: Rc<RefCell<Inner<T>>>,
}

impl<T> Clone for Observable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + 'static> Observable<T> {
    #[must_use]
    pub fn new(value: T) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                value,
                version: 0,
                subscribers: Vec::new(),
            })),
        }
    }

    /// Clone out the current value.
    #[must_use]
    pub fn get(&self) -> T {
        self.inner.borrow().value.clone()
    }

    /// Borrow the current value for the duration of `f`.
    pub fn with<R>(&self, f: impl FnOnce(&T) -> R) -> R {
        f(&self.inner.borrow().value)
    }

    /// Replace the value, notifying subscribers if it changed.
    pub fn set(&self, value: T) {
        let (snapshot, callbacks) = {
            let mut inner = self.inner.borrow_mut();
            if inner.value == value {
                return;
            }
            inner.value = value;
            inner.version += 1;
            inner.subscribers.retain(|weak| weak.strong_count() > 0);
            let callbacks: Vec<Rc<Callback<T>>> =
                inner.subscribers.iter().filter_map(Weak::upgrade).collect();
            (inner.value.clone(), callbacks)
        };
        for callback in callbacks {
            callback(&snapshot);
        }
    }

    /// Modify the value in place, notifying subscribers if it changed.
    pub fn update(&self, f: impl FnOnce(&mut T)) {
        let mut next = self.get();
        f(&mut next);
        self.set(next);
    }

    /// Register a callback invoked with the new value after each change.
    pub fn subscribe(&self, callback: impl Fn(&T) + 'static) -> Subscription {
        let callback: Rc<Callback<T>> = Rc::new(callback);
        self.inner
            .borrow_mut()
            .subscribers
            .push(Rc::downgrade(&callback));
        Subscription::new(callback)
    }

    /// Number of changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.inner.borrow().version
    }

    /// Number of live subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner
            .borrow()
            .subscribers
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }

    /// A non-owning handle to this observable.
    #[must_use]
    pub fn downgrade(&self) -> WeakObservable<T> {
        WeakObservable {
            inner: Rc::downgrade(&self.inner),
        }
    }
}

impl<T: Clone + PartialEq + fmt::Debug + 'static> fmt::Debug for Observable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("Observable")
            .field("value", &inner.value)
            .field("version", &inner.version)
            .finish()
    }
}

/// Non-owning handle to an [`Observable`]; upgrade to read or write.
pub struct WeakObservable<T> {
    inner: Weak<RefCell<Inner<T>>>,
}

impl<T> Clone for WeakObservable<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Weak::clone(&self.inner),
        }
    }
}

impl<T> WeakObservable<T> {
    /// The observable, if its owner still holds it.
    #[must_use]
    pub fn upgrade(&self) -> Option<Observable<T>> {
        self.inner.upgrade().map(|inner| Observable { inner })
    }
}

impl<T> fmt::Debug for WeakObservable<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WeakObservable")
            .field("alive", &(self.inner.strong_count() > 0))
            .finish()
    }
}
