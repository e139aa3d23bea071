#![forbid(unsafe_code)]

//! Fire-every-time notification channels.
//!
//! Unlike [`Observable`](super::Observable), an [`EventChannel`] stores no
//! value and performs no equality check: every [`emit`](EventChannel::emit)
//! reaches every live subscriber. Use it for "something happened" streams
//! where repeated identical events are meaningful.
//!
//! Channels are explicit objects owned by whoever produces the events; there
//! is no global registry. Subscribers hold a [`Subscription`] and are
//! removed when it drops.

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::observable::Subscription;

type Listener<E> = dyn Fn(&E);

/// A single-threaded broadcast channel for events of type `E`.
pub struct EventChannel<E> {
    listeners: Rc<RefCell<Vec<Weak<Listener<E>>>>>,
}

impl<E> Clone for EventChannel<E> {
    fn clone(&self) -> Self {
        Self {
            listeners: Rc::clone(&self.listeners),
        }
    }
}

impl<E: 'static> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E: 'static> EventChannel<E> {
    #[must_use]
    pub fn new() -> Self {
        Self {
            listeners: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Register a listener. It stays registered while the returned guard lives.
    pub fn subscribe(&self, listener: impl Fn(&E) + 'static) -> Subscription {
        let listener: Rc<Listener<E>> = Rc::new(listener);
        self.listeners.borrow_mut().push(Rc::downgrade(&listener));
        Subscription::new(listener)
    }

    /// Deliver `event` to every live listener in registration order.
    ///
    /// Returns the number of listeners reached. Listeners registered while
    /// the emit is in progress first hear the next event.
    pub fn emit(&self, event: &E) -> usize {
        let live: Vec<Rc<Listener<E>>> = {
            let mut listeners = self.listeners.borrow_mut();
            listeners.retain(|weak| weak.strong_count() > 0);
            listeners.iter().filter_map(Weak::upgrade).collect()
        };
        for listener in &live {
            listener(event);
        }
        live.len()
    }

    /// Number of live listeners.
    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.listeners
            .borrow()
            .iter()
            .filter(|weak| weak.strong_count() > 0)
            .count()
    }
}

impl<E> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("slots", &self.listeners.borrow().len())
            .finish()
    }
}
