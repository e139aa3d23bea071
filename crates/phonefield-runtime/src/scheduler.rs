#![forbid(unsafe_code)]

//! Cooperative next-tick scheduling.
//!
//! A [`TickScheduler`] is a FIFO of deferred closures drained by the host
//! once per event-loop iteration. Work that must not run inside the
//! current call stack (for example, reacting to a control notification that
//! fires while the control is still applying its own update) is deferred
//! here instead.
//!
//! # Invariants
//!
//! 1. Tasks run in the order they were deferred.
//! 2. [`run_tick`](TickScheduler::run_tick) runs only tasks queued before
//!    the tick started; tasks deferred during the tick wait for the next one.
//! 3. No borrow of the queue is held while a task runs, so tasks may defer
//!    further work.
//!
//! # Example
//!
//! ```
//! use phonefield_runtime::TickScheduler;
//! use std::cell::Cell;
//! use std::rc::Rc;
//!
//! let scheduler = TickScheduler::new();
//! let ran = Rc::new(Cell::new(false));
//! let flag = Rc::clone(&ran);
//! scheduler.defer(move || flag.set(true));
//!
//! assert!(!ran.get());
//! assert_eq!(scheduler.run_tick(), 1);
//! assert!(ran.get());
//! ```

use std::cell::{Cell, RefCell};
use std::collections::VecDeque;
use std::fmt;
use std::rc::Rc;

type Task = Box<dyn FnOnce()>;

/// Handle to a single-threaded deferred task queue.
///
/// Clones share the same queue.
#[derive(Clone, Default)]
pub struct TickScheduler {
    queue: Rc<RefCell<VecDeque<Task>>>,
    ticks: Rc<Cell<u64>>,
}

impl TickScheduler {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue `task` for the next tick.
    pub fn defer(&self, task: impl FnOnce() + 'static) {
        self.queue.borrow_mut().push_back(Box::new(task));
    }

    /// Run every task queued before this call. Returns how many ran.
    pub fn run_tick(&self) -> usize {
        let batch = std::mem::take(&mut *self.queue.borrow_mut());
        let tick = self.ticks.get() + 1;
        self.ticks.set(tick);
        if batch.is_empty() {
            return 0;
        }

        let _span = tracing::trace_span!("scheduler_tick", tick, tasks = batch.len()).entered();
        let count = batch.len();
        for task in batch {
            task();
        }
        count
    }

    /// Run ticks until the queue is empty or `max_ticks` ticks have run.
    ///
    /// Returns the number of ticks that ran at least one task.
    pub fn run_until_idle(&self, max_ticks: usize) -> usize {
        let mut busy = 0;
        for _ in 0..max_ticks {
            if self.is_idle() {
                break;
            }
            self.run_tick();
            busy += 1;
        }
        if !self.is_idle() {
            tracing::debug!(pending = self.pending(), max_ticks, "scheduler still busy");
        }
        busy
    }

    /// Number of tasks waiting for the next tick.
    #[must_use]
    pub fn pending(&self) -> usize {
        self.queue.borrow().len()
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        self.queue.borrow().is_empty()
    }

    /// Number of ticks run so far, including empty ones.
    #[must_use]
    pub fn tick_count(&self) -> u64 {
        self.ticks.get()
    }
}

impl fmt::Debug for TickScheduler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TickScheduler")
            .field("pending", &self.pending())
            .field("ticks", &self.ticks.get())
            .finish()
    }
}
