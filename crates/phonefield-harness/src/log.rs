#![forbid(unsafe_code)]

//! Recording handler invocations.

use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

use phonefield_widgets::{EditState, FieldSnapshot, HandlerKind, HandlerSet};
use serde_json::{Value, json};

/// One recorded handler call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerEntry {
    pub kind: HandlerKind,
    pub snapshot: FieldSnapshot,
}

/// Records every handler invocation of a field, in order.
///
/// Clones share the same record.
#[derive(Clone, Default)]
pub struct HandlerLog {
    entries: Rc<RefCell<Vec<HandlerEntry>>>,
}

impl HandlerLog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// A handler set that records into this log for every slot.
    #[must_use]
    pub fn handlers(&self) -> HandlerSet {
        HandlerKind::ALL
            .into_iter()
            .fold(HandlerSet::builder(), |builder, kind| {
                let entries = Rc::clone(&self.entries);
                builder.on(kind, move |snapshot| {
                    tracing::trace!(%kind, text = %snapshot.text, "handler invoked");
                    entries.borrow_mut().push(HandlerEntry {
                        kind,
                        snapshot: snapshot.clone(),
                    });
                })
            })
            .build()
    }

    #[must_use]
    pub fn entries(&self) -> Vec<HandlerEntry> {
        self.entries.borrow().clone()
    }

    #[must_use]
    pub fn kinds(&self) -> Vec<HandlerKind> {
        self.entries.borrow().iter().map(|e| e.kind).collect()
    }

    #[must_use]
    pub fn count(&self, kind: HandlerKind) -> usize {
        self.entries.borrow().iter().filter(|e| e.kind == kind).count()
    }

    /// Snapshot passed to the most recent call of `kind`.
    #[must_use]
    pub fn last(&self, kind: HandlerKind) -> Option<FieldSnapshot> {
        self.entries
            .borrow()
            .iter()
            .rev()
            .find(|e| e.kind == kind)
            .map(|e| e.snapshot.clone())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    pub fn clear(&self) {
        self.entries.borrow_mut().clear();
    }

    /// Drain and return everything recorded so far.
    pub fn take(&self) -> Vec<HandlerEntry> {
        std::mem::take(&mut *self.entries.borrow_mut())
    }

    /// The transcript as a JSON array.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let entries: Vec<Value> = self
            .entries
            .borrow()
            .iter()
            .map(|e| {
                json!({
                    "kind": e.kind.name(),
                    "text": e.snapshot.text,
                    "value": e.snapshot.value,
                    "number": e.snapshot.number.as_ref().map(|n| n.canonical()),
                    "editing": e.snapshot.state == EditState::Editing,
                })
            })
            .collect();
        Value::Array(entries)
    }

    /// BLAKE3 hex digest of the JSON transcript, for golden comparisons.
    #[must_use]
    pub fn digest(&self) -> String {
        let bytes = self.to_json().to_string();
        blake3::hash(bytes.as_bytes()).to_hex().to_string()
    }
}

impl fmt::Debug for HandlerLog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.kinds()).finish()
    }
}
