#![forbid(unsafe_code)]

//! Caller reactions to field lifecycle events.
//!
//! A [`HandlerSet`] is built once and handed to the coordinator. Every slot
//! receives a [`FieldSnapshot`] of the field as it is after the event.
//! Unset slots are no-ops.

use std::fmt;
use std::rc::Rc;

use phonefield_number::ParsedNumber;

use crate::state::EditState;

/// Field state handed to handlers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldSnapshot {
    /// Displayed text.
    pub text: String,
    /// Caller-facing value.
    pub value: String,
    pub number: Option<ParsedNumber>,
    pub state: EditState,
}

/// The six handler slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum HandlerKind {
    BeginEditing,
    TextChanged,
    NumberChanged,
    EndEditing,
    Clear,
    Return,
}

impl HandlerKind {
    pub const ALL: [Self; 6] = [
        Self::BeginEditing,
        Self::TextChanged,
        Self::NumberChanged,
        Self::EndEditing,
        Self::Clear,
        Self::Return,
    ];

    const fn index(self) -> usize {
        self as usize
    }

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BeginEditing => "begin_editing",
            Self::TextChanged => "text_changed",
            Self::NumberChanged => "number_changed",
            Self::EndEditing => "end_editing",
            Self::Clear => "clear",
            Self::Return => "return",
        }
    }
}

impl fmt::Display for HandlerKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A single handler callback.
pub type Handler = Rc<dyn Fn(&FieldSnapshot)>;

/// Immutable set of caller handlers.
#[derive(Clone, Default)]
pub struct HandlerSet {
    slots: [Option<Handler>; 6],
}

impl HandlerSet {
    /// A set where every slot is a no-op.
    #[must_use]
    pub fn none() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> HandlerSetBuilder {
        HandlerSetBuilder::default()
    }

    #[must_use]
    pub fn is_set(&self, kind: HandlerKind) -> bool {
        self.slots[kind.index()].is_some()
    }

    pub(crate) fn invoke(&self, kind: HandlerKind, snapshot: &FieldSnapshot) {
        if let Some(handler) = &self.slots[kind.index()] {
            handler(snapshot);
        }
    }
}

impl fmt::Debug for HandlerSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let set: Vec<_> = HandlerKind::ALL
            .into_iter()
            .filter(|kind| self.is_set(*kind))
            .map(HandlerKind::name)
            .collect();
        f.debug_struct("HandlerSet").field("set", &set).finish()
    }
}

/// Builder for [`HandlerSet`].
#[derive(Default)]
pub struct HandlerSetBuilder {
    slots: [Option<Handler>; 6],
}

impl HandlerSetBuilder {
    /// Install `handler` in the `kind` slot, replacing any previous one.
    #[must_use]
    pub fn on(mut self, kind: HandlerKind, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.slots[kind.index()] = Some(Rc::new(handler));
        self
    }

    #[must_use]
    pub fn on_begin_editing(self, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.on(HandlerKind::BeginEditing, handler)
    }

    #[must_use]
    pub fn on_text_changed(self, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.on(HandlerKind::TextChanged, handler)
    }

    #[must_use]
    pub fn on_number_changed(self, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.on(HandlerKind::NumberChanged, handler)
    }

    #[must_use]
    pub fn on_end_editing(self, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.on(HandlerKind::EndEditing, handler)
    }

    #[must_use]
    pub fn on_clear(self, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.on(HandlerKind::Clear, handler)
    }

    #[must_use]
    pub fn on_return(self, handler: impl Fn(&FieldSnapshot) + 'static) -> Self {
        self.on(HandlerKind::Return, handler)
    }

    #[must_use]
    pub fn build(self) -> HandlerSet {
        HandlerSet { slots: self.slots }
    }
}
