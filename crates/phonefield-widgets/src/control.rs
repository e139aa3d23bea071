#![forbid(unsafe_code)]

//! The native text control contract.
//!
//! A [`TextControl`] owns the on-screen text. It reports changes three ways:
//!
//! - a synchronous edit handler called on every user keystroke,
//! - [`TextFieldDelegate`] calls for editing lifecycle events,
//! - a [`TextNotification`] on its [`EventChannel`] for every mutation,
//!   user-driven or programmatic.
//!
//! Notifications carry a [`ControlRef`] naming the sender, so a listener can
//! verify it is hearing from the control it was attached to.

use std::any::{TypeId, type_name};
use std::fmt;
use std::rc::{Rc, Weak};
use std::sync::atomic::{AtomicU64, Ordering};

use phonefield_runtime::reactive::EventChannel;

use crate::config::FieldConfig;

/// Global counter for control ids.
static CONTROL_ID_COUNTER: AtomicU64 = AtomicU64::new(1);

/// Unique identifier of a control instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlId(u64);

impl ControlId {
    /// Allocate a fresh id.
    #[must_use]
    pub fn next() -> Self {
        Self(CONTROL_ID_COUNTER.fetch_add(1, Ordering::Relaxed))
    }

    #[inline]
    #[must_use]
    pub const fn id(self) -> u64 {
        self.0
    }
}

/// Identity of a control: its id plus its concrete type.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ControlRef {
    id: ControlId,
    type_id: TypeId,
    type_name: &'static str,
}

impl ControlRef {
    /// Reference to a control of concrete type `C`.
    #[must_use]
    pub fn of<C: 'static>(id: ControlId) -> Self {
        Self {
            id,
            type_id: TypeId::of::<C>(),
            type_name: type_name::<C>(),
        }
    }

    #[must_use]
    pub const fn id(&self) -> ControlId {
        self.id
    }

    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Whether both references name the same concrete control type.
    #[must_use]
    pub fn same_type(&self, other: &Self) -> bool {
        self.type_id == other.type_id
    }

    #[must_use]
    pub fn is<C: 'static>(&self) -> bool {
        self.type_id == TypeId::of::<C>()
    }
}

impl fmt::Debug for ControlRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ControlRef({}#{})", self.type_name, self.id.0)
    }
}

/// "Text changed" notification posted by a control.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextNotification {
    pub sender: ControlRef,
    /// The control's text after the mutation.
    pub text: String,
}

/// Editing lifecycle callbacks a control makes to its delegate.
pub trait TextFieldDelegate {
    fn did_begin_editing(&self);
    fn did_end_editing(&self);
    /// Asked when the user taps the clear button. `true` lets the control
    /// clear its text.
    fn should_clear(&self) -> bool;
    /// Asked when the user presses return. `true` lets the control process
    /// the return key.
    fn should_return(&self) -> bool;
}

/// Callback invoked with the control's text on every user edit.
pub type EditHandler = Rc<dyn Fn(&str)>;

/// An editable text control the field can drive.
///
/// Implementations must not hold internal borrows while calling the edit
/// handler, the delegate or channel listeners: those may call straight
/// back into the control.
pub trait TextControl: 'static {
    fn control_ref(&self) -> ControlRef;

    fn text(&self) -> String;

    /// Replace the text programmatically. Posts a notification when the text
    /// changes; never calls the edit handler.
    fn set_text(&self, text: &str);

    /// Apply pass-through configuration.
    fn apply_config(&self, config: &FieldConfig);

    fn set_edit_handler(&self, handler: Option<EditHandler>);

    /// Attach or detach the delegate. Controls hold delegates weakly.
    fn set_delegate(&self, delegate: Option<Weak<dyn TextFieldDelegate>>);

    /// The channel this control posts [`TextNotification`]s on.
    fn notifications(&self) -> EventChannel<TextNotification>;
}
