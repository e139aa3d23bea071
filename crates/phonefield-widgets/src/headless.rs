#![forbid(unsafe_code)]

//! An in-memory [`TextControl`].
//!
//! [`HeadlessControl`] behaves like a platform text field without drawing
//! anything. User actions (`begin_editing`, `insert`, `backspace`, ...) go
//! through the same callbacks a native field would make. Programmatic
//! [`set_text`](TextControl::set_text) only posts a notification.
//!
//! Clones share state, so a test can keep one handle while the field owns
//! another.
//!
//! # Callback Order
//!
//! | Action | Callbacks |
//! |--------|-----------|
//! | `begin_editing` | delegate `did_begin_editing`; with clear-on-begin and text, an edit to `""` |
//! | `insert`, `backspace`, `replace` | edit handler, then notification |
//! | `tap_clear` | delegate `should_clear`; if allowed, notification with `""` |
//! | `press_return` | delegate `should_return` |
//! | `end_editing` | delegate `did_end_editing` |
//! | `set_text` | notification, only when the text changed |

use std::cell::RefCell;
use std::fmt;
use std::rc::{Rc, Weak};

use phonefield_runtime::reactive::EventChannel;

use crate::config::{FieldConfig, FieldFlags};
use crate::control::{
    ControlId, ControlRef, EditHandler, TextControl, TextFieldDelegate, TextNotification,
};

#[derive(Default)]
struct ControlState {
    text: String,
    editing: bool,
    /// The next insertion replaces the text (clear-on-insertion).
    replace_on_insert: bool,
    config: FieldConfig,
    config_applications: u64,
    edit_handler: Option<EditHandler>,
    delegate: Option<Weak<dyn TextFieldDelegate>>,
}

/// Headless text control for tests and non-visual hosts.
#[derive(Clone)]
pub struct HeadlessControl {
    id: ControlId,
    state: Rc<RefCell<ControlState>>,
    notifications: EventChannel<TextNotification>,
}

impl HeadlessControl {
    #[must_use]
    pub fn new() -> Self {
        Self::with_text("")
    }

    #[must_use]
    pub fn with_text(text: impl Into<String>) -> Self {
        Self {
            id: ControlId::next(),
            state: Rc::new(RefCell::new(ControlState {
                text: text.into(),
                ..ControlState::default()
            })),
            notifications: EventChannel::new(),
        }
    }

    // ---------------------------------------------------------------------
    // User actions
    // ---------------------------------------------------------------------

    /// Focus the control. Returns `false` when disabled or already editing.
    pub fn begin_editing(&self) -> bool {
        let clear_first = {
            let mut state = self.state.borrow_mut();
            if !state.config.is_enabled() || state.editing {
                return false;
            }
            state.editing = true;
            state.replace_on_insert = state.config.flags.contains(FieldFlags::CLEAR_ON_INSERTION);
            state.config.flags.contains(FieldFlags::CLEAR_ON_BEGIN_EDITING) && !state.text.is_empty()
        };
        if let Some(delegate) = self.delegate() {
            delegate.did_begin_editing();
        }
        if clear_first {
            self.commit_user_text(String::new());
        }
        true
    }

    /// Type `input` at the end of the text.
    ///
    /// Digits beyond the configured maximum are dropped. Returns whether the
    /// text changed.
    pub fn insert(&self, input: &str) -> bool {
        let next = {
            let mut state = self.state.borrow_mut();
            if !state.editing {
                return false;
            }
            let base = if std::mem::take(&mut state.replace_on_insert) {
                String::new()
            } else {
                state.text.clone()
            };
            let next = limit_digits(base, input, state.config.max_digits);
            if next == state.text {
                return false;
            }
            next
        };
        self.commit_user_text(next);
        true
    }

    /// Delete the last character. Returns whether the text changed.
    pub fn backspace(&self) -> bool {
        let next = {
            let mut state = self.state.borrow_mut();
            if !state.editing || state.text.is_empty() {
                return false;
            }
            state.replace_on_insert = false;
            let mut next = state.text.clone();
            next.pop();
            next
        };
        self.commit_user_text(next);
        true
    }

    /// Replace the whole text as the user would by select-all and paste.
    pub fn replace(&self, input: &str) -> bool {
        let next = {
            let mut state = self.state.borrow_mut();
            if !state.editing {
                return false;
            }
            state.replace_on_insert = false;
            let next = limit_digits(String::new(), input, state.config.max_digits);
            if next == state.text {
                return false;
            }
            next
        };
        self.commit_user_text(next);
        true
    }

    /// Tap the clear button. Returns whether the text was cleared.
    pub fn tap_clear(&self) -> bool {
        if !self.state.borrow().config.is_enabled() {
            return false;
        }
        let allowed = self.delegate().is_none_or(|d| d.should_clear());
        if !allowed {
            return false;
        }
        self.state.borrow_mut().text.clear();
        self.post("");
        true
    }

    /// Press return. Returns the delegate's answer (`true` without one).
    pub fn press_return(&self) -> bool {
        self.delegate().is_none_or(|d| d.should_return())
    }

    /// Resign focus. Returns `false` when not editing.
    pub fn end_editing(&self) -> bool {
        {
            let mut state = self.state.borrow_mut();
            if !state.editing {
                return false;
            }
            state.editing = false;
            state.replace_on_insert = false;
        }
        if let Some(delegate) = self.delegate() {
            delegate.did_end_editing();
        }
        true
    }

    // ---------------------------------------------------------------------
    // Inspection
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn is_editing(&self) -> bool {
        self.state.borrow().editing
    }

    /// The configuration most recently applied by the field.
    #[must_use]
    pub fn config(&self) -> FieldConfig {
        self.state.borrow().config.clone()
    }

    /// How many times configuration has been applied.
    #[must_use]
    pub fn config_applications(&self) -> u64 {
        self.state.borrow().config_applications
    }

    #[must_use]
    pub fn has_edit_handler(&self) -> bool {
        self.state.borrow().edit_handler.is_some()
    }

    /// Whether a live delegate is attached.
    #[must_use]
    pub fn has_delegate(&self) -> bool {
        self.delegate().is_some()
    }

    #[must_use]
    pub fn listener_count(&self) -> usize {
        self.notifications.listener_count()
    }

    // ---------------------------------------------------------------------
    // Internals
    // ---------------------------------------------------------------------

    fn delegate(&self) -> Option<Rc<dyn TextFieldDelegate>> {
        self.state.borrow().delegate.as_ref().and_then(Weak::upgrade)
    }

    fn commit_user_text(&self, text: String) {
        let handler = {
            let mut state = self.state.borrow_mut();
            state.text.clone_from(&text);
            state.edit_handler.clone()
        };
        if let Some(handler) = handler {
            handler(&text);
        }
        self.post(&text);
    }

    fn post(&self, text: &str) {
        let notification = TextNotification {
            sender: self.control_ref(),
            text: text.to_owned(),
        };
        let reached = self.notifications.emit(&notification);
        tracing::trace!(control = self.id.id(), reached, "text notification posted");
    }
}

/// Append `input` to `base`, dropping digits past `max_digits`.
fn limit_digits(mut base: String, input: &str, max_digits: Option<usize>) -> String {
    let Some(max) = max_digits else {
        base.push_str(input);
        return base;
    };
    let mut digits = base.chars().filter(char::is_ascii_digit).count();
    for c in input.chars() {
        if c.is_ascii_digit() {
            if digits >= max {
                continue;
            }
            digits += 1;
        }
        base.push(c);
    }
    base
}

impl Default for HeadlessControl {
    fn default() -> Self {
        Self::new()
    }
}

impl TextControl for HeadlessControl {
    fn control_ref(&self) -> ControlRef {
        ControlRef::of::<Self>(self.id)
    }

    fn text(&self) -> String {
        self.state.borrow().text.clone()
    }

    fn set_text(&self, text: &str) {
        {
            let mut state = self.state.borrow_mut();
            if state.text == text {
                return;
            }
            text.clone_into(&mut state.text);
        }
        self.post(text);
    }

    fn apply_config(&self, config: &FieldConfig) {
        let mut state = self.state.borrow_mut();
        state.config.clone_from(config);
        state.config_applications += 1;
    }

    fn set_edit_handler(&self, handler: Option<EditHandler>) {
        self.state.borrow_mut().edit_handler = handler;
    }

    fn set_delegate(&self, delegate: Option<Weak<dyn TextFieldDelegate>>) {
        self.state.borrow_mut().delegate = delegate;
    }

    fn notifications(&self) -> EventChannel<TextNotification> {
        self.notifications.clone()
    }
}

impl fmt::Debug for HeadlessControl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = self.state.borrow();
        f.debug_struct("HeadlessControl")
            .field("id", &self.id)
            .field("text", &state.text)
            .field("editing", &state.editing)
            .finish_non_exhaustive()
    }
}
