#![forbid(unsafe_code)]

//! The sync coordinator.
//!
//! [`SyncCoordinator`] keeps three pieces of state consistent:
//!
//! - the displayed text, mirroring the control,
//! - the external value written to the caller's binding,
//! - the parsed number derived from the displayed text.
//!
//! Every path funnels through one reconciliation pass: set the displayed
//! text, parse it against the default region, derive the external value
//! from the [`FormattingMode`], write both bindings, then fire
//! `text_changed` followed by `number_changed`.
//!
//! # Event Paths
//!
//! | Event | Behavior |
//! |-------|----------|
//! | Edit changed | Reconcile now; drop any pending deferred text |
//! | Notification, same text | Ignore; drop any pending deferred text |
//! | Notification, new text | Remember it; reconcile on the next tick |
//! | Begin / end editing | Handler; state `Editing` / `Idle` |
//! | Should clear | Empty text; clear handler; `Idle`; reconcile `""` |
//! | Should return | Return handler |
//!
//! # Invariants
//!
//! 1. After any reconciliation the displayed text equals the reconciled raw
//!    text, and the external value follows the mode rule for it.
//! 2. Notifications never reconcile synchronously.
//! 3. At most one deferred reconciliation is queued per coordinator; it
//!    uses the most recent pending text.
//! 4. A reconciliation requested while one is running (from a handler or a
//!    binding observer) is deferred to the next tick. A deferred direct edit
//!    reconciles even when its text is already displayed.
//! 5. Deferred tasks hold the coordinator weakly; a dropped coordinator is
//!    never called back.
//!
//! # Failure Modes
//!
//! | Failure | Cause | Behavior |
//! |---------|-------|----------|
//! | Parse error | Incomplete or invalid text | `number` is `None`; canonical value is empty |
//! | Foreign control type | Notification from a control of another type | `error!` log; panics with debug assertions |
//! | Foreign control id | Notification from another control of the same type | `debug!` log; ignored |

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use phonefield_number::{MetadataParser, ParsedNumber, PhoneNumberParser, RegionCode};
use phonefield_runtime::TickScheduler;
use phonefield_runtime::reactive::BindingCell;

use crate::control::{ControlRef, TextFieldDelegate, TextNotification};
use crate::handlers::{FieldSnapshot, HandlerKind, HandlerSet};
use crate::state::{EditState, FormattingMode};

/// Resets the reconciling flag when a pass ends, including on unwind.
struct ReconcileGuard<'a>(&'a Cell<bool>);

impl<'a> ReconcileGuard<'a> {
    fn enter(flag: &'a Cell<bool>) -> Self {
        flag.set(true);
        Self(flag)
    }
}

impl Drop for ReconcileGuard<'_> {
    fn drop(&mut self) {
        self.0.set(false);
    }
}

/// Where deferred text came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EditOrigin {
    /// A control notification; skipped if the text is already displayed.
    Notification,
    /// A direct edit or clear requested during a pass; always reconciled.
    Direct,
}

#[derive(Debug, Clone)]
struct PendingText {
    text: String,
    origin: EditOrigin,
}

/// Reconciles displayed text, external value and parsed number.
///
/// Built with [`SyncCoordinator::builder`]; always lives in an `Rc` so that
/// deferred work can hold it weakly.
pub struct SyncCoordinator {
    weak_self: Weak<Self>,
    mode: FormattingMode,
    parser: Box<dyn PhoneNumberParser>,
    handlers: HandlerSet,
    scheduler: TickScheduler,
    value: BindingCell<String>,
    display: BindingCell<String>,
    default_region: Cell<Option<RegionCode>>,
    control: Cell<Option<ControlRef>>,

    displayed: RefCell<String>,
    external: RefCell<String>,
    number: RefCell<Option<ParsedNumber>>,
    state: Cell<EditState>,

    pending: RefCell<Option<PendingText>>,
    deferred_queued: Cell<bool>,
    reconciling: Cell<bool>,
    reconciliations: Cell<u64>,
}

impl SyncCoordinator {
    /// Start building a coordinator writing its external value to `value`.
    ///
    /// The displayed text is initialized from `value`.
    #[must_use]
    pub fn builder(value: BindingCell<String>) -> CoordinatorBuilder {
        CoordinatorBuilder::new(value)
    }

    // ---------------------------------------------------------------------
    // Event entry points
    // ---------------------------------------------------------------------

    /// The control's text changed from a user edit.
    pub fn on_edit_changed(&self, raw: &str) {
        if self.pending.borrow_mut().take().is_some() {
            tracing::trace!("direct edit supersedes pending notification");
        }
        self.reconcile(raw);
    }

    /// A text-changed notification arrived from a control.
    pub fn on_external_notification(&self, notification: &TextNotification) {
        if !self.accepts(&notification.sender) {
            return;
        }
        self.on_external_text(&notification.text);
    }

    /// The control's text was changed out of band to `raw`.
    ///
    /// Text equal to the displayed text is ignored. Anything else is
    /// reconciled on the next scheduler tick.
    pub fn on_external_text(&self, raw: &str) {
        if *self.displayed.borrow() == raw {
            let mut pending = self.pending.borrow_mut();
            if pending.as_ref().is_some_and(|p| p.origin == EditOrigin::Notification) {
                pending.take();
                tracing::trace!("pending notification discarded; control shows displayed text");
            }
            tracing::trace!(text = raw, "notification matches displayed text");
            return;
        }
        self.defer(raw, EditOrigin::Notification);
    }

    // ---------------------------------------------------------------------
    // Reconciliation
    // ---------------------------------------------------------------------

    fn reconcile(&self, raw: &str) {
        if self.reconciling.get() {
            tracing::debug!(text = raw, "re-entrant reconciliation deferred to next tick");
            self.defer(raw, EditOrigin::Direct);
            return;
        }
        let _guard = ReconcileGuard::enter(&self.reconciling);
        let _span = tracing::debug_span!("reconcile", mode = ?self.mode, len = raw.len()).entered();

        let number = match self.parser.parse(raw, self.default_region.get()) {
            Ok(number) => Some(number),
            Err(err) => {
                tracing::trace!(%err, "text does not parse");
                None
            }
        };
        let value = self.mode.external_value(raw, number.as_ref());
        tracing::debug!(value = %value, parsed = number.is_some(), "reconciled");

        raw.clone_into(&mut self.displayed.borrow_mut());
        *self.number.borrow_mut() = number;
        value.clone_into(&mut self.external.borrow_mut());
        self.reconciliations.set(self.reconciliations.get() + 1);

        self.value.set(value);
        self.display.set(raw.to_owned());

        let snapshot = self.snapshot();
        self.handlers.invoke(HandlerKind::TextChanged, &snapshot);
        self.handlers.invoke(HandlerKind::NumberChanged, &snapshot);
    }

    fn defer(&self, raw: &str, origin: EditOrigin) {
        *self.pending.borrow_mut() = Some(PendingText {
            text: raw.to_owned(),
            origin,
        });
        self.schedule_deferred();
    }

    fn schedule_deferred(&self) {
        if self.deferred_queued.replace(true) {
            tracing::trace!("deferred reconciliation already queued");
            return;
        }
        let weak = self.weak_self.clone();
        self.scheduler.defer(move || match weak.upgrade() {
            Some(this) => this.run_deferred(),
            None => tracing::trace!("coordinator dropped before deferred reconciliation"),
        });
    }

    fn run_deferred(&self) {
        self.deferred_queued.set(false);
        let pending = self.pending.borrow_mut().take();
        let Some(PendingText { text, origin }) = pending else {
            return;
        };
        if origin == EditOrigin::Notification && *self.displayed.borrow() == text {
            tracing::trace!("deferred text already displayed");
            return;
        }
        self.reconcile(&text);
    }

    /// Check a notification sender against the bound control.
    fn accepts(&self, sender: &ControlRef) -> bool {
        let Some(expected) = self.control.get() else {
            return true;
        };
        if !sender.same_type(&expected) {
            tracing::error!(
                expected = expected.type_name(),
                actual = sender.type_name(),
                "notification from unexpected control type"
            );
            debug_assert!(
                sender.same_type(&expected),
                "notification from unexpected control type: expected {}, got {}",
                expected.type_name(),
                sender.type_name()
            );
            return false;
        }
        if sender.id() != expected.id() {
            tracing::debug!(?sender, ?expected, "notification from another control ignored");
            return false;
        }
        true
    }

    // ---------------------------------------------------------------------
    // Configuration
    // ---------------------------------------------------------------------

    /// Only notifications from `control` are accepted from now on.
    pub fn bind_control(&self, control: ControlRef) {
        self.control.set(Some(control));
    }

    #[must_use]
    pub fn bound_control(&self) -> Option<ControlRef> {
        self.control.get()
    }

    /// Region used by subsequent parses.
    pub fn set_default_region(&self, region: Option<RegionCode>) {
        if self.default_region.replace(region) != region {
            tracing::debug!(?region, "default region changed");
        }
    }

    #[must_use]
    pub fn default_region(&self) -> Option<RegionCode> {
        self.default_region.get()
    }

    // ---------------------------------------------------------------------
    // State
    // ---------------------------------------------------------------------

    #[must_use]
    pub fn mode(&self) -> FormattingMode {
        self.mode
    }

    #[must_use]
    pub fn state(&self) -> EditState {
        self.state.get()
    }

    #[must_use]
    pub fn displayed_text(&self) -> String {
        self.displayed.borrow().clone()
    }

    /// The value most recently written to the caller binding.
    #[must_use]
    pub fn external_value(&self) -> String {
        self.external.borrow().clone()
    }

    #[must_use]
    pub fn parsed_number(&self) -> Option<ParsedNumber> {
        self.number.borrow().clone()
    }

    /// Text waiting for the next tick, if any.
    #[must_use]
    pub fn pending_text(&self) -> Option<String> {
        self.pending.borrow().as_ref().map(|p| p.text.clone())
    }

    #[must_use]
    pub fn has_pending(&self) -> bool {
        self.pending.borrow().is_some()
    }

    /// Number of completed reconciliation passes.
    #[must_use]
    pub fn reconcile_count(&self) -> u64 {
        self.reconciliations.get()
    }

    #[must_use]
    pub fn snapshot(&self) -> FieldSnapshot {
        FieldSnapshot {
            text: self.displayed.borrow().clone(),
            value: self.external.borrow().clone(),
            number: self.number.borrow().clone(),
            state: self.state.get(),
        }
    }
}

impl TextFieldDelegate for SyncCoordinator {
    fn did_begin_editing(&self) {
        self.state.set(EditState::Editing);
        tracing::debug!("editing began");
        self.handlers.invoke(HandlerKind::BeginEditing, &self.snapshot());
    }

    fn did_end_editing(&self) {
        self.state.set(EditState::Idle);
        tracing::debug!("editing ended");
        self.handlers.invoke(HandlerKind::EndEditing, &self.snapshot());
    }

    fn should_clear(&self) -> bool {
        self.pending.borrow_mut().take();
        self.displayed.borrow_mut().clear();
        self.state.set(EditState::Idle);
        tracing::debug!("field cleared");
        self.handlers.invoke(HandlerKind::Clear, &self.snapshot());
        // Empty text never parses, so the value is empty in both modes.
        self.reconcile("");
        true
    }

    fn should_return(&self) -> bool {
        self.handlers.invoke(HandlerKind::Return, &self.snapshot());
        true
    }
}

impl fmt::Debug for SyncCoordinator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SyncCoordinator")
            .field("mode", &self.mode)
            .field("state", &self.state.get())
            .field("displayed", &*self.displayed.borrow())
            .field("external", &*self.external.borrow())
            .field("pending", &self.pending_text())
            .field("default_region", &self.default_region.get())
            .finish_non_exhaustive()
    }
}

/// Builder for [`SyncCoordinator`].
pub struct CoordinatorBuilder {
    value: BindingCell<String>,
    mode: FormattingMode,
    parser: Option<Box<dyn PhoneNumberParser>>,
    handlers: HandlerSet,
    scheduler: Option<TickScheduler>,
    display: Option<BindingCell<String>>,
    default_region: Option<RegionCode>,
}

impl CoordinatorBuilder {
    fn new(value: BindingCell<String>) -> Self {
        Self {
            value,
            mode: FormattingMode::default(),
            parser: None,
            handlers: HandlerSet::none(),
            scheduler: None,
            display: None,
            default_region: None,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: FormattingMode) -> Self {
        self.mode = mode;
        self
    }

    /// Parser used on every reconciliation. Defaults to [`MetadataParser`].
    #[must_use]
    pub fn parser(mut self, parser: impl PhoneNumberParser + 'static) -> Self {
        self.parser = Some(Box::new(parser));
        self
    }

    #[must_use]
    pub fn handlers(mut self, handlers: HandlerSet) -> Self {
        self.handlers = handlers;
        self
    }

    /// Scheduler for deferred reconciliation. Defaults to a private one,
    /// which only makes sense in tests that never run deferred work.
    #[must_use]
    pub fn scheduler(mut self, scheduler: TickScheduler) -> Self {
        self.scheduler = Some(scheduler);
        self
    }

    /// Binding mirroring the displayed text. Defaults to detached storage.
    #[must_use]
    pub fn display_binding(mut self, display: BindingCell<String>) -> Self {
        self.display = Some(display);
        self
    }

    #[must_use]
    pub fn default_region(mut self, region: Option<RegionCode>) -> Self {
        self.default_region = region;
        self
    }

    #[must_use]
    pub fn build(self) -> Rc<SyncCoordinator> {
        let parser = self
            .parser
            .unwrap_or_else(|| Box::new(MetadataParser::new()));
        let initial = self.value.get();
        let number = parser.parse(&initial, self.default_region).ok();
        let display = self
            .display
            .unwrap_or_else(|| BindingCell::detached(String::new()));
        display.set(initial.clone());

        tracing::debug!(mode = ?self.mode, initial = %initial, "coordinator created");
        Rc::new_cyclic(|weak_self| SyncCoordinator {
            weak_self: weak_self.clone(),
            mode: self.mode,
            parser,
            handlers: self.handlers,
            scheduler: self.scheduler.unwrap_or_default(),
            value: self.value,
            display,
            default_region: Cell::new(self.default_region),
            control: Cell::new(None),
            displayed: RefCell::new(initial.clone()),
            external: RefCell::new(initial),
            number: RefCell::new(number),
            state: Cell::new(EditState::Idle),
            pending: RefCell::new(None),
            deferred_queued: Cell::new(false),
            reconciling: Cell::new(false),
            reconciliations: Cell::new(0),
        })
    }
}

impl fmt::Debug for CoordinatorBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CoordinatorBuilder")
            .field("mode", &self.mode)
            .field("handlers", &self.handlers)
            .field("default_region", &self.default_region)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::control::ControlId;
    use crate::handlers::HandlerSetBuilder;
    use phonefield_number::ParseError;
    use phonefield_runtime::reactive::Observable;
    use proptest::prelude::*;
    use tracing_test::traced_test;

    struct Harness {
        value: Observable<String>,
        display: Observable<String>,
        scheduler: TickScheduler,
        log: Rc<RefCell<Vec<(HandlerKind, FieldSnapshot)>>>,
        coordinator: Rc<SyncCoordinator>,
    }

    fn harness(mode: FormattingMode, region: Option<&str>) -> Harness {
        harness_with(mode, region, "", |b| b)
    }

    fn harness_with(
        mode: FormattingMode,
        region: Option<&str>,
        initial: &str,
        extra: impl FnOnce(HandlerSetBuilder) -> HandlerSetBuilder,
    ) -> Harness {
        let value = Observable::new(initial.to_string());
        let display = Observable::new(String::new());
        let scheduler = TickScheduler::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut builder = HandlerSet::builder();
        for kind in HandlerKind::ALL {
            let sink = Rc::clone(&log);
            builder = builder.on(kind, move |snap| sink.borrow_mut().push((kind, snap.clone())));
        }
        let builder = extra(builder);
        let coordinator = SyncCoordinator::builder(BindingCell::from_observable(&value))
            .mode(mode)
            .handlers(builder.build())
            .scheduler(scheduler.clone())
            .display_binding(BindingCell::from_observable(&display))
            .default_region(region.map(|r| r.parse().unwrap()))
            .build();
        Harness {
            value,
            display,
            scheduler,
            log,
            coordinator,
        }
    }

    impl Harness {
        fn kinds(&self) -> Vec<HandlerKind> {
            self.log.borrow().iter().map(|(k, _)| *k).collect()
        }
    }

    #[test]
    fn initial_text_comes_from_value_binding() {
        let h = harness_with(FormattingMode::Verbatim, Some("US"), "415 555 1234", |b| b);
        assert_eq!(h.coordinator.displayed_text(), "415 555 1234");
        assert_eq!(h.display.get(), "415 555 1234");
        assert_eq!(h.coordinator.parsed_number(), Some(ParsedNumber::new(1, "4155551234")));
        assert_eq!(h.coordinator.state(), EditState::Idle);
        assert!(h.log.borrow().is_empty());
    }

    #[test]
    fn verbatim_mirrors_text() {
        let h = harness(FormattingMode::Verbatim, Some("US"));
        h.coordinator.on_edit_changed("(415) 555");
        assert_eq!(h.value.get(), "(415) 555");
        assert_eq!(h.display.get(), "(415) 555");
        assert_eq!(h.coordinator.external_value(), "(415) 555");
        assert_eq!(h.coordinator.parsed_number(), None);
    }

    #[test]
    fn canonical_success() {
        let h = harness(FormattingMode::Canonical, Some("US"));
        h.coordinator.on_edit_changed("(415) 555-1234");
        assert_eq!(h.value.get(), "+14155551234");
        assert_eq!(h.display.get(), "(415) 555-1234");
        let number = h.coordinator.parsed_number().unwrap();
        assert_eq!(number.country_code, 1);
        assert_eq!(number.national_number, "4155551234");
    }

    #[test]
    fn canonical_failure_is_empty() {
        let h = harness(FormattingMode::Canonical, Some("US"));
        h.coordinator.on_edit_changed("abc");
        assert_eq!(h.value.get(), "");
        assert_eq!(h.coordinator.displayed_text(), "abc");
        assert_eq!(h.coordinator.parsed_number(), None);
    }

    #[test]
    fn handlers_fire_text_then_number() {
        let h = harness(FormattingMode::Canonical, Some("US"));
        h.coordinator.on_edit_changed("4155551234");
        assert_eq!(h.kinds(), vec![HandlerKind::TextChanged, HandlerKind::NumberChanged]);
        let log = h.log.borrow();
        let (_, snap) = &log[1];
        assert_eq!(snap.text, "4155551234");
        assert_eq!(snap.value, "+14155551234");
        assert_eq!(snap.number, Some(ParsedNumber::new(1, "4155551234")));
    }

    #[test]
    fn edit_twice_is_idempotent() {
        let h = harness(FormattingMode::Canonical, Some("US"));
        h.coordinator.on_edit_changed("415 555 1234");
        let first = h.coordinator.snapshot();
        h.coordinator.on_edit_changed("415 555 1234");
        assert_eq!(h.coordinator.snapshot(), first);
        assert_eq!(
            h.kinds(),
            vec![
                HandlerKind::TextChanged,
                HandlerKind::NumberChanged,
                HandlerKind::TextChanged,
                HandlerKind::NumberChanged,
            ]
        );
    }

    #[test]
    fn notification_with_displayed_text_is_ignored() {
        let h = harness(FormattingMode::Verbatim, Some("US"));
        h.coordinator.on_edit_changed("555");
        h.log.borrow_mut().clear();
        let version = h.value.version();

        h.coordinator.on_external_text("555");
        assert_eq!(h.scheduler.pending(), 0);
        h.scheduler.run_tick();
        assert!(h.log.borrow().is_empty());
        assert_eq!(h.value.version(), version);
        assert_eq!(h.value.get(), "555");
    }

    #[traced_test]
    #[test]
    fn dedupe_is_traced() {
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.on_edit_changed("555");
        h.coordinator.on_external_text("555");
        assert!(logs_contain("notification matches displayed text"));
    }

    #[test]
    fn new_notification_text_waits_for_tick() {
        let h = harness(FormattingMode::Canonical, Some("US"));
        h.coordinator.on_edit_changed("555");
        h.log.borrow_mut().clear();

        h.coordinator.on_external_text("+1555");
        assert_eq!(h.coordinator.displayed_text(), "555");
        assert!(h.log.borrow().is_empty());
        assert_eq!(h.coordinator.pending_text().as_deref(), Some("+1555"));

        assert_eq!(h.scheduler.run_tick(), 1);
        assert_eq!(h.coordinator.displayed_text(), "+1555");
        // Too short for NANP, so canonical is empty.
        assert_eq!(h.value.get(), "");
        assert_eq!(h.kinds(), vec![HandlerKind::TextChanged, HandlerKind::NumberChanged]);
        assert!(!h.coordinator.has_pending());
    }

    #[test]
    fn notification_applies_verbatim() {
        let h = harness(FormattingMode::Verbatim, Some("US"));
        h.coordinator.on_edit_changed("555");
        h.coordinator.on_external_text("+1555");
        h.scheduler.run_tick();
        assert_eq!(h.value.get(), "+1555");
    }

    #[test]
    fn notifications_coalesce_to_latest() {
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.on_external_text("1");
        h.coordinator.on_external_text("12");
        h.coordinator.on_external_text("123");
        assert_eq!(h.scheduler.pending(), 1);

        h.scheduler.run_tick();
        assert_eq!(h.coordinator.displayed_text(), "123");
        assert_eq!(h.coordinator.reconcile_count(), 1);
    }

    #[test]
    fn edit_supersedes_pending_notification() {
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.on_external_text("+44");
        h.coordinator.on_edit_changed("0207");
        assert!(!h.coordinator.has_pending());

        h.scheduler.run_tick();
        assert_eq!(h.coordinator.displayed_text(), "0207");
        assert_eq!(h.coordinator.reconcile_count(), 1);
    }

    #[test]
    fn matching_notification_discards_pending() {
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.on_edit_changed("1");
        h.coordinator.on_external_text("2");
        h.coordinator.on_external_text("1");
        assert!(!h.coordinator.has_pending());
        h.scheduler.run_tick();
        assert_eq!(h.coordinator.displayed_text(), "1");
        assert_eq!(h.coordinator.reconcile_count(), 1);
    }

    #[test]
    fn deferred_task_skips_dropped_coordinator() {
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.on_external_text("999");
        let Harness {
            coordinator,
            scheduler,
            log,
            ..
        } = h;
        drop(coordinator);
        assert_eq!(scheduler.run_tick(), 1);
        assert!(log.borrow().is_empty());
    }

    #[test]
    fn clear_resets_both_modes() {
        for mode in [FormattingMode::Verbatim, FormattingMode::Canonical] {
            let h = harness(mode, Some("US"));
            h.coordinator.did_begin_editing();
            h.coordinator.on_edit_changed("4155551234");
            h.log.borrow_mut().clear();

            assert!(h.coordinator.should_clear());
            assert_eq!(h.coordinator.displayed_text(), "");
            assert_eq!(h.value.get(), "");
            assert_eq!(h.display.get(), "");
            assert_eq!(h.coordinator.parsed_number(), None);
            assert_eq!(h.coordinator.state(), EditState::Idle);
            assert_eq!(
                h.kinds(),
                vec![
                    HandlerKind::Clear,
                    HandlerKind::TextChanged,
                    HandlerKind::NumberChanged,
                ]
            );
            let log = h.log.borrow();
            assert_eq!(log[0].1.text, "");
            assert_eq!(log[2].1.value, "");
            assert_eq!(log[2].1.number, None);
        }
    }

    #[test]
    fn number_handler_sees_cleared_number() {
        let h = harness(FormattingMode::Canonical, Some("US"));
        h.coordinator.on_edit_changed("4155551234");
        assert!(h.coordinator.should_clear());
        // The control echoes the empty text; it matches and is dropped.
        h.coordinator.on_external_text("");
        h.scheduler.run_until_idle(5);

        let log = h.log.borrow();
        let numbers: Vec<_> = log
            .iter()
            .filter(|(k, _)| *k == HandlerKind::NumberChanged)
            .map(|(_, s)| s.number.clone())
            .collect();
        assert_eq!(numbers, vec![Some(ParsedNumber::new(1, "4155551234")), None]);
        assert_eq!(h.coordinator.reconcile_count(), 2);
    }

    #[test]
    fn clear_drops_pending_notification() {
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.on_external_text("123");
        assert!(h.coordinator.should_clear());
        assert!(!h.coordinator.has_pending());
        h.scheduler.run_tick();
        assert_eq!(h.coordinator.displayed_text(), "");
        assert_eq!(h.coordinator.reconcile_count(), 1);
    }

    #[test]
    fn editing_state_machine() {
        let h = harness(FormattingMode::Verbatim, None);
        assert_eq!(h.coordinator.state(), EditState::Idle);
        h.coordinator.did_begin_editing();
        assert_eq!(h.coordinator.state(), EditState::Editing);
        h.coordinator.on_edit_changed("1");
        assert_eq!(h.coordinator.state(), EditState::Editing);
        h.coordinator.did_end_editing();
        assert_eq!(h.coordinator.state(), EditState::Idle);
        assert_eq!(
            h.kinds(),
            vec![
                HandlerKind::BeginEditing,
                HandlerKind::TextChanged,
                HandlerKind::NumberChanged,
                HandlerKind::EndEditing,
            ]
        );
        assert_eq!(h.log.borrow()[0].1.state, EditState::Editing);
        assert_eq!(h.log.borrow()[3].1.state, EditState::Idle);
    }

    #[test]
    fn should_return_fires_handler() {
        let h = harness(FormattingMode::Verbatim, None);
        assert!(h.coordinator.should_return());
        assert_eq!(h.kinds(), vec![HandlerKind::Return]);
    }

    #[test]
    fn reentrant_edit_from_handler_is_deferred() {
        let slot: Rc<RefCell<Weak<SyncCoordinator>>> = Rc::new(RefCell::new(Weak::new()));
        let inner = Rc::clone(&slot);
        let h = harness_with(FormattingMode::Verbatim, None, "", move |b| {
            b.on_text_changed(move |snap| {
                if snap.text == "1" {
                    if let Some(c) = inner.borrow().upgrade() {
                        c.on_edit_changed("12");
                    }
                }
            })
        });
        *slot.borrow_mut() = Rc::downgrade(&h.coordinator);

        h.coordinator.on_edit_changed("1");
        assert_eq!(h.coordinator.displayed_text(), "1");
        assert_eq!(h.coordinator.pending_text().as_deref(), Some("12"));

        h.scheduler.run_tick();
        assert_eq!(h.coordinator.displayed_text(), "12");
        assert_eq!(h.value.get(), "12");
    }

    #[test]
    fn reentrant_same_text_edit_still_reconciles() {
        let slot: Rc<RefCell<Weak<SyncCoordinator>>> = Rc::new(RefCell::new(Weak::new()));
        let inner = Rc::clone(&slot);
        let fired = Rc::new(Cell::new(0));
        let count = Rc::clone(&fired);
        let h = harness_with(FormattingMode::Verbatim, None, "", move |b| {
            b.on_text_changed(move |_| {
                count.set(count.get() + 1);
                if count.get() == 1 {
                    if let Some(c) = inner.borrow().upgrade() {
                        c.on_edit_changed("5");
                    }
                }
            })
        });
        *slot.borrow_mut() = Rc::downgrade(&h.coordinator);

        h.coordinator.on_edit_changed("5");
        assert_eq!(h.coordinator.pending_text().as_deref(), Some("5"));
        // A matching notification does not cancel a deferred edit.
        h.coordinator.on_external_text("5");
        assert!(h.coordinator.has_pending());

        h.scheduler.run_until_idle(5);
        assert_eq!(fired.get(), 2);
        assert_eq!(h.coordinator.reconcile_count(), 2);
        assert_eq!(h.coordinator.displayed_text(), "5");
    }

    #[test]
    fn clear_from_handler_reconciles_next_tick() {
        let slot: Rc<RefCell<Weak<SyncCoordinator>>> = Rc::new(RefCell::new(Weak::new()));
        let inner = Rc::clone(&slot);
        let h = harness_with(FormattingMode::Canonical, Some("US"), "", move |b| {
            b.on_number_changed(move |snap| {
                if snap.number.is_some() {
                    if let Some(c) = inner.borrow().upgrade() {
                        c.should_clear();
                    }
                }
            })
        });
        *slot.borrow_mut() = Rc::downgrade(&h.coordinator);

        h.coordinator.on_edit_changed("4155551234");
        assert_eq!(h.coordinator.displayed_text(), "");
        assert_eq!(h.value.get(), "+14155551234");

        h.scheduler.run_until_idle(5);
        assert_eq!(h.value.get(), "");
        assert_eq!(h.coordinator.parsed_number(), None);
    }

    #[test]
    fn custom_parser_and_region_change() {
        let value = Observable::new(String::new());
        let coordinator = SyncCoordinator::builder(BindingCell::from_observable(&value))
            .mode(FormattingMode::Canonical)
            .parser(
                |text: &str, region: Option<RegionCode>| -> Result<ParsedNumber, ParseError> {
                    match region {
                        Some(r) if r.as_str() == "GB" => Ok(ParsedNumber::new(44, text)),
                        _ => Err(ParseError::InvalidCountryCode),
                    }
                },
            )
            .build();
        coordinator.on_edit_changed("7700");
        assert_eq!(value.get(), "");

        coordinator.set_default_region(Some("GB".parse().unwrap()));
        coordinator.on_edit_changed("7700");
        assert_eq!(value.get(), "+447700");
    }

    #[test]
    fn notification_from_bound_control_is_accepted() {
        struct Native;
        let h = harness(FormattingMode::Verbatim, None);
        let me = ControlRef::of::<Native>(ControlId::next());
        h.coordinator.bind_control(me);
        h.coordinator.on_external_notification(&TextNotification {
            sender: me,
            text: "7".into(),
        });
        assert_eq!(h.coordinator.pending_text().as_deref(), Some("7"));
    }

    #[test]
    fn notification_from_other_instance_is_ignored() {
        struct Native;
        let h = harness(FormattingMode::Verbatim, None);
        h.coordinator.bind_control(ControlRef::of::<Native>(ControlId::next()));
        h.coordinator.on_external_notification(&TextNotification {
            sender: ControlRef::of::<Native>(ControlId::next()),
            text: "7".into(),
        });
        assert!(!h.coordinator.has_pending());
    }

    #[test]
    #[cfg_attr(debug_assertions, should_panic(expected = "unexpected control type"))]
    fn foreign_control_type_is_fatal_in_debug() {
        struct Native;
        struct Impostor;
        let h = harness(FormattingMode::Verbatim, None);
        let id = ControlId::next();
        h.coordinator.bind_control(ControlRef::of::<Native>(id));
        h.coordinator.on_external_notification(&TextNotification {
            sender: ControlRef::of::<Impostor>(id),
            text: "7".into(),
        });
        assert!(!h.coordinator.has_pending());
    }

    proptest! {
        #[test]
        fn verbatim_value_always_equals_text(s in "\\PC{0,24}") {
            let h = harness(FormattingMode::Verbatim, Some("US"));
            h.coordinator.on_edit_changed(&s);
            prop_assert_eq!(h.value.get(), s.clone());
            prop_assert_eq!(h.coordinator.displayed_text(), s);
        }

        #[test]
        fn canonical_value_is_empty_or_digits(s in "[0-9+() -]{0,20}") {
            let h = harness(FormattingMode::Canonical, Some("GB"));
            h.coordinator.on_edit_changed(&s);
            let value = h.value.get();
            match h.coordinator.parsed_number() {
                Some(number) => prop_assert_eq!(value, number.canonical()),
                None => prop_assert!(value.is_empty()),
            }
        }
    }
}
