#![forbid(unsafe_code)]

//! A mounted field over a headless control.

use std::rc::Rc;

use phonefield_number::RegionCode;
use phonefield_runtime::TickScheduler;
use phonefield_runtime::reactive::{BindingCell, Observable};
use phonefield_widgets::{
    FieldConfig, FormattingMode, HeadlessControl, PhoneField, PhoneFieldBuilder, SyncCoordinator,
    TextControl,
};

use crate::log::HandlerLog;
use crate::ops::FieldOp;

/// Upper bound on ticks run by [`FieldFixture::settle`].
const SETTLE_TICKS: usize = 16;

/// Parse a region code, `None` on anything invalid.
#[must_use]
pub fn region(code: &str) -> Option<RegionCode> {
    code.parse().ok()
}

/// A phone field mounted on a [`HeadlessControl`], with observable
/// storage for both bindings and a [`HandlerLog`] recording every handler.
pub struct FieldFixture {
    pub value: Observable<String>,
    pub display: Observable<String>,
    pub scheduler: TickScheduler,
    pub control: HeadlessControl,
    pub log: HandlerLog,
    field: PhoneField<HeadlessControl>,
}

/// Builder for [`FieldFixture`].
#[derive(Debug, Default)]
pub struct FieldFixtureBuilder {
    mode: FormattingMode,
    initial: String,
    config: FieldConfig,
}

impl FieldFixtureBuilder {
    #[must_use]
    pub fn mode(mut self, mode: FormattingMode) -> Self {
        self.mode = mode;
        self
    }

    #[must_use]
    pub fn region(mut self, region: Option<RegionCode>) -> Self {
        self.config.default_region = region;
        self
    }

    /// Initial content of the value binding.
    #[must_use]
    pub fn initial(mut self, text: impl Into<String>) -> Self {
        self.initial = text.into();
        self
    }

    /// Configuration; keeps any region already set when `config` has none.
    #[must_use]
    pub fn config(mut self, config: FieldConfig) -> Self {
        let region = config.default_region.or(self.config.default_region);
        self.config = config.default_region(region);
        self
    }

    #[must_use]
    pub fn build(self) -> FieldFixture {
        let value = Observable::new(self.initial);
        let display = Observable::new(String::new());
        let scheduler = TickScheduler::new();
        let control = HeadlessControl::new();
        let log = HandlerLog::new();
        let field = PhoneFieldBuilder::new(BindingCell::from_observable(&value))
            .mode(self.mode)
            .handlers(log.handlers())
            .scheduler(scheduler.clone())
            .display_binding(BindingCell::from_observable(&display))
            .config(self.config)
            .mount(control.clone());
        FieldFixture {
            value,
            display,
            scheduler,
            control,
            log,
            field,
        }
    }
}

impl FieldFixture {
    #[must_use]
    pub fn builder() -> FieldFixtureBuilder {
        FieldFixtureBuilder::default()
    }

    #[must_use]
    pub fn verbatim(region: Option<RegionCode>) -> Self {
        Self::builder().mode(FormattingMode::Verbatim).region(region).build()
    }

    #[must_use]
    pub fn canonical(region: Option<RegionCode>) -> Self {
        Self::builder().mode(FormattingMode::Canonical).region(region).build()
    }

    #[must_use]
    pub fn field(&self) -> &PhoneField<HeadlessControl> {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut PhoneField<HeadlessControl> {
        &mut self.field
    }

    #[must_use]
    pub fn coordinator(&self) -> &Rc<SyncCoordinator> {
        self.field.coordinator()
    }

    #[must_use]
    pub fn value(&self) -> String {
        self.value.get()
    }

    #[must_use]
    pub fn displayed(&self) -> String {
        self.coordinator().displayed_text()
    }

    /// Focus the control if needed and type `text` one character at a time.
    pub fn type_text(&self, text: &str) {
        if !self.control.is_editing() {
            self.control.begin_editing();
        }
        let mut buf = [0u8; 4];
        for c in text.chars() {
            self.control.insert(c.encode_utf8(&mut buf));
        }
    }

    /// Run one scheduler tick. Returns the number of tasks that ran.
    pub fn tick(&self) -> usize {
        self.scheduler.run_tick()
    }

    /// Run ticks until no deferred work remains.
    pub fn settle(&self) -> usize {
        self.scheduler.run_until_idle(SETTLE_TICKS)
    }

    /// Apply one operation.
    pub fn apply(&mut self, op: &FieldOp) {
        tracing::trace!(?op, "fixture op");
        match op {
            FieldOp::BeginEditing => {
                self.control.begin_editing();
            }
            FieldOp::Insert(text) => {
                self.control.insert(text);
            }
            FieldOp::Backspace => {
                self.control.backspace();
            }
            FieldOp::Replace(text) => {
                self.control.replace(text);
            }
            FieldOp::TapClear => {
                self.control.tap_clear();
            }
            FieldOp::PressReturn => {
                self.control.press_return();
            }
            FieldOp::EndEditing => {
                self.control.end_editing();
            }
            FieldOp::SetText(text) => self.control.set_text(text),
            FieldOp::Tick => {
                self.tick();
            }
            FieldOp::Refresh => self.field.refresh(),
            FieldOp::SetRegion(code) => self.field.set_default_region(region(code)),
        }
    }

    /// Assert the field invariants that must hold once deferred work has
    /// settled.
    ///
    /// # Panics
    ///
    /// When the control, bindings and coordinator disagree.
    pub fn assert_consistent(&self) {
        assert!(self.scheduler.is_idle(), "deferred work still queued");
        let coordinator = self.coordinator();
        let displayed = coordinator.displayed_text();
        assert_eq!(self.control.text(), displayed, "control and displayed text differ");
        assert_eq!(self.display.get(), displayed, "display binding differs");

        let value = self.value.get();
        assert_eq!(value, coordinator.external_value(), "value binding differs");
        match coordinator.mode() {
            FormattingMode::Verbatim => assert_eq!(value, displayed, "verbatim value differs"),
            FormattingMode::Canonical => {
                let expected = coordinator
                    .parsed_number()
                    .map(|n| n.canonical())
                    .unwrap_or_default();
                assert_eq!(value, expected, "canonical value differs");
            }
        }
    }
}

impl std::fmt::Debug for FieldFixture {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldFixture")
            .field("field", &self.field)
            .field("log", &self.log)
            .finish_non_exhaustive()
    }
}
