#![forbid(unsafe_code)]

//! The field controller.
//!
//! [`PhoneField`] mounts a [`SyncCoordinator`] on a [`TextControl`]: it
//! installs the edit handler and delegate, subscribes to the control's
//! notifications and pushes configuration onto the control on every
//! [`refresh`](PhoneField::refresh). It never reconciles state itself.
//!
//! # Example
//!
//! ```
//! use phonefield_runtime::TickScheduler;
//! use phonefield_runtime::reactive::{BindingCell, Observable};
//! use phonefield_widgets::{FieldConfig, FormattingMode, HeadlessControl, PhoneFieldBuilder};
//!
//! let value = Observable::new(String::new());
//! let scheduler = TickScheduler::new();
//! let control = HeadlessControl::new();
//!
//! let field = PhoneFieldBuilder::new(BindingCell::from_observable(&value))
//!     .mode(FormattingMode::Canonical)
//!     .scheduler(scheduler.clone())
//!     .config(FieldConfig::default().default_region(Some("US".parse().unwrap())))
//!     .mount(control.clone());
//!
//! control.begin_editing();
//! control.insert("(415) 555-1234");
//! assert_eq!(value.get(), "+14155551234");
//! assert_eq!(field.parsed_number().get().map(|n| n.country_code), Some(1));
//! ```
//!
//! # Lifecycle
//!
//! Unmounting, explicitly or by drop, cancels the notification subscription
//! and detaches the edit handler and delegate. The control itself is left
//! with whatever text it had.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use phonefield_number::{ParsedNumber, PhoneNumberParser, RegionCode};
use phonefield_runtime::reactive::{Binding, BindingCell, BindingScope};
use phonefield_runtime::{RegionContext, TickScheduler};

use crate::config::FieldConfig;
use crate::control::{EditHandler, TextControl, TextFieldDelegate, TextNotification};
use crate::coordinator::{CoordinatorBuilder, SyncCoordinator};
use crate::handlers::HandlerSet;
use crate::state::FormattingMode;

/// A phone-number field mounted on a control.
pub struct PhoneField<C: TextControl> {
    control: C,
    coordinator: Rc<SyncCoordinator>,
    config: FieldConfig,
    region_context: Option<RegionContext>,
    /// Configured region, the fallback while a followed context has none.
    configured_region: Rc<Cell<Option<RegionCode>>>,
    scope: BindingScope,
    mounted: bool,
}

/// Builder for [`PhoneField`].
pub struct PhoneFieldBuilder {
    coordinator: CoordinatorBuilder,
    config: FieldConfig,
    region_context: Option<RegionContext>,
}

impl PhoneFieldBuilder {
    /// Start building a field whose external value is written to `value`.
    #[must_use]
    pub fn new(value: BindingCell<String>) -> Self {
        Self {
            coordinator: SyncCoordinator::builder(value),
            config: FieldConfig::default(),
            region_context: None,
        }
    }

    #[must_use]
    pub fn mode(mut self, mode: FormattingMode) -> Self {
        self.coordinator = self.coordinator.mode(mode);
        self
    }

    #[must_use]
    pub fn parser(mut self, parser: impl PhoneNumberParser + 'static) -> Self {
        self.coordinator = self.coordinator.parser(parser);
        self
    }

    #[must_use]
    pub fn handlers(mut self, handlers: HandlerSet) -> Self {
        self.coordinator = self.coordinator.handlers(handlers);
        self
    }

    /// Host scheduler draining deferred reconciliation.
    #[must_use]
    pub fn scheduler(mut self, scheduler: TickScheduler) -> Self {
        self.coordinator = self.coordinator.scheduler(scheduler);
        self
    }

    /// Binding mirroring the displayed text.
    #[must_use]
    pub fn display_binding(mut self, display: BindingCell<String>) -> Self {
        self.coordinator = self.coordinator.display_binding(display);
        self
    }

    #[must_use]
    pub fn config(mut self, config: FieldConfig) -> Self {
        self.config = config;
        self
    }

    /// Take the default region from `context`, following its changes.
    ///
    /// While the context has no region, the configured one applies.
    #[must_use]
    pub fn follow_region(mut self, context: &RegionContext) -> Self {
        self.region_context = Some(context.clone());
        self
    }

    /// Attach to `control` and push the initial configuration and text.
    pub fn mount<C: TextControl>(self, control: C) -> PhoneField<C> {
        let region = effective_region(self.region_context.as_ref(), self.config.default_region);
        let coordinator = self.coordinator.default_region(region).build();
        coordinator.bind_control(control.control_ref());

        let weak = Rc::downgrade(&coordinator);
        let edit: EditHandler = Rc::new(move |text: &str| {
            if let Some(coordinator) = weak.upgrade() {
                coordinator.on_edit_changed(text);
            }
        });
        control.set_edit_handler(Some(edit));

        let delegate: Weak<SyncCoordinator> = Rc::downgrade(&coordinator);
        control.set_delegate(Some(delegate as Weak<dyn TextFieldDelegate>));

        let mut scope = BindingScope::new();
        let weak = Rc::downgrade(&coordinator);
        scope.hold(control.notifications().subscribe(move |note: &TextNotification| {
            if let Some(coordinator) = weak.upgrade() {
                coordinator.on_external_notification(note);
            }
        }));

        let configured_region = Rc::new(Cell::new(self.config.default_region));
        if let Some(context) = &self.region_context {
            let weak = Rc::downgrade(&coordinator);
            let fallback = Rc::clone(&configured_region);
            scope.hold(context.subscribe(move |region| {
                if let Some(coordinator) = weak.upgrade() {
                    coordinator.set_default_region(region.or(fallback.get()));
                }
            }));
        }

        tracing::debug!(control = ?control.control_ref(), "phone field mounted");
        let field = PhoneField {
            control,
            coordinator,
            config: self.config,
            region_context: self.region_context,
            configured_region,
            scope,
            mounted: true,
        };
        field.refresh();
        field
    }
}

impl fmt::Debug for PhoneFieldBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneFieldBuilder")
            .field("coordinator", &self.coordinator)
            .field("config", &self.config)
            .field("follows_region", &self.region_context.is_some())
            .finish()
    }
}

fn effective_region(
    context: Option<&RegionContext>,
    configured: Option<RegionCode>,
) -> Option<RegionCode> {
    context.and_then(RegionContext::region).or(configured)
}

impl<C: TextControl> PhoneField<C> {
    /// Push configuration and the displayed text onto the control.
    pub fn refresh(&self) {
        if !self.mounted {
            return;
        }
        let mut config = self.config.clone();
        config.default_region = self.coordinator.default_region();
        self.control.apply_config(&config);

        let displayed = self.coordinator.displayed_text();
        if self.control.text() != displayed {
            self.control.set_text(&displayed);
        }
    }

    /// Replace the configuration and refresh.
    ///
    /// Unless the field follows a region context, the configured default
    /// region is re-applied to the parser.
    pub fn update_config(&mut self, config: FieldConfig) {
        self.configured_region.set(config.default_region);
        let region = effective_region(self.region_context.as_ref(), config.default_region);
        self.coordinator.set_default_region(region);
        self.config = config;
        self.refresh();
    }

    /// Override the default region used by the parser and refresh.
    pub fn set_default_region(&mut self, region: Option<RegionCode>) {
        self.config.default_region = region;
        self.configured_region.set(region);
        let region = effective_region(self.region_context.as_ref(), region);
        self.coordinator.set_default_region(region);
        self.refresh();
    }

    /// Read-only view of the parsed number, current on every `get()`.
    #[must_use]
    pub fn parsed_number(&self) -> Binding<Option<ParsedNumber>> {
        let weak = Rc::downgrade(&self.coordinator);
        Binding::new(move || weak.upgrade().and_then(|c| c.parsed_number()))
    }

    #[must_use]
    pub fn coordinator(&self) -> &Rc<SyncCoordinator> {
        &self.coordinator
    }

    #[must_use]
    pub fn control(&self) -> &C {
        &self.control
    }

    #[must_use]
    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    #[must_use]
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Detach from the control. Idempotent.
    pub fn unmount(&mut self) {
        if !self.mounted {
            return;
        }
        self.mounted = false;
        self.scope.clear();
        self.control.set_edit_handler(None);
        self.control.set_delegate(None);
        tracing::debug!(control = ?self.control.control_ref(), "phone field unmounted");
    }
}

impl<C: TextControl> Drop for PhoneField<C> {
    fn drop(&mut self) {
        self.unmount();
    }
}

impl<C: TextControl> fmt::Debug for PhoneField<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PhoneField")
            .field("control", &self.control.control_ref())
            .field("coordinator", &self.coordinator)
            .field("mounted", &self.mounted)
            .finish_non_exhaustive()
    }
}
