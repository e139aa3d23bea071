#![forbid(unsafe_code)]

//! Default-region context for phone fields.
//!
//! The [`RegionContext`] owns the region used to resolve national numbers
//! that lack a country calling code. Changes are versioned and observable,
//! so mounted fields can re-apply the region to their parser configuration
//! when it changes.

use std::cell::RefCell;
use std::env;

use phonefield_number::RegionCode;

use crate::reactive::{Observable, Subscription};

thread_local! {
    static GLOBAL_CONTEXT: RefCell<Option<RegionContext>> = const { RefCell::new(None) };
}

/// Runtime region context.
#[derive(Clone, Debug)]
pub struct RegionContext {
    current: Observable<Option<RegionCode>>,
}

impl RegionContext {
    #[must_use]
    pub fn new(region: Option<RegionCode>) -> Self {
        Self {
            current: Observable::new(region),
        }
    }

    /// A context initialized from the process environment.
    #[must_use]
    pub fn system() -> Self {
        Self::new(detect_system_region())
    }

    /// The thread-local context, created from the environment on first use.
    #[must_use]
    pub fn global() -> Self {
        GLOBAL_CONTEXT.with(|slot| slot.borrow_mut().get_or_insert_with(Self::system).clone())
    }

    #[must_use]
    pub fn region(&self) -> Option<RegionCode> {
        self.current.get()
    }

    /// Replace the region. Subscribers fire only if it changed.
    pub fn set_region(&self, region: Option<RegionCode>) {
        self.current.set(region);
    }

    /// Subscribe to region changes.
    pub fn subscribe(&self, callback: impl Fn(Option<RegionCode>) + 'static) -> Subscription {
        self.current.subscribe(move |region| callback(*region))
    }

    /// Number of region changes since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.current.version()
    }
}

impl Default for RegionContext {
    fn default() -> Self {
        Self::new(None)
    }
}

/// Detect the region from locale environment variables.
///
/// Preference order: `LC_ALL`, then `LANG`. Returns `None` when neither
/// names a territory (`C`, `POSIX`, a bare language such as `fr`).
#[must_use]
pub fn detect_system_region() -> Option<RegionCode> {
    let lc_all = env::var("LC_ALL").ok();
    let lang = env::var("LANG").ok();
    detect_system_region_from(lc_all.as_deref(), lang.as_deref())
}

fn detect_system_region_from(lc_all: Option<&str>, lang: Option<&str>) -> Option<RegionCode> {
    lc_all
        .and_then(region_from_locale)
        .or_else(|| lang.and_then(region_from_locale))
}

/// Extract the territory of a POSIX or BCP 47 locale (`en_US.UTF-8`,
/// `pt-BR`, `sr_RS@latin`).
fn region_from_locale(raw: &str) -> Option<RegionCode> {
    let raw = raw.trim();
    let raw = raw.split('@').next().unwrap_or(raw);
    let raw = raw.split('.').next().unwrap_or(raw);
    raw.split(['_', '-'])
        .skip(1)
        .find(|part| part.len() == 2 && part.chars().all(|c| c.is_ascii_alphabetic()))
        .and_then(|part| part.parse().ok())
}
