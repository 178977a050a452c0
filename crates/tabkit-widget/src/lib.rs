#![forbid(unsafe_code)]

//! Widget: the tabset model, hit-testing, and navigation.
//!
//! # Role in tabkit
//! `tabkit-widget` is the stateful layer. It owns tabs, options, and the
//! selection pointers, schedules one layout pass per batch of mutations,
//! and answers the host's screen-space questions (what did this click
//! hit, which tab is next in that arrow direction, where does the page
//! go).
//!
//! # Primary responsibilities
//! - **Tabset**: ordered tab arena with single selection, name index,
//!   and the dirty-flag layout scheduler.
//! - **Options**: every strip knob, typed and as string keywords.
//! - **Picking**: screen point to tab, perforation, or close button.
//! - **Navigation**: arrow-key movement across tabs and tiers.
//! - **Measurement**: the `TextMeasurer` boundary hosts implement.
//!
//! # How it fits in the system
//! Label math and packing live in `tabkit-layout`; coordinates and the
//! projection live in `tabkit-core`. The host drives this crate: mutate,
//! check [`Tabset::needs_layout`], call [`Tabset::recompute`] once per
//! idle cycle, then draw from the geometry readers.

pub mod error;
pub mod measure;
pub mod options;
pub mod pick;
pub mod tab;
pub mod tabset;

pub use error::TabsetError;
pub use measure::{MonospaceMeasurer, TextMeasurer};
pub use options::{ShowTabs, TabsetOptions};
pub use pick::{PERFORATION_SIZE, PickContext};
pub use tab::{PLUS_TAB_NAME, PageSlot, Tab, TabId, TabState};
#[cfg(feature = "state-persistence")]
pub use tabset::{OptionsSnapshot, TabSnapshot, TabsetSnapshot};
pub use tabset::Tabset;

pub use tabkit_core::transform::{Direction, Projection};
