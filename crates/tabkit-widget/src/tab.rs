#![forbid(unsafe_code)]

//! Tab records and identity.
//!
//! A [`Tab`] is a plain record owned by the tabset arena; everything a
//! host reads from it (index, geometry, visibility) is recomputed by the
//! tabset, never by the tab itself.
//!
//! # Invariants
//!
//! - Ids are non-zero and never reused within one tabset.
//! - `index` equals the tab's position in display order after every
//!   mutation.
//! - The tab named [`PLUS_TAB_NAME`] is the reserved trailing slot: last
//!   in display order, never selected, never given a close button.

use std::fmt;
use std::str::FromStr;

use tabkit_core::geometry::{Sides, Size};
use tabkit_core::page::{Anchor, Fill};
use tabkit_core::side::ParseKeywordError;
use tabkit_layout::LabelGeometry;

use crate::error::TabsetError;

/// Reserved name of the trailing "new tab" affordance.
pub const PLUS_TAB_NAME: &str = "+";

// ---------------------------------------------------------------------------
// Identity
// ---------------------------------------------------------------------------

/// Stable identifier for tabs.
///
/// `0` is reserved/invalid so ids are always non-zero. Ids are allocated
/// by the tabset and stay valid until the tab is deleted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TabId(u64);

impl TabId {
    /// Lowest valid tab id.
    pub const MIN: Self = Self(1);

    /// Raw numeric value.
    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }

    /// The next id, or an error on overflow.
    pub fn checked_next(self) -> Result<Self, TabsetError> {
        match self.0.checked_add(1) {
            Some(next) => Ok(Self(next)),
            None => Err(TabsetError::TabIdOverflow { current: self }),
        }
    }
}

impl Default for TabId {
    fn default() -> Self {
        Self::MIN
    }
}

impl fmt::Display for TabId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ---------------------------------------------------------------------------
// State
// ---------------------------------------------------------------------------

/// Interaction state of one tab.
///
/// The states are mutually exclusive; whether the tab is currently drawn
/// is the orthogonal `on_screen` flag the layout pass maintains.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TabState {
    #[default]
    Normal,
    /// Armed under the pointer.
    Active,
    /// Visible but refuses selection.
    Disabled,
    /// Excluded from layout and picking.
    Hidden,
}

impl TabState {
    /// Canonical keyword, as accepted by [`FromStr`].
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            TabState::Normal => "normal",
            TabState::Active => "active",
            TabState::Disabled => "disabled",
            TabState::Hidden => "hidden",
        }
    }

    /// Whether a tab in this state may take the selection.
    #[must_use]
    pub const fn is_selectable(self) -> bool {
        matches!(self, TabState::Normal | TabState::Active)
    }
}

impl fmt::Display for TabState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.keyword())
    }
}

impl FromStr for TabState {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "normal" => Ok(TabState::Normal),
            "active" => Ok(TabState::Active),
            "disabled" => Ok(TabState::Disabled),
            "hidden" => Ok(TabState::Hidden),
            other => Err(ParseKeywordError::new("tab state", other)),
        }
    }
}

// ---------------------------------------------------------------------------
// Page link
// ---------------------------------------------------------------------------

/// Link from a tab to its embedded page.
///
/// The handle is opaque to the engine; the windowing layer owns the page
/// and notifies the tabset on geometry requests and destruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageSlot {
    /// Host-side window handle.
    pub handle: u64,
    /// Size the page asked for, overriding the cavity fit.
    pub size_override: Option<Size>,
    pub fill: Fill,
    pub anchor: Anchor,
    pub pad: Sides,
}

impl PageSlot {
    /// Page link with default placement: fill both axes, no padding.
    #[must_use]
    pub fn new(handle: u64) -> Self {
        Self {
            handle,
            size_override: None,
            fill: Fill::default(),
            anchor: Anchor::default(),
            pad: Sides::all(0),
        }
    }
}

// ---------------------------------------------------------------------------
// Tab record
// ---------------------------------------------------------------------------

/// One tab. Owned by the [`Tabset`](crate::Tabset) arena.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tab {
    pub(crate) name: String,
    pub(crate) index: usize,
    pub(crate) state: TabState,
    pub(crate) on_screen: bool,
    pub(crate) torn_off: bool,
    pub(crate) icon: Option<Size>,
    pub(crate) label: Option<LabelGeometry>,
    pub(crate) slot: Option<usize>,
    pub(crate) page: Option<PageSlot>,
}

impl Tab {
    pub(crate) fn new(name: String, index: usize) -> Self {
        Self {
            name,
            index,
            state: TabState::Normal,
            on_screen: false,
            torn_off: false,
            icon: None,
            label: None,
            slot: None,
            page: None,
        }
    }

    /// Display text, also the tab's identity in the name index.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Position in display order.
    #[must_use]
    pub const fn index(&self) -> usize {
        self.index
    }

    #[must_use]
    pub const fn state(&self) -> TabState {
        self.state
    }

    /// Whether the last layout pass left this tab drawable.
    #[must_use]
    pub const fn is_on_screen(&self) -> bool {
        self.on_screen
    }

    #[must_use]
    pub const fn is_torn_off(&self) -> bool {
        self.torn_off
    }

    #[must_use]
    pub const fn icon(&self) -> Option<Size> {
        self.icon
    }

    /// Label geometry from the last layout pass.
    #[must_use]
    pub const fn label(&self) -> Option<&LabelGeometry> {
        self.label.as_ref()
    }

    /// Index into the packed layout, when this tab was packed.
    #[must_use]
    pub const fn slot(&self) -> Option<usize> {
        self.slot
    }

    #[must_use]
    pub const fn page(&self) -> Option<&PageSlot> {
        self.page.as_ref()
    }

    /// Whether this is the reserved trailing plus tab.
    #[must_use]
    pub fn is_plus(&self) -> bool {
        self.name == PLUS_TAB_NAME
    }
}
