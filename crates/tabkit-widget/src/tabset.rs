#![forbid(unsafe_code)]

//! The tabset: tab arena, display order, selection, and the layout pass.
//!
//! [`Tabset`] owns every tab and all strip state. Mutations never lay
//! anything out; they set a dirty flag and the host runs one
//! [`recompute`](Tabset::recompute) per idle cycle, which measures
//! labels, packs tiers, renumbers tiers around the selection, clamps
//! scroll, and refreshes per-tab visibility.
//!
//! # Invariants
//!
//! - The display order, the arena, and the name index agree after every
//!   mutation; [`Tab::index`] always equals the tab's position in
//!   display order.
//! - At most one tab is selected, and only while it is selectable.
//! - The plus tab, when present, is last in display order.
//!
//! # Failure Modes
//!
//! - Mutation and lookup entry points return [`TabsetError`]. Geometry
//!   readers return `Option` and never panic on stale ids.

use std::collections::BTreeMap;

use rustc_hash::FxHashMap;

use tabkit_core::geometry::{Rect, Sides, Size};
use tabkit_core::page::{Anchor, Fill, page_rect};
use tabkit_core::side::Side;
#[cfg(feature = "state-persistence")]
use tabkit_core::side::ParseKeywordError;
use tabkit_core::transform::Projection;
use tabkit_layout::{
    LabelParts, Layout, LayoutFlags, PackInput, TabSlot, layout_label, pack, renumber,
};

use crate::error::TabsetError;
use crate::measure::TextMeasurer;
use crate::options::{ShowTabs, TabsetOptions};
use crate::tab::{PLUS_TAB_NAME, PageSlot, Tab, TabId, TabState};

// ---------------------------------------------------------------------------
// Tabset
// ---------------------------------------------------------------------------

/// A tabbed-notebook model: ordered tabs plus the packed strip layout.
#[derive(Debug, Clone)]
pub struct Tabset {
    pub(crate) options: TabsetOptions,
    pub(crate) arena: BTreeMap<TabId, Tab>,
    pub(crate) order: Vec<TabId>,
    pub(crate) by_name: FxHashMap<String, TabId>,
    pub(crate) next_id: TabId,
    pub(crate) auto_name_seq: u64,
    pub(crate) selected: Option<TabId>,
    pub(crate) active: Option<TabId>,
    pub(crate) focus: Option<TabId>,
    pub(crate) start: Option<TabId>,
    pub(crate) scroll_offset: i32,
    pub(crate) area: Size,
    pub(crate) layout: Layout,
    pub(crate) dirty: bool,
}

impl Default for Tabset {
    fn default() -> Self {
        Self::new(TabsetOptions::default())
    }
}

impl Tabset {
    /// Empty tabset. Dirty until the first [`recompute`](Self::recompute).
    #[must_use]
    pub fn new(options: TabsetOptions) -> Self {
        Self {
            options,
            arena: BTreeMap::new(),
            order: Vec::new(),
            by_name: FxHashMap::default(),
            next_id: TabId::MIN,
            auto_name_seq: 0,
            selected: None,
            active: None,
            focus: None,
            start: None,
            scroll_offset: 0,
            area: Size::default(),
            layout: Layout::default(),
            dirty: true,
        }
    }

    fn alloc_id(&mut self) -> Result<TabId, TabsetError> {
        let current = self.next_id;
        self.next_id = current.checked_next()?;
        Ok(current)
    }

    fn reindex(&mut self) {
        for (i, id) in self.order.iter().enumerate() {
            if let Some(tab) = self.arena.get_mut(id) {
                tab.index = i;
            }
        }
    }

    // --- lookups ---

    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    #[must_use]
    pub fn tab(&self, id: TabId) -> Option<&Tab> {
        self.arena.get(&id)
    }

    #[must_use]
    pub fn tab_id_by_name(&self, name: &str) -> Option<TabId> {
        self.by_name.get(name).copied()
    }

    /// The tab at a display-order index.
    pub fn tab_at(&self, index: usize) -> Result<TabId, TabsetError> {
        self.order
            .get(index)
            .copied()
            .ok_or(TabsetError::InvalidIndex {
                index,
                len: self.order.len(),
            })
    }

    /// Resolve a name or glob pattern (`*`, `?`) to exactly one tab.
    ///
    /// A pattern without glob characters is an exact name lookup. A
    /// pattern matching more than one tab is ambiguous and reports every
    /// matching name.
    pub fn tab_matching(&self, pattern: &str) -> Result<TabId, TabsetError> {
        if !pattern.contains(['*', '?']) {
            return self
                .by_name
                .get(pattern)
                .copied()
                .ok_or_else(|| TabsetError::NoSuchTab {
                    tab: pattern.to_string(),
                });
        }
        let mut found: Vec<(TabId, String)> = Vec::new();
        for id in &self.order {
            if let Some(tab) = self.arena.get(id)
                && glob_match(pattern, &tab.name)
            {
                found.push((*id, tab.name.clone()));
            }
        }
        match found.len() {
            0 => Err(TabsetError::NoSuchTab {
                tab: pattern.to_string(),
            }),
            1 => Ok(found[0].0),
            _ => Err(TabsetError::AmbiguousName {
                pattern: pattern.to_string(),
                matches: found.into_iter().map(|(_, name)| name).collect(),
            }),
        }
    }

    /// Tabs in display order.
    pub fn iter(&self) -> impl Iterator<Item = (TabId, &Tab)> {
        self.order
            .iter()
            .filter_map(|id| self.arena.get(id).map(|tab| (*id, tab)))
    }

    #[must_use]
    pub fn order(&self) -> &[TabId] {
        &self.order
    }

    // --- state accessors ---

    #[must_use]
    pub const fn selected(&self) -> Option<TabId> {
        self.selected
    }

    #[must_use]
    pub const fn active(&self) -> Option<TabId> {
        self.active
    }

    #[must_use]
    pub const fn focus(&self) -> Option<TabId> {
        self.focus
    }

    /// First tab of the page-adjacent tier (multi-tier), or the first
    /// tab inside the scroll window (single tier).
    #[must_use]
    pub const fn start(&self) -> Option<TabId> {
        self.start
    }

    #[must_use]
    pub const fn scroll_offset(&self) -> i32 {
        self.scroll_offset
    }

    #[must_use]
    pub const fn area(&self) -> Size {
        self.area
    }

    #[must_use]
    pub const fn options(&self) -> &TabsetOptions {
        &self.options
    }

    /// The packed layout from the last [`recompute`](Self::recompute).
    #[must_use]
    pub const fn layout(&self) -> &Layout {
        &self.layout
    }

    #[must_use]
    pub const fn flags(&self) -> LayoutFlags {
        self.layout.flags
    }

    /// Whether a mutation since the last layout pass requires another.
    #[must_use]
    pub const fn needs_layout(&self) -> bool {
        self.dirty
    }

    // --- structural mutations ---

    /// Append a tab, before the plus tab if one is present.
    ///
    /// Passing [`PLUS_TAB_NAME`] creates the reserved plus tab itself,
    /// which always lands last.
    pub fn add_tab(&mut self, name: &str) -> Result<TabId, TabsetError> {
        self.insert_inner(self.order.len(), name)
    }

    /// Append a tab with a generated `tabN` name.
    pub fn add_tab_auto(&mut self) -> Result<TabId, TabsetError> {
        loop {
            self.auto_name_seq += 1;
            let name = format!("tab{}", self.auto_name_seq);
            if !self.by_name.contains_key(&name) {
                return self.add_tab(&name);
            }
        }
    }

    /// Insert a tab at a display-order index, clamped before the plus tab.
    pub fn insert_tab(&mut self, index: usize, name: &str) -> Result<TabId, TabsetError> {
        if index > self.order.len() {
            return Err(TabsetError::InvalidIndex {
                index,
                len: self.order.len(),
            });
        }
        self.insert_inner(index, name)
    }

    fn insert_inner(&mut self, index: usize, name: &str) -> Result<TabId, TabsetError> {
        if name.is_empty() {
            return Err(bad_name("tab names cannot be empty"));
        }
        if self.by_name.contains_key(name) {
            return Err(TabsetError::DuplicateName {
                name: name.to_string(),
            });
        }
        let id = self.alloc_id()?;
        let at = self.insert_pos(index, name);
        self.order.insert(at, id);
        self.arena.insert(id, Tab::new(name.to_string(), at));
        self.by_name.insert(name.to_string(), id);
        self.reindex();
        self.dirty = true;
        Ok(id)
    }

    /// Clamp an insertion index so the plus tab stays last.
    fn insert_pos(&self, requested: usize, name: &str) -> usize {
        if name == PLUS_TAB_NAME {
            return self.order.len();
        }
        let limit = match self.order.last().and_then(|id| self.arena.get(id)) {
            Some(last) if last.is_plus() => self.order.len() - 1,
            _ => self.order.len(),
        };
        requested.min(limit)
    }

    /// Remove a tab and return its record.
    ///
    /// A deleted selected tab hands the selection to the previous
    /// selectable non-plus tab, else the first remaining one, else no
    /// tab. Other pointers at the deleted tab are cleared.
    pub fn delete_tab(&mut self, id: TabId) -> Result<Tab, TabsetError> {
        let tab = self
            .arena
            .remove(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?;
        let pos = tab.index;
        self.order.retain(|t| *t != id);
        self.by_name.remove(&tab.name);
        if self.selected == Some(id) {
            self.selected = self.transfer_target(pos);
        }
        if self.active == Some(id) {
            self.active = None;
        }
        if self.focus == Some(id) {
            self.focus = None;
        }
        if self.start == Some(id) {
            self.start = None;
        }
        self.reindex();
        self.dirty = true;
        Ok(tab)
    }

    /// Previous-else-first selectable non-plus tab around position `pos`.
    fn transfer_target(&self, pos: usize) -> Option<TabId> {
        let eligible = |id: &&TabId| {
            self.arena
                .get(*id)
                .is_some_and(|tab| tab.state.is_selectable() && !tab.is_plus())
        };
        self.order[..pos.min(self.order.len())]
            .iter()
            .rev()
            .find(eligible)
            .or_else(|| self.order.iter().find(eligible))
            .copied()
    }

    /// Move a tab to a display-order index, clamped before the plus tab.
    pub fn move_tab(&mut self, id: TabId, index: usize) -> Result<(), TabsetError> {
        let (from, plus) = {
            let tab = self
                .arena
                .get(&id)
                .ok_or_else(|| TabsetError::no_such_id(id))?;
            (tab.index, tab.is_plus())
        };
        if plus {
            return Err(TabsetError::InvalidOption {
                option: "position".to_string(),
                reason: "the plus tab is pinned last".to_string(),
            });
        }
        if index > self.order.len() {
            return Err(TabsetError::InvalidIndex {
                index,
                len: self.order.len(),
            });
        }
        self.order.remove(from);
        let at = self.insert_pos(index, "");
        self.order.insert(at, id);
        self.reindex();
        self.dirty = true;
        Ok(())
    }

    /// Rename a tab. The plus tab's name is reserved in both directions.
    pub fn rename_tab(&mut self, id: TabId, name: &str) -> Result<(), TabsetError> {
        if name.is_empty() {
            return Err(bad_name("tab names cannot be empty"));
        }
        {
            let tab = self
                .arena
                .get(&id)
                .ok_or_else(|| TabsetError::no_such_id(id))?;
            if tab.name == name {
                return Ok(());
            }
            if tab.is_plus() || name == PLUS_TAB_NAME {
                return Err(bad_name("the plus tab name is reserved"));
            }
            if self.by_name.contains_key(name) {
                return Err(TabsetError::DuplicateName {
                    name: name.to_string(),
                });
            }
        }
        if let Some(tab) = self.arena.get_mut(&id) {
            let old = std::mem::replace(&mut tab.name, name.to_string());
            self.by_name.remove(&old);
            self.by_name.insert(name.to_string(), id);
            self.dirty = true;
        }
        Ok(())
    }

    // --- per-tab mutations ---

    pub fn set_icon(&mut self, id: TabId, icon: Option<Size>) -> Result<(), TabsetError> {
        let tab = self
            .arena
            .get_mut(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?;
        tab.icon = icon;
        self.dirty = true;
        Ok(())
    }

    /// Change a tab's state, keeping the pointers coherent.
    ///
    /// Making a tab [`TabState::Active`] demotes the previously active
    /// one; making the selected tab unselectable hands the selection on
    /// the way a deletion would.
    pub fn set_state(&mut self, id: TabId, state: TabState) -> Result<(), TabsetError> {
        let pos = self
            .arena
            .get(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?
            .index;
        if state == TabState::Active
            && let Some(prev) = self.active
            && prev != id
            && let Some(tab) = self.arena.get_mut(&prev)
            && tab.state == TabState::Active
        {
            tab.state = TabState::Normal;
        }
        if let Some(tab) = self.arena.get_mut(&id) {
            tab.state = state;
        }
        match state {
            TabState::Active => self.active = Some(id),
            _ if self.active == Some(id) => self.active = None,
            _ => {}
        }
        if self.selected == Some(id) && !state.is_selectable() {
            self.selected = self.transfer_target(pos);
        }
        if self.focus == Some(id) && state == TabState::Hidden {
            self.focus = None;
        }
        self.dirty = true;
        Ok(())
    }

    pub fn set_torn_off(&mut self, id: TabId, torn_off: bool) -> Result<(), TabsetError> {
        let tab = self
            .arena
            .get_mut(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?;
        tab.torn_off = torn_off;
        self.dirty = true;
        Ok(())
    }

    pub fn set_page(&mut self, id: TabId, page: Option<PageSlot>) -> Result<(), TabsetError> {
        let tab = self
            .arena
            .get_mut(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?;
        tab.page = page;
        self.dirty = true;
        Ok(())
    }

    // --- selection pointers ---

    /// Select a tab. Returns whether the selection changed.
    pub fn select(&mut self, id: TabId) -> Result<bool, TabsetError> {
        let tab = self
            .arena
            .get(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?;
        if tab.is_plus() || !tab.state.is_selectable() {
            return Err(TabsetError::NotSelectable {
                name: tab.name.clone(),
                state: tab.state,
            });
        }
        if self.selected == Some(id) {
            return Ok(false);
        }
        #[cfg(feature = "tracing")]
        let old = self.selected;
        self.selected = Some(id);
        self.dirty = true;
        #[cfg(feature = "tracing")]
        Self::log_select(old, id);
        Ok(true)
    }

    /// Point the hover highlight at a tab, or clear it.
    ///
    /// Disabled and hidden tabs refuse quietly with `Ok(false)`; the
    /// pointer chases the mouse and stale hovers are not an error worth
    /// surfacing.
    pub fn set_active(&mut self, to: Option<TabId>) -> Result<bool, TabsetError> {
        if let Some(id) = to {
            let tab = self
                .arena
                .get(&id)
                .ok_or_else(|| TabsetError::no_such_id(id))?;
            if !tab.state.is_selectable() {
                return Ok(false);
            }
        }
        if self.active == to {
            return Ok(false);
        }
        if let Some(prev) = self.active
            && let Some(tab) = self.arena.get_mut(&prev)
            && tab.state == TabState::Active
        {
            tab.state = TabState::Normal;
        }
        if let Some(id) = to
            && let Some(tab) = self.arena.get_mut(&id)
        {
            tab.state = TabState::Active;
        }
        self.active = to;
        self.dirty = true;
        Ok(true)
    }

    /// Move the keyboard focus ring, or clear it.
    pub fn set_focus(&mut self, to: Option<TabId>) -> Result<bool, TabsetError> {
        if let Some(id) = to {
            let tab = self
                .arena
                .get(&id)
                .ok_or_else(|| TabsetError::no_such_id(id))?;
            if tab.state == TabState::Hidden {
                return Ok(false);
            }
        }
        if self.focus == to {
            return Ok(false);
        }
        self.focus = to;
        self.dirty = true;
        Ok(true)
    }

    #[cfg(feature = "tracing")]
    fn log_select(from: Option<TabId>, to: TabId) {
        tracing::debug!(
            message = "tabset.select",
            from = from.map_or(0, TabId::get),
            to = to.get()
        );
    }

    // --- scrolling ---

    /// Pixels of strip available for tabs along the strip axis.
    fn strip_avail(&self) -> i32 {
        let extent = if self.options.side().is_horizontal() {
            self.area.width
        } else {
            self.area.height
        };
        (extent - 2 * (self.options.inset() + self.options.select_pad().0)).max(0)
    }

    /// Set the scroll offset, clamped to the overfull range.
    pub fn set_scroll_offset(&mut self, px: i32) {
        let max = (self.layout.world_width - self.strip_avail()).max(0);
        let clamped = px.clamp(0, max);
        if clamped != self.scroll_offset {
            self.scroll_offset = clamped;
            self.dirty = true;
        }
    }

    /// Scroll by whole increments; negative steps scroll back.
    pub fn scroll_by_increment(&mut self, steps: i32) {
        self.set_scroll_offset(self.scroll_offset + steps * self.options.scroll_increment());
    }

    /// Scroll a single-tier strip just far enough to expose a tab.
    pub fn ensure_visible(&mut self, id: TabId) -> Result<(), TabsetError> {
        let slot = self
            .arena
            .get(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?
            .slot;
        if self.layout.tiers > 1 {
            return Ok(());
        }
        let Some((x, width)) = slot
            .and_then(|s| self.layout.tabs.get(s))
            .map(|row| (row.x, row.width))
        else {
            return Ok(());
        };
        let avail = self.strip_avail();
        if x < self.scroll_offset {
            self.set_scroll_offset(x);
        } else if x + width > self.scroll_offset + avail {
            self.set_scroll_offset(x + width - avail);
        }
        Ok(())
    }

    // --- configuration ---

    pub fn set_area(&mut self, size: Size) {
        if self.area != size {
            self.area = size;
            self.dirty = true;
        }
    }

    /// Apply one string `option = value` pair.
    pub fn configure(&mut self, option: &str, value: &str) -> Result<(), TabsetError> {
        self.options.set(option, value)?;
        self.dirty = true;
        Ok(())
    }

    pub fn replace_options(&mut self, options: TabsetOptions) {
        self.options = options;
        self.dirty = true;
    }

    // --- geometry readers ---

    /// Whether the strip is drawn at all under the current options.
    #[must_use]
    pub fn strip_visible(&self) -> bool {
        match self.options.show_tabs() {
            ShowTabs::Always => true,
            ShowTabs::Never => false,
            ShowTabs::Multiple => self.layout.tabs.len() >= 2,
        }
    }

    /// Pixels the strip occupies from its widget edge, zero when hidden.
    #[must_use]
    pub fn strip_thickness(&self) -> i32 {
        if !self.strip_visible() {
            return 0;
        }
        let pad_y = if self.layout.tiers <= 1 {
            self.options.select_pad().1
        } else {
            0
        };
        self.options.inset() + pad_y + self.layout.world_height
    }

    /// The projection for this tabset inside its own area.
    #[must_use]
    pub fn projection(&self) -> Projection {
        self.projection_in(Rect::from_size(self.area.width, self.area.height))
    }

    /// The projection for this tabset inside an arbitrary container.
    #[must_use]
    pub fn projection_in(&self, container: Rect) -> Projection {
        let (pad_x, pad_y) = self.options.select_pad();
        let y_pad = if self.layout.tiers <= 1 { pad_y } else { 0 };
        Projection::new(self.options.side(), container).with_offsets(
            self.options.inset() + pad_x - self.scroll_offset,
            self.options.inset() + y_pad,
        )
    }

    /// A tab's rectangle in world space, if it was packed.
    #[must_use]
    pub fn world_rect(&self, id: TabId) -> Option<Rect> {
        let slot = self.arena.get(&id)?.slot?;
        let row = self.layout.tabs.get(slot)?;
        Some(Rect::new(row.x, row.y, row.width, row.height))
    }

    /// A tab's rectangle on screen, if it was packed.
    #[must_use]
    pub fn screen_rect(&self, id: TabId) -> Option<Rect> {
        Some(self.projection().rect_to_screen(self.world_rect(id)?))
    }

    /// A tab's tier, 1 = page-adjacent, if it was packed.
    #[must_use]
    pub fn tier(&self, id: TabId) -> Option<usize> {
        let slot = self.arena.get(&id)?.slot?;
        Some(self.layout.tabs.get(slot)?.tier)
    }

    /// Total world-space extent of the packed strip.
    #[must_use]
    pub const fn world_extent(&self) -> Size {
        Size::new(self.layout.world_width, self.layout.world_height)
    }

    /// The widget area left for pages once the strip took its edge.
    #[must_use]
    pub fn cavity(&self) -> Rect {
        let thickness = self.strip_thickness();
        let (x, y, width, height) = match self.options.side() {
            Side::Top => (0, thickness, self.area.width, self.area.height - thickness),
            Side::Bottom => (0, 0, self.area.width, self.area.height - thickness),
            Side::Left => (thickness, 0, self.area.width - thickness, self.area.height),
            Side::Right => (0, 0, self.area.width - thickness, self.area.height),
        };
        Rect::new(x, y, width.max(0), height.max(0))
    }

    /// Where a tab's page goes: the cavity placed per the tab's fill,
    /// anchor, padding, and size override.
    pub fn page_area(&self, id: TabId) -> Result<Rect, TabsetError> {
        let tab = self
            .arena
            .get(&id)
            .ok_or_else(|| TabsetError::no_such_id(id))?;
        let cavity = self.cavity();
        let (natural, fill, anchor, pad) = match tab.page {
            Some(page) => (
                page.size_override.unwrap_or(cavity.size()),
                page.fill,
                page.anchor,
                page.pad,
            ),
            None => (
                cavity.size(),
                Fill::default(),
                Anchor::default(),
                Sides::all(0),
            ),
        };
        Ok(page_rect(
            cavity,
            natural.width,
            natural.height,
            anchor,
            fill,
            pad,
        ))
    }

    // --- layout pass ---

    /// Run one full layout pass and clear the dirty flag.
    ///
    /// `width`/`height` is the widget area. Labels are measured through
    /// `measurer`, hidden tabs are skipped, the rest pack into tiers,
    /// tiers renumber so the selected tab sits page-adjacent, the scroll
    /// offset clamps to the new world width, and every tab's `on_screen`
    /// flag refreshes.
    pub fn recompute(&mut self, measurer: &dyn TextMeasurer, width: i32, height: i32) {
        #[cfg(feature = "tracing")]
        let layout_start = std::time::Instant::now();
        #[cfg(feature = "tracing")]
        let layout_span = tracing::debug_span!(
            "tabset.layout",
            tab_count = self.order.len(),
            tiers = tracing::field::Empty,
            layout_duration_us = tracing::field::Empty
        );
        #[cfg(feature = "tracing")]
        let _layout_guard = layout_span.enter();

        self.area = Size::new(width, height);
        let quadrant = self.options.quadrant();
        let ipad = self.options.label_pad();
        let close = self.options.close_buttons();

        let order = self.order.clone();
        let mut slots: Vec<TabSlot> = Vec::with_capacity(order.len());
        let mut packed: Vec<TabId> = Vec::with_capacity(order.len());
        for id in order {
            let Some(tab) = self.arena.get_mut(&id) else {
                continue;
            };
            let text = measurer.measure(&tab.name);
            let button = if close && !tab.is_plus() {
                let side = text.height.max(tab.icon.map_or(0, |icon| icon.height));
                (side > 0).then(|| Size::new(side, side))
            } else {
                None
            };
            let geometry = layout_label(
                LabelParts {
                    icon: tab.icon,
                    text: Some(text),
                    button,
                },
                ipad,
                quadrant,
            );
            tab.label = Some(geometry);
            tab.on_screen = false;
            tab.slot = None;
            if tab.state != TabState::Hidden {
                tab.slot = Some(slots.len());
                slots.push(TabSlot {
                    label: geometry.rotated,
                    is_plus: tab.is_plus(),
                });
                packed.push(id);
            }
        }

        let avail = self.strip_avail();
        self.layout = pack(&PackInput {
            slots: &slots,
            policy: self.options.width_policy(),
            slant: self.options.slant(),
            gap: self.options.gap(),
            overlap: self.options.overlap(),
            avail,
            requested_tiers: self.options.tiers(),
        });

        let mut start_slot = 0;
        if let Some(selected) = self.selected
            && let Some(slot) = self.arena.get(&selected).and_then(|tab| tab.slot)
        {
            start_slot = renumber(&mut self.layout, slot);
        }

        let max_scroll = (self.layout.world_width - avail).max(0);
        self.scroll_offset = self.scroll_offset.clamp(0, max_scroll);

        self.start = if self.layout.tiers > 1 {
            packed.get(start_slot).copied()
        } else {
            packed
                .iter()
                .zip(self.layout.tabs.iter())
                .find(|&(_, row)| row.x + row.width > self.scroll_offset)
                .map(|(id, _)| *id)
        };

        let visible = self.strip_visible();
        let overfull = self.layout.flags.contains(LayoutFlags::OVERFULL);
        let window_end = self.scroll_offset + avail;
        for (i, id) in packed.iter().enumerate() {
            let Some(row) = self.layout.tabs.get(i) else {
                continue;
            };
            let shown = visible
                && (!overfull || (row.x < window_end && row.x + row.width > self.scroll_offset));
            if let Some(tab) = self.arena.get_mut(id) {
                tab.on_screen = shown;
            }
        }

        self.dirty = false;

        #[cfg(feature = "tracing")]
        {
            layout_span.record("tiers", self.layout.tiers as u64);
            let elapsed_us = layout_start.elapsed().as_micros() as u64;
            layout_span.record("layout_duration_us", elapsed_us);
        }
    }

    // --- collaborator notifications ---

    /// The host destroyed a page window; the owning tab goes with it.
    pub fn page_destroyed(&mut self, handle: u64) -> Option<TabId> {
        let id = self.order.iter().copied().find(|id| {
            self.arena
                .get(id)
                .and_then(|tab| tab.page)
                .is_some_and(|page| page.handle == handle)
        })?;
        self.delete_tab(id).ok()?;
        Some(id)
    }

    /// A page asked for a new natural size.
    pub fn page_geometry_request(&mut self, handle: u64, size: Size) -> bool {
        for tab in self.arena.values_mut() {
            if let Some(page) = tab.page.as_mut()
                && page.handle == handle
            {
                page.size_override = Some(size);
                self.dirty = true;
                return true;
            }
        }
        false
    }

    /// A tab's icon image changed size.
    pub fn icon_changed(&mut self, id: TabId, size: Size) -> Result<(), TabsetError> {
        self.set_icon(id, Some(size))
    }
}

fn bad_name(reason: &str) -> TabsetError {
    TabsetError::InvalidOption {
        option: "name".to_string(),
        reason: reason.to_string(),
    }
}

/// Shell-style match: `*` is any run, `?` any single character.
fn glob_match(pattern: &str, text: &str) -> bool {
    let p: Vec<char> = pattern.chars().collect();
    let t: Vec<char> = text.chars().collect();
    let (mut pi, mut ti) = (0, 0);
    let mut star: Option<(usize, usize)> = None;
    while ti < t.len() {
        if pi < p.len() && (p[pi] == '?' || p[pi] == t[ti]) {
            pi += 1;
            ti += 1;
        } else if pi < p.len() && p[pi] == '*' {
            star = Some((pi, ti));
            pi += 1;
        } else if let Some((sp, st)) = star {
            pi = sp + 1;
            ti = st + 1;
            star = Some((sp, st + 1));
        } else {
            return false;
        }
    }
    while pi < p.len() && p[pi] == '*' {
        pi += 1;
    }
    pi == p.len()
}

// ---------------------------------------------------------------------------
// Snapshot
// ---------------------------------------------------------------------------

/// One tab in a [`TabsetSnapshot`].
#[cfg(feature = "state-persistence")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TabSnapshot {
    pub name: String,
    pub state: String,
    #[serde(default)]
    pub torn_off: bool,
}

/// Options in a [`TabsetSnapshot`], as configuration keywords.
#[cfg(feature = "state-persistence")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OptionsSnapshot {
    pub side: String,
    pub slant: String,
    pub width: String,
    pub show_tabs: String,
    pub tiers: usize,
    pub gap: i32,
    pub overlap: i32,
    pub inset: i32,
    pub angle: i32,
    pub scroll_increment: i32,
    pub tearoff: bool,
    pub close_buttons: bool,
}

/// Persistable view of a tabset: names, states, selection, options.
///
/// Geometry is deliberately absent; the restored tabset is dirty and the
/// first layout pass rebuilds it.
#[cfg(feature = "state-persistence")]
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TabsetSnapshot {
    pub tabs: Vec<TabSnapshot>,
    pub selected: Option<String>,
    pub options: OptionsSnapshot,
}

#[cfg(feature = "state-persistence")]
impl Tabset {
    #[must_use]
    pub fn snapshot(&self) -> TabsetSnapshot {
        TabsetSnapshot {
            tabs: self
                .iter()
                .map(|(_, tab)| TabSnapshot {
                    name: tab.name.clone(),
                    state: tab.state.keyword().to_string(),
                    torn_off: tab.torn_off,
                })
                .collect(),
            selected: self
                .selected
                .and_then(|id| self.arena.get(&id))
                .map(|tab| tab.name.clone()),
            options: OptionsSnapshot {
                side: self.options.side().keyword().to_string(),
                slant: self.options.slant().keyword().to_string(),
                width: self.options.width_policy().to_string(),
                show_tabs: self.options.show_tabs().keyword().to_string(),
                tiers: self.options.tiers(),
                gap: self.options.gap(),
                overlap: self.options.overlap(),
                inset: self.options.inset(),
                angle: self.options.angle(),
                scroll_increment: self.options.scroll_increment(),
                tearoff: self.options.tearoff(),
                close_buttons: self.options.close_buttons(),
            },
        }
    }

    /// Rebuild a tabset from a snapshot. Dirty until the next layout pass.
    pub fn from_snapshot(snap: &TabsetSnapshot) -> Result<Self, TabsetError> {
        let mut options = TabsetOptions::default();
        options.set("side", &snap.options.side)?;
        options.set("slant", &snap.options.slant)?;
        options.set("width", &snap.options.width)?;
        options.set("show-tabs", &snap.options.show_tabs)?;
        options.set_tiers(snap.options.tiers);
        options.set_gap(snap.options.gap)?;
        options.set_overlap(snap.options.overlap)?;
        options.set_inset(snap.options.inset)?;
        options.set_angle(snap.options.angle);
        options.set_scroll_increment(snap.options.scroll_increment)?;
        options.set_tearoff(snap.options.tearoff);
        options.set_close_buttons(snap.options.close_buttons);

        let mut tabs = Self::new(options);
        for entry in &snap.tabs {
            let id = tabs.add_tab(&entry.name)?;
            let state: TabState =
                entry
                    .state
                    .parse()
                    .map_err(|e: ParseKeywordError| TabsetError::InvalidOption {
                        option: "state".to_string(),
                        reason: e.to_string(),
                    })?;
            if state != TabState::Normal {
                tabs.set_state(id, state)?;
            }
            if entry.torn_off {
                tabs.set_torn_off(id, true)?;
            }
        }
        if let Some(name) = &snap.selected
            && let Some(id) = tabs.tab_id_by_name(name)
        {
            tabs.select(id)?;
        }
        Ok(tabs)
    }
}

#[cfg(test)]
mod tests {
    use super::{Tabset, glob_match};
    use crate::error::TabsetError;
    use crate::measure::MonospaceMeasurer;
    use crate::options::TabsetOptions;
    use crate::tab::{PLUS_TAB_NAME, PageSlot, TabId, TabState};
    use tabkit_core::geometry::{Rect, Sides, Size};
    use tabkit_core::page::{Anchor, Fill};
    use tabkit_layout::LayoutFlags;
    #[cfg(feature = "tracing")]
    use std::sync::{Arc, Mutex};
    #[cfg(feature = "tracing")]
    use tracing::Subscriber;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::Layer;
    #[cfg(feature = "tracing")]
    use tracing_subscriber::layer::{Context, SubscriberExt};

    fn cells() -> MonospaceMeasurer {
        MonospaceMeasurer::new(8, 16)
    }

    fn tabset_with(names: &[&str]) -> Tabset {
        let mut tabs = Tabset::new(TabsetOptions::default());
        for name in names {
            tabs.add_tab(name).unwrap();
        }
        tabs
    }

    fn ids(tabs: &Tabset) -> Vec<TabId> {
        tabs.order().to_vec()
    }

    // --- add, insert, order ---

    #[test]
    fn indices_track_display_order() {
        let tabs = tabset_with(&["a", "b", "c"]);
        for (i, (_, tab)) in tabs.iter().enumerate() {
            assert_eq!(tab.index(), i);
        }
        assert_eq!(tabs.len(), 3);
    }

    #[test]
    fn duplicate_and_empty_names_are_rejected() {
        let mut tabs = tabset_with(&["a"]);
        assert!(matches!(
            tabs.add_tab("a"),
            Err(TabsetError::DuplicateName { .. })
        ));
        assert!(matches!(
            tabs.add_tab(""),
            Err(TabsetError::InvalidOption { .. })
        ));
        assert_eq!(tabs.len(), 1);
    }

    #[test]
    fn auto_names_skip_taken_ones() {
        let mut tabs = Tabset::default();
        let first = tabs.add_tab_auto().unwrap();
        assert_eq!(tabs.tab(first).unwrap().name(), "tab1");
        tabs.add_tab("tab2").unwrap();
        let third = tabs.add_tab_auto().unwrap();
        assert_eq!(tabs.tab(third).unwrap().name(), "tab3");
    }

    #[test]
    fn insert_respects_index_and_reindexes() {
        let mut tabs = tabset_with(&["a", "c"]);
        let b = tabs.insert_tab(1, "b").unwrap();
        assert_eq!(tabs.tab(b).unwrap().index(), 1);
        assert_eq!(tabs.tab_at(2).unwrap(), tabs.tab_id_by_name("c").unwrap());
        let err = tabs.insert_tab(7, "z").unwrap_err();
        assert_eq!(err.to_string(), "tab index 7 out of range for 3 tabs");
    }

    #[test]
    fn plus_tab_stays_last() {
        let mut tabs = tabset_with(&["a"]);
        let plus = tabs.add_tab(PLUS_TAB_NAME).unwrap();
        let b = tabs.add_tab("b").unwrap();
        assert_eq!(ids(&tabs).last(), Some(&plus));
        assert_eq!(tabs.tab(b).unwrap().index(), 1);

        // Inserting at the end clamps before the plus tab.
        let c = tabs.insert_tab(3, "c").unwrap();
        assert_eq!(tabs.tab(c).unwrap().index(), 2);
        assert_eq!(ids(&tabs).last(), Some(&plus));

        // And so does moving.
        tabs.move_tab(tabs.tab_id_by_name("a").unwrap(), 3).unwrap();
        assert_eq!(ids(&tabs).last(), Some(&plus));
        assert!(matches!(
            tabs.move_tab(plus, 0),
            Err(TabsetError::InvalidOption { .. })
        ));
    }

    #[test]
    fn move_tab_reorders_and_reindexes() {
        let mut tabs = tabset_with(&["a", "b", "c"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        tabs.move_tab(a, 2).unwrap();
        let names: Vec<&str> = tabs.iter().map(|(_, tab)| tab.name()).collect();
        assert_eq!(names, ["b", "c", "a"]);
        assert_eq!(tabs.tab(a).unwrap().index(), 2);
    }

    // --- delete and selection transfer ---

    #[test]
    fn deleting_selected_hands_selection_backward() {
        let mut tabs = tabset_with(&["a", "b", "c"]);
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.select(b).unwrap();
        tabs.delete_tab(b).unwrap();
        assert_eq!(tabs.selected(), tabs.tab_id_by_name("a"));
    }

    #[test]
    fn deleting_first_selected_hands_selection_forward() {
        let mut tabs = tabset_with(&["a", "b", "c"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        tabs.select(a).unwrap();
        tabs.delete_tab(a).unwrap();
        assert_eq!(tabs.selected(), tabs.tab_id_by_name("b"));
    }

    #[test]
    fn selection_transfer_skips_ineligible_tabs() {
        let mut tabs = tabset_with(&["a", "b", "c", "d"]);
        tabs.add_tab(PLUS_TAB_NAME).unwrap();
        let a = tabs.tab_id_by_name("a").unwrap();
        let b = tabs.tab_id_by_name("b").unwrap();
        let c = tabs.tab_id_by_name("c").unwrap();
        tabs.set_state(a, TabState::Disabled).unwrap();
        tabs.set_state(c, TabState::Hidden).unwrap();
        tabs.select(b).unwrap();
        tabs.delete_tab(b).unwrap();
        // Previous tab is disabled, next is hidden, so the first
        // selectable tab after them takes over; never the plus tab.
        assert_eq!(tabs.selected(), tabs.tab_id_by_name("d"));
    }

    #[test]
    fn deleting_the_last_eligible_tab_clears_selection() {
        let mut tabs = tabset_with(&["only"]);
        let only = tabs.tab_id_by_name("only").unwrap();
        tabs.select(only).unwrap();
        tabs.delete_tab(only).unwrap();
        assert_eq!(tabs.selected(), None);
        assert!(tabs.is_empty());
    }

    #[test]
    fn delete_clears_other_pointers_at_the_tab() {
        let mut tabs = tabset_with(&["a", "b"]);
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.set_active(Some(b)).unwrap();
        tabs.set_focus(Some(b)).unwrap();
        tabs.delete_tab(b).unwrap();
        assert_eq!(tabs.active(), None);
        assert_eq!(tabs.focus(), None);
        assert!(matches!(
            tabs.delete_tab(b),
            Err(TabsetError::NoSuchTab { .. })
        ));
    }

    // --- rename, state, lookups ---

    #[test]
    fn rename_moves_the_name_index_entry() {
        let mut tabs = tabset_with(&["a", "b"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        tabs.rename_tab(a, "alpha").unwrap();
        assert_eq!(tabs.tab_id_by_name("alpha"), Some(a));
        assert_eq!(tabs.tab_id_by_name("a"), None);
        assert!(matches!(
            tabs.rename_tab(a, "b"),
            Err(TabsetError::DuplicateName { .. })
        ));
        assert!(tabs.rename_tab(a, PLUS_TAB_NAME).is_err());
    }

    #[test]
    fn disabling_the_selected_tab_moves_the_selection() {
        let mut tabs = tabset_with(&["a", "b", "c"]);
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.select(b).unwrap();
        tabs.set_state(b, TabState::Disabled).unwrap();
        assert_eq!(tabs.selected(), tabs.tab_id_by_name("a"));
        assert!(matches!(
            tabs.select(b),
            Err(TabsetError::NotSelectable { .. })
        ));
    }

    #[test]
    fn activating_a_tab_demotes_the_previous_one() {
        let mut tabs = tabset_with(&["a", "b"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.set_state(a, TabState::Active).unwrap();
        assert_eq!(tabs.active(), Some(a));
        tabs.set_state(b, TabState::Active).unwrap();
        assert_eq!(tabs.active(), Some(b));
        assert_eq!(tabs.tab(a).unwrap().state(), TabState::Normal);
    }

    #[test]
    fn set_active_refuses_unselectable_tabs_quietly() {
        let mut tabs = tabset_with(&["a", "b"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.set_state(b, TabState::Disabled).unwrap();
        assert_eq!(tabs.set_active(Some(b)), Ok(false));
        assert_eq!(tabs.set_active(Some(a)), Ok(true));
        assert_eq!(tabs.tab(a).unwrap().state(), TabState::Active);
        assert_eq!(tabs.set_active(None), Ok(true));
        assert_eq!(tabs.tab(a).unwrap().state(), TabState::Normal);
    }

    #[test]
    fn selecting_the_plus_tab_is_an_error() {
        let mut tabs = tabset_with(&["a"]);
        let plus = tabs.add_tab(PLUS_TAB_NAME).unwrap();
        let err = tabs.select(plus).unwrap_err();
        assert!(matches!(err, TabsetError::NotSelectable { .. }));
    }

    #[test]
    fn reselecting_reports_no_change() {
        let mut tabs = tabset_with(&["a"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        assert_eq!(tabs.select(a), Ok(true));
        assert_eq!(tabs.select(a), Ok(false));
    }

    #[test]
    fn pattern_lookup_exact_glob_and_ambiguous() {
        let tabs = tabset_with(&["build", "buy", "deploy"]);
        assert_eq!(tabs.tab_matching("build").unwrap(), tabs.tab_id_by_name("build").unwrap());
        assert_eq!(tabs.tab_matching("b?ild").unwrap(), tabs.tab_id_by_name("build").unwrap());
        assert_eq!(tabs.tab_matching("*oy").unwrap(), tabs.tab_id_by_name("deploy").unwrap());
        let err = tabs.tab_matching("bu*").unwrap_err();
        match err {
            TabsetError::AmbiguousName { pattern, matches } => {
                assert_eq!(pattern, "bu*");
                assert_eq!(matches, ["build", "buy"]);
            }
            other => panic!("expected AmbiguousName, got {other:?}"),
        }
        assert!(matches!(
            tabs.tab_matching("zz*"),
            Err(TabsetError::NoSuchTab { .. })
        ));
    }

    #[test]
    fn glob_star_backtracks() {
        assert!(glob_match("a*b*c", "axxbyyc"));
        assert!(glob_match("a*b*c", "abc"));
        assert!(glob_match("*", ""));
        assert!(glob_match("so?e", "some"));
        assert!(!glob_match("a*b*c", "axxbyy"));
        assert!(!glob_match("so?e", "sole?"));
    }

    // --- dirty flag scheduling ---

    #[test]
    fn mutations_mark_dirty_and_recompute_clears_it() {
        let mut tabs = tabset_with(&["a", "b"]);
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 400, 300);
        assert!(!tabs.needs_layout());

        let a = tabs.tab_id_by_name("a").unwrap();
        tabs.select(tabs.tab_id_by_name("b").unwrap()).unwrap();
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 400, 300);

        tabs.set_state(a, TabState::Disabled).unwrap();
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 400, 300);

        tabs.configure("gap", "4").unwrap();
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 400, 300);

        tabs.set_area(Size::new(500, 300));
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 500, 300);
        assert!(!tabs.needs_layout());

        // Setting the same area again is not a change.
        tabs.set_area(Size::new(500, 300));
        assert!(!tabs.needs_layout());
    }

    // --- layout pass ---

    #[test]
    fn recompute_packs_and_fills_the_strip() {
        let mut tabs = tabset_with(&["alpha", "beta", "gamma"]);
        tabs.recompute(&cells(), 400, 300);
        let layout = tabs.layout();
        assert_eq!(layout.tabs.len(), 3);
        // Default inset 2 and select pad 2 on both ends of the axis.
        assert_eq!(layout.world_width, 400 - 2 * (2 + 2));
        assert!(!layout.flags.contains(LayoutFlags::OVERFULL));
        for (_, tab) in tabs.iter() {
            assert!(tab.is_on_screen());
            assert!(tab.label().is_some());
        }
        assert_eq!(tabs.start(), tabs.tab_id_by_name("alpha"));
    }

    #[test]
    fn hidden_tabs_are_not_packed() {
        let mut tabs = tabset_with(&["a", "b", "c"]);
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.set_state(b, TabState::Hidden).unwrap();
        tabs.recompute(&cells(), 400, 300);
        assert_eq!(tabs.layout().tabs.len(), 2);
        assert_eq!(tabs.tab(b).unwrap().slot(), None);
        assert!(!tabs.tab(b).unwrap().is_on_screen());
        assert!(tabs.world_rect(b).is_none());
    }

    #[test]
    fn overfull_strip_scrolls_and_windows_visibility() {
        let mut tabs = Tabset::default();
        for i in 0..12 {
            tabs.add_tab(&format!("document{i}")).unwrap();
        }
        tabs.recompute(&cells(), 240, 300);
        assert!(tabs.flags().contains(LayoutFlags::OVERFULL));
        let first = tabs.tab_at(0).unwrap();
        let last = tabs.tab_at(11).unwrap();
        assert!(tabs.tab(first).unwrap().is_on_screen());
        assert!(!tabs.tab(last).unwrap().is_on_screen());
        assert_eq!(tabs.start(), Some(first));

        // Scroll to the far end; the window and start follow.
        tabs.set_scroll_offset(i32::MAX);
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 240, 300);
        let avail = 240 - 2 * (2 + 2);
        assert_eq!(
            tabs.scroll_offset(),
            tabs.layout().world_width - avail
        );
        assert!(!tabs.tab(first).unwrap().is_on_screen());
        assert!(tabs.tab(last).unwrap().is_on_screen());
        assert_ne!(tabs.start(), Some(first));
    }

    #[test]
    fn ensure_visible_scrolls_just_enough() {
        let mut tabs = Tabset::default();
        for i in 0..12 {
            tabs.add_tab(&format!("document{i}")).unwrap();
        }
        tabs.recompute(&cells(), 240, 300);
        let last = tabs.tab_at(11).unwrap();
        tabs.ensure_visible(last).unwrap();
        tabs.recompute(&cells(), 240, 300);
        assert!(tabs.tab(last).unwrap().is_on_screen());
        let rect = tabs.world_rect(last).unwrap();
        let avail = 240 - 2 * (2 + 2);
        assert_eq!(tabs.scroll_offset(), rect.right() - avail);

        // Scrolling back to the first tab snaps to its left edge.
        let first = tabs.tab_at(0).unwrap();
        tabs.ensure_visible(first).unwrap();
        assert_eq!(tabs.scroll_offset(), 0);
    }

    #[test]
    fn multi_tier_selection_lands_on_the_page_tier() {
        let mut tabs = Tabset::default();
        tabs.configure("tiers", "3").unwrap();
        for i in 0..9 {
            tabs.add_tab(&format!("tab{i}")).unwrap();
        }
        let picked = tabs.tab_at(7).unwrap();
        tabs.select(picked).unwrap();
        tabs.recompute(&cells(), 200, 300);
        assert_eq!(tabs.layout().tiers, 3);
        assert_eq!(tabs.tier(picked), Some(1));
        // Tier 1 sits page-adjacent, at the largest world y.
        let rect = tabs.world_rect(picked).unwrap();
        assert_eq!(
            rect.y,
            (tabs.layout().tiers as i32 - 1) * tabs.layout().tab_height
        );
        // The start tab opens the selected tier.
        let start = tabs.start().unwrap();
        assert_eq!(tabs.tier(start), Some(1));
        assert_eq!(tabs.world_rect(start).unwrap().x, 0);
    }

    #[test]
    fn plus_tab_keeps_its_natural_width() {
        let mut tabs = tabset_with(&["alpha", "beta"]);
        tabs.add_tab(PLUS_TAB_NAME).unwrap();
        tabs.recompute(&cells(), 300, 200);
        let narrow = tabs.world_rect(tabs.tab_id_by_name(PLUS_TAB_NAME).unwrap()).unwrap();
        tabs.set_area(Size::new(600, 200));
        tabs.recompute(&cells(), 600, 200);
        let wide = tabs.world_rect(tabs.tab_id_by_name(PLUS_TAB_NAME).unwrap()).unwrap();
        // Slack goes to the ordinary tabs; the plus tab never grows.
        assert_eq!(narrow.width, wide.width);
        let alpha = tabs.world_rect(tabs.tab_id_by_name("alpha").unwrap()).unwrap();
        assert!(alpha.width > wide.width);
    }

    #[test]
    fn strip_thickness_feeds_the_cavity() {
        let mut tabs = tabset_with(&["a", "b"]);
        tabs.recompute(&cells(), 400, 300);
        let thickness = tabs.strip_thickness();
        assert_eq!(thickness, 2 + 2 + tabs.layout().world_height);
        assert_eq!(tabs.cavity(), Rect::new(0, thickness, 400, 300 - thickness));

        tabs.configure("side", "left").unwrap();
        tabs.recompute(&cells(), 400, 300);
        let thickness = tabs.strip_thickness();
        assert_eq!(tabs.cavity(), Rect::new(thickness, 0, 400 - thickness, 300));
    }

    #[test]
    fn hidden_strip_leaves_the_whole_area_for_pages() {
        let mut tabs = tabset_with(&["a", "b"]);
        tabs.configure("show-tabs", "never").unwrap();
        tabs.recompute(&cells(), 400, 300);
        assert!(!tabs.strip_visible());
        assert_eq!(tabs.strip_thickness(), 0);
        assert_eq!(tabs.cavity(), Rect::from_size(400, 300));
        assert!(!tabs.tab(tabs.tab_at(0).unwrap()).unwrap().is_on_screen());
    }

    #[test]
    fn show_tabs_multiple_needs_a_second_tab() {
        let mut tabs = Tabset::default();
        tabs.configure("show-tabs", "multiple").unwrap();
        tabs.add_tab("a").unwrap();
        tabs.recompute(&cells(), 400, 300);
        assert!(!tabs.strip_visible());
        tabs.add_tab("b").unwrap();
        tabs.recompute(&cells(), 400, 300);
        assert!(tabs.strip_visible());
    }

    #[test]
    fn screen_rect_round_trips_through_the_projection() {
        let mut tabs = tabset_with(&["a", "b", "c"]);
        tabs.configure("side", "bottom").unwrap();
        tabs.recompute(&cells(), 400, 300);
        let b = tabs.tab_id_by_name("b").unwrap();
        let world = tabs.world_rect(b).unwrap();
        let screen = tabs.screen_rect(b).unwrap();
        let proj = tabs.projection();
        assert_eq!(proj.rect_to_screen(world), screen);
        // Bottom side: the strip hugs the bottom edge of the area.
        assert_eq!(screen.bottom(), 300 - 2 - 2);
    }

    // --- page collaboration ---

    #[test]
    fn page_area_defaults_to_the_whole_cavity() {
        let mut tabs = tabset_with(&["a"]);
        tabs.recompute(&cells(), 400, 300);
        let a = tabs.tab_id_by_name("a").unwrap();
        assert_eq!(tabs.page_area(a).unwrap(), tabs.cavity());
    }

    #[test]
    fn page_geometry_request_overrides_natural_size() {
        let mut tabs = tabset_with(&["a"]);
        let a = tabs.tab_id_by_name("a").unwrap();
        tabs.set_page(
            a,
            Some(PageSlot {
                handle: 77,
                size_override: None,
                fill: Fill::NONE,
                anchor: Anchor::Nw,
                pad: Sides::all(0),
            }),
        )
        .unwrap();
        tabs.recompute(&cells(), 400, 300);
        assert!(tabs.page_geometry_request(77, Size::new(120, 80)));
        assert!(tabs.needs_layout());
        tabs.recompute(&cells(), 400, 300);
        let cavity = tabs.cavity();
        assert_eq!(
            tabs.page_area(a).unwrap(),
            Rect::new(cavity.x, cavity.y, 120, 80)
        );
        assert!(!tabs.page_geometry_request(99, Size::new(1, 1)));
    }

    #[test]
    fn page_destroyed_deletes_the_owning_tab() {
        let mut tabs = tabset_with(&["a", "b"]);
        let b = tabs.tab_id_by_name("b").unwrap();
        tabs.set_page(b, Some(PageSlot::new(5))).unwrap();
        assert_eq!(tabs.page_destroyed(5), Some(b));
        assert_eq!(tabs.tab(b), None);
        assert_eq!(tabs.page_destroyed(5), None);
    }

    // --- snapshot ---

    #[cfg(feature = "state-persistence")]
    #[test]
    fn snapshot_round_trips_through_json() {
        let mut tabs = Tabset::default();
        tabs.configure("side", "left").unwrap();
        tabs.configure("slant", "right").unwrap();
        tabs.configure("tiers", "2").unwrap();
        tabs.configure("tearoff", "on").unwrap();
        for name in ["build", "run", "logs"] {
            tabs.add_tab(name).unwrap();
        }
        let run = tabs.tab_id_by_name("run").unwrap();
        let logs = tabs.tab_id_by_name("logs").unwrap();
        tabs.select(run).unwrap();
        tabs.set_state(logs, TabState::Disabled).unwrap();
        tabs.set_torn_off(run, true).unwrap();

        let snap = tabs.snapshot();
        let json = serde_json::to_string(&snap).unwrap();
        let back: super::TabsetSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(back, snap);

        let restored = Tabset::from_snapshot(&back).unwrap();
        assert!(restored.needs_layout());
        let names: Vec<&str> = restored.iter().map(|(_, tab)| tab.name()).collect();
        assert_eq!(names, ["build", "run", "logs"]);
        let run = restored.tab_id_by_name("run").unwrap();
        assert_eq!(restored.selected(), Some(run));
        assert!(restored.tab(run).unwrap().is_torn_off());
        assert_eq!(
            restored.tab(restored.tab_id_by_name("logs").unwrap()).unwrap().state(),
            TabState::Disabled
        );
        assert_eq!(restored.options(), tabs.options());
    }

    #[cfg(feature = "state-persistence")]
    #[test]
    fn snapshot_with_bad_state_keyword_is_rejected() {
        let mut snap = tabset_with(&["a"]).snapshot();
        snap.tabs[0].state = "pinned".to_string();
        assert!(matches!(
            Tabset::from_snapshot(&snap),
            Err(TabsetError::InvalidOption { .. })
        ));
    }

    // --- tracing ---

    #[cfg(feature = "tracing")]
    #[derive(Default)]
    struct TabsetTraceState {
        saw_layout_span: bool,
        saw_select_event: bool,
        saw_duration_record: bool,
    }

    #[cfg(feature = "tracing")]
    struct TabsetTraceCapture {
        state: Arc<Mutex<TabsetTraceState>>,
    }

    #[cfg(feature = "tracing")]
    impl<S> Layer<S> for TabsetTraceCapture
    where
        S: Subscriber + for<'lookup> tracing_subscriber::registry::LookupSpan<'lookup>,
    {
        fn on_new_span(
            &self,
            attrs: &tracing::span::Attributes<'_>,
            _id: &tracing::Id,
            _ctx: Context<'_, S>,
        ) {
            if attrs.metadata().name() == "tabset.layout" {
                self.state.lock().expect("tabset trace lock").saw_layout_span = true;
            }
        }

        fn on_record(
            &self,
            id: &tracing::Id,
            values: &tracing::span::Record<'_>,
            ctx: Context<'_, S>,
        ) {
            let Some(span) = ctx.span(id) else {
                return;
            };
            if span.metadata().name() != "tabset.layout" {
                return;
            }
            struct V {
                saw: bool,
            }
            impl tracing::field::Visit for V {
                fn record_u64(&mut self, field: &tracing::field::Field, _value: u64) {
                    if field.name() == "layout_duration_us" {
                        self.saw = true;
                    }
                }

                fn record_debug(
                    &mut self,
                    _field: &tracing::field::Field,
                    _value: &dyn std::fmt::Debug,
                ) {
                }
            }
            let mut v = V { saw: false };
            values.record(&mut v);
            if v.saw {
                self.state
                    .lock()
                    .expect("tabset trace lock")
                    .saw_duration_record = true;
            }
        }

        fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
            struct Msg {
                message: Option<String>,
            }
            impl tracing::field::Visit for Msg {
                fn record_str(&mut self, field: &tracing::field::Field, value: &str) {
                    if field.name() == "message" {
                        self.message = Some(value.to_string());
                    }
                }

                fn record_debug(
                    &mut self,
                    field: &tracing::field::Field,
                    value: &dyn std::fmt::Debug,
                ) {
                    if field.name() == "message" {
                        self.message = Some(format!("{value:?}").trim_matches('"').to_string());
                    }
                }
            }
            let mut msg = Msg { message: None };
            event.record(&mut msg);
            if msg.message.as_deref() == Some("tabset.select") {
                self.state.lock().expect("tabset trace lock").saw_select_event = true;
            }
        }
    }

    #[cfg(feature = "tracing")]
    #[test]
    fn layout_span_and_select_event_are_emitted() {
        let state = Arc::new(Mutex::new(TabsetTraceState::default()));
        let subscriber = tracing_subscriber::registry().with(TabsetTraceCapture {
            state: Arc::clone(&state),
        });
        let _guard = tracing::subscriber::set_default(subscriber);

        let mut tabs = tabset_with(&["a", "b"]);
        tabs.select(tabs.tab_id_by_name("b").unwrap()).unwrap();
        tabs.recompute(&cells(), 400, 300);

        let state = state.lock().expect("tabset trace lock");
        assert!(state.saw_layout_span);
        assert!(state.saw_select_event);
        assert!(state.saw_duration_record);
    }
}
