#![forbid(unsafe_code)]

//! The tab packer: natural widths, tiering, and exact-fit adjustment.
//!
//! One call to [`pack`] turns measured label sizes into world-space tab
//! geometry. The pass has three phases: natural sizing (label width plus
//! slant allowance, or the uniform width for `Same`/`Fixed` policies),
//! tier assignment, and slack distribution so tiers fit the viewport.
//!
//! Tier behavior splits on the requested tier count. At most one tier: a
//! strip wider than the viewport is left at natural size and flagged
//! [`LayoutFlags::OVERFULL`] for the host to scroll; a narrower strip
//! grows fairly to fill. More than one: tabs chunk into
//! `ceil(n / ceil(n / requested))` tiers in display order and every tier
//! is grown or shrunk to exactly the viewport width, since scrolling is
//! unavailable in tiered mode.
//!
//! # Invariants
//!
//! - Tab heights are uniform (the tallest rotated label).
//! - Within a tier, `x[i+1] == x[i] + width[i] + gap - overlap`.
//! - The plus tab keeps its natural width through every phase.
//! - Widths never drop below 1; an unrecoverable deficit leaves the tier
//!   overfull rather than violating the floor.
//!
//! # Failure Modes
//!
//! None; packing is total. Degenerate inputs (zero tabs, non-positive
//! viewport) produce empty or overfull layouts, never panics.

use std::fmt;
use std::str::FromStr;

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use tabkit_core::geometry::Size;
use tabkit_core::side::{ParseKeywordError, Slant};

use crate::slack::{distribute_fair, reflow_positions, shrink_ranked};

/// Width consumed by a square (unslanted) tab end.
pub const CORNER_INSET: i32 = 3;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// How tab widths are chosen.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum WidthPolicy {
    /// Each tab takes its own label width.
    #[default]
    Variable,
    /// Every tab takes the widest label's width.
    Same,
    /// Every tab takes the given width, floored to the widest label.
    Fixed(i32),
}

impl fmt::Display for WidthPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            WidthPolicy::Variable => f.write_str("variable"),
            WidthPolicy::Same => f.write_str("same"),
            WidthPolicy::Fixed(px) => write!(f, "{px}"),
        }
    }
}

impl FromStr for WidthPolicy {
    type Err = ParseKeywordError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "variable" => Ok(WidthPolicy::Variable),
            "same" => Ok(WidthPolicy::Same),
            other => match other.parse::<i32>() {
                Ok(px) if px >= 0 => Ok(WidthPolicy::Fixed(px)),
                _ => Err(ParseKeywordError::new("tab width", other)),
            },
        }
    }
}

bitflags! {
    /// Packing outcome flags.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct LayoutFlags: u8 {
        /// Single-tier strip wider than the viewport; the host scrolls.
        const OVERFULL   = 0b01;
        /// The layout has more than one tier.
        const MULTI_TIER = 0b10;
    }
}

/// One tab's measured input to the packer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TabSlot {
    /// Rotated label size.
    pub label: Size,
    /// The reserved new-tab slot: natural width, never adjusted.
    pub is_plus: bool,
}

/// Parameters for one packing pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PackInput<'a> {
    pub slots: &'a [TabSlot],
    pub policy: WidthPolicy,
    pub slant: Slant,
    /// Pixels between neighboring tabs.
    pub gap: i32,
    /// Pixels neighboring tabs overlap (subtracts from `gap`).
    pub overlap: i32,
    /// Viewport extent along the strip axis.
    pub avail: i32,
    /// 0 or 1 = single tier plus scrolling; above 1 = exact-fit tiers.
    pub requested_tiers: usize,
}

/// Per-tab packed geometry, world space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TabLayout {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    /// 1-based; tier 1 sits adjacent to the page.
    pub tier: usize,
}

/// The result of one packing pass.
///
/// Immutable between passes: the widget replaces the whole value on
/// recompute and only [`crate::tier::renumber`] rewrites tier numbers in
/// place.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Layout {
    /// Per-tab geometry, display order.
    pub tabs: Vec<TabLayout>,
    /// Number of tiers; 0 for an empty layout.
    pub tiers: usize,
    /// Uniform tab height.
    pub tab_height: i32,
    /// Widest final tab width.
    pub max_tab_width: i32,
    /// Extent of the widest tier along the strip.
    pub world_width: i32,
    /// `tiers * tab_height`.
    pub world_height: i32,
    pub flags: LayoutFlags,
    /// Display index of the first tab of tier 1 (set by renumbering).
    pub start: usize,
}

impl Layout {
    /// Flat serializable image of this layout for diffing in tests and
    /// diagnostics.
    #[must_use]
    pub fn snapshot(&self) -> LayoutSnapshot {
        LayoutSnapshot {
            tabs: self
                .tabs
                .iter()
                .map(|t| TabRecord {
                    x: t.x,
                    y: t.y,
                    width: t.width,
                    height: t.height,
                    tier: t.tier,
                })
                .collect(),
            tiers: self.tiers,
            tab_height: self.tab_height,
            world_width: self.world_width,
            world_height: self.world_height,
            overfull: self.flags.contains(LayoutFlags::OVERFULL),
            multi_tier: self.flags.contains(LayoutFlags::MULTI_TIER),
            start: self.start,
        }
    }
}

/// One tab in a [`LayoutSnapshot`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabRecord {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
    pub tier: usize,
}

/// Serializable image of a packing pass.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct LayoutSnapshot {
    pub tabs: Vec<TabRecord>,
    pub tiers: usize,
    pub tab_height: i32,
    pub world_width: i32,
    pub world_height: i32,
    pub overfull: bool,
    pub multi_tier: bool,
    pub start: usize,
}

// ---------------------------------------------------------------------------
// Packing
// ---------------------------------------------------------------------------

/// Strip width both tab ends consume together.
fn slant_allowance(slant: Slant, tab_height: i32) -> i32 {
    let left = if slant.contains(Slant::LEFT) {
        tab_height
    } else {
        CORNER_INSET
    };
    let right = if slant.contains(Slant::RIGHT) {
        tab_height
    } else {
        CORNER_INSET
    };
    left + right
}

/// Extent of a reflowed row along the strip.
fn strip_extent(tabs: &[TabLayout]) -> i32 {
    tabs.iter().map(|t| t.x + t.width).max().unwrap_or(0)
}

/// Adjustable indices within `lo..hi`, relative to `lo`.
fn adjustable_in(slots: &[TabSlot], lo: usize, hi: usize) -> Vec<usize> {
    (lo..hi)
        .filter(|&i| !slots[i].is_plus)
        .map(|i| i - lo)
        .collect()
}

/// Pack measured tabs into world-space geometry.
#[must_use]
pub fn pack(input: &PackInput) -> Layout {
    let n = input.slots.len();
    if n == 0 {
        return Layout::default();
    }

    let tab_height = input
        .slots
        .iter()
        .map(|s| s.label.height)
        .max()
        .unwrap_or(0);
    let allowance = slant_allowance(input.slant, tab_height);
    let max_label = input
        .slots
        .iter()
        .filter(|s| !s.is_plus)
        .map(|s| s.label.width)
        .max()
        .unwrap_or(0);

    let uniform = match input.policy {
        WidthPolicy::Variable => 0,
        WidthPolicy::Same => max_label + allowance,
        WidthPolicy::Fixed(px) => px.max(max_label) + allowance,
    };

    let mut tabs: Vec<TabLayout> = input
        .slots
        .iter()
        .map(|slot| {
            let width = if slot.is_plus || matches!(input.policy, WidthPolicy::Variable) {
                slot.label.width + allowance
            } else {
                uniform
            };
            TabLayout {
                x: 0,
                y: 0,
                width: width.max(1),
                height: tab_height,
                tier: 1,
            }
        })
        .collect();

    let spacing = input.gap - input.overlap;
    let mut flags = LayoutFlags::empty();

    let tiers = if input.requested_tiers <= 1 {
        reflow_positions(&mut tabs, spacing);
        let natural = strip_extent(&tabs);
        if natural > input.avail {
            flags |= LayoutFlags::OVERFULL;
        } else if natural < input.avail {
            let adjustable = adjustable_in(input.slots, 0, n);
            let _ = distribute_fair(&mut tabs, &adjustable, input.avail - natural);
            reflow_positions(&mut tabs, spacing);
        }
        1
    } else {
        let per = n.div_ceil(input.requested_tiers);
        let tiers = n.div_ceil(per);
        for (i, tab) in tabs.iter_mut().enumerate() {
            tab.tier = i / per + 1;
        }
        for t in 0..tiers {
            let lo = t * per;
            let hi = ((t + 1) * per).min(n);
            let row = &mut tabs[lo..hi];
            reflow_positions(row, spacing);
            let delta = input.avail - strip_extent(row);
            let adjustable = adjustable_in(input.slots, lo, hi);
            if delta > 0 {
                let _ = distribute_fair(row, &adjustable, delta);
            } else if delta < 0 {
                // Residual deficits leave the tier overfull; tolerated.
                let _ = match input.policy {
                    WidthPolicy::Variable => shrink_ranked(row, &adjustable, -delta),
                    _ => -distribute_fair(row, &adjustable, delta),
                };
            }
            reflow_positions(row, spacing);
        }
        if tiers > 1 {
            flags |= LayoutFlags::MULTI_TIER;
        }
        tiers
    };

    for tab in &mut tabs {
        tab.y = (tiers - tab.tier) as i32 * tab_height;
    }

    let world_width = strip_extent(&tabs);
    let max_tab_width = tabs.iter().map(|t| t.width).max().unwrap_or(0);

    Layout {
        tabs,
        tiers,
        tab_height,
        max_tab_width,
        world_width,
        world_height: tiers as i32 * tab_height,
        flags,
        start: 0,
    }
}

#[cfg(test)]
mod tests {
    use super::{
        CORNER_INSET, LayoutFlags, PackInput, TabSlot, WidthPolicy, pack, slant_allowance,
    };
    use tabkit_core::geometry::Size;
    use tabkit_core::side::Slant;

    fn slots(sizes: &[(i32, i32)]) -> Vec<TabSlot> {
        sizes
            .iter()
            .map(|&(w, h)| TabSlot {
                label: Size::new(w, h),
                is_plus: false,
            })
            .collect()
    }

    fn input<'a>(slots: &'a [TabSlot], avail: i32, tiers: usize) -> PackInput<'a> {
        PackInput {
            slots,
            policy: WidthPolicy::Variable,
            slant: Slant::NONE,
            gap: 2,
            overlap: 0,
            avail,
            requested_tiers: tiers,
        }
    }

    // --- natural sizing ---

    #[test]
    fn empty_input_is_empty_layout() {
        let layout = pack(&input(&[], 400, 1));
        assert!(layout.tabs.is_empty());
        assert_eq!(layout.tiers, 0);
        assert_eq!(layout.world_width, 0);
        assert_eq!(layout.world_height, 0);
    }

    #[test]
    fn heights_are_uniform() {
        let s = slots(&[(30, 12), (40, 20), (25, 16)]);
        let layout = pack(&input(&s, 1000, 1));
        assert!(layout.tabs.iter().all(|t| t.height == 20));
        assert_eq!(layout.tab_height, 20);
    }

    #[test]
    fn slant_allowances() {
        assert_eq!(slant_allowance(Slant::NONE, 20), 2 * CORNER_INSET);
        assert_eq!(slant_allowance(Slant::LEFT, 20), 20 + CORNER_INSET);
        assert_eq!(slant_allowance(Slant::BOTH, 20), 40);
    }

    #[test]
    fn variable_width_is_label_plus_allowance() {
        let s = slots(&[(30, 20), (50, 20)]);
        let mut inp = input(&s, 10_000, 1);
        inp.slant = Slant::BOTH;
        let layout = pack(&inp);
        // Surplus grows, so use an overfull viewport to see natural widths.
        inp.avail = 10;
        let layout2 = pack(&inp);
        assert_eq!(layout2.tabs[0].width, 30 + 40);
        assert_eq!(layout2.tabs[1].width, 50 + 40);
        assert!(layout.tabs[0].width >= layout2.tabs[0].width);
    }

    #[test]
    fn same_policy_uses_widest_label() {
        let s = slots(&[(30, 20), (50, 20), (10, 20)]);
        let mut inp = input(&s, 10, 1); // overfull, widths untouched
        inp.policy = WidthPolicy::Same;
        let layout = pack(&inp);
        let expect = 50 + 2 * CORNER_INSET;
        assert!(layout.tabs.iter().all(|t| t.width == expect));
    }

    #[test]
    fn fixed_policy_floors_at_widest_label() {
        let s = slots(&[(30, 20), (50, 20)]);
        let mut inp = input(&s, 10, 1);
        inp.policy = WidthPolicy::Fixed(40);
        let layout = pack(&inp);
        assert!(layout.tabs.iter().all(|t| t.width == 50 + 2 * CORNER_INSET));

        inp.policy = WidthPolicy::Fixed(80);
        let layout = pack(&inp);
        assert!(layout.tabs.iter().all(|t| t.width == 80 + 2 * CORNER_INSET));
    }

    #[test]
    fn plus_slot_keeps_natural_width() {
        let mut s = slots(&[(30, 20), (30, 20), (9, 20)]);
        s[2].is_plus = true;
        let mut inp = input(&s, 10, 1);
        inp.policy = WidthPolicy::Same;
        let layout = pack(&inp);
        assert_eq!(layout.tabs[0].width, 30 + 2 * CORNER_INSET);
        assert_eq!(layout.tabs[2].width, 9 + 2 * CORNER_INSET);
    }

    // --- single tier ---

    #[test]
    fn overfull_single_tier_keeps_natural_widths() {
        let s = slots(&[(100, 20), (100, 20), (100, 20)]);
        let layout = pack(&input(&s, 200, 1));
        assert!(layout.flags.contains(LayoutFlags::OVERFULL));
        assert!(!layout.flags.contains(LayoutFlags::MULTI_TIER));
        let w = 100 + 2 * CORNER_INSET;
        assert!(layout.tabs.iter().all(|t| t.width == w));
        // Exact natural extent, for scroll clamping.
        assert_eq!(layout.world_width, 3 * w + 2 * 2);
        assert_eq!(layout.tiers, 1);
    }

    #[test]
    fn surplus_single_tier_grows_to_fill() {
        let s = slots(&[(50, 20), (50, 20)]);
        let layout = pack(&input(&s, 300, 1));
        assert!(layout.flags.is_empty());
        assert_eq!(layout.world_width, 300);
        // 2px gap; widths absorb the rest.
        let total: i32 = layout.tabs.iter().map(|t| t.width).sum();
        assert_eq!(total, 298);
    }

    #[test]
    fn exact_fit_single_tier_untouched() {
        let s = slots(&[(50, 20), (50, 20)]);
        let natural = 2 * (50 + 2 * CORNER_INSET) + 2;
        let layout = pack(&input(&s, natural, 1));
        assert!(layout.flags.is_empty());
        assert!(layout.tabs.iter().all(|t| t.width == 50 + 2 * CORNER_INSET));
    }

    #[test]
    fn zero_requested_tiers_means_single_tier() {
        let s = slots(&[(50, 20), (50, 20)]);
        let layout = pack(&input(&s, 100, 0));
        assert_eq!(layout.tiers, 1);
        assert!(layout.flags.contains(LayoutFlags::OVERFULL));
    }

    // --- multiple tiers ---

    #[test]
    fn tier_chunks_are_ceil_divided() {
        let s = slots(&[(30, 20); 7]);
        let layout = pack(&input(&s, 400, 3));
        assert_eq!(layout.tiers, 3);
        let counts: Vec<usize> = (1..=3)
            .map(|t| layout.tabs.iter().filter(|tab| tab.tier == t).count())
            .collect();
        assert_eq!(counts, vec![3, 3, 1]);
        assert!(layout.flags.contains(LayoutFlags::MULTI_TIER));
    }

    #[test]
    fn requested_tiers_cap_by_tab_count() {
        let s = slots(&[(30, 20), (30, 20)]);
        let layout = pack(&input(&s, 400, 5));
        // per = 1, so only as many tiers as tabs.
        assert_eq!(layout.tiers, 2);
    }

    #[test]
    fn every_tier_fits_exactly() {
        let s = slots(&[(80, 20), (30, 20), (55, 20), (70, 20), (20, 20)]);
        let avail = 150;
        let layout = pack(&input(&s, avail, 2));
        assert_eq!(layout.tiers, 2);
        for t in 1..=2 {
            let extent = layout
                .tabs
                .iter()
                .filter(|tab| tab.tier == t)
                .map(|tab| tab.x + tab.width)
                .max()
                .unwrap();
            assert_eq!(extent, avail, "tier {t}");
        }
        assert_eq!(layout.world_width, avail);
        assert!(!layout.flags.contains(LayoutFlags::OVERFULL));
    }

    #[test]
    fn tiered_shrink_uses_rank_for_variable() {
        // Tier 1 holds a narrow and a wide tab (46px and 106px natural);
        // the 34px deficit comes out of the wide one alone.
        let s = slots(&[(40, 20), (100, 20), (100, 20)]);
        let layout = pack(&input(&s, 120, 2));
        assert_eq!(layout.tabs[0].tier, 1);
        assert_eq!(layout.tabs[1].tier, 1);
        assert_eq!(layout.tabs[2].tier, 2);
        assert_eq!(layout.tabs[0].width, 46);
        assert_eq!(layout.tabs[1].width, 72);
        // The solo second-tier tab grows to fill.
        assert_eq!(layout.tabs[2].width, 120);
    }

    #[test]
    fn tiered_shrink_is_fair_for_uniform() {
        let s = slots(&[(100, 20), (60, 20), (100, 20), (60, 20)]);
        let mut inp = input(&s, 150, 2);
        inp.policy = WidthPolicy::Same;
        let layout = pack(&inp);
        // Uniform width 106 per tab, two per tier, extent 214; every tab
        // gives up the same share of the 64px deficit.
        assert!(layout.tabs.iter().all(|t| t.width == 74));
        assert_eq!(layout.world_width, 150);
    }

    #[test]
    fn tiered_positions_follow_spacing() {
        let s = slots(&[(30, 20); 6]);
        let mut inp = input(&s, 500, 2);
        inp.gap = 5;
        inp.overlap = 2;
        let layout = pack(&inp);
        for t in 1..=layout.tiers {
            let row: Vec<_> = layout.tabs.iter().filter(|tab| tab.tier == t).collect();
            for pair in row.windows(2) {
                assert_eq!(pair[1].x, pair[0].x + pair[0].width + 5 - 2);
            }
            assert_eq!(row[0].x, 0);
        }
    }

    #[test]
    fn tier_rows_stack_toward_the_page() {
        let s = slots(&[(30, 20); 6]);
        let layout = pack(&input(&s, 500, 3));
        assert_eq!(layout.tiers, 3);
        assert_eq!(layout.world_height, 60);
        for tab in &layout.tabs {
            assert_eq!(tab.y, (3 - tab.tier) as i32 * 20);
        }
        // Tier 1 is the innermost row.
        let tier1_y = layout.tabs.iter().find(|t| t.tier == 1).unwrap().y;
        assert_eq!(tier1_y, 40);
    }

    // --- snapshot ---

    #[test]
    fn snapshot_mirrors_layout() {
        let s = slots(&[(30, 20), (40, 20)]);
        let layout = pack(&input(&s, 100, 1));
        let snap = layout.snapshot();
        assert_eq!(snap.tabs.len(), 2);
        assert_eq!(snap.tabs[1].width, layout.tabs[1].width);
        assert_eq!(snap.tiers, 1);
        assert_eq!(snap.overfull, layout.flags.contains(LayoutFlags::OVERFULL));
        assert_eq!(snap.world_width, layout.world_width);
    }

    // --- width policy parsing ---

    #[test]
    fn width_policy_keywords() {
        assert_eq!("variable".parse::<WidthPolicy>(), Ok(WidthPolicy::Variable));
        assert_eq!("same".parse::<WidthPolicy>(), Ok(WidthPolicy::Same));
        assert_eq!("120".parse::<WidthPolicy>(), Ok(WidthPolicy::Fixed(120)));
        assert!("-4".parse::<WidthPolicy>().is_err());
        assert!("wide".parse::<WidthPolicy>().is_err());
    }
}
