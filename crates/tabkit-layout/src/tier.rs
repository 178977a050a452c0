#![forbid(unsafe_code)]

//! Tier renumbering around the selected tab.
//!
//! In a tiered layout the selected tab's row always renders adjacent to
//! the page, so its outline flows into the page border. [`renumber`]
//! rotates tier numbers until the selected tab sits in tier 1 and
//! recomputes each row's world y. Display order never changes; rows move,
//! tabs within them do not.

use crate::pack::Layout;

/// Rotate tier numbers so `selected`'s tier becomes tier 1.
///
/// Returns the display index of the first tab in the selected tier, also
/// stored in `layout.start`. Rows keep their members and their order;
/// tier numbers rotate by `1 - selected_tier` modulo the tier count and
/// `y = (tiers - tier) * tab_height` is reassigned. Out-of-range
/// `selected` and single-tier layouts leave the numbering alone.
pub fn renumber(layout: &mut Layout, selected: usize) -> usize {
    if layout.tiers <= 1 || selected >= layout.tabs.len() {
        layout.start = 0;
        return 0;
    }

    let selected_tier = layout.tabs[selected].tier;
    let tiers = layout.tiers as i32;

    let mut start = selected;
    while start > 0 && layout.tabs[start - 1].tier == selected_tier {
        start -= 1;
    }

    for tab in &mut layout.tabs {
        let rotated = (tab.tier as i32 - selected_tier as i32 + 1).rem_euclid(tiers);
        tab.tier = if rotated == 0 { layout.tiers } else { rotated as usize };
        tab.y = (tiers - tab.tier as i32) * layout.tab_height;
    }

    layout.start = start;
    start
}
